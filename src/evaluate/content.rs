//! Content grading of a transcript against a fixed five-dimension rubric.
//!
//! The rubric prompt instructs the model to answer in a fixed Japanese format
//! (`<label>評価：<n>/<max>`), which is then recovered with per-dimension
//! regexes. Dimensions the model skips or malforms are reported explicitly
//! rather than silently scored as zero.

use crate::error::{Result, TalkscoreError};
use crate::llm::ChatConversation;
use crate::recording::Recording;
use log::warn;
use regex::Regex;

/// `(field label, maximum score)` for each rubric dimension, in prompt order.
const DIMENSIONS: [(&str, u32); 5] = [
    ("一貫性", 10),
    ("構成", 10),
    ("独自性", 10),
    ("文法", 5),
    ("語彙", 5),
];

/// Sub-scores recovered from one rubric response.
///
/// `None` means the dimension was not found in the response, which includes
/// out-of-range values (`12/10` is treated as absent, not clamped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSubScores {
    pub consistency: Option<u32>,
    pub structure: Option<u32>,
    pub originality: Option<u32>,
    pub grammar: Option<u32>,
    pub vocabulary: Option<u32>,
}

impl ContentSubScores {
    /// Extract sub-scores from a raw model response.
    pub fn parse(response: &str) -> Self {
        let mut values = [None; 5];
        for (slot, (label, max)) in values.iter_mut().zip(DIMENSIONS) {
            *slot = extract_dimension(response, label, max);
        }
        let [consistency, structure, originality, grammar, vocabulary] = values;
        Self {
            consistency,
            structure,
            originality,
            grammar,
            vocabulary,
        }
    }

    fn slots(&self) -> [(&'static str, Option<u32>); 5] {
        [
            ("一貫性", self.consistency),
            ("構成", self.structure),
            ("独自性", self.originality),
            ("文法", self.grammar),
            ("語彙", self.vocabulary),
        ]
    }

    /// Labels of dimensions that were found.
    pub fn found(&self) -> Vec<&'static str> {
        self.slots()
            .into_iter()
            .filter_map(|(label, v)| v.map(|_| label))
            .collect()
    }

    /// Labels of dimensions that were not found.
    pub fn missing(&self) -> Vec<&'static str> {
        self.slots()
            .into_iter()
            .filter_map(|(label, v)| v.is_none().then_some(label))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Total content score on a 0-100 scale.
    ///
    /// The five dimensions sum to at most 40, scaled by 2.5 and rounded
    /// half-away-from-zero. Errors if any dimension is missing; a partial
    /// rubric never produces a total.
    pub fn total(&self) -> Result<u32> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(TalkscoreError::PartialParse { missing });
        }
        let sum: u32 = self
            .slots()
            .into_iter()
            .filter_map(|(_, v)| v)
            .sum();
        Ok((f64::from(sum) * 2.5).round() as u32)
    }
}

fn extract_dimension(response: &str, label: &str, max: u32) -> Option<u32> {
    // Pattern like `一貫性評価：8/10`, tolerating whitespace and an ASCII
    // colon in place of the full-width one.
    let pattern = format!(r"{label}\s*評価\s*[：:]\s*(\d+)\s*/\s*{max}");
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Invalid rubric pattern for {}: {}", label, e);
            return None;
        }
    };
    let captured = re.captures(response)?.get(1)?.as_str();
    let value: u32 = captured.parse().ok()?;
    (value <= max).then_some(value)
}

/// Raw response plus whatever sub-scores could be recovered from it.
#[derive(Debug, Clone)]
pub struct ContentEvaluation {
    pub raw_response: String,
    pub scores: ContentSubScores,
}

/// Grades transcript content by sending the rubric prompt to a chat model.
pub struct ContentRelevanceEvaluator {
    conversation: ChatConversation,
    topics: Vec<String>,
}

impl ContentRelevanceEvaluator {
    pub fn new(conversation: ChatConversation, topics: Vec<String>) -> Self {
        Self {
            conversation,
            topics,
        }
    }

    /// Build the rubric prompt for a transcript.
    pub fn build_prompt(&self, transcript: &str) -> String {
        let topics = self.topics.join(", ");
        format!(
            "あなたは英語スピーチの採点者です。以下のテーマについて話された\
             英語スピーチの書き起こしを、5つの観点で採点してください。\n\
             テーマ: {topics}\n\
             \n\
             書き起こし:\n\
             「{transcript}」\n\
             \n\
             次の形式で、各観点の評価を必ず1行ずつ出力してください。\n\
             一貫性評価：{{n}}/10\n\
             構成評価：{{n}}/10\n\
             独自性評価：{{n}}/10\n\
             文法評価：{{n}}/5\n\
             語彙評価：{{n}}/5\n\
             最後に、より良い言い回しの例を「」で囲んで1つ示してください。"
        )
    }

    /// Grade the recording's transcript.
    ///
    /// Each evaluation starts from a cleared conversation so earlier
    /// transcripts cannot bias the grading.
    pub async fn evaluate(&mut self, recording: &Recording) -> Result<ContentEvaluation> {
        let transcript = recording.transcript_text()?;
        if transcript.trim().is_empty() {
            return Err(TalkscoreError::InputMissing { what: "transcript" });
        }

        self.conversation.reset();
        let prompt = self.build_prompt(&transcript);
        let raw_response = self.conversation.send(&prompt).await?;

        let scores = ContentSubScores::parse(&raw_response);
        if !scores.is_complete() {
            warn!(
                "Rubric response incomplete, missing: {}",
                scores.missing().join(", ")
            );
        }

        Ok(ContentEvaluation {
            raw_response,
            scores,
        })
    }
}
