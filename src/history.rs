//! Persisted session history: recent composite scores, a seven-day attendance
//! window, and the rank derived from both.
//!
//! The state file is plain JSON under the data directory. Time is injected
//! through the `Clock` trait so the day-rollover logic is testable.

use crate::defaults;
use crate::error::{Result, TalkscoreError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Time source seam for the attendance window.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Rank tier derived from the rank score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RankTier {
    Blue,
    Bronze,
    Silver,
    Gold,
}

impl RankTier {
    pub fn from_score(score: u32) -> Self {
        match score {
            251.. => RankTier::Gold,
            201..=250 => RankTier::Silver,
            151..=200 => RankTier::Bronze,
            _ => RankTier::Blue,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RankTier::Gold => "Gold",
            RankTier::Silver => "Silver",
            RankTier::Bronze => "Bronze",
            RankTier::Blue => "Blue",
        }
    }
}

/// Serialized history state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryState {
    /// Most recent composite scores, oldest first, at most seven entries.
    pub recent_scores: VecDeque<u32>,
    /// Attendance flags for the trailing seven days, oldest first.
    pub attendance_days: VecDeque<bool>,
    /// Epoch seconds of the last attendance credit.
    pub last_update_epoch_secs: Option<u64>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            recent_scores: VecDeque::new(),
            attendance_days: VecDeque::from(vec![false; defaults::HISTORY_CAPACITY]),
            last_update_epoch_secs: None,
        }
    }
}

/// Persistent store of session history and the derived rank.
pub struct SessionHistoryStore {
    state: HistoryState,
    rank_score: u32,
    path: PathBuf,
    clock: Box<dyn Clock>,
}

impl SessionHistoryStore {
    /// Load history from disk, rolling the attendance window forward for any
    /// days that elapsed while the store was closed.
    ///
    /// A missing state file starts fresh; a corrupt one is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        Self::load_with_clock(path, Box::new(SystemClock))
    }

    pub fn load_with_clock(path: impl Into<PathBuf>, clock: Box<dyn Clock>) -> Result<Self> {
        let path = path.into();
        let state = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| TalkscoreError::Decode {
                service: "history store",
                message: format!("{}: {}", path.display(), e),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HistoryState::default(),
            Err(e) => {
                return Err(TalkscoreError::Read {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        let mut store = Self {
            state,
            rank_score: 0,
            path,
            clock,
        };
        store.adjust_for_elapsed_time()?;
        store.update_rank();
        Ok(store)
    }

    /// Record one session's composite score.
    ///
    /// Attendance for today is credited at most once per 24 hours; further
    /// sessions the same day still record their scores.
    pub fn record_score(&mut self, score: u32) -> Result<()> {
        self.state.recent_scores.push_back(score);
        while self.state.recent_scores.len() > defaults::HISTORY_CAPACITY {
            self.state.recent_scores.pop_front();
        }

        let now_secs = epoch_secs(self.clock.now());
        let credit = match self.state.last_update_epoch_secs {
            None => true,
            Some(last) => now_secs.saturating_sub(last) >= defaults::DAY_SECS,
        };
        if credit {
            self.state.attendance_days.push_back(true);
            while self.state.attendance_days.len() > defaults::HISTORY_CAPACITY {
                self.state.attendance_days.pop_front();
            }
            self.state.last_update_epoch_secs = Some(now_secs);
            debug!("Attendance credited at epoch {}", now_secs);
        }

        self.update_rank();
        self.persist()
    }

    /// Shift the attendance window forward by the number of whole days since
    /// the last credit, marking the skipped days absent.
    fn adjust_for_elapsed_time(&mut self) -> Result<()> {
        let Some(last) = self.state.last_update_epoch_secs else {
            return Ok(());
        };
        let now_secs = epoch_secs(self.clock.now());
        let elapsed_days = now_secs.saturating_sub(last) / defaults::DAY_SECS;
        if elapsed_days == 0 {
            return Ok(());
        }

        // Shifting by more than the window length clears it entirely, so the
        // shift is bounded by the capacity.
        let shift = (elapsed_days.min(defaults::HISTORY_CAPACITY as u64)) as usize;
        for _ in 0..shift {
            self.state.attendance_days.pop_front();
            self.state.attendance_days.push_back(false);
        }

        // Advance by whole days so the fractional remainder still counts
        // toward the next credit.
        self.state.last_update_epoch_secs = Some(last + elapsed_days * defaults::DAY_SECS);
        debug!("Attendance window shifted by {} day(s)", elapsed_days);
        self.persist()
    }

    /// Continuity score for the current attendance window.
    pub fn continuity_score(&self) -> u32 {
        let attended = self
            .state
            .attendance_days
            .iter()
            .filter(|&&day| day)
            .count();
        match attended {
            7.. => 100,
            5..=6 => 80,
            3..=4 => 60,
            1..=2 => 40,
            0 => 0,
        }
    }

    fn update_rank(&mut self) {
        let average = if self.state.recent_scores.is_empty() {
            0
        } else {
            let sum: u32 = self.state.recent_scores.iter().sum();
            sum / self.state.recent_scores.len() as u32
        };
        self.rank_score = average + self.continuity_score();
    }

    pub fn rank_score(&self) -> u32 {
        self.rank_score
    }

    pub fn rank_tier(&self) -> RankTier {
        RankTier::from_score(self.rank_score)
    }

    pub fn recent_scores(&self) -> &VecDeque<u32> {
        &self.state.recent_scores
    }

    pub fn attendance_days(&self) -> &VecDeque<bool> {
        &self.state.attendance_days
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| TalkscoreError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        let bytes = serde_json::to_vec_pretty(&self.state).map_err(|e| {
            TalkscoreError::Other(format!("Failed to serialize history state: {}", e))
        })?;
        fs::write(&self.path, bytes).map_err(|e| TalkscoreError::Write {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

fn epoch_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
