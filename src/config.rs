use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub transcription: TranscriptionConfig,
    pub scoring: ScoringConfig,
    pub chat: ChatConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
}

/// Transcription backend selection.
///
/// `WhisperApi` posts the audio to the Whisper HTTP API; `Device` trusts the
/// transcript the platform recognizer already produced during capture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptionBackend {
    WhisperApi,
    Device,
}

/// Transcription configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub backend: TranscriptionBackend,
    pub endpoint: String,
    pub model: String,
    pub language: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Pronunciation-scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Chat-completion configuration for content grading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub max_history: usize,
    pub timeout_secs: u64,
}

/// Per-session evaluation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub min_recording_secs: f64,
}

/// Local file locations for transcript, diagnostics and history state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            backend: TranscriptionBackend::WhisperApi,
            endpoint: defaults::TRANSCRIPTION_ENDPOINT.to_string(),
            model: defaults::TRANSCRIPTION_MODEL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            api_key: String::new(),
            timeout_secs: defaults::TRANSCRIPTION_TIMEOUT_SECS,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::SCORING_ENDPOINT.to_string(),
            api_key: String::new(),
            timeout_secs: defaults::SCORING_TIMEOUT_SECS,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::CHAT_ENDPOINT.to_string(),
            model: defaults::CHAT_MODEL.to_string(),
            api_key: String::new(),
            max_tokens: defaults::MAX_TOKENS,
            max_history: defaults::MAX_CHAT_HISTORY,
            timeout_secs: defaults::CHAT_TIMEOUT_SECS,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_recording_secs: defaults::MIN_RECORDING_SECS,
        }
    }
}

impl StorageConfig {
    /// Resolve the data directory, defaulting to the platform data dir.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from(".data"))
                .join("talkscore")
        })
    }

    /// Path of the persisted transcript for the current recording.
    pub fn transcript_path(&self) -> PathBuf {
        self.resolved_data_dir().join(defaults::TRANSCRIPT_FILE)
    }

    /// Path of the raw scoring-API response, overwritten on every call.
    pub fn diagnostics_path(&self) -> PathBuf {
        self.resolved_data_dir().join(defaults::DIAGNOSTICS_FILE)
    }

    /// Path of the persisted session history state.
    pub fn history_path(&self) -> PathBuf {
        self.resolved_data_dir().join(defaults::HISTORY_FILE)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist.
    ///
    /// Only returns defaults if the file is missing; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - TALKSCORE_OPENAI_API_KEY → transcription.api_key and chat.api_key
    /// - TALKSCORE_SCORING_API_KEY → scoring.api_key
    /// - TALKSCORE_CHAT_MODEL → chat.model
    /// - TALKSCORE_LANGUAGE → transcription.language
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("TALKSCORE_OPENAI_API_KEY")
            && !key.is_empty()
        {
            self.transcription.api_key = key.clone();
            self.chat.api_key = key;
        }

        if let Ok(key) = std::env::var("TALKSCORE_SCORING_API_KEY")
            && !key.is_empty()
        {
            self.scoring.api_key = key;
        }

        if let Ok(model) = std::env::var("TALKSCORE_CHAT_MODEL")
            && !model.is_empty()
        {
            self.chat.model = model;
        }

        if let Ok(language) = std::env::var("TALKSCORE_LANGUAGE")
            && !language.is_empty()
        {
            self.transcription.language = language;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/talkscore/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("talkscore")
            .join("config.toml")
    }
}
