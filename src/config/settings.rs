use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub transcription: TranscriptionSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub language: Option<String>,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
}

impl TranscriptionSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub chunk_byte_ceiling: u64,
    pub concurrency: usize,
    pub scratch_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Build settings from environment variables, with the defaults the
    /// pipeline ships with (24 MiB chunk ceiling, whisper-1, English hint).
    pub fn from_env() -> Result<Self, SettingsError> {
        let settings = Self {
            transcription: TranscriptionSettings {
                api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
                base_url: std::env::var("WHISPER_BASE_URL").ok(),
                model: std::env::var("WHISPER_MODEL")
                    .unwrap_or_else(|_| "whisper-1".to_string()),
                language: std::env::var("TRANSCRIPTION_LANGUAGE")
                    .ok()
                    .or_else(|| Some("en".to_string())),
                request_timeout_secs: parse_env("TRANSCRIPTION_TIMEOUT_SECS", 60)?,
                max_attempts: parse_env("TRANSCRIPTION_MAX_ATTEMPTS", 3)?,
            },
            pipeline: PipelineSettings {
                chunk_byte_ceiling: parse_env("CHUNK_BYTE_CEILING", 24 * 1024 * 1024)?,
                concurrency: parse_env("TRANSCRIPTION_CONCURRENCY", 4)?,
                scratch_root: std::env::var("SCRATCH_ROOT").ok().map(PathBuf::from),
            },
            logging: LoggingSettings {
                level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                enable_json: std::env::var("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or(false),
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.pipeline.chunk_byte_ceiling == 0 {
            return Err(SettingsError::Invalid(
                "chunk_byte_ceiling must be greater than zero".to_string(),
            ));
        }
        if self.pipeline.concurrency == 0 {
            return Err(SettingsError::Invalid(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, SettingsError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| SettingsError::Invalid(format!("{} is not a valid value", name))),
        Err(_) => Ok(default),
    }
}
