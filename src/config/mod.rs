mod settings;

pub use settings::{
    LoggingSettings, PipelineSettings, Settings, SettingsError, TranscriptionSettings,
};
