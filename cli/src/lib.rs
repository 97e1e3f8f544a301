use clap::ValueEnum;
use serde::Serialize;
use std::fs;
use std::path::Path;
use target_vision::{FrameReport, TargetRecord, TargetsInfo, VisionConfig};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    InvalidConfig(#[from] target_vision::VisionError),
    #[error("Either --config or --preset is required")]
    MissingConfig,
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Built-in configurations selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// GENERAL profile, largest six targets
    General,
    /// PAIRED profile, stacked-pair matching
    Paired,
}

impl Preset {
    pub fn config(self) -> VisionConfig {
        match self {
            Self::General => VisionConfig::general(),
            Self::Paired => VisionConfig::paired(),
        }
    }
}

/// File loading and saving for [`VisionConfig`]
pub trait ConfigFile: Sized {
    /// Load configuration from TOML string
    fn from_toml(content: &str) -> Result<Self, CliError>;

    /// Load configuration from JSON string
    fn from_json(content: &str) -> Result<Self, CliError>;

    fn to_toml(&self) -> Result<String, CliError>;

    fn to_json(&self) -> Result<String, CliError>;

    /// Load configuration from a TOML file
    fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a JSON file
    fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Auto-detect file format and load configuration
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Save configuration, picking the format from the extension
    fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(CliError::UnsupportedFileFormat),
        };
        fs::write(path, content)?;
        Ok(())
    }
}

impl ConfigFile for VisionConfig {
    fn from_toml(content: &str) -> Result<Self, CliError> {
        let config: VisionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn from_json(content: &str) -> Result<Self, CliError> {
        let config: VisionConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// What `detect` prints: the full report plus the slots a host would see
#[derive(Debug, Clone, Serialize)]
pub struct DetectSummary {
    pub report: FrameReport,
    pub num_targets: usize,
    pub reported: Vec<TargetRecord>,
}

impl DetectSummary {
    pub fn new(report: FrameReport, info: &TargetsInfo) -> Self {
        Self {
            report,
            num_targets: info.num_targets,
            reported: info.reported().to_vec(),
        }
    }
}
