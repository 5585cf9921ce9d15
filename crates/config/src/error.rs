use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    /// The platform user configuration directory could not be resolved.
    NoConfigDir,
    /// File system error while reading or writing the settings file.
    Io { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "no user configuration directory"),
            Self::Io { path, message } => {
                write!(f, "IO error at {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
