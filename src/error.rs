use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenRstError {
    #[error("Cannot open source file {}: {source}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output file {}: {source}", .path.display())]
    DestinationCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid source name: {name:?}")]
    InvalidName { name: String },

    #[error("No source names configured")]
    NoNames,

    #[error("Output file {} is the source file itself", .path.display())]
    SameFile { path: PathBuf },
}

impl GenRstError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenRstError::Config { .. }
            | GenRstError::InvalidName { .. }
            | GenRstError::NoNames
            | GenRstError::SameFile { .. } => 2,
            GenRstError::SourceOpen { .. } | GenRstError::Read { .. } => 3,
            GenRstError::DestinationCreate { .. } | GenRstError::Write { .. } => 4,
            GenRstError::Io(_) => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for GenRstError {
    fn user_message(&self) -> String {
        match self {
            GenRstError::SourceOpen { path, .. } => {
                format!("Source file could not be opened: {}", path.display())
            }
            GenRstError::DestinationCreate { path, .. } => {
                format!("Output file could not be created: {}", path.display())
            }
            GenRstError::InvalidName { name } => {
                format!("Invalid source name: {:?}", name)
            }
            GenRstError::NoNames => "No source names to process".to_string(),
            GenRstError::SameFile { path } => {
                format!("Refusing to overwrite source file: {}", path.display())
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            GenRstError::SourceOpen { .. } => Some(
                "Check the source directory with --source-dir and the extension with --source-ext.".to_string()
            ),
            GenRstError::DestinationCreate { .. } => Some(
                "Make sure the output directory exists, or pass --create-dirs to create it.".to_string()
            ),
            GenRstError::InvalidName { .. } => Some(
                "Names may only contain letters, digits, '_', '-' and '.', and cannot start with a dot.".to_string()
            ),
            GenRstError::NoNames => Some(
                "List names on the command line, set `names` in genrst.toml, or use --discover.".to_string()
            ),
            GenRstError::SameFile { .. } => Some(
                "Point --dest-dir or --dest-ext somewhere other than the sources.".to_string()
            ),
            GenRstError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for GenRstError {
    fn from(error: toml::de::Error) -> Self {
        GenRstError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenRstError>;
