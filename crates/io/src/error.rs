use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// File or directory could not be read.
    Read { path: PathBuf, message: String },
    /// A record did not decompose into exactly (source, destination).
    BadRecord { path: PathBuf, line: u64, fields: usize },
    /// Path does not exist.
    NotFound { path: PathBuf },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "cannot read {}: {message}", path.display())
            }
            Self::BadRecord { path, line, fields } => {
                write!(
                    f,
                    "{}:{line}: expected 2 tab-separated fields, found {fields}",
                    path.display()
                )
            }
            Self::NotFound { path } => {
                write!(f, "no such file or directory: {}", path.display())
            }
        }
    }
}

impl std::error::Error for IoError {}
