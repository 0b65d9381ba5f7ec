use std::{error, fmt, io};

/// Everything here is fatal at the process boundary: callers propagate with `?`
/// and `main` (or a worker) reports the message and exits non-zero.
#[derive(Debug)]
pub enum EagleError {
    Io(io::Error),
    Hts(rust_htslib::errors::Error),
    FileOpen(String),
    BadVcfRecord(String),
    MissingSequence(String),
}

impl fmt::Display for EagleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EagleError::Io(err) => write!(f, "IO error: {}", err),
            EagleError::Hts(err) => write!(f, "HTS error: {}", err),
            EagleError::FileOpen(msg) => write!(f, "failed to open {}", msg),
            EagleError::BadVcfRecord(line) => write!(f, "bad fields in VCF record: {}", line),
            EagleError::MissingSequence(name) => {
                write!(f, "failed to find sequence {} in the reference index", name)
            }
        }
    }
}

impl error::Error for EagleError {}

impl From<io::Error> for EagleError {
    fn from(err: io::Error) -> Self {
        EagleError::Io(err)
    }
}

impl From<rust_htslib::errors::Error> for EagleError {
    fn from(err: rust_htslib::errors::Error) -> Self {
        EagleError::Hts(err)
    }
}
