//! Error type shared by the fetch, normalize and render stages
//!
//! Every variant is fatal for the run except where the caller decides
//! otherwise (malformed records under `MalformedPolicy::Skip`).

#[derive(Debug)]
pub enum StatsError {
    Http(reqwest::Error),
    Status { url: String, status: u16 },
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
    Malformed {
        index: usize,
        field: &'static str,
        detail: String,
    },
    Render(String),
}

impl StatsError {
    pub fn malformed(index: usize, field: &'static str, detail: impl Into<String>) -> Self {
        StatsError::Malformed {
            index,
            field,
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        StatsError::Http(err)
    }
}

impl From<std::io::Error> for StatsError {
    fn from(err: std::io::Error) -> Self {
        StatsError::Io(err)
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::Json(err)
    }
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::Http(e) => write!(f, "HTTP error: {}", e),
            StatsError::Status { url, status } => {
                write!(f, "Stats API error: {} returned status {}", url, status)
            }
            StatsError::Io(e) => write!(f, "IO error: {}", e),
            StatsError::Json(e) => write!(f, "JSON error: {}", e),
            StatsError::Config(e) => write!(f, "Configuration error: {}", e),
            StatsError::Malformed {
                index,
                field,
                detail,
            } => write!(f, "Malformed record #{} ({}): {}", index, field, detail),
            StatsError::Render(e) => write!(f, "Render error: {}", e),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::Http(e) => Some(e),
            StatsError::Io(e) => Some(e),
            StatsError::Json(e) => Some(e),
            _ => None,
        }
    }
}

pub type StatsResult<T> = Result<T, StatsError>;
