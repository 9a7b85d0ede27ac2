use thiserror::Error;

/// Errors raised while building, validating or applying filters.
///
/// Callers decide the response: `Invalid` with a redirect means the request can
/// be fixed by following the URL, `DuplicateKey` is a conflict (usually a 404).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("{message}")]
    Invalid {
        message: String,
        redirect: Option<String>,
    },
    #[error("duplicate filter {0:?}")]
    DuplicateKey(String),
}

impl FilterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
            redirect: None,
        }
    }

    pub fn with_redirect(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
            redirect: Some(url.into()),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Invalid { message, .. } => message.clone(),
            Self::DuplicateKey(_) => self.to_string(),
        }
    }

    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Self::Invalid { redirect, .. } => redirect.as_deref(),
            Self::DuplicateKey(_) => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }
}

pub type Result<T, E = FilterError> = std::result::Result<T, E>;
