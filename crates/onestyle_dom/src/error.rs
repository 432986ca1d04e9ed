use thiserror::Error;

/// Failures applying styles to a target root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The target root (window, document, head, shadow root) is not reachable.
    #[error("style target unavailable: {0}")]
    Unavailable(String),

    /// A DOM call threw.
    #[error("DOM operation `{op}` failed: {message}")]
    Operation { op: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, DomError>;
