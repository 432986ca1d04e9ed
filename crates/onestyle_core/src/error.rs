use thiserror::Error;

/// Shape violations detected on a [`ConfigDocument`](crate::ConfigDocument)
/// or one of its values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("color scale `{color}` is missing weights: {}", missing.join(", "))]
    IncompleteScale { color: String, missing: Vec<String> },

    #[error("variation `{name}` of `{slot}` collides with a scale weight")]
    ReservedVariation { slot: String, name: String },

    #[error("invalid color value `{0}`")]
    InvalidColor(String),
}
