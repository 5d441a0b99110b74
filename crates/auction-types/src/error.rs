/// Rejected textual integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseUintError {
    Empty,
    Invalid(String),
    Overflow(String),
}

impl std::fmt::Display for ParseUintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty integer"),
            Self::Invalid(input) => write!(f, "invalid unsigned integer: {input:?}"),
            Self::Overflow(input) => write!(f, "integer exceeds 256 bits: {input:?}"),
        }
    }
}

impl std::error::Error for ParseUintError {}
