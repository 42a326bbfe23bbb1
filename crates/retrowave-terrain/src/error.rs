use std::fmt;

/// Errors raised while building a terrain strip.
///
/// All of these are startup errors. Once a [`TerrainStrip`](crate::TerrainStrip)
/// exists, per-frame work cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainError {
    /// A configuration field is out of range.
    InvalidConfig { field: &'static str, message: String },
    /// A caller-provided vertex or colour buffer does not match the grid size.
    BufferSizeMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A hex colour literal could not be parsed.
    InvalidColor(String),
}

impl TerrainError {
    pub(crate) fn config(field: &'static str, msg: impl Into<String>) -> Self {
        Self::InvalidConfig { field, message: msg.into() }
    }
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { field, message } => {
                write!(f, "invalid terrain config `{field}`: {message}")
            }
            Self::BufferSizeMismatch { buffer, expected, actual } => write!(
                f,
                "{buffer} buffer has {actual} floats, grid requires exactly {expected}"
            ),
            Self::InvalidColor(src) => write!(f, "invalid hex colour `{src}`"),
        }
    }
}

impl std::error::Error for TerrainError {}
