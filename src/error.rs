use thiserror::Error;

/// Failure to parse a color string with the lenient [`FromStr`] parser.
///
/// The converter functions themselves never return this; they hand back
/// `None` because malformed input from a live text field is routine.
///
/// [`FromStr`]: std::str::FromStr
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("empty color string")]
    Empty,

    #[error("invalid hex color length {0} (expected 3 or 6 digits)")]
    InvalidLength(usize),

    #[error("invalid hex digits in {0:?}")]
    InvalidHex(String),
}

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for RGBA")]
    BufferSize { expected: usize, actual: usize },

    #[error("unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid color: {0}")]
    Color(#[from] ParseColorError),

    #[error("unknown {kind} {name:?}")]
    UnknownName { kind: &'static str, name: String },
}

impl PaletteError {
    pub(crate) fn unknown(kind: &'static str, name: &str) -> Self {
        PaletteError::UnknownName {
            kind,
            name: name.to_string(),
        }
    }
}
