/// Convenience result type used across gifcap APIs.
pub type GifcapResult<T> = Result<T, GifcapError>;

#[derive(thiserror::Error, Debug)]
/// Top-level error type for scaling, captioning, and animation I/O.
pub enum GifcapError {
    /// Invalid parameters (scale factor, dimensions, frame rate, quality).
    #[error("validation error: {0}")]
    Validation(String),

    /// Source could not be opened or decoded, or contained no frames.
    #[error("decode error: {0}")]
    Decode(String),

    /// Output animation could not be written.
    #[error("encode error: {0}")]
    Encode(String),

    /// Text could not be rasterized.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifcapError {
    /// Build [`GifcapError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`GifcapError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build [`GifcapError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build [`GifcapError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
