/// Streaming GIF decoding.
pub mod decode;
