pub mod encoder;

pub use encoder::{COMPRESSION_LEVEL, CompressionLevel, FlacStreamEncoder};
