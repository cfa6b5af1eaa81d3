pub mod converter;
pub mod sox;

pub use converter::{AudioConverter, AudioSpec, ConversionError, ConversionJob};
pub use sox::SoxConverter;
