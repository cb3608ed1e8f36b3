//! Implementations of `io::Read` and symbol extraction to transparently handle base64 decoding.
mod decoder;
mod groups;

pub use self::decoder::DecoderReader;
pub use self::groups::SymbolGroups;
