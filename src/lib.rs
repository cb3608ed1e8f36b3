//! A streaming base64 decoder that tolerates noise between symbols.
//!
//! # Overview
//!
//! Decoding happens one [SymbolGroup](decode::SymbolGroup) at a time: 4 symbols of the
//! [STANDARD](alphabet::STANDARD) alphabet decode to 1 to 3 bytes, depending on padding.
//! Groups are independent of each other, so a malformed group is reported on its own and the
//! caller decides whether to keep going.
//!
//! | Function                   | Input                        | Output                            |
//! |----------------------------|------------------------------|-----------------------------------|
//! | `decode_group`             | 4 symbols                    | `DecodedChunk` or `DecodeError`   |
//! | `decode`                   | noisy bytes                  | `Vec<u8>`, fails on first error   |
//! | `stream::decode_stream`    | `BufRead`                    | writes to `Write`, reports errors |
//! | `read::DecoderReader`      | `BufRead`                    | `io::Read` of decoded bytes       |
//!
//! Any byte that isn't one of the 65 alphabet symbols (64 data symbols and `=`) is skipped before
//! grouping, so line breaks, whitespace, and other junk don't affect the output.
//!
//! # Padding
//!
//! `=` may only appear at the end of a group, in position 3 or positions 2 and 3. Anything else
//! is [DecodeError::InvalidPadding]. A stream ending with 1 to 3 leftover symbols is reported as
//! [DecodeError::IncompleteGroup]; partial groups are never decoded.
//!
//! ```
//! assert_eq!(b"ABC", &b64dec::decode_group(b"QUJD").unwrap()[..]);
//! assert_eq!(b"hello", &b64dec::decode(b"aGVs\nbG8=").unwrap()[..]);
//! ```

#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_results,
    variant_size_differences,
    warnings
)]
#![forbid(unsafe_code)]

pub mod alphabet;
pub mod decode;
pub mod read;
pub mod stream;


pub use crate::decode::{
    decode_group, decode_groups, decode_groups_parallel, DecodeConfig, DecodeError,
    DecodedChunk, GroupDecoder, SymbolGroup,
};
pub use crate::stream::decode;

/// The padding symbol.
pub const PAD_BYTE: u8 = b'=';
