use crate::alphabet::{Alphabet, PAD_POSITION, STANDARD};
use byteorder::{BigEndian, ByteOrder};
use rayon::prelude::*;
use std::{error, fmt, ops, thread};
use tracing::debug;

/// Number of symbols in a group.
pub const GROUP_LEN: usize = 4;
/// Number of bytes a group without padding decodes to.
pub const DECODED_GROUP_LEN: usize = 3;

/// Exactly 4 alphabet symbols, the unit of decoding.
pub type SymbolGroup = [u8; GROUP_LEN];

/// Errors that can occur while decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A byte that isn't in the alphabet was found in a group. The offset and offending byte are
    /// provided.
    InvalidByte(usize, u8),
    /// Padding was found where it isn't allowed: in the first two positions of a group, or
    /// followed by a data symbol. The offset of the first offending padding symbol is provided.
    InvalidPadding(usize),
    /// The input ended with this many symbols, which isn't enough for a group.
    IncompleteGroup(usize),
    /// The last non-padding input symbol's encoded 6 bits have nonzero bits that will be discarded.
    /// Only reported when trailing bits are not allowed by the [DecodeConfig].
    InvalidLastSymbol(usize, u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeError::InvalidByte(index, byte) => {
                write!(f, "Invalid byte {}, offset {}.", byte, index)
            }
            DecodeError::InvalidPadding(index) => {
                write!(f, "Invalid padding, offset {}.", index)
            }
            DecodeError::IncompleteGroup(symbols) => {
                write!(f, "Incomplete trailing group of {} symbols.", symbols)
            }
            DecodeError::InvalidLastSymbol(index, byte) => {
                write!(f, "Invalid last symbol {}, offset {}.", byte, index)
            }
        }
    }
}

impl error::Error for DecodeError {}

impl DecodeError {
    /// Shift a per-group offset so it counts from the start of the stream.
    pub(crate) fn offset_by(self, group_offset: usize) -> DecodeError {
        match self {
            DecodeError::InvalidByte(offset, byte) => {
                DecodeError::InvalidByte(group_offset + offset, byte)
            }
            DecodeError::InvalidPadding(offset) => {
                DecodeError::InvalidPadding(group_offset + offset)
            }
            DecodeError::IncompleteGroup(len) => DecodeError::IncompleteGroup(len),
            DecodeError::InvalidLastSymbol(offset, byte) => {
                DecodeError::InvalidLastSymbol(group_offset + offset, byte)
            }
        }
    }
}

/// The 1 to 3 bytes decoded from one [SymbolGroup].
///
/// Lives on the stack; dereferences to the decoded bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DecodedChunk {
    bytes: [u8; DECODED_GROUP_LEN],
    len: u8,
}

impl DecodedChunk {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl ops::Deref for DecodedChunk {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for DecodedChunk {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for DecodedChunk {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("DecodedChunk").field(&self.as_slice()).finish()
    }
}

/// Contains configuration parameters for group decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeConfig {
    decode_allow_trailing_bits: bool,
}

impl DecodeConfig {
    /// Create a new config that allows trailing bits in padded groups.
    ///
    /// This is the behavior of [decode_group].
    pub const fn new() -> Self {
        DecodeConfig {
            decode_allow_trailing_bits: true,
        }
    }

    /// Sets whether to allow nonzero trailing bits.
    ///
    /// A padded group whose last data symbol has bits that don't fit in the output (e.g. `QR==`)
    /// decodes the same as its canonical form (`QQ==`) when allowed. When disallowed, such groups
    /// are rejected with [DecodeError::InvalidLastSymbol]. Rejecting them is useful when the
    /// encoded form must be unique.
    pub const fn with_decode_allow_trailing_bits(self, allow: bool) -> Self {
        DecodeConfig {
            decode_allow_trailing_bits: allow,
        }
    }

    pub const fn decode_allow_trailing_bits(&self) -> bool {
        self.decode_allow_trailing_bits
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes [SymbolGroup]s of the [STANDARD] alphabet under a [DecodeConfig].
///
/// Holds no mutable state, so one decoder can be shared by any number of threads.
#[derive(Clone, Copy, Debug)]
pub struct GroupDecoder {
    alphabet: &'static Alphabet,
    config: DecodeConfig,
}

/// A lenient [GroupDecoder] using [STANDARD].
pub const DEFAULT_DECODER: GroupDecoder = GroupDecoder::new(DecodeConfig::new());

impl GroupDecoder {
    pub const fn new(config: DecodeConfig) -> GroupDecoder {
        GroupDecoder {
            alphabet: &STANDARD,
            config,
        }
    }

    pub const fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub const fn alphabet(&self) -> &'static Alphabet {
        self.alphabet
    }

    /// Decode one group of 4 symbols into 1 to 3 bytes.
    ///
    /// Padding is only legal in the last two positions, and only as a suffix. Errors never come
    /// with partial output.
    pub fn decode_group(&self, group: &SymbolGroup) -> Result<DecodedChunk, DecodeError> {
        // Padding in the first two positions would leave fewer than 8 bits of data.
        for (index, &byte) in group[..2].iter().enumerate() {
            if self.alphabet.is_padding(byte) {
                return Err(DecodeError::InvalidPadding(index));
            }
        }

        let mut value: u32 = 0;
        let mut output_len = DECODED_GROUP_LEN;
        let mut first_padding_index: Option<usize> = None;
        let mut last_symbol = (0_usize, 0_u8);

        for (index, &byte) in group.iter().enumerate() {
            let position = self
                .alphabet
                .position_of(byte)
                .ok_or(DecodeError::InvalidByte(index, byte))?;

            let morsel = if position == PAD_POSITION {
                if first_padding_index.is_none() {
                    first_padding_index = Some(index);
                }
                if output_len == 1 {
                    // a third padding symbol would leave nothing to output
                    return Err(DecodeError::InvalidPadding(
                        first_padding_index.unwrap_or(index),
                    ));
                }
                output_len -= 1;
                0
            } else {
                if let Some(padding_index) = first_padding_index {
                    return Err(DecodeError::InvalidPadding(padding_index));
                }
                last_symbol = (index, byte);
                position
            };

            value = (value << 6) | u32::from(morsel);
        }

        // Bits below the emitted bytes can only be set by the last data symbol.
        let mask = (1_u32 << (8 * (DECODED_GROUP_LEN - output_len))) - 1;
        if !self.config.decode_allow_trailing_bits && (value & mask) != 0 {
            return Err(DecodeError::InvalidLastSymbol(last_symbol.0, last_symbol.1));
        }

        let mut bytes = [0_u8; DECODED_GROUP_LEN];
        BigEndian::write_u24(&mut bytes, value);
        // don't carry discarded trailing bits around
        bytes[output_len..].fill(0);

        Ok(DecodedChunk {
            bytes,
            // at most 3
            len: output_len as u8,
        })
    }
}

///Decode one group of 4 symbols with the [STANDARD] alphabet.
///
///# Example
///
///```rust
///let chunk = b64dec::decode_group(b"QUI=").unwrap();
///assert_eq!(b"AB", &chunk[..]);
///
///assert!(b64dec::decode_group(b"A===").is_err());
///```
pub fn decode_group(group: &SymbolGroup) -> Result<DecodedChunk, DecodeError> {
    DEFAULT_DECODER.decode_group(group)
}

/// Decode every group independently, in order.
pub fn decode_groups(groups: &[SymbolGroup]) -> Vec<Result<DecodedChunk, DecodeError>> {
    groups.iter().map(decode_group).collect()
}

/// Like [decode_groups], but decodes on a rayon pool of at most `threads` workers. Groups are
/// independent so the result is identical to [decode_groups].
///
/// `threads` is capped at the available parallelism; 0 and 1 decode on the calling thread.
pub fn decode_groups_parallel(
    groups: &[SymbolGroup],
    threads: usize,
) -> Vec<Result<DecodedChunk, DecodeError>> {
    let available = thread::available_parallelism().map_or(1, |n| n.get());
    let threads = threads.clamp(1, available);
    if threads == 1 || groups.len() < 2 {
        return decode_groups(groups);
    }

    if threads >= rayon::current_num_threads() {
        return par_decode_groups(groups);
    }

    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| par_decode_groups(groups)),
        Err(error) => {
            debug!(%error, threads, "falling back to the global pool");
            par_decode_groups(groups)
        }
    }
}

fn par_decode_groups(groups: &[SymbolGroup]) -> Vec<Result<DecodedChunk, DecodeError>> {
    groups.par_iter().map(decode_group).collect()
}
