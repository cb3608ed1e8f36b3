//! Provides [Alphabet] and the [STANDARD] alphabet used for all decoding.

use crate::PAD_BYTE;

/// Number of data symbols. A symbol's position in the alphabet is the 6-bit value it encodes.
pub const DATA_SYMBOLS: usize = 64;
/// Position reported for the padding symbol.
pub const PAD_POSITION: u8 = 64;

pub(crate) const INVALID_VALUE: u8 = 255;

/// An alphabet defines the 64 data symbols plus the trailing padding symbol, 65 in total.
///
/// The position of a symbol is public and stable: positions 0-63 are the decoded 6-bit value,
/// position 64 is the padding marker.
///
/// Alphabets are meant to live in `const`s. Lookups go through a 256-entry reverse table that is
/// built at compile time, so they are O(1) and never allocate.
///
/// ```
/// use b64dec::alphabet::STANDARD;
///
/// assert_eq!(Some(0), STANDARD.position_of(b'A'));
/// assert_eq!(Some(63), STANDARD.position_of(b'/'));
/// assert_eq!(Some(64), STANDARD.position_of(b'='));
/// assert_eq!(None, STANDARD.position_of(b'*'));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Alphabet {
    symbols: [u8; DATA_SYMBOLS + 1],
    decode_table: [u8; 256],
}

impl Alphabet {
    /// Build an alphabet from 64 data symbols followed by the padding symbol.
    ///
    /// Panics (at compile time when used in a `const`) if the text is not 65 printable ASCII
    /// bytes or contains a duplicate.
    const fn from_symbols(alphabet: &str) -> Alphabet {
        let source_bytes = alphabet.as_bytes();
        assert!(
            source_bytes.len() == DATA_SYMBOLS + 1,
            "Base64 alphabet length must be 65"
        );

        let mut symbols = [0_u8; DATA_SYMBOLS + 1];
        let mut decode_table = [INVALID_VALUE; 256];

        // a way to copy that's allowed in const fn
        let mut index = 0;
        while index < source_bytes.len() {
            let byte = source_bytes[index];
            // 127 (DEL) is commonly considered printable for some reason but clearly unsuitable
            assert!(byte >= 32_u8 && byte < 127_u8, "Bytes must be printable");
            assert!(
                decode_table[byte as usize] == INVALID_VALUE,
                "Duplicate bytes"
            );

            symbols[index] = byte;
            // index is in 0-64, so the cast can't truncate
            decode_table[byte as usize] = index as u8;
            index += 1;
        }

        Alphabet {
            symbols,
            decode_table,
        }
    }

    /// Position of `byte` in the alphabet: 0-63 for data symbols, [PAD_POSITION] for padding,
    /// `None` for anything else.
    #[inline]
    pub const fn position_of(&self, byte: u8) -> Option<u8> {
        // tables are all 256 elements, lookup with a u8 index always succeeds
        match self.decode_table[byte as usize] {
            INVALID_VALUE => None,
            position => Some(position),
        }
    }

    /// Returns true if `byte` is one of the 65 symbols, padding included.
    #[inline]
    pub const fn is_member(&self, byte: u8) -> bool {
        self.decode_table[byte as usize] != INVALID_VALUE
    }

    #[inline]
    pub const fn is_padding(&self, byte: u8) -> bool {
        self.decode_table[byte as usize] == PAD_POSITION
    }

    /// The symbol at `position`, or `None` past the padding symbol.
    pub const fn symbol_at(&self, position: u8) -> Option<u8> {
        if (position as usize) < self.symbols.len() {
            Some(self.symbols[position as usize])
        } else {
            None
        }
    }

    /// The padding symbol, always the last one.
    pub const fn padding(&self) -> u8 {
        self.symbols[DATA_SYMBOLS]
    }
}

/// The standard alphabet (uses `+` and `/`, padded with `=`).
///
/// See [RFC 4648](https://tools.ietf.org/html/rfc4648#section-4).
pub const STANDARD: Alphabet = Alphabet::from_symbols(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=",
);

// The decoder assumes the padding symbol is the crate-wide pad byte.
const _: () = assert!(STANDARD.padding() == PAD_BYTE);
