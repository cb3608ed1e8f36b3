use crate::alphabet::{Alphabet, STANDARD};
use crate::decode::{DecodeError, SymbolGroup, GROUP_LEN};
use std::{fmt, io};

/// Pulls [SymbolGroup]s out of a byte source, skipping every byte that isn't in the alphabet.
///
/// `=` is a member of the alphabet and is passed through like any other symbol; whether it's in
/// a legal position is for the group decoder to decide.
///
/// ```
/// use b64dec::read::SymbolGroups;
///
/// let mut groups = SymbolGroups::new(&b"QU\r\nJD ~QQ=="[..]);
///
/// assert_eq!(Some(*b"QUJD"), groups.next_group().unwrap());
/// assert_eq!(Some(*b"QQ=="), groups.next_group().unwrap());
/// assert_eq!(None, groups.next_group().unwrap());
/// assert!(groups.remainder().is_empty());
/// ```
pub struct SymbolGroups<R: io::BufRead> {
    inner: R,
    alphabet: &'static Alphabet,
    // symbols of the group being assembled
    pending: SymbolGroup,
    pending_len: usize,
    // total symbols handed out in complete groups, used to provide offsets in errors
    symbols_extracted: usize,
    at_eof: bool,
    // set once the iterator has reported an error or the end of input
    finished: bool,
}

impl<R: io::BufRead> fmt::Debug for SymbolGroups<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SymbolGroups")
            .field("pending", &&self.pending[..self.pending_len])
            .field("symbols_extracted", &self.symbols_extracted)
            .field("at_eof", &self.at_eof)
            .finish()
    }
}

impl<R: io::BufRead> SymbolGroups<R> {
    pub fn new(reader: R) -> Self {
        SymbolGroups {
            inner: reader,
            alphabet: &STANDARD,
            pending: [0; GROUP_LEN],
            pending_len: 0,
            symbols_extracted: 0,
            at_eof: false,
            finished: false,
        }
    }

    /// Read until the next 4 alphabet symbols have been seen.
    ///
    /// Returns `Ok(None)` at the end of input. Any symbols left over at that point are available
    /// from [SymbolGroups::remainder].
    ///
    /// # Errors
    ///
    /// Errors from the wrapped reader, other than `Interrupted`, are returned as is. Symbols
    /// gathered before the error are kept, so calling again resumes where it left off.
    pub fn next_group(&mut self) -> io::Result<Option<SymbolGroup>> {
        while !self.at_eof {
            let available = match self.inner.fill_buf() {
                Ok(bytes) => bytes,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };

            if available.is_empty() {
                self.at_eof = true;
                break;
            }

            let mut consumed = 0;
            let mut complete = false;
            for &byte in available {
                consumed += 1;
                if !self.alphabet.is_member(byte) {
                    continue;
                }

                self.pending[self.pending_len] = byte;
                self.pending_len += 1;
                if self.pending_len == GROUP_LEN {
                    complete = true;
                    break;
                }
            }
            self.inner.consume(consumed);

            if complete {
                self.pending_len = 0;
                self.symbols_extracted += GROUP_LEN;
                return Ok(Some(self.pending));
            }
        }

        Ok(None)
    }

    /// Symbols that were read but don't make up a complete group. Only meaningful once
    /// [SymbolGroups::next_group] has returned `Ok(None)`.
    pub fn remainder(&self) -> &[u8] {
        &self.pending[..self.pending_len]
    }

    /// Number of symbols handed out so far in complete groups. This is the offset of the first
    /// symbol of the next group.
    pub fn symbols_extracted(&self) -> usize {
        self.symbols_extracted
    }

    /// Unwraps this `SymbolGroups`, returning the underlying reader.
    ///
    /// Bytes up to and including the last symbol of the last returned group have been consumed
    /// from it; any symbols in [SymbolGroups::remainder] have been consumed as well.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::BufRead> Iterator for SymbolGroups<R> {
    type Item = io::Result<SymbolGroup>;

    /// Yields each complete group. A trailing partial group is yielded once as an error of kind
    /// `InvalidData` wrapping [DecodeError::IncompleteGroup]. Stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_group() {
            Ok(Some(group)) => Some(Ok(group)),
            Ok(None) => {
                self.finished = true;
                match self.pending_len {
                    0 => None,
                    len => Some(Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        DecodeError::IncompleteGroup(len),
                    ))),
                }
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}
