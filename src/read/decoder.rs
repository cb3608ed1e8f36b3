use crate::decode::{DecodeError, GroupDecoder, DECODED_GROUP_LEN, DEFAULT_DECODER};
use crate::read::SymbolGroups;
use std::{cmp, fmt, io};

/// A `Read` implementation that decodes base64 data read from an underlying reader.
///
/// Bytes that aren't base64 symbols are skipped, so line-wrapped or otherwise noisy input can be
/// read directly.
///
/// A malformed group fails the `read` call that reaches it with `io::ErrorKind::InvalidData`
/// wrapping the [DecodeError], with offsets counted in symbols from the start of the stream.
/// Bytes decoded before the malformed group are returned first. The next call carries on with
/// the group after it, so a caller that wants to skip bad groups can just keep reading.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use std::io::Cursor;
///
/// // use a cursor as the simplest possible `Read` -- in real code this is probably a file, etc.
/// let mut wrapped_reader = Cursor::new(b"YXNk\r\nZg==\r\n");
/// let mut decoder = b64dec::read::DecoderReader::new(&mut wrapped_reader);
///
/// // handle errors as you normally would
/// let mut result = Vec::new();
/// decoder.read_to_end(&mut result).unwrap();
///
/// assert_eq!(b"asdf", &result[..]);
/// ```
pub struct DecoderReader<R: io::BufRead> {
    decoder: GroupDecoder,
    /// Where b64 data is read from
    groups: SymbolGroups<R>,

    // The caller may provide a buffer too small to hold a decoded group, so we have to be able to
    // hang on to a few decoded bytes.
    decoded_buffer: [u8; DECODED_GROUP_LEN],
    // index of start of decoded data
    decoded_offset: usize,
    // length of decoded data
    decoded_len: usize,
    // error hit after some bytes were already copied out; returned by the next read
    pending_error: Option<io::Error>,
    // set once a trailing partial group has been reported
    reported_remainder: bool,
}

impl<R: io::BufRead> fmt::Debug for DecoderReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DecoderReader")
            .field("decoder", &self.decoder)
            .field("decoded_buffer", &self.decoded_buffer)
            .field("decoded_offset", &self.decoded_offset)
            .field("decoded_len", &self.decoded_len)
            .field("pending_error", &self.pending_error)
            .finish()
    }
}

impl<R: io::BufRead> DecoderReader<R> {
    /// Create a new decoder that will read from the provided reader `r`, using the lenient
    /// default group decoder.
    pub fn new(reader: R) -> Self {
        Self::with_decoder(reader, DEFAULT_DECODER)
    }

    pub fn with_decoder(reader: R, decoder: GroupDecoder) -> Self {
        DecoderReader {
            decoder,
            groups: SymbolGroups::new(reader),
            decoded_buffer: [0; DECODED_GROUP_LEN],
            decoded_offset: 0,
            decoded_len: 0,
            pending_error: None,
            reported_remainder: false,
        }
    }

    /// Write as much as possible of the decoded buffer into the target buffer.
    /// Must only be called when there is something to write and space to write into.
    /// Returns the number of (decoded) bytes copied.
    fn flush_decoded_buf(&mut self, buf: &mut [u8]) -> usize {
        debug_assert!(self.decoded_len > 0);
        debug_assert!(!buf.is_empty());

        let copy_len = cmp::min(self.decoded_len, buf.len());

        buf[..copy_len].copy_from_slice(
            &self.decoded_buffer[self.decoded_offset..self.decoded_offset + copy_len],
        );

        self.decoded_offset += copy_len;
        self.decoded_len -= copy_len;

        copy_len
    }

    /// Decode the next group into the decoded buffer.
    /// Returns `Ok(false)` at the end of input.
    fn decode_next_group(&mut self) -> Result<bool, io::Error> {
        debug_assert_eq!(0, self.decoded_len);

        let group_offset = self.groups.symbols_extracted();
        let group = match self.groups.next_group()? {
            Some(group) => group,
            None => {
                let remainder = self.groups.remainder().len();
                if remainder > 0 && !self.reported_remainder {
                    self.reported_remainder = true;
                    return Err(decode_error(DecodeError::IncompleteGroup(remainder)));
                }
                return Ok(false);
            }
        };

        let chunk = self
            .decoder
            .decode_group(&group)
            .map_err(|error| decode_error(error.offset_by(group_offset)))?;

        self.decoded_buffer[..chunk.len()].copy_from_slice(&chunk);
        self.decoded_offset = 0;
        self.decoded_len = chunk.len();

        Ok(true)
    }

    /// Unwraps this `DecoderReader`, returning the base reader which it reads base64 encoded
    /// input from.
    ///
    /// Because `DecoderReader` performs internal buffering, the state of the inner reader is
    /// unspecified. This function is mainly provided because the inner reader type may provide
    /// additional functionality beyond the `Read` implementation which may still be useful.
    pub fn into_inner(self) -> R {
        self.groups.into_inner()
    }
}

fn decode_error(error: DecodeError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, error)
}

impl<R: io::BufRead> io::Read for DecoderReader<R> {
    /// Decode input from the wrapped reader.
    ///
    /// Under non-error circumstances, this returns `Ok` with the value being the number of bytes
    /// written in `buf`.
    ///
    /// # Errors
    ///
    /// Any errors emitted by the delegate reader are returned. Decoding errors due to invalid
    /// base64 are also possible, and will have `io::ErrorKind::InvalidData`.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if let Some(error) = self.pending_error.take() {
            return Err(error);
        }

        let mut written = 0;
        while written < buf.len() {
            if self.decoded_len > 0 {
                written += self.flush_decoded_buf(&mut buf[written..]);
                continue;
            }

            match self.decode_next_group() {
                Ok(true) => {}
                Ok(false) => break,
                // nothing copied out yet, so the error belongs to this call
                Err(error) if written == 0 => return Err(error),
                Err(error) => {
                    self.pending_error = Some(error);
                    break;
                }
            }
        }

        Ok(written)
    }
}
