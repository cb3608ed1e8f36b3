//! Whole-stream decoding on top of [SymbolGroups] and the group decoder.

use crate::decode::{DecodeError, GroupDecoder, DEFAULT_DECODER};
use crate::read::SymbolGroups;
use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use tracing::{debug, trace};

/// Line mode considers at most this many bytes of the first line.
pub const LINE_LIMIT: usize = 255;

/// What happened while decoding a stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamReport {
    /// Complete groups seen, malformed ones included.
    pub groups: usize,
    /// Malformed groups, plus one for a trailing partial group.
    pub malformed: usize,
    /// Decoded bytes written to the sink.
    pub bytes_written: usize,
    /// True if the malformed group handler stopped decoding early.
    pub aborted: bool,
}

impl StreamReport {
    pub fn is_clean(&self) -> bool {
        self.malformed == 0
    }
}

/// Decode everything `reader` provides into `writer`.
///
/// Noise bytes are skipped. Every malformed group, and a trailing partial group, is passed to
/// `on_malformed` with offsets counted in symbols from the start of the stream; it returns
/// [ControlFlow::Continue] to carry on with the next group or [ControlFlow::Break] to stop.
///
/// # Errors
///
/// Only I/O errors from the reader or writer. Malformed input is never an error here.
///
/// ```
/// use std::ops::ControlFlow;
///
/// let mut out = Vec::new();
/// let mut errors = Vec::new();
/// let report = b64dec::stream::decode_stream(
///     &b"QUJD A=== QUI="[..],
///     &mut out,
///     &b64dec::decode::DEFAULT_DECODER,
///     |e| {
///         errors.push(e.clone());
///         ControlFlow::Continue(())
///     },
/// )
/// .unwrap();
///
/// assert_eq!(b"ABCAB", &out[..]);
/// assert_eq!(1, report.malformed);
/// assert_eq!(vec![b64dec::DecodeError::InvalidPadding(5)], errors);
/// ```
pub fn decode_stream<R, W, F>(
    reader: R,
    writer: &mut W,
    decoder: &GroupDecoder,
    mut on_malformed: F,
) -> io::Result<StreamReport>
where
    R: BufRead,
    W: Write + ?Sized,
    F: FnMut(&DecodeError) -> ControlFlow<()>,
{
    let mut groups = SymbolGroups::new(reader);
    let mut report = StreamReport::default();

    loop {
        let group_offset = groups.symbols_extracted();
        let group = match groups.next_group()? {
            Some(group) => group,
            None => break,
        };
        report.groups += 1;

        match decoder.decode_group(&group) {
            Ok(chunk) => {
                trace!(offset = group_offset, len = chunk.len(), "decoded group");
                writer.write_all(&chunk)?;
                report.bytes_written += chunk.len();
            }
            Err(error) => {
                let error = error.offset_by(group_offset);
                debug!(offset = group_offset, %error, "malformed group");
                report.malformed += 1;
                if on_malformed(&error).is_break() {
                    report.aborted = true;
                    return Ok(report);
                }
            }
        }
    }

    let remainder = groups.remainder().len();
    if remainder > 0 {
        let error = DecodeError::IncompleteGroup(remainder);
        debug!(offset = groups.symbols_extracted(), %error, "trailing partial group");
        report.malformed += 1;
        report.aborted = on_malformed(&error).is_break();
    }

    Ok(report)
}

/// Read the first line of `reader`, keeping at most [LINE_LIMIT] bytes of it. The line ends at
/// the first `\r` or `\n`, which is not included.
pub fn first_line<R: BufRead>(reader: R) -> io::Result<Vec<u8>> {
    let mut line = Vec::with_capacity(LINE_LIMIT);
    let _ = reader.take(LINE_LIMIT as u64).read_until(b'\n', &mut line)?;

    if let Some(end) = line.iter().position(|&b| b == b'\r' || b == b'\n') {
        line.truncate(end);
    }

    Ok(line)
}

///Decode noisy base64 into a new `Vec`, failing on the first malformed group.
///
///# Example
///
///```rust
///let bytes = b64dec::decode(b"aGVsbG8g\r\nd29ybGQ=\r\n").unwrap();
///assert_eq!(b"hello world", &bytes[..]);
///
///assert_eq!(
///    Err(b64dec::DecodeError::IncompleteGroup(3)),
///    b64dec::decode(b"aGVsbG8gd29ybGQ")
///);
///```
pub fn decode<T: ?Sized + AsRef<[u8]>>(input: &T) -> Result<Vec<u8>, DecodeError> {
    let input = input.as_ref();
    let mut buffer = Vec::with_capacity(input.len() / 4 * 3);
    let mut first_error = None;

    // reading from a slice and writing to a Vec can't fail
    let _ = decode_stream(input, &mut buffer, &DEFAULT_DECODER, |error| {
        first_error = Some(error.clone());
        ControlFlow::Break(())
    });

    match first_error {
        Some(error) => Err(error),
        None => Ok(buffer),
    }
}
