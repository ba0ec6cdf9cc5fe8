//! The safe, direction-split wrapper over [`raw::Stream`].
//!
//! [`Compress`] and [`Decompress`] each own a `raw::Stream` and return
//! `Result<Status, Error>` instead of a bare status, mirroring the split
//! between `bzip2::raw::Stream` (misuse-checked-at-runtime, bare return
//! codes) and `bzip2::mem::{Compress, Decompress}` (one type per direction,
//! `Result`-returning) in the teacher crate. There is no `MemError`
//! variant here: `Vec`'s allocator failures abort rather than returning a
//! recoverable status, so SPEC_FULL.md §4.6 drops it from `Status`.

use std::error;
use std::fmt;

use crate::raw;
use crate::Compression;

/// Default target block size, used by [`Compress::new`]/[`Decompress::new`]
/// callers that don't need a non-default value.
pub const DEFAULT_BLOCK_SIZE: u32 = raw::DEFAULT_BLOCK_SIZE;

/// Flush behavior for a [`Compress::compress`]/[`Compress::compress_vec`] call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Action {
    /// Accumulate input, only closing a block once a full `block_size` is
    /// available.
    Run,
    /// Close the current block now, without marking the stream finished.
    Flush,
    /// Close the current block and, once input runs out, append an EOF
    /// marker and return `Status::StreamEnd`.
    Finish,
}

impl From<Action> for raw::Action {
    fn from(action: Action) -> raw::Action {
        match action {
            Action::Run => raw::Action::Run,
            Action::Flush => raw::Action::Flush,
            Action::Finish => raw::Action::Finish,
        }
    }
}

/// Successful outcome of a `compress`/`decompress` call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Status {
    /// Progress was made (or none was possible this call); call again.
    Ok,
    /// The stream has finished: an EOF marker was consumed or emitted.
    StreamEnd,
}

/// A stream error: a corrupt input, a misuse of the API, or a caller-set
/// buffer too small to make progress without internal staging.
#[derive(Debug)]
pub struct Error(String);

impl Error {
    fn new(status: raw::Status, message: Option<&'static str>) -> Error {
        Error(format!("{:?}: {}", status, message.unwrap_or("no further detail")))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl error::Error for Error {}

fn translate(stream_message: Option<&'static str>, status: raw::Status) -> Result<Status, Error> {
    match status {
        raw::Status::Ok => Ok(Status::Ok),
        raw::Status::StreamEnd => Ok(Status::StreamEnd),
        other => Err(Error::new(other, stream_message)),
    }
}

/// A compression stream at the mem-buffer level: feed it slices, get
/// slices (or an appended `Vec`) back.
pub struct Compress {
    inner: raw::Stream,
}

impl Compress {
    /// Creates a new compressor at the given `level`, targeting `block_size`
    /// (clamped up to [`raw::MIN_BLOCK_SIZE`]).
    pub fn new(level: Compression, block_size: u32) -> Compress {
        Compress { inner: raw::Stream::new_compress(level as u32, block_size) }
    }

    /// Total bytes fed into this stream so far.
    pub fn total_in(&self) -> u64 {
        self.inner.total_in()
    }

    /// Total bytes produced by this stream so far.
    pub fn total_out(&self) -> u64 {
        self.inner.total_out()
    }

    /// The `block_size` this stream was constructed with.
    pub fn block_size(&self) -> u32 {
        self.inner.block_size()
    }

    /// Restores this stream to a freshly constructed state.
    pub fn reset(&mut self) {
        self.inner.reset()
    }

    /// Compresses `input` into `output`. The non-buffering contract from
    /// SPEC_FULL.md §4.3 is always in force: a call that cannot make
    /// progress without internal staging here returns `BufError`-flavored
    /// [`Error`] rather than stalling. Use [`Compress::compress_vec`] if you
    /// want buffering to just work.
    pub fn compress(&mut self, input: &[u8], output: &mut [u8], action: Action) -> Result<Status, Error> {
        let mut in_cursor = input;
        let mut out_cursor = output;
        let status = self.inner.compress(&mut in_cursor, &mut out_cursor, action.into(), false);
        translate(self.inner.message(), status)
    }

    /// Compresses `input`, appending compressed bytes into the unused
    /// capacity of `output` (never growing it). Buffers internally as
    /// needed, so a caller that drains `output` between calls never hits
    /// `BufError`.
    pub fn compress_vec(&mut self, input: &[u8], output: &mut Vec<u8>, action: Action) -> Result<Status, Error> {
        let cap = output.capacity();
        let len = output.len();
        output.resize(cap, 0);

        let mut in_cursor = input;
        let mut out_cursor = &mut output[len..];
        let before = out_cursor.len();
        let status = self.inner.compress(&mut in_cursor, &mut out_cursor, action.into(), true);
        let written = before - out_cursor.len();
        output.truncate(len + written);

        translate(self.inner.message(), status)
    }
}

/// A decompression stream at the mem-buffer level. See [`Compress`].
pub struct Decompress {
    inner: raw::Stream,
}

impl Decompress {
    /// Creates a new decompressor accepting blocks up to `block_size`
    /// (clamped up to [`raw::MIN_BLOCK_SIZE`]).
    pub fn new(block_size: u32) -> Decompress {
        Decompress { inner: raw::Stream::new_decompress(block_size) }
    }

    /// Total bytes fed into this stream so far.
    pub fn total_in(&self) -> u64 {
        self.inner.total_in()
    }

    /// Total bytes produced by this stream so far.
    pub fn total_out(&self) -> u64 {
        self.inner.total_out()
    }

    /// The `block_size` this stream was constructed with.
    pub fn block_size(&self) -> u32 {
        self.inner.block_size()
    }

    /// Restores this stream to a freshly constructed state.
    pub fn reset(&mut self) {
        self.inner.reset()
    }

    /// Decompresses `input` into `output`, non-buffering (see
    /// [`Compress::compress`]).
    pub fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<Status, Error> {
        let mut in_cursor = input;
        let mut out_cursor = output;
        let status = self.inner.decompress(&mut in_cursor, &mut out_cursor, false);
        translate(self.inner.message(), status)
    }

    /// Decompresses `input`, appending to the unused capacity of `output`
    /// (never growing it), buffering internally as needed.
    pub fn decompress_vec(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<Status, Error> {
        let cap = output.capacity();
        let len = output.len();
        output.resize(cap, 0);

        let mut in_cursor = input;
        let mut out_cursor = &mut output[len..];
        let before = out_cursor.len();
        let status = self.inner.decompress(&mut in_cursor, &mut out_cursor, true);
        let written = before - out_cursor.len();
        output.truncate(len + written);

        translate(self.inner.message(), status)
    }

    /// Resynchronizes after a corrupted block by scanning `input` for the
    /// next plausible header, advancing past the garbage.
    pub fn decompress_sync(&mut self, input: &[u8]) -> Result<Status, Error> {
        let mut in_cursor = input;
        let status = self.inner.decompress_sync(&mut in_cursor);
        translate(self.inner.message(), status)
    }
}

/// Reads the `block_size` a compressed stream was produced with, straight
/// off its first header, without needing a live [`Decompress`].
pub fn get_stream_block_size(buf: &[u8]) -> Option<u32> {
    raw::get_stream_block_size(buf)
}

/// Sniffs whether `buf` begins with a plausible block header.
pub fn is_compressed_stream(buf: &[u8]) -> Result<Status, Error> {
    translate(None, raw::is_compressed_stream(buf))
}
