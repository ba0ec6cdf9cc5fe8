//! Raw low-level manipulation of a single compression/decompression stream.
//!
//! This is the streaming state machine from SPEC_FULL.md §4.4: a single
//! [`Stream`] type, parameterized by direction, drives both directions
//! through one [`Stream::process`] entry point, exactly like the reference
//! `fastlzlibProcess` function drives both `fastlzlibCompress` and
//! `fastlzlibDecompress`. [`crate::mem`] wraps this in a safer, per-direction
//! API; this module is the thing that actually does the work.

use std::ops::ControlFlow;

use crate::block;
use crate::header;

/// Minimum block size accepted at construction, and the RAW/COMPRESSED
/// cutoff: blocks no larger than this always take the RAW path, since the
/// block compressor has no useful ratio on inputs this small.
pub const MIN_BLOCK_SIZE: u32 = 64;

/// Default `block_size` used by `compressInit`/`decompressInit`.
pub const DEFAULT_BLOCK_SIZE: u32 = 32768;

/// Capacity of each staging buffer: one block's worth of uncompressed data
/// plus the compressor's worst-case expansion plus room for two headers.
fn buffer_block_size(block_size: u32) -> usize {
    (block_size + block_size / 10 + header::HEADER_SIZE as u32 * 2) as usize
}

/// Which direction a [`Stream`] drives. Replaces the reference's sentinel
/// `level == ZFAST_LEVEL_DECOMPRESS` with a real tagged union, per the
/// redesign note in SPEC_FULL.md §9.
#[derive(Copy, Clone, Debug)]
enum Kind {
    Compress { level: u32 },
    Decompress,
}

/// Flush behavior requested for a `process` call. Only meaningful on the
/// compress side; `decompress` always drives `process` with `Run`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Action {
    /// Do not force a short block: accumulate up to a full `block_size`
    /// before compressing.
    Run,
    /// Force the current block to close at whatever input is available,
    /// without marking the stream finished.
    Flush,
    /// Like `Flush`, and once all input is consumed, append an EOF marker.
    Finish,
}

/// Outcome of a `process` call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Status {
    /// Progress was made (or none was possible yet); call again.
    Ok,
    /// The stream is finished: an EOF marker was consumed or emitted.
    StreamEnd,
    /// Misuse: wrong direction, or an internal invariant was violated.
    StreamError,
    /// The compressed stream is corrupt (bad magic, or sync exhausted).
    DataError,
    /// A well-formed header declared something this decoder won't accept.
    VersionError,
    /// `may_buffer` was false and one call can't make progress as-is.
    BufError,
}

/// The low-level, direction-tagged stream. See the module docs.
pub struct Stream {
    kind: Kind,
    block_size: u32,

    in_hdr: [u8; header::HEADER_SIZE],
    in_hdr_offs: usize,

    block_type: header::BlockType,
    str_size: usize,
    dec_size: usize,

    in_buff: Vec<u8>,
    in_buff_offs: usize,
    out_buff: Vec<u8>,
    out_buff_offs: usize,

    /// Compress-side-only latch: true once the EOF marker has been written,
    /// so a subsequent `Finish` call reports `StreamEnd` instead of writing
    /// a second one. See DESIGN.md for why this replaces the reference's
    /// `str_size == 0 && dec_size == 0` shortcut on the compress side.
    eof_written: bool,

    total_in: u64,
    total_out: u64,
    message: Option<&'static str>,
}

impl Stream {
    /// Creates a stream that compresses at `level` (clamped into `0..=9`)
    /// with the given target block size (clamped up to `MIN_BLOCK_SIZE`).
    pub fn new_compress(level: u32, block_size: u32) -> Stream {
        let level = level.min(9);
        Stream::new(Kind::Compress { level }, block_size)
    }

    /// Creates a stream that decompresses, accepting blocks up to
    /// `block_size` (clamped up to `MIN_BLOCK_SIZE`).
    pub fn new_decompress(block_size: u32) -> Stream {
        Stream::new(Kind::Decompress, block_size)
    }

    fn new(kind: Kind, block_size: u32) -> Stream {
        let block_size = block_size.max(MIN_BLOCK_SIZE);
        let cap = buffer_block_size(block_size);
        Stream {
            kind,
            block_size,
            in_hdr: [0; header::HEADER_SIZE],
            in_hdr_offs: 0,
            block_type: header::BlockType::Compressed,
            str_size: 0,
            dec_size: 0,
            in_buff: vec![0; cap],
            in_buff_offs: 0,
            out_buff: vec![0; cap],
            out_buff_offs: 0,
            eof_written: false,
            total_in: 0,
            total_out: 0,
            message: None,
        }
    }

    /// Clears per-stream offsets and per-block descriptors; preserves the
    /// buffers, `level`, and `block_size`.
    pub fn reset(&mut self) {
        self.message = None;
        self.in_hdr_offs = 0;
        self.block_type = header::BlockType::Compressed;
        self.str_size = 0;
        self.dec_size = 0;
        self.in_buff_offs = 0;
        self.out_buff_offs = 0;
        self.eof_written = false;
        self.total_in = 0;
        self.total_out = 0;
    }

    /// The `block_size` this stream was constructed with.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Total bytes consumed from caller-supplied input so far.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Total bytes written to caller-supplied output so far.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Human-readable description of the most recent error, if any.
    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// Drives compression. Returns `StreamError` if this stream was built
    /// for decompression.
    pub fn compress(&mut self, input: &mut &[u8], output: &mut &mut [u8], flush: Action, may_buffer: bool) -> Status {
        if !matches!(self.kind, Kind::Compress { .. }) {
            self.message = Some("Compressing function used with a decompressing stream");
            return Status::StreamError;
        }
        self.process(input, output, flush, may_buffer)
    }

    /// Drives decompression. Returns `StreamError` if this stream was built
    /// for compression.
    pub fn decompress(&mut self, input: &mut &[u8], output: &mut &mut [u8], may_buffer: bool) -> Status {
        if !matches!(self.kind, Kind::Decompress) {
            self.message = Some("Decompressing function used with a compressing stream");
            return Status::StreamError;
        }
        self.process(input, output, Action::Run, may_buffer)
    }

    /// Scans forward in `input` for the next plausible block header,
    /// leaving the cursor positioned at it. See SPEC_FULL.md §4.5 and the
    /// quirk note in §9 (`in_hdr_offs` is repurposed as a scan counter that
    /// is never consulted afterwards, matching the reference).
    pub fn decompress_sync(&mut self, input: &mut &[u8]) -> Status {
        if !matches!(self.kind, Kind::Decompress) {
            self.message = Some("Decompressing function used with a compressing stream");
            return Status::StreamError;
        }
        if self.out_buff_offs < self.dec_size {
            return Status::Ok;
        }
        if input.len() < header::HEADER_SIZE {
            self.message = Some("Need more data on input");
            return Status::BufError;
        }
        self.in_hdr_offs = 0;
        let mut cur = *input;
        while cur.len() >= header::HEADER_SIZE {
            if header::has_magic(cur) {
                let hdr = header::decode(&cur[..header::HEADER_SIZE]);
                if hdr.block_size != 0 {
                    *input = cur;
                    return Status::Ok;
                }
            }
            self.in_hdr_offs += 1;
            cur = &cur[1..];
            self.total_in += 1;
        }
        *input = cur;
        self.message = Some("No flush point found");
        Status::DataError
    }

    fn validate_header(&mut self, declared_block_size: u32) -> Option<Status> {
        match self.block_type {
            header::BlockType::BadMagic => {
                self.message = Some("Corrupted compressed stream (bad magic)");
                Some(Status::DataError)
            }
            header::BlockType::Unrecognized => {
                self.message = Some("Corrupted compressed stream (illegal block type)");
                Some(Status::VersionError)
            }
            header::BlockType::Raw | header::BlockType::Compressed => {
                if declared_block_size > self.block_size {
                    self.message = Some("Block size too large");
                    Some(Status::VersionError)
                } else if self.dec_size > buffer_block_size(self.block_size) {
                    self.message = Some("Corrupted compressed stream (illegal decompressed size)");
                    Some(Status::VersionError)
                } else if self.str_size > buffer_block_size(self.block_size) {
                    self.message = Some("Corrupted compressed stream (illegal stream size)");
                    Some(Status::VersionError)
                } else {
                    None
                }
            }
        }
    }

    /// Phase H for the decompress side: read (possibly split across calls)
    /// the next 20-byte header, validate it, and detect the EOF marker.
    /// Returns `Some(status)` when `process` should return immediately.
    fn decompress_acquire_header(&mut self, input: &mut &[u8], avail_out: usize, may_buffer: bool) -> Option<Status> {
        let fast_path = self.in_hdr_offs == 0 && input.len() >= header::HEADER_SIZE;

        let hdr = if fast_path {
            let cur = *input;
            let hdr = header::decode(&cur[..header::HEADER_SIZE]);
            let str_size = hdr.compressed as usize;
            let dec_size = hdr.original as usize;
            if !may_buffer {
                if cur.len() < header::HEADER_SIZE + str_size {
                    self.message = Some("Need more data on input");
                    return Some(Status::BufError);
                }
                if avail_out < dec_size {
                    self.message = Some("Need more room on output");
                    return Some(Status::BufError);
                }
            }
            *input = &cur[header::HEADER_SIZE..];
            self.total_in += header::HEADER_SIZE as u64;
            hdr
        } else {
            if self.in_hdr_offs == 0 && !may_buffer {
                self.message = Some("Need more data on input");
                return Some(Status::BufError);
            }
            let cur = *input;
            let take = (header::HEADER_SIZE - self.in_hdr_offs).min(cur.len());
            self.in_hdr[self.in_hdr_offs..self.in_hdr_offs + take].copy_from_slice(&cur[..take]);
            self.in_hdr_offs += take;
            *input = &cur[take..];
            self.total_in += take as u64;

            if self.in_hdr_offs < header::HEADER_SIZE {
                return Some(Status::Ok);
            }
            let hdr = header::decode(&self.in_hdr);
            self.in_hdr_offs = 0;
            hdr
        };

        self.block_type = hdr.block_type;
        self.str_size = hdr.compressed as usize;
        self.dec_size = hdr.original as usize;

        if let Some(status) = self.validate_header(hdr.block_size) {
            return Some(status);
        }

        self.out_buff_offs = self.dec_size;

        if self.str_size == 0 && self.dec_size == 0 {
            return Some(Status::StreamEnd);
        }

        None
    }

    /// Phase H counterpart for the compress side: synthesize the target
    /// payload size for the next block instead of parsing one off the wire.
    fn compress_acquire_header(&mut self, input: &[u8], flush: Action, may_buffer: bool) -> Option<Status> {
        if self.eof_written {
            return Some(Status::StreamEnd);
        }
        let block_size = self.block_size as usize;
        let str_size = if flush != Action::Run {
            block_size.min(input.len())
        } else {
            if input.len() < block_size && !may_buffer {
                self.message = Some("Need more data on input");
                return Some(Status::BufError);
            }
            block_size
        };
        self.block_type = header::BlockType::Compressed;
        self.str_size = str_size;
        self.dec_size = 0;
        self.out_buff_offs = 0;
        None
    }

    /// The single entry point driving either direction. See SPEC_FULL.md
    /// §4.4 for the phase-by-phase contract this implements.
    fn process(&mut self, input: &mut &[u8], output: &mut &mut [u8], flush: Action, may_buffer: bool) -> Status {
        // Phase D: a previously produced block is still draining.
        if self.out_buff_offs < self.dec_size {
            let avail_out = output.len();
            let size = (self.dec_size - self.out_buff_offs).min(avail_out);
            if size > 0 {
                let out_taken = std::mem::take(output);
                let (head, tail) = out_taken.split_at_mut(size);
                head.copy_from_slice(&self.out_buff[self.out_buff_offs..self.out_buff_offs + size]);
                *output = tail;
                self.out_buff_offs += size;
                self.total_out += size as u64;
            }
            log::trace!("drained {size} bytes from output staging buffer");
            return Status::Ok;
        }

        // Phase H: acquire a block header (or synthesize one, compress side).
        let mut just_acquired = false;
        if self.str_size == 0 {
            let outcome = match self.kind {
                Kind::Decompress => self.decompress_acquire_header(input, output.len(), may_buffer),
                Kind::Compress { .. } => self.compress_acquire_header(input, flush, may_buffer),
            };
            if let Some(status) = outcome {
                if status != Status::Ok {
                    log::debug!("process terminating this block: {status:?} ({:?})", self.message);
                }
                return status;
            }
            just_acquired = true;
        }

        // Phase P: acquire the payload, zero-copy if it arrived with the
        // same call that just acquired the header, buffered otherwise.
        let mut direct: Option<&[u8]> = None;
        if just_acquired {
            if input.len() >= self.str_size {
                let cur = *input;
                let (head, tail) = cur.split_at(self.str_size);
                *input = tail;
                self.total_in += self.str_size as u64;
                direct = Some(head);
            } else {
                self.in_buff_offs = 0;
            }
        }

        let payload: &[u8] = if let Some(direct) = direct {
            direct
        } else {
            if self.in_buff_offs < self.str_size {
                let need = self.str_size - self.in_buff_offs;
                let cur = *input;
                let take = need.min(cur.len());
                if take > 0 {
                    self.in_buff[self.in_buff_offs..self.in_buff_offs + take].copy_from_slice(&cur[..take]);
                    self.in_buff_offs += take;
                    *input = &cur[take..];
                    self.total_in += take as u64;
                }
            }
            if self.in_buff_offs == self.str_size {
                &self.in_buff[..self.str_size]
            } else if flush != Action::Run {
                self.str_size = self.in_buff_offs;
                &self.in_buff[..self.str_size]
            } else {
                log::trace!(
                    "buffered {}/{} bytes of block payload, need more input",
                    self.in_buff_offs,
                    self.str_size
                );
                return Status::Ok;
            }
        };

        // Phase C: transform the complete payload.
        let effective_flush = if flush == Action::Finish && !input.is_empty() { Action::Run } else { flush };
        let str_size = self.str_size;

        match self.kind {
            Kind::Decompress => {
                let dec_size = self.dec_size;
                let block_type = self.block_type;
                let result: ControlFlow<(), usize> = if output.len() >= dec_size {
                    let out_taken = std::mem::take(output);
                    let (head, tail) = out_taken.split_at_mut(dec_size);
                    let produced = decompress_into(block_type, payload, head);
                    *output = tail;
                    self.out_buff_offs = dec_size;
                    self.total_out += produced.as_ref().map_or(0, |n| *n as u64);
                    produced.map_or(ControlFlow::Break(()), ControlFlow::Continue)
                } else {
                    let dest = &mut self.out_buff[..dec_size];
                    let produced = decompress_into(block_type, payload, dest);
                    self.out_buff_offs = 0;
                    produced.map_or(ControlFlow::Break(()), ControlFlow::Continue)
                };
                self.str_size = 0;
                if result.is_break() {
                    self.message = Some("Unable to decompress block stream");
                    return Status::StreamError;
                }
            }
            Kind::Compress { level } => {
                let level = block::level_from_compression(level);
                let append_eof = effective_flush == Action::Finish && input.is_empty();
                let needed_direct = str_size + str_size / 10 + 66;
                if output.len() >= needed_direct {
                    let out_taken = std::mem::take(output);
                    let produced = compress_wrapper(level, self.block_size, payload, out_taken, append_eof);
                    let (_, tail) = out_taken.split_at_mut(produced);
                    *output = tail;
                    self.out_buff_offs = self.dec_size;
                    self.total_out += produced as u64;
                } else {
                    let cap = buffer_block_size(self.block_size);
                    let produced = compress_wrapper(level, self.block_size, payload, &mut self.out_buff[..cap], append_eof);
                    self.dec_size = produced;
                    self.out_buff_offs = 0;
                }
                self.str_size = 0;
                if append_eof {
                    self.eof_written = true;
                }
            }
        }

        if flush == Action::Finish && input.is_empty() && self.out_buff_offs == self.dec_size {
            Status::StreamEnd
        } else {
            Status::Ok
        }
    }
}

/// Decompresses one complete block payload into `dest` (sized to exactly
/// the declared `dec_size`). `Ok(n)` only ever has `n == dest.len()`;
/// anything else is a decode failure.
fn decompress_into(block_type: header::BlockType, payload: &[u8], dest: &mut [u8]) -> Result<usize, ()> {
    let produced = match block_type {
        header::BlockType::Raw => {
            if dest.len() == payload.len() {
                dest.copy_from_slice(payload);
                payload.len()
            } else {
                0
            }
        }
        header::BlockType::Compressed => block::decompress_block(payload, dest),
        header::BlockType::Unrecognized | header::BlockType::BadMagic => unreachable!("rejected by validate_header"),
    };
    if produced == dest.len() {
        Ok(produced)
    } else {
        Err(())
    }
}

/// Frames `payload` per SPEC_FULL.md §4.2: RAW if `payload.len() <=
/// MIN_BLOCK_SIZE`, otherwise COMPRESSED, then an EOF marker if requested
/// (even when `payload` is empty). Returns total bytes written to `dest`.
fn compress_wrapper(level: block::Level, block_size: u32, payload: &[u8], dest: &mut [u8], append_eof: bool) -> usize {
    let mut done = 0;
    if !payload.is_empty() {
        let (block_type, produced) = if payload.len() > MIN_BLOCK_SIZE as usize {
            let body = &mut dest[header::HEADER_SIZE..];
            let n = block::compress_block(level, payload, body);
            (header::BLOCK_TYPE_COMPRESSED, n)
        } else {
            let body = &mut dest[header::HEADER_SIZE..];
            body[..payload.len()].copy_from_slice(payload);
            (header::BLOCK_TYPE_RAW, payload.len())
        };
        header::encode(dest, block_type, block_size, produced as u32, payload.len() as u32);
        done = header::HEADER_SIZE + produced;
    }
    if append_eof {
        done += header::encode(&mut dest[done..], header::BLOCK_TYPE_COMPRESSED, block_size, 0, 0);
    }
    done
}

/// Parses the header of `buf` and returns its `block_size` field (subject
/// to the aliasing quirk in `header::decode`), or `None` on short input or
/// bad magic.
pub fn get_stream_block_size(buf: &[u8]) -> Option<u32> {
    if buf.len() < header::HEADER_SIZE {
        return None;
    }
    let hdr = header::decode(&buf[..header::HEADER_SIZE]);
    if hdr.block_type == header::BlockType::BadMagic || hdr.block_size == 0 {
        None
    } else {
        Some(hdr.block_size)
    }
}

/// Sniffs whether `buf` begins with a valid block header.
pub fn is_compressed_stream(buf: &[u8]) -> Status {
    if buf.len() < header::HEADER_SIZE {
        Status::BufError
    } else if get_stream_block_size(buf).is_some() {
        Status::Ok
    } else {
        Status::DataError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8], level: u32, block_size: u32) -> Vec<u8> {
        let mut c = Stream::new_compress(level, block_size);
        let mut compressed = vec![0u8; data.len() * 2 + 4096];
        let mut input = data;
        let mut out_slice = &mut compressed[..];
        loop {
            let status = c.compress(&mut input, &mut out_slice, Action::Finish, true);
            match status {
                Status::Ok => continue,
                Status::StreamEnd => break,
                other => panic!("unexpected status {other:?}"),
            }
        }
        let produced = c.total_out() as usize;
        compressed.truncate(produced);

        let mut d = Stream::new_decompress(block_size);
        let mut decompressed = vec![0u8; data.len() + 4096];
        let mut input = &compressed[..];
        let mut out_slice = &mut decompressed[..];
        loop {
            let status = d.decompress(&mut input, &mut out_slice, true);
            match status {
                Status::Ok => continue,
                Status::StreamEnd => break,
                other => panic!("unexpected status {other:?}"),
            }
        }
        let produced = d.total_out() as usize;
        decompressed.truncate(produced);
        decompressed
    }

    #[test]
    fn empty_stream_is_one_eof_header() {
        let mut c = Stream::new_compress(6, DEFAULT_BLOCK_SIZE);
        let mut out = [0u8; 64];
        let mut input: &[u8] = &[];
        let mut out_slice = &mut out[..];
        let status = c.compress(&mut input, &mut out_slice, Action::Finish, true);
        assert_eq!(status, Status::StreamEnd);
        assert_eq!(c.total_out(), 20);
        assert_eq!(&out[0..7], &[0x46, 0x61, 0x73, 0x74, 0x4C, 0x5A, 0x00]);
        assert_eq!(out[7], header::BLOCK_TYPE_COMPRESSED);
        assert_eq!(&out[8..16], &[0u8; 8]);
    }

    #[test]
    fn short_block_takes_raw_path() {
        let mut c = Stream::new_compress(6, DEFAULT_BLOCK_SIZE);
        let mut out = [0u8; 128];
        let mut input: &[u8] = b"hello";
        let mut out_slice = &mut out[..];
        let status = c.compress(&mut input, &mut out_slice, Action::Finish, true);
        assert_eq!(status, Status::StreamEnd);
        let produced = c.total_out() as usize;
        assert_eq!(produced, 20 + 5 + 20);
        assert_eq!(out[7], header::BLOCK_TYPE_RAW);
        assert_eq!(&out[20..25], b"hello");
    }

    #[test]
    fn long_block_takes_compressed_path() {
        let data = vec![0u8; 10_000];
        let mut c = Stream::new_compress(6, DEFAULT_BLOCK_SIZE);
        let mut out = vec![0u8; 20_000];
        let mut input: &[u8] = &data;
        let mut out_slice = &mut out[..];
        let status = c.compress(&mut input, &mut out_slice, Action::Finish, true);
        assert_eq!(status, Status::StreamEnd);
        assert_eq!(out[7], header::BLOCK_TYPE_COMPRESSED);
        let compressed_len = u32::from_le_bytes(out[8..12].try_into().unwrap());
        assert!((compressed_len as usize) < 10_000);
        assert_eq!(u32::from_le_bytes(out[12..16].try_into().unwrap()), 10_000);
    }

    #[test]
    fn round_trip_hello() {
        assert_eq!(roundtrip(b"hello", 6, DEFAULT_BLOCK_SIZE), b"hello");
    }

    #[test]
    fn round_trip_large_repetitive() {
        let data = vec![7u8; 200_000];
        assert_eq!(roundtrip(&data, 9, DEFAULT_BLOCK_SIZE), data);
    }

    #[test]
    fn round_trip_empty() {
        assert_eq!(roundtrip(b"", 1, DEFAULT_BLOCK_SIZE), b"");
    }

    #[test]
    fn boundary_block_size_stays_raw() {
        let data = vec![42u8; 64];
        let mut c = Stream::new_compress(6, 64);
        let mut out = vec![0u8; 512];
        let mut input: &[u8] = &data;
        let mut out_slice = &mut out[..];
        let status = c.compress(&mut input, &mut out_slice, Action::Finish, true);
        assert_eq!(status, Status::StreamEnd);
        assert_eq!(out[7], header::BLOCK_TYPE_RAW);
        assert_eq!(c.total_out(), 20 + 64 + 20);
    }

    #[test]
    fn split_header_byte_at_a_time() {
        let data = vec![3u8; 10_000];
        let mut c = Stream::new_compress(6, DEFAULT_BLOCK_SIZE);
        let mut compressed = vec![0u8; 20_000];
        let mut input: &[u8] = &data;
        let mut out_slice = &mut compressed[..];
        loop {
            match c.compress(&mut input, &mut out_slice, Action::Finish, true) {
                Status::Ok => continue,
                Status::StreamEnd => break,
                s => panic!("{s:?}"),
            }
        }
        let produced = c.total_out() as usize;
        compressed.truncate(produced);

        let mut d = Stream::new_decompress(DEFAULT_BLOCK_SIZE);
        let mut decompressed = vec![0u8; 11_000];
        let mut out_slice = &mut decompressed[..];
        let mut consumed_total = 0usize;
        loop {
            let remaining = compressed.len() - consumed_total;
            if remaining == 0 {
                break;
            }
            let mut one_byte: &[u8] = &compressed[consumed_total..consumed_total + 1];
            let before = d.total_in();
            let status = d.decompress(&mut one_byte, &mut out_slice, true);
            consumed_total += (d.total_in() - before) as usize;
            match status {
                Status::Ok => continue,
                Status::StreamEnd => break,
                s => panic!("{s:?}"),
            }
        }
        let produced = d.total_out() as usize;
        decompressed.truncate(produced);
        assert_eq!(decompressed, data);
    }

    #[test]
    fn corruption_in_magic_is_data_error() {
        let mut compressed = vec![0u8; 64];
        let mut c = Stream::new_compress(6, DEFAULT_BLOCK_SIZE);
        let mut input: &[u8] = b"hello world";
        let mut out_slice = &mut compressed[..];
        let _ = c.compress(&mut input, &mut out_slice, Action::Finish, true);
        compressed[0] ^= 0xff;

        let mut d = Stream::new_decompress(DEFAULT_BLOCK_SIZE);
        let mut decompressed = vec![0u8; 64];
        let mut input: &[u8] = &compressed;
        let mut out_slice = &mut decompressed[..];
        let status = d.decompress(&mut input, &mut out_slice, true);
        assert_eq!(status, Status::DataError);
        assert!(d.message().unwrap().contains("bad magic"));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut c = Stream::new_compress(6, DEFAULT_BLOCK_SIZE);
        let mut out1 = vec![0u8; 128];
        {
            let mut input: &[u8] = b"reset me";
            let mut out_slice = &mut out1[..];
            loop {
                match c.compress(&mut input, &mut out_slice, Action::Finish, true) {
                    Status::Ok => continue,
                    Status::StreamEnd => break,
                    s => panic!("{s:?}"),
                }
            }
        }
        let len1 = c.total_out();
        c.reset();
        let mut out2 = vec![0u8; 128];
        {
            let mut input: &[u8] = b"reset me";
            let mut out_slice = &mut out2[..];
            loop {
                match c.compress(&mut input, &mut out_slice, Action::Finish, true) {
                    Status::Ok => continue,
                    Status::StreamEnd => break,
                    s => panic!("{s:?}"),
                }
            }
        }
        let len2 = c.total_out();
        assert_eq!(len1, len2);
        assert_eq!(&out1[..len1 as usize], &out2[..len2 as usize]);
    }

    #[test]
    fn non_buffering_call_leaves_cursors_untouched_on_buf_error() {
        let mut d = Stream::new_decompress(DEFAULT_BLOCK_SIZE);
        let data = [0u8; 10];
        let mut input: &[u8] = &data;
        let mut out = [0u8; 64];
        let mut out_slice = &mut out[..];
        let before_in_len = input.len();
        let status = d.decompress(&mut input, &mut out_slice, false);
        assert_eq!(status, Status::BufError);
        assert_eq!(input.len(), before_in_len);
        assert_eq!(d.total_in(), 0);
        assert_eq!(d.total_out(), 0);
    }

    #[test]
    fn sync_locates_next_header_after_garbage() {
        let mut c = Stream::new_compress(6, DEFAULT_BLOCK_SIZE);
        let mut compressed = vec![0u8; 64];
        {
            let mut input: &[u8] = b"hello";
            let mut out_slice = &mut compressed[..];
            let _ = c.compress(&mut input, &mut out_slice, Action::Finish, true);
        }
        let mut garbage = vec![0xAAu8; 13];
        garbage.extend_from_slice(&compressed);

        let mut d = Stream::new_decompress(DEFAULT_BLOCK_SIZE);
        let mut input: &[u8] = &garbage;
        let status = d.decompress_sync(&mut input);
        assert_eq!(status, Status::Ok);
        assert_eq!(input, &compressed[..]);
    }

    #[test]
    fn sync_reports_data_error_with_no_header_in_window() {
        let mut d = Stream::new_decompress(DEFAULT_BLOCK_SIZE);
        let garbage = vec![0xAAu8; 64];
        let mut input: &[u8] = &garbage;
        let status = d.decompress_sync(&mut input);
        assert_eq!(status, Status::DataError);
    }

    #[test]
    fn stream_block_size_sniff() {
        let mut c = Stream::new_compress(6, DEFAULT_BLOCK_SIZE);
        let mut compressed = vec![0u8; 64];
        let mut input: &[u8] = b"hi";
        let mut out_slice = &mut compressed[..];
        let _ = c.compress(&mut input, &mut out_slice, Action::Finish, true);
        assert_eq!(get_stream_block_size(&compressed), Some(2));
        assert_eq!(is_compressed_stream(&compressed), Status::Ok);
        assert_eq!(is_compressed_stream(&compressed[..10]), Status::BufError);
        let mut bad = compressed.clone();
        bad[0] = 0;
        assert_eq!(is_compressed_stream(&bad), Status::DataError);
    }
}

