//! I/O streams for wrapping plain `Read` types as encoders/decoders.
//!
//! These wrap a reader that doesn't implement `BufRead` by carrying their
//! own internal buffer, unlike the `bufread` module's adapters which read
//! directly from the caller-supplied `BufRead`.

use std::io;
use std::io::prelude::*;

use crate::{Action, Compress, Compression, Decompress, Status};

/// A compressor, or encoder.
///
/// This structure implements a `Read` interface and will read uncompressed
/// data from an underlying stream and emit a stream of compressed data.
pub struct FastLzEncoder<R>(Inner<R, Compress>);

/// A decompressor, or decoder.
///
/// This structure implements a `Read` interface and takes a stream of
/// compressed data as input, providing the decompressed data when read from.
pub struct FastLzDecoder<R>(Inner<R, Decompress>);

struct Inner<R, S> {
    obj: R,
    data: S,
    in_buf: Vec<u8>,
    in_pos: usize,
    in_cap: usize,
    out_buf: Vec<u8>,
    out_pos: usize,
    done: bool,
}

/// Drives one direction of a mem-level stream, buffering as needed so a
/// `Read` adapter can always make partial progress across calls instead of
/// requiring a full block's worth of input or output space up front.
trait Codec {
    fn total_in(&self) -> u64;
    fn step_vec(&mut self, input: &[u8], output: &mut Vec<u8>, eof: bool) -> Result<Status, crate::Error>;
}

impl Codec for Compress {
    fn total_in(&self) -> u64 {
        Compress::total_in(self)
    }
    fn step_vec(&mut self, input: &[u8], output: &mut Vec<u8>, eof: bool) -> Result<Status, crate::Error> {
        let action = if eof { Action::Finish } else { Action::Run };
        self.compress_vec(input, output, action)
    }
}

impl Codec for Decompress {
    fn total_in(&self) -> u64 {
        Decompress::total_in(self)
    }
    fn step_vec(&mut self, input: &[u8], output: &mut Vec<u8>, _eof: bool) -> Result<Status, crate::Error> {
        self.decompress_vec(input, output)
    }
}

impl<R: Read, S: Codec> Inner<R, S> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.out_pos < self.out_buf.len() {
                let n = (self.out_buf.len() - self.out_pos).min(out.len());
                out[..n].copy_from_slice(&self.out_buf[self.out_pos..self.out_pos + n]);
                self.out_pos += n;
                return Ok(n);
            }
            if self.done {
                return Ok(0);
            }
            self.out_buf.clear();
            self.out_pos = 0;

            let mut eof = false;
            if self.in_pos == self.in_cap {
                self.in_cap = self.obj.read(&mut self.in_buf)?;
                self.in_pos = 0;
                eof = self.in_cap == 0;
            }

            let before_in = self.data.total_in();
            let status = self
                .data
                .step_vec(&self.in_buf[self.in_pos..self.in_cap], &mut self.out_buf, eof)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            self.in_pos += (self.data.total_in() - before_in) as usize;

            if status == Status::StreamEnd {
                self.done = true;
            }
            if self.out_buf.is_empty() && (self.done || eof) {
                return Ok(0);
            }
        }
    }
}

impl<R: Read> FastLzEncoder<R> {
    /// Creates a new encoder which will read uncompressed data from the
    /// given stream and emit a compressed stream.
    pub fn new(r: R, level: Compression) -> FastLzEncoder<R> {
        FastLzEncoder(Inner {
            obj: r,
            data: Compress::new(level, crate::mem::DEFAULT_BLOCK_SIZE),
            in_buf: vec![0; 32 * 1024],
            in_pos: 0,
            in_cap: 0,
            out_buf: Vec::with_capacity(32 * 1024),
            out_pos: 0,
            done: false,
        })
    }

    /// Acquires a reference to the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.0.obj
    }

    /// Acquires a mutable reference to the underlying stream.
    ///
    /// Note that mutation of the stream may result in surprising results if
    /// this encoder is continued to be used.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.0.obj
    }

    /// Consumes this encoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.0.obj
    }

    /// Returns the number of bytes produced by the compressor.
    pub fn total_out(&self) -> u64 {
        self.0.data.total_out()
    }

    /// Returns the number of bytes consumed by the compressor.
    pub fn total_in(&self) -> u64 {
        self.0.data.total_in()
    }
}

impl<R: Read> Read for FastLzEncoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Read> FastLzDecoder<R> {
    /// Creates a new decoder which will decompress data read from the given
    /// stream.
    pub fn new(r: R) -> FastLzDecoder<R> {
        FastLzDecoder(Inner {
            obj: r,
            data: Decompress::new(crate::mem::DEFAULT_BLOCK_SIZE),
            in_buf: vec![0; 32 * 1024],
            in_pos: 0,
            in_cap: 0,
            out_buf: Vec::with_capacity(32 * 1024),
            out_pos: 0,
            done: false,
        })
    }

    /// Acquires a reference to the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.0.obj
    }

    /// Acquires a mutable reference to the underlying stream.
    ///
    /// Note that mutation of the stream may result in surprising results if
    /// this decoder is continued to be used.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.0.obj
    }

    /// Consumes this decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.0.obj
    }

    /// Returns the number of bytes that the decompressor has consumed.
    pub fn total_in(&self) -> u64 {
        self.0.data.total_in()
    }

    /// Returns the number of bytes that the decompressor has produced.
    pub fn total_out(&self) -> u64 {
        self.0.data.total_out()
    }
}

impl<R: Read> Read for FastLzDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}
