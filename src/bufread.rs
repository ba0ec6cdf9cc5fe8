//! I/O streams for wrapping `BufRead` types as encoders/decoders.

use std::io;
use std::io::prelude::*;

use crate::{Action, Compress, Compression, Decompress, Status};

/// A compressor, or encoder.
///
/// This structure implements a `BufRead` interface and will read
/// uncompressed data from an underlying stream and emit a stream of
/// compressed data.
pub struct FastLzEncoder<R> {
    obj: R,
    data: Compress,
    buf: Vec<u8>,
    pos: usize,
}

/// A decompressor, or decoder.
///
/// This structure implements a `BufRead` interface and takes a stream of
/// compressed data as input, providing the decompressed data when read from.
pub struct FastLzDecoder<R> {
    obj: R,
    data: Decompress,
    buf: Vec<u8>,
    pos: usize,
    done: bool,
    multi: bool,
}

impl<R: BufRead> FastLzEncoder<R> {
    /// Creates a new encoder which will read uncompressed data from the
    /// given stream and emit a compressed stream.
    pub fn new(r: R, level: Compression) -> FastLzEncoder<R> {
        FastLzEncoder {
            obj: r,
            data: Compress::new(level, crate::mem::DEFAULT_BLOCK_SIZE),
            buf: Vec::with_capacity(32 * 1024),
            pos: 0,
        }
    }
}

impl<R> FastLzEncoder<R> {
    /// Acquires a reference to the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.obj
    }

    /// Acquires a mutable reference to the underlying stream.
    ///
    /// Note that mutation of the stream may result in surprising results if
    /// this encoder is continued to be used.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.obj
    }

    /// Consumes this encoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.obj
    }

    /// Returns the number of bytes produced by the compressor
    /// (e.g. the number of bytes read from this stream).
    pub fn total_out(&self) -> u64 {
        self.data.total_out()
    }

    /// Returns the number of bytes consumed by the compressor
    /// (e.g. the number of bytes read from the underlying stream).
    pub fn total_in(&self) -> u64 {
        self.data.total_in()
    }
}

impl<R: BufRead> Read for FastLzEncoder<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.pos < self.buf.len() {
                let n = (self.buf.len() - self.pos).min(out.len());
                out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            self.buf.clear();
            self.pos = 0;

            let input = self.obj.fill_buf()?;
            let eof = input.is_empty();
            let action = if eof { Action::Finish } else { Action::Run };
            let before_in = self.data.total_in();
            self.data
                .compress_vec(input, &mut self.buf, action)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let consumed = (self.data.total_in() - before_in) as usize;
            self.obj.consume(consumed);

            if self.buf.is_empty() && eof {
                return Ok(0);
            }
        }
    }
}

impl<W: Write> Write for FastLzEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.get_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.get_mut().flush()
    }
}

impl<R: BufRead> FastLzDecoder<R> {
    /// Creates a new decoder which will decompress data read from the given
    /// stream.
    pub fn new(r: R) -> FastLzDecoder<R> {
        FastLzDecoder {
            obj: r,
            data: Decompress::new(crate::mem::DEFAULT_BLOCK_SIZE),
            buf: Vec::with_capacity(32 * 1024),
            pos: 0,
            done: false,
            multi: false,
        }
    }

    fn multi(mut self, flag: bool) -> FastLzDecoder<R> {
        self.multi = flag;
        self
    }
}

impl<R> FastLzDecoder<R> {
    /// Acquires a reference to the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.obj
    }

    /// Acquires a mutable reference to the underlying stream.
    ///
    /// Note that mutation of the stream may result in surprising results if
    /// this decoder is continued to be used.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.obj
    }

    /// Consumes this decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.obj
    }

    /// Returns the number of bytes that the decompressor has consumed.
    ///
    /// Note that this will likely be smaller than what the decompressor
    /// actually read from the underlying stream due to buffering.
    pub fn total_in(&self) -> u64 {
        self.data.total_in()
    }

    /// Returns the number of bytes that the decompressor has produced.
    pub fn total_out(&self) -> u64 {
        self.data.total_out()
    }
}

impl<R: BufRead> Read for FastLzDecoder<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.pos < self.buf.len() {
                let n = (self.buf.len() - self.pos).min(out.len());
                out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            if self.done {
                return Ok(0);
            }
            self.buf.clear();
            self.pos = 0;

            let input = self.obj.fill_buf()?;
            let eof = input.is_empty();
            let before_in = self.data.total_in();
            let status = self
                .data
                .decompress_vec(input, &mut self.buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let consumed = (self.data.total_in() - before_in) as usize;
            self.obj.consume(consumed);

            if status == Status::StreamEnd {
                if !eof && self.multi {
                    self.data = Decompress::new(self.data.block_size());
                } else {
                    self.done = true;
                }
            }
            if self.buf.is_empty() && (self.done || eof) {
                return Ok(0);
            }
        }
    }
}

impl<W: Write> Write for FastLzDecoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.get_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.get_mut().flush()
    }
}

/// A streaming decoder that decodes all members of a multi-block-stream
/// concatenation, rather than stopping at the first EOF marker.
pub struct MultiFastLzDecoder<R>(FastLzDecoder<R>);

impl<R: BufRead> MultiFastLzDecoder<R> {
    /// Creates a new decoder from the given reader. If the compressed
    /// stream is actually several streams concatenated back to back, all
    /// of them will be decoded in turn.
    pub fn new(r: R) -> MultiFastLzDecoder<R> {
        MultiFastLzDecoder(FastLzDecoder::new(r).multi(true))
    }
}

impl<R> MultiFastLzDecoder<R> {
    /// Acquires a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        self.0.get_ref()
    }

    /// Acquires a mutable reference to the underlying stream.
    ///
    /// Note that mutation of the stream may result in surprising results if
    /// this decoder is continued to be used.
    pub fn get_mut(&mut self) -> &mut R {
        self.0.get_mut()
    }

    /// Consumes this decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.0.into_inner()
    }
}

impl<R: BufRead> Read for MultiFastLzDecoder<R> {
    fn read(&mut self, into: &mut [u8]) -> io::Result<usize> {
        self.0.read(into)
    }
}

impl<R: BufRead + Write> Write for MultiFastLzDecoder<R> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.get_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.get_mut().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn smoke_round_trip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(200);
        let encoder = FastLzEncoder::new(Cursor::new(data.clone()), Compression::Best);
        let mut decoder = FastLzDecoder::new(io::BufReader::new(encoder));
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn multi_decoder_reads_concatenated_streams() {
        let mut compressed = Vec::new();
        for chunk in [&b"first"[..], &b"second"[..]] {
            let mut encoder = FastLzEncoder::new(Cursor::new(chunk.to_vec()), Compression::Fastest);
            let mut buf = Vec::new();
            encoder.read_to_end(&mut buf).unwrap();
            compressed.extend_from_slice(&buf);
        }
        let mut decoder = MultiFastLzDecoder::new(io::BufReader::new(Cursor::new(compressed)));
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"firstsecond");
    }
}
