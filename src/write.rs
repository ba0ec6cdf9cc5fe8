//! Writer-based compression/decompression streams

use std::io;
use std::io::prelude::*;

use crate::{Action, Compress, Compression, Decompress, Status};

/// A compression stream which will have uncompressed data written to it and
/// will write compressed data to an output stream.
pub struct FastLzEncoder<W: Write> {
    data: Compress,
    obj: Option<W>,
    buf: Vec<u8>,
}

/// A decompression stream which will have compressed data written to it and
/// will write decompressed data to an output stream.
pub struct FastLzDecoder<W: Write> {
    data: Decompress,
    obj: Option<W>,
    buf: Vec<u8>,
    done: bool,
}

impl<W: Write> FastLzEncoder<W> {
    /// Create a new compression stream which will compress at the given level
    /// to write compress output to the given output stream.
    pub fn new(obj: W, level: Compression) -> FastLzEncoder<W> {
        FastLzEncoder {
            data: Compress::new(level, crate::mem::DEFAULT_BLOCK_SIZE),
            obj: Some(obj),
            buf: Vec::with_capacity(32 * 1024),
        }
    }

    fn dump(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            self.obj.as_mut().unwrap().write_all(&self.buf)?;
            self.buf.truncate(0);
        }
        Ok(())
    }

    fn do_finish(&mut self) -> io::Result<()> {
        loop {
            self.dump()?;
            let res = self.data.compress_vec(&[], &mut self.buf, Action::Finish);
            if res.map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))? == Status::StreamEnd {
                break;
            }
        }
        self.dump()
    }

    /// Consumes this encoder, flushing the output stream.
    ///
    /// This will flush the underlying data stream and then return the
    /// contained writer if the flush succeeded.
    pub fn finish(mut self) -> io::Result<W> {
        self.do_finish()?;
        Ok(self.obj.take().unwrap())
    }

    /// Returns the number of bytes produced by the compressor.
    ///
    /// Note that, due to buffering, this only bears any relation to
    /// `total_in()` after a call to `flush()`. At that point,
    /// `total_out() / total_in()` is the compression ratio.
    pub fn total_out(&self) -> u64 {
        self.data.total_out()
    }

    /// Returns the number of bytes consumed by the compressor
    /// (e.g. the number of bytes written to this stream).
    pub fn total_in(&self) -> u64 {
        self.data.total_in()
    }
}

impl<W: Write> Write for FastLzEncoder<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        loop {
            self.dump()?;

            let total_in = self.total_in();
            self.data
                .compress_vec(data, &mut self.buf, Action::Run)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let written = (self.total_in() - total_in) as usize;

            if written > 0 || data.is_empty() {
                return Ok(written);
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        loop {
            self.dump()?;
            let before = self.total_out();
            self.data
                .compress_vec(&[], &mut self.buf, Action::Flush)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

            if before == self.total_out() {
                break;
            }
        }
        self.obj.as_mut().unwrap().flush()
    }
}

impl<W: Write> Drop for FastLzEncoder<W> {
    fn drop(&mut self) {
        if self.obj.is_some() {
            let _ = self.do_finish();
        }
    }
}

impl<W: Write> FastLzDecoder<W> {
    /// Create a new decoding stream which will decompress all data written
    /// to it into `obj`.
    pub fn new(obj: W) -> FastLzDecoder<W> {
        FastLzDecoder {
            data: Decompress::new(crate::mem::DEFAULT_BLOCK_SIZE),
            obj: Some(obj),
            buf: Vec::with_capacity(32 * 1024),
            done: false,
        }
    }

    fn dump(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            self.obj.as_mut().unwrap().write_all(&self.buf)?;
            self.buf.truncate(0);
        }
        Ok(())
    }

    fn do_finish(&mut self) -> io::Result<()> {
        while !self.done {
            self.write(&[])?;
        }
        self.dump()
    }

    /// Unwrap the underlying writer, finishing the decompression stream.
    pub fn finish(&mut self) -> io::Result<W> {
        self.do_finish()?;
        Ok(self.obj.take().unwrap())
    }

    /// Returns the number of bytes produced by the decompressor.
    ///
    /// Note that, due to buffering, this only bears any relation to
    /// `total_in()` after a call to `flush()`. At that point,
    /// `total_in() / total_out()` is the compression ratio.
    pub fn total_out(&self) -> u64 {
        self.data.total_out()
    }

    /// Returns the number of bytes consumed by the decompressor
    /// (e.g. the number of bytes written to this stream).
    pub fn total_in(&self) -> u64 {
        self.data.total_in()
    }
}

impl<W: Write> Write for FastLzDecoder<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.done {
            return Ok(0);
        }
        loop {
            self.dump()?;

            let before = self.total_in();
            let res = self.data.decompress_vec(data, &mut self.buf);
            let written = (self.total_in() - before) as usize;

            let res = res.map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

            if res == Status::StreamEnd {
                self.done = true;
            }
            if written > 0 || data.is_empty() || self.done {
                return Ok(written);
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.dump()?;
        self.obj.as_mut().unwrap().flush()
    }
}

impl<W: Write> Drop for FastLzDecoder<W> {
    fn drop(&mut self) {
        if self.obj.is_some() {
            let _ = self.do_finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FastLzDecoder, FastLzEncoder};
    use std::io::prelude::*;

    #[test]
    fn smoke() {
        let d = FastLzDecoder::new(Vec::new());
        let mut c = FastLzEncoder::new(d, crate::Compression::Default);
        c.write_all(b"12834").unwrap();
        let s = "12345".repeat(100_000);
        c.write_all(s.as_bytes()).unwrap();
        let data = c.finish().unwrap().finish().unwrap();
        assert_eq!(&data[0..5], b"12834");
        assert_eq!(data.len(), 500_005);
        assert!(format!("12834{s}").as_bytes() == &*data);
    }

    #[test]
    fn write_empty() {
        let d = FastLzDecoder::new(Vec::new());
        let mut c = FastLzEncoder::new(d, crate::Compression::Default);
        c.write(b"").unwrap();
        let data = c.finish().unwrap().finish().unwrap();
        assert_eq!(&data[..], b"");
    }

    #[test]
    fn flush_produces_readable_prefix() {
        let mut out = Vec::new();
        {
            let mut c = FastLzEncoder::new(&mut out, crate::Compression::Fastest);
            c.write_all(b"hello world").unwrap();
            c.flush().unwrap();
        }
        assert!(!out.is_empty());

        let mut d = FastLzDecoder::new(Vec::new());
        d.write_all(&out).unwrap();
        let decoded = d.finish().unwrap();
        assert_eq!(decoded, b"hello world");
    }
}
