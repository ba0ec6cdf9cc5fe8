//! A streaming block-framing compression codec.
//!
//! Data is split into blocks, each wrapped in a 20-byte header recording its
//! type (raw or compressed), compressed size, and original size; a stream
//! ends with a header-only EOF marker. The streams offered in this library
//! are primarily found in the `read` and `write` modules; both compressors
//! and decompressors are available in each depending on what operation you
//! need.
//!
//! Access to the lower-level, mem-buffer-oriented stream is provided
//! through the `mem` module, and the lowest-level, direction-tagged stream
//! through `raw`.
//!
//! # Example
//!
//! ```
//! use std::io::prelude::*;
//! use fastlz::Compression;
//! use fastlz::read::{FastLzEncoder, FastLzDecoder};
//!
//! // Round trip some bytes from a byte source, into a compressor, into a
//! // decompressor, and finally into a vector.
//! let data = "Hello, World!".as_bytes();
//! let compressor = FastLzEncoder::new(data, Compression::Best);
//! let mut decompressor = FastLzDecoder::new(compressor);
//!
//! let mut contents = String::new();
//! decompressor.read_to_string(&mut contents).unwrap();
//! assert_eq!(contents, "Hello, World!");
//! ```

#![deny(missing_docs)]

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
extern crate rand;

pub use mem::{Action, Compress, Decompress, Error, Status};

mod block;
mod header;
pub mod mem;
pub mod raw;

pub mod bufread;
pub mod read;
pub mod write;

/// When compressing data, the compression level can be specified by a value
/// in this enum. It only affects how hard the block compressor looks for
/// back-references, never correctness.
#[derive(Copy, Clone)]
pub enum Compression {
    /// Optimize for the best speed of encoding.
    Fastest = 1,
    /// Optimize for the size of data being encoded.
    Best = 9,
    /// Choose the default compression, a balance between speed and size.
    Default = 6,
}

