//! Encode/decode of the 20-byte block header.
//!
//! Wire layout (little-endian): 7-byte magic, 1-byte type, then three u32
//! fields (compressed length, original length, block size).

pub const HEADER_SIZE: usize = 20;
pub const BLOCK_MAGIC: &[u8; 7] = b"FastLZ\0";

pub const BLOCK_TYPE_RAW: u8 = 0xc0;
pub const BLOCK_TYPE_COMPRESSED: u8 = 0x0c;

/// Block type as read off the wire.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BlockType {
    Raw,
    Compressed,
    /// The magic matched but the type byte is neither RAW nor COMPRESSED.
    Unrecognized,
    /// The 7-byte magic itself didn't match.
    BadMagic,
}

/// A parsed (or synthesized) block header.
#[derive(Copy, Clone, Debug)]
pub struct Header {
    pub block_type: BlockType,
    pub block_size: u32,
    pub compressed: u32,
    pub original: u32,
}

/// Writes a header into `dest[..HEADER_SIZE]`, returning `HEADER_SIZE`.
///
/// # Panics
///
/// Panics if `dest` is shorter than `HEADER_SIZE`.
pub fn encode(dest: &mut [u8], block_type: u8, block_size: u32, compressed: u32, original: u32) -> usize {
    let dest = &mut dest[..HEADER_SIZE];
    dest[0..7].copy_from_slice(BLOCK_MAGIC);
    dest[7] = block_type;
    dest[8..12].copy_from_slice(&compressed.to_le_bytes());
    dest[12..16].copy_from_slice(&original.to_le_bytes());
    dest[16..20].copy_from_slice(&block_size.to_le_bytes());
    HEADER_SIZE
}

/// Parses a header from `source[..HEADER_SIZE]`.
///
/// Matches the reference implementation's aliasing quirk: `block_size` is
/// read from offset 12 (the `original` field), not offset 16 where `encode`
/// writes it. See SPEC_FULL.md §4.1 and §9. A type byte that isn't RAW or
/// COMPRESSED is reported as `Unrecognized` rather than `BadMagic` — only an
/// actual magic mismatch gets that sentinel, so callers can tell "corrupt
/// data" (bad magic) apart from "well-formed but unsupported" (bad type).
///
/// # Panics
///
/// Panics if `source` is shorter than `HEADER_SIZE`.
pub fn decode(source: &[u8]) -> Header {
    let source = &source[..HEADER_SIZE];
    if source[0..7] != BLOCK_MAGIC[..] {
        return Header {
            block_type: BlockType::BadMagic,
            block_size: 0,
            compressed: 0,
            original: 0,
        };
    }
    let block_type = match source[7] {
        BLOCK_TYPE_RAW => BlockType::Raw,
        BLOCK_TYPE_COMPRESSED => BlockType::Compressed,
        _ => BlockType::Unrecognized,
    };
    let compressed = u32::from_le_bytes(source[8..12].try_into().unwrap());
    let original = u32::from_le_bytes(source[12..16].try_into().unwrap());
    // quirk: block_size aliases the `original` field on the wire, not offset 16.
    let block_size = u32::from_le_bytes(source[12..16].try_into().unwrap());
    Header { block_type, block_size, compressed, original }
}

/// Returns `true` if `source[0..7]` is the literal magic (used by the sync
/// scan, which checks the magic byte-by-byte without parsing the rest).
pub fn has_magic(source: &[u8]) -> bool {
    source.len() >= 7 && source[0..7] == BLOCK_MAGIC[..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_compressed() {
        let mut buf = [0u8; HEADER_SIZE];
        encode(&mut buf, BLOCK_TYPE_COMPRESSED, 32768, 123, 456);
        let hdr = decode(&buf);
        assert_eq!(hdr.block_type, BlockType::Compressed);
        assert_eq!(hdr.compressed, 123);
        assert_eq!(hdr.original, 456);
        // quirk: block_size reads back as `original`, not the 32768 written.
        assert_eq!(hdr.block_size, 456);
    }

    #[test]
    fn bad_magic() {
        let mut buf = [0u8; HEADER_SIZE];
        encode(&mut buf, BLOCK_TYPE_RAW, 64, 1, 1);
        buf[0] ^= 0xff;
        let hdr = decode(&buf);
        assert_eq!(hdr.block_type, BlockType::BadMagic);
        assert_eq!(hdr.compressed, 0);
        assert_eq!(hdr.original, 0);
        assert_eq!(hdr.block_size, 0);
    }

    #[test]
    fn unrecognized_type_keeps_sizes() {
        let mut buf = [0u8; HEADER_SIZE];
        encode(&mut buf, 0x55, 64, 7, 9);
        let hdr = decode(&buf);
        assert_eq!(hdr.block_type, BlockType::Unrecognized);
        assert_eq!(hdr.compressed, 7);
    }

    #[test]
    fn eof_marker_round_trip() {
        let mut buf = [0u8; HEADER_SIZE];
        encode(&mut buf, BLOCK_TYPE_COMPRESSED, 32768, 0, 0);
        let hdr = decode(&buf);
        assert_eq!(hdr.block_type, BlockType::Compressed);
        assert_eq!(hdr.compressed, 0);
        assert_eq!(hdr.original, 0);
    }

    #[test]
    fn empty_stream_literal_bytes() {
        let mut buf = [0u8; HEADER_SIZE];
        encode(&mut buf, BLOCK_TYPE_COMPRESSED, 32768, 0, 0);
        assert_eq!(&buf[0..7], &[0x46, 0x61, 0x73, 0x74, 0x4C, 0x5A, 0x00]);
        assert_eq!(buf[7], 0x0C);
        assert_eq!(&buf[8..16], &[0u8; 8]);
        assert_eq!(u32::from_le_bytes(buf[16..20].try_into().unwrap()), 32768);
    }
}
