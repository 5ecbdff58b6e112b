//! Chunk types and the per-chunk CRC-32.

use crc32fast::Hasher;
use std::fmt;

/// Four-byte chunk type tag.
///
/// Any four bytes are structurally legal; no vocabulary is enforced.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");

    /// Raw tag bytes.
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// True for the terminating chunk type.
    pub fn is_end(&self) -> bool {
        *self == Self::IEND
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Non-ASCII tags are shown escaped; they are legal framing-wise.
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

/// Length and type fields that open every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Exact byte count of the body, independent of the type.
    pub length: u32,
    pub chunk_type: ChunkType,
}

/// A fully read chunk.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    pub header: ChunkHeader,
    pub body: Vec<u8>,
    /// CRC-32 as stored in the stream.
    pub checksum: u32,
}

impl Chunk {
    pub fn chunk_type(&self) -> ChunkType {
        self.header.chunk_type
    }

    /// CRC-32 over type tag and body.
    pub fn computed_crc(&self) -> u32 {
        chunk_crc(self.header.chunk_type, &self.body)
    }

    /// Whether the stored checksum matches the body.
    pub fn crc_matches(&self) -> bool {
        self.computed_crc() == self.checksum
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("type", &self.header.chunk_type)
            .field("length", &self.header.length)
            .field("body", &&self.body[..self.body.len().min(12)])
            .field("checksum", &format_args!("{:#010x}", self.checksum))
            .finish()
    }
}

/// CRC-32 (IEEE, reflected 0xEDB88320, init and final XOR 0xFFFFFFFF) of
/// `chunk_type || body`, as stored in the chunk trailer.
pub fn chunk_crc(chunk_type: ChunkType, body: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(chunk_type.as_bytes());
    hasher.update(body);
    hasher.finalize()
}
