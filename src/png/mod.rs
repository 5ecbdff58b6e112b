//! PNG container framing: signature, chunks and a streaming chunk reader.
//!
//! Only the framing needed to reach the terminating `IEND` chunk is
//! understood here. Chunk payloads are never interpreted; colour type, bit
//! depth and ancillary chunk ordering are out of scope.

pub mod chunk;
pub mod reader;
pub mod signature;

pub use chunk::{chunk_crc, Chunk, ChunkHeader, ChunkType};
pub use reader::ChunkReader;
pub use signature::{read_signature, PNG_SIGNATURE};
