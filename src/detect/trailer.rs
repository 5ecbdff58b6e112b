//! Classification of bytes found after the first IEND chunk.
//!
//! An editor that shrinks an image in place rewrites the PNG at the start of
//! the old buffer and leaves the rest untouched, so stale data from the old
//! file follows the new IEND. The trailer is flagged only when its last eight
//! bytes read as a zero length field followed by the empty-IEND CRC
//! (`00 00 00 00 AE 42 60 82`). Leftover data that ends any other way is not
//! flagged, and nothing else in the trailer is inspected.

/// Smallest trailer that can hold a phantom IEND footer (length + CRC).
pub const MIN_TRAILER_LEN: usize = 8;

/// CRC-32 of an empty IEND chunk (`crc32(b"IEND")`).
pub const PHANTOM_FOOTER_CRC: u32 = 0xAE42_6082;

/// Outcome of inspecting a trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerClass {
    /// File ends exactly at IEND.
    Empty,
    /// Fewer than [`MIN_TRAILER_LEN`] extra bytes.
    TooShort,
    /// Extra bytes that do not end in a phantom IEND footer.
    Unrecognized,
    /// Extra bytes ending in a duplicated empty IEND footer.
    PhantomFooter,
}

/// Classify the raw bytes following the first IEND chunk.
pub fn classify_trailer(trailer: &[u8]) -> TrailerClass {
    if trailer.is_empty() {
        return TrailerClass::Empty;
    }
    if trailer.len() < MIN_TRAILER_LEN {
        return TrailerClass::TooShort;
    }
    if has_phantom_footer(trailer) {
        TrailerClass::PhantomFooter
    } else {
        TrailerClass::Unrecognized
    }
}

fn has_phantom_footer(trailer: &[u8]) -> bool {
    let footer = &trailer[trailer.len() - MIN_TRAILER_LEN..];
    let (len_field, crc_field) = footer.split_at(4);
    let length = u32::from_be_bytes([len_field[0], len_field[1], len_field[2], len_field[3]]);
    let crc = u32::from_be_bytes([crc_field[0], crc_field[1], crc_field[2], crc_field[3]]);
    length == 0 && crc == PHANTOM_FOOTER_CRC
}
