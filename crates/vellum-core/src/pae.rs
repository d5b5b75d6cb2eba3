//! Pre-Authentication Encoding.
//!
//! PAE turns an ordered list of byte strings into a single byte string that
//! can be authenticated without ambiguity:
//! - 8-byte little-endian piece count
//! - for each piece: 8-byte little-endian length, then the raw bytes
//!
//! The encoding is critical: every implementation must produce identical
//! bytes or tags and signatures will not verify across them.

/// Encode a length as 8 little-endian bytes with the top bit cleared.
///
/// Clearing the MSB keeps the value representable as a signed 64-bit integer
/// on platforms that lack unsigned types.
pub fn le64(n: u64) -> [u8; 8] {
    (n & (u64::MAX >> 1)).to_le_bytes()
}

/// Encode pieces with PAE.
pub fn pae(pieces: &[&[u8]]) -> Vec<u8> {
    let total = 8 + pieces.iter().map(|p| 8 + p.len()).sum::<usize>();
    let mut buf = Vec::with_capacity(total);

    buf.extend_from_slice(&le64(pieces.len() as u64));
    for piece in pieces {
        buf.extend_from_slice(&le64(piece.len() as u64));
        buf.extend_from_slice(piece);
    }
    buf
}
