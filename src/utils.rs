//! Small free-standing helpers shared across move generation and search.

/// Pop (return and clear) the least-significant set bit's index.
///
/// Thin wrapper kept around so call sites that only need the index
/// (rather than the full `BitboardExt` trait) can stay terse.
#[inline(always)]
pub fn pop_lsb(bb: &mut u64) -> u8 {
    let idx = bb.trailing_zeros() as u8;
    *bb &= *bb - 1;
    idx
}

/// (rank, file) -> 0..64 square index, little-endian rank-file mapping.
#[inline(always)]
pub fn square_index(rank: usize, file: usize) -> usize {
    rank * 8 + file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_lsb_walks_low_to_high() {
        let mut bb = 0b0010_0101u64;
        assert_eq!(pop_lsb(&mut bb), 0);
        assert_eq!(pop_lsb(&mut bb), 2);
        assert_eq!(pop_lsb(&mut bb), 5);
        assert_eq!(bb, 0);
    }

    #[test]
    fn square_index_matches_a1_zero_layout() {
        assert_eq!(square_index(0, 0), 0); // a1
        assert_eq!(square_index(7, 7), 63); // h8
        assert_eq!(square_index(3, 4), 28); // e4
    }
}
