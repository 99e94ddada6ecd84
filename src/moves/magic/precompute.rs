//! One-time generation of rook/bishop magic bitboard tables.
//!
//! For each square we compute the "relevant occupancy" mask (the squares a
//! slider's attack set can possibly depend on, excluding board edges since a
//! blocker on the edge never changes where the ray stops short of it),
//! enumerate every subset of that mask via the carry-rippler trick, and
//! search for a magic multiplier that hashes every subset to a unique index
//! without colliding two different attack sets into the same slot.

use rand::{RngCore, SeedableRng, rngs::StdRng};

use super::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use super::search::find_magic_number_for_square;
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};

/// How to seed the RNG used for the magic-number search.
pub enum MagicTableSeed {
    /// Reproducible: same seed always finds the same magics.
    Fixed(u64),
    /// Seeded from the OS RNG; a fresh search every run.
    Random,
}

fn rook_relevant_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;

    for r in (rank + 1)..7 {
        mask |= 1u64 << (r * 8 + file);
    }
    for r in (1..rank).rev() {
        mask |= 1u64 << (r * 8 + file);
    }
    for f in (file + 1)..7 {
        mask |= 1u64 << (rank * 8 + f);
    }
    for f in (1..file).rev() {
        mask |= 1u64 << (rank * 8 + f);
    }
    mask
}

fn bishop_relevant_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;

    let (mut r, mut f) = (rank + 1, file + 1);
    while r <= 6 && f <= 6 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f += 1;
    }
    let (mut r, mut f) = (rank - 1, file - 1);
    while r >= 1 && f >= 1 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f -= 1;
    }
    let (mut r, mut f) = (rank + 1, file - 1);
    while r <= 6 && f >= 1 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f -= 1;
    }
    let (mut r, mut f) = (rank - 1, file + 1);
    while r >= 1 && f <= 6 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f += 1;
    }
    mask
}

/// Every subset of `mask`, via the standard carry-rippler enumeration.
fn subsets_of(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1usize << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

fn build_entry(
    square: usize,
    mask: u64,
    attack_fn: fn(usize, u64) -> u64,
    rng: &mut StdRng,
) -> Result<MagicEntry, String> {
    let bits = mask.count_ones();
    let shift = 64 - bits;

    let blockers = subsets_of(mask);
    let attacks: Vec<u64> = blockers.iter().map(|&b| attack_fn(square, b)).collect();

    let magic = find_magic_number_for_square(&blockers, &attacks, shift, rng)?;

    let mut table = vec![0u64; 1usize << bits];
    for (&b, &a) in blockers.iter().zip(attacks.iter()) {
        let index = (b.wrapping_mul(magic) >> shift) as usize;
        table[index] = a;
    }

    Ok(MagicEntry {
        magic,
        shift,
        mask,
        table: table.into_boxed_slice(),
    })
}

/// Search for magic numbers for every square and assemble the full table set.
///
/// Fails only if the random search exhausts its attempt budget for some
/// square, which in practice does not happen with the sparse-candidate
/// generator in [`super::search`].
pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let mut rng = match seed {
        MagicTableSeed::Fixed(s) => StdRng::seed_from_u64(s),
        MagicTableSeed::Random => {
            let mut seed_bytes = [0u8; 32];
            rand::rng().fill_bytes(&mut seed_bytes);
            StdRng::from_seed(seed_bytes)
        }
    };

    let mut rook_entries = Vec::with_capacity(64);
    let mut bishop_entries = Vec::with_capacity(64);

    for square in 0..64 {
        let rook_mask = rook_relevant_mask(square);
        rook_entries.push(build_entry(
            square,
            rook_mask,
            rook_attacks_per_square,
            &mut rng,
        )?);

        let bishop_mask = bishop_relevant_mask(square);
        bishop_entries.push(build_entry(
            square,
            bishop_mask,
            bishop_attacks_per_square,
            &mut rng,
        )?);
    }

    Ok(MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_mask_excludes_edges() {
        // a1: relevant squares are along rank 1 and file a, minus the edges.
        let mask = rook_relevant_mask(0);
        assert_eq!(mask & 0x8000_0000_0000_0001, 0); // h1, a8 excluded
    }

    #[test]
    fn bishop_mask_excludes_edges() {
        let mask = bishop_relevant_mask(27); // d4
        assert_eq!(mask.count_ones(), 9);
    }

    #[test]
    fn subset_enumeration_covers_full_power_set() {
        let mask = 0b1011u64;
        let subsets = subsets_of(mask);
        assert_eq!(subsets.len(), 1 << mask.count_ones());
        for bit_pattern in 0..(1u64 << mask.count_ones()) {
            assert!(subsets.contains(&{
                // spread bit_pattern's bits across mask's set bits
                let mut m = mask;
                let mut result = 0u64;
                let mut bp = bit_pattern;
                while m != 0 {
                    let lsb = m & m.wrapping_neg();
                    if bp & 1 != 0 {
                        result |= lsb;
                    }
                    bp >>= 1;
                    m &= m - 1;
                }
                result
            }));
        }
    }

    #[test]
    fn fixed_seed_generates_consistent_tables() {
        let a = generate_magic_tables(MagicTableSeed::Fixed(7)).unwrap();
        let b = generate_magic_tables(MagicTableSeed::Fixed(7)).unwrap();
        for sq in 0..64 {
            assert_eq!(a.rook.entries[sq].magic, b.rook.entries[sq].magic);
            assert_eq!(a.bishop.entries[sq].magic, b.bishop.entries[sq].magic);
        }
    }
}
