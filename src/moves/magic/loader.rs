//! Process-wide magic table singleton.
//!
//! Table generation runs a random search over ~2^20 candidates per square,
//! cheap in absolute terms but wasteful to repeat on every lookup, so the
//! result is built once behind a `OnceLock` and shared via `Arc`.

use std::sync::{Arc, OnceLock};

use super::precompute::{MagicTableSeed, generate_magic_tables};
use super::structs::MagicTables;

static TABLES: OnceLock<Arc<MagicTables>> = OnceLock::new();

fn build() -> MagicTables {
    #[cfg(feature = "deterministic_magic")]
    let seed = MagicTableSeed::Fixed(0xC0FF_EE12_3456_789A);
    #[cfg(not(feature = "deterministic_magic"))]
    let seed = MagicTableSeed::Random;

    generate_magic_tables(seed).expect("magic number search exhausted its attempt budget")
}

/// Deserialize a table set from `VANTAGE_MAGIC_TABLE_PATH` if set and valid,
/// otherwise generate one from scratch. Lets a long-running deployment pin a
/// known-good table set instead of re-searching for magics on every boot.
#[cfg(feature = "load_magic")]
fn load_or_build() -> MagicTables {
    if let Ok(path) = std::env::var("VANTAGE_MAGIC_TABLE_PATH") {
        if let Ok(bytes) = std::fs::read(&path) {
            if let Ok(tables) = bincode::deserialize::<MagicTables>(&bytes) {
                return tables;
            }
        }
    }
    build()
}

#[cfg(not(feature = "load_magic"))]
fn load_or_build() -> MagicTables {
    build()
}

/// Return the process-wide magic bitboard tables, generating them on first call.
pub fn load_magic_tables() -> Arc<MagicTables> {
    TABLES.get_or_init(|| Arc::new(load_or_build())).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_calls_share_the_same_tables() {
        let a = load_magic_tables();
        let b = load_magic_tables();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn rook_and_bishop_tables_cover_all_squares() {
        let tables = load_magic_tables();
        assert_eq!(tables.rook.entries.len(), 64);
        assert_eq!(tables.bishop.entries.len(), 64);
    }
}
