//! Property-based tests for the window sweep
//!
//! The sweep is compared against a brute-force reference: for every
//! emitted tile, the population must equal the set of input items whose
//! ranges overlap the tile.

use exintools::core::{GenomicInterval, Strand, WindowIter, WindowTile};
use proptest::prelude::*;

fn iv(start: u64, end: u64) -> GenomicInterval {
    GenomicInterval::new("chr1", start, end, Strand::Both)
}

/// Sorted (by start) items on one reference sequence
fn arb_sorted_items() -> impl Strategy<Value = Vec<GenomicInterval>> {
    prop::collection::vec((0u64..10_000, 1u64..500), 1..40).prop_map(|mut pairs| {
        pairs.sort_by_key(|&(s, _)| s);
        pairs.into_iter().map(|(s, len)| iv(s, s + len)).collect()
    })
}

fn sweep(
    items: &[GenomicInterval],
    window: u64,
    stagger: u64,
) -> Vec<WindowTile<GenomicInterval>> {
    let records = items.to_vec().into_iter().map(Ok);
    WindowIter::new(records, window, stagger)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every tile's population equals the brute-force overlap set
    #[test]
    fn prop_population_matches_brute_force(
        items in arb_sorted_items(),
        window in 1u64..2_000,
        stagger in 1u64..2_000,
    ) {
        for tile in sweep(&items, window, stagger) {
            let expected: Vec<&GenomicInterval> = items
                .iter()
                .filter(|item| item.start < tile.interval.end && item.end > tile.interval.start)
                .collect();
            prop_assert_eq!(
                tile.population.len(),
                expected.len(),
                "tile [{}, {}) has population {} but {} items overlap",
                tile.interval.start, tile.interval.end,
                tile.population.len(), expected.len()
            );
            for (got, want) in tile.population.iter().zip(expected) {
                prop_assert_eq!(got, want);
            }
        }
    }

    /// Tile starts advance by exactly the stagger length
    #[test]
    fn prop_tiles_advance_by_stagger(
        items in arb_sorted_items(),
        window in 1u64..2_000,
        stagger in 1u64..2_000,
    ) {
        let tiles = sweep(&items, window, stagger);
        prop_assert!(!tiles.is_empty());
        prop_assert_eq!(tiles[0].interval.start, items[0].start);
        for pair in tiles.windows(2) {
            prop_assert_eq!(pair[1].interval.start - pair[0].interval.start, stagger);
            prop_assert_eq!(pair[0].interval.span(), window);
        }
    }

    /// Gap-free tilings place every item in at least one population
    #[test]
    fn prop_contiguous_tiling_covers_every_item(
        items in arb_sorted_items(),
        window in 1u64..2_000,
    ) {
        let tiles = sweep(&items, window, window);
        for item in &items {
            let appearances = tiles
                .iter()
                .filter(|t| t.population.iter().any(|p| p == item))
                .count();
            prop_assert!(appearances >= 1, "item [{}, {}) in no tile", item.start, item.end);
        }
    }

    /// Coverage arithmetic round-trips on every tile
    #[test]
    fn prop_tile_coverage_round_trip(
        items in arb_sorted_items(),
        window in 1u64..2_000,
        stagger in 1u64..2_000,
    ) {
        for tile in sweep(&items, window, stagger) {
            let covered: u64 = tile.mask_union().iter().map(|m| m.span()).sum();
            prop_assert_eq!(covered + tile.unmasked_bases(), tile.interval.span());
            let percent = tile.percent_masked();
            prop_assert!((0.0..=1.0).contains(&percent));
        }
    }

    /// The sweep never emits a tile past the data on a reference sequence
    #[test]
    fn prop_last_tile_overlaps_data(
        items in arb_sorted_items(),
        window in 1u64..2_000,
        stagger in 1u64..2_000,
    ) {
        let tiles = sweep(&items, window, stagger);
        let max_end = items.iter().map(|i| i.end).max().unwrap();
        if let Some(last) = tiles.last() {
            prop_assert!(last.interval.start < max_end);
        }
    }
}
