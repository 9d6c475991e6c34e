//! Benchmarks for position-cache builds and collision resolution
//!
//! Run with: cargo bench collision

use std::collections::HashSet;

use board_dnd::config::BoardConfig;
use board_dnd::drag::{resolve, CacheScope, PositionCache};
use board_dnd::layout::GridLayout;
use board_dnd::model::{Board, CellKey, Group, ItemId, Point, RecordId, RecordStore};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// `columns` columns of `cards` cards each
fn make_board(columns: usize, cards: usize) -> (Board, RecordStore, GridLayout) {
    let groups: Vec<Group> = (0..columns)
        .map(|c| Group::new(format!("g{}", c).as_str(), format!("v{}", c).as_str()))
        .collect();
    let board = Board::new(groups, vec![]);

    let mut store = RecordStore::new();
    for c in 0..columns {
        let ids = (0..cards)
            .map(|r| RecordId::new(format!("g{}-r{}", c, r)))
            .collect();
        store.set_sequence(&CellKey::column(format!("g{}", c).as_str()), ids);
    }

    let layout = GridLayout::compute(
        &BoardConfig::default(),
        &board,
        None,
        &HashSet::new(),
        &store,
    );
    (board, store, layout)
}

// ============================================================================
// Cache build
// ============================================================================

#[divan::bench(args = [(4, 25), (8, 100), (16, 250)])]
fn build_card_cache(bencher: divan::Bencher, (columns, cards): (usize, usize)) {
    let (board, store, layout) = make_board(columns, cards);
    let cells = board.cells(None);

    bencher.bench_local(|| {
        PositionCache::build(
            CacheScope::Cards {
                cells: &cells,
                store: &store,
            },
            &layout,
        )
    });
}

#[divan::bench(args = [(8, 100), (16, 250)])]
fn patch_card_cache(bencher: divan::Bencher, (columns, cards): (usize, usize)) {
    let (board, store, mut layout) = make_board(columns, cards);
    let cells = board.cells(None);
    let mut cache = PositionCache::build(
        CacheScope::Cards {
            cells: &cells,
            store: &store,
        },
        &layout,
    );
    layout.scroll_by(0.0, 120.0);

    bencher.bench_local(|| cache.patch(&layout));
}

// ============================================================================
// Resolution
// ============================================================================

/// Worst case: the pointer hovers the last cell, so the scan walks the
/// whole cache before finding a hit
#[divan::bench(args = [(4, 25), (8, 100), (16, 250)])]
fn resolve_last_cell(bencher: divan::Bencher, (columns, cards): (usize, usize)) {
    let (board, store, layout) = make_board(columns, cards);
    let cells = board.cells(None);
    let cache = PositionCache::build(
        CacheScope::Cards {
            cells: &cells,
            store: &store,
        },
        &layout,
    );
    let dragged = ItemId::Card(RecordId::new("g0-r0"));
    let last = cells.last().cloned().unwrap_or_else(|| CellKey::column("g0"));
    let target = cache
        .get(&ItemId::AddSentinel(last))
        .map(|e| e.rect.origin().offset(1.0, 1.0))
        .unwrap_or_default();

    bencher.bench_local(|| resolve(divan::black_box(target), &dragged, &cache, 8.0));
}

#[divan::bench]
fn resolve_miss(bencher: divan::Bencher) {
    let (board, store, layout) = make_board(16, 250);
    let cells = board.cells(None);
    let cache = PositionCache::build(
        CacheScope::Cards {
            cells: &cells,
            store: &store,
        },
        &layout,
    );
    let dragged = ItemId::Card(RecordId::new("g0-r0"));

    bencher.bench_local(|| {
        resolve(
            divan::black_box(Point::new(-10_000.0, -10_000.0)),
            &dragged,
            &cache,
            8.0,
        )
    });
}
