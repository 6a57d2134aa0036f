// Expectimax: the player maximises, tile spawns are averaged

use rand::RngCore;

use super::{
    choose_root_move, SearchBudget, SearchContext, SearchOutcome, SearchState, SearchStrategy,
};
use crate::types::Direction;

#[derive(Debug, Clone, Copy, Default)]
pub struct Expectimax;

impl SearchStrategy for Expectimax {
    fn name(&self) -> &'static str {
        "expectimax"
    }

    fn search(
        &self,
        state: &SearchState,
        budget: &SearchBudget,
        ctx: &mut SearchContext<'_>,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let child_depth = budget.depth.saturating_sub(1);
        choose_root_move(state, budget, ctx, rng, |child, ctx| {
            chance_value(child, child_depth, ctx)
        })
    }
}

/// Expected value over every empty cell receiving a 2 or a 4
///
/// Each empty cell is equally likely, so every outcome is weighted by
/// probability / emptyCount.
pub(crate) fn chance_value(state: &SearchState, depth: u32, ctx: &mut SearchContext<'_>) -> f64 {
    if depth == 0 || ctx.timed_out() {
        return ctx.evaluate(state);
    }

    let empty = state.board.empty_cells();
    if empty.is_empty() {
        return ctx.evaluate(state);
    }
    ctx.count_node();

    let cell_count = empty.len() as f64;
    let mut expected = 0.0;
    for &(row, col) in &empty {
        for &(tile, probability) in ctx.spawn_outcomes().iter() {
            let spawned = state.with_tile(row, col, tile);
            expected += probability / cell_count * max_value(&spawned, depth - 1, ctx);
        }
    }
    expected
}

/// Best value over the player's legal moves, cached per board and depth
pub(crate) fn max_value(state: &SearchState, depth: u32, ctx: &mut SearchContext<'_>) -> f64 {
    if depth == 0 || ctx.timed_out() {
        return ctx.evaluate(state);
    }

    let key = ctx.transposition_key(state, depth);
    if let Some(cached) = ctx.lookup_transposition(&key) {
        return cached;
    }
    ctx.count_node();

    let mut best: Option<f64> = None;
    for direction in Direction::all() {
        if let Some(child) = state.after_move(direction) {
            let value = chance_value(&child, depth - 1, ctx);
            best = Some(best.map_or(value, |b: f64| b.max(value)));
        }
    }

    let value = match best {
        Some(value) => value,
        None => ctx.evaluate(state),
    };

    // values computed after the deadline are truncated, keep them out of the table
    if !ctx.timed_out() {
        ctx.store_transposition(key, value);
    }
    value
}
