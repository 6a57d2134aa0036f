// Minimax: the environment places whichever tile hurts the player most
//
// Both layers prune with alpha-beta, which is sound here because the
// environment layer is a true minimiser. Nothing is cached: pruned values are
// bounds, not exact scores. A pruned root move is an upper bound at or below the
// best exact value, so without jitter it can never be chosen.

use rand::RngCore;

use super::{
    choose_root_move, SearchBudget, SearchContext, SearchOutcome, SearchState, SearchStrategy,
};
use crate::types::Direction;

#[derive(Debug, Clone, Copy, Default)]
pub struct Minimax;

impl SearchStrategy for Minimax {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn search(
        &self,
        state: &SearchState,
        budget: &SearchBudget,
        ctx: &mut SearchContext<'_>,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let child_depth = budget.depth.saturating_sub(1);
        // jittered root values must be exact, so the root window only narrows without jitter
        let prune_root = budget.randomness == 0.0;
        let mut alpha = f64::NEG_INFINITY;

        choose_root_move(state, budget, ctx, rng, |child, ctx| {
            let floor = if prune_root { alpha } else { f64::NEG_INFINITY };
            let value = min_value(child, child_depth, floor, f64::INFINITY, ctx);
            alpha = alpha.max(value);
            value
        })
    }
}

fn min_value(
    state: &SearchState,
    depth: u32,
    alpha: f64,
    mut beta: f64,
    ctx: &mut SearchContext<'_>,
) -> f64 {
    if depth == 0 || ctx.timed_out() {
        return ctx.evaluate(state);
    }

    let empty = state.board.empty_cells();
    if empty.is_empty() {
        return ctx.evaluate(state);
    }
    ctx.count_node();

    let mut worst = f64::INFINITY;
    'cells: for &(row, col) in &empty {
        for &tile in &[2, 4] {
            let spawned = state.with_tile(row, col, tile);
            let value = max_value(&spawned, depth - 1, alpha, beta, ctx);
            worst = worst.min(value);
            beta = beta.min(value);
            if beta <= alpha {
                break 'cells;
            }
        }
    }
    worst
}

fn max_value(
    state: &SearchState,
    depth: u32,
    mut alpha: f64,
    beta: f64,
    ctx: &mut SearchContext<'_>,
) -> f64 {
    if depth == 0 || ctx.timed_out() {
        return ctx.evaluate(state);
    }
    ctx.count_node();

    let mut best: Option<f64> = None;
    for direction in Direction::all() {
        let child = match state.after_move(direction) {
            Some(child) => child,
            None => continue,
        };

        let value = min_value(&child, depth - 1, alpha, beta, ctx);
        best = Some(best.map_or(value, |b: f64| b.max(value)));
        alpha = alpha.max(value);
        if beta <= alpha {
            break;
        }
    }

    match best {
        Some(value) => value,
        None => ctx.evaluate(state),
    }
}
