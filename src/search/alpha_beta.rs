// Alpha-Beta over the expectimax tree
//
// The MAX layer carries (alpha, beta) and stops expanding siblings once
// beta <= alpha. The CHANCE layer passes the window through untouched and never
// prunes: an expected value cannot be bounded without optimistic/pessimistic
// bound propagation, which this search does not do. The root opens with
// beta = +inf and nothing below tightens it, so the reported move always
// equals the unpruned expectimax move. A cut-off value is only a lower bound
// and is never cached.
//
// With beta fixed at +inf the `beta <= alpha` cutoff is unreachable in this
// tree, so node counts match Expectimax exactly. The window is kept so a
// bounded chance layer can tighten beta without touching the MAX layer.

use rand::RngCore;

use super::{
    choose_root_move, SearchBudget, SearchContext, SearchOutcome, SearchState, SearchStrategy,
};
use crate::types::Direction;

#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaBeta;

impl SearchStrategy for AlphaBeta {
    fn name(&self) -> &'static str {
        "alpha_beta"
    }

    fn search(
        &self,
        state: &SearchState,
        budget: &SearchBudget,
        ctx: &mut SearchContext<'_>,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let child_depth = budget.depth.saturating_sub(1);
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;

        choose_root_move(state, budget, ctx, rng, |child, ctx| {
            let value = chance_value(child, child_depth, alpha, beta, ctx);
            alpha = alpha.max(value);
            value
        })
    }
}

fn chance_value(
    state: &SearchState,
    depth: u32,
    alpha: f64,
    beta: f64,
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

    let cell_count = empty.len() as f64;
    let mut expected = 0.0;
    for &(row, col) in &empty {
        for &(tile, probability) in ctx.spawn_outcomes().iter() {
            let spawned = state.with_tile(row, col, tile);
            expected +=
                probability / cell_count * max_value(&spawned, depth - 1, alpha, beta, ctx);
        }
    }
    expected
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

    let key = ctx.transposition_key(state, depth);
    if let Some(cached) = ctx.lookup_transposition(&key) {
        return cached;
    }
    ctx.count_node();

    let mut best: Option<f64> = None;
    let mut cut_off = false;
    for direction in Direction::all() {
        let child = match state.after_move(direction) {
            Some(child) => child,
            None => continue,
        };

        let value = chance_value(&child, depth - 1, alpha, beta, ctx);
        best = Some(best.map_or(value, |b: f64| b.max(value)));
        alpha = alpha.max(value);

        if beta <= alpha {
            cut_off = true;
            break;
        }
    }

    let value = match best {
        Some(value) => value,
        None => ctx.evaluate(state),
    };

    if !cut_off && !ctx.timed_out() {
        ctx.store_transposition(key, value);
    }
    value
}
