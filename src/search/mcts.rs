//! Monte Carlo Tree Search over player moves.
//!
//! Nodes live in an arena owned by [`MctsTree`]; a child stores its parent's
//! index as a non-owning back-reference, and the whole tree is dropped when the
//! decision completes. Each iteration runs:
//! 1. Selection: descend by UCB1 until a leaf, unvisited children first.
//! 2. Expansion: a leaf that has been visited gets one child per legal move,
//!    and the first new child is simulated.
//! 3. Simulation: random legal moves with random tile spawns, capped in plies,
//!    scored by the heuristic.
//! 4. Backpropagation: visit count and reward added to every ancestor.
//!
//! The final move is the root child with the most visits; ties go to the first
//! child in fixed direction order.

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use super::{SearchBudget, SearchContext, SearchOutcome, SearchState, SearchStrategy};
use crate::types::Direction;

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct MctsNode {
    pub state: SearchState,
    parent: Option<NodeId>,
    children: Vec<(Direction, NodeId)>,
    pub visits: u32,
    pub total_reward: f64,
}

impl MctsNode {
    fn new(state: SearchState, parent: Option<NodeId>) -> Self {
        MctsNode {
            state,
            parent,
            children: Vec::new(),
            visits: 0,
            total_reward: 0.0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }
}

/// Visit statistics of one root child
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildStats {
    pub direction: Direction,
    pub visits: u32,
    pub mean_reward: f64,
}

#[derive(Debug, Clone)]
pub struct MctsTree {
    nodes: Vec<MctsNode>,
    exploration_constant: f64,
}

impl MctsTree {
    pub const ROOT: NodeId = 0;

    pub fn new(root: SearchState, exploration_constant: f64) -> Self {
        MctsTree {
            nodes: vec![MctsNode::new(root, None)],
            exploration_constant,
        }
    }

    pub fn node(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// UCB1 of `child`; unvisited children score +inf
    pub fn ucb1(&self, child: NodeId) -> f64 {
        let node = &self.nodes[child];
        if node.visits == 0 {
            return f64::INFINITY;
        }

        let parent_visits = node
            .parent
            .map(|p| self.nodes[p].visits)
            .unwrap_or(node.visits);
        node.mean_reward()
            + self.exploration_constant
                * ((parent_visits as f64).ln() / node.visits as f64).sqrt()
    }

    /// Descends from the root to a leaf, expanding it if it was visited before
    pub fn select(&mut self) -> NodeId {
        let mut current = Self::ROOT;

        while !self.nodes[current].is_leaf() {
            let mut best: Option<(NodeId, f64)> = None;
            for &(_, child) in &self.nodes[current].children {
                let score = self.ucb1(child);
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((child, score));
                }
            }
            match best {
                Some((child, _)) => current = child,
                None => break,
            }
        }

        if self.nodes[current].visits > 0 {
            self.expand(current);
            if let Some(&(_, first)) = self.nodes[current].children.first() {
                return first;
            }
        }
        current
    }

    /// Adds one child per legal move; no-op moves are skipped
    fn expand(&mut self, id: NodeId) {
        let parent_state = self.nodes[id].state.clone();
        for direction in Direction::all() {
            if let Some(child_state) = parent_state.after_move(direction) {
                let child_id = self.nodes.len();
                self.nodes.push(MctsNode::new(child_state, Some(id)));
                self.nodes[id].children.push((direction, child_id));
            }
        }
    }

    /// Adds the reward to `id` and every ancestor up to the root
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id];
            node.visits += 1;
            node.total_reward += reward;
            current = node.parent;
        }
    }

    pub fn root_children(&self) -> Vec<ChildStats> {
        self.nodes[Self::ROOT]
            .children
            .iter()
            .map(|&(direction, id)| ChildStats {
                direction,
                visits: self.nodes[id].visits,
                mean_reward: self.nodes[id].mean_reward(),
            })
            .collect()
    }

    /// Root child with the strictly highest visit count, first in direction order on ties
    pub fn best_child(&self) -> Option<ChildStats> {
        let mut best: Option<ChildStats> = None;
        for stats in self.root_children() {
            if best.map_or(true, |b| stats.visits > b.visits) {
                best = Some(stats);
            }
        }
        best
    }

    pub fn root_visits(&self) -> u32 {
        self.nodes[Self::ROOT].visits
    }
}

/// Plays random legal moves from `state` and scores where it ends up
fn rollout(state: &SearchState, ctx: &mut SearchContext<'_>, rng: &mut dyn RngCore) -> f64 {
    let max_moves = ctx.settings().rollout_max_moves;
    let two_probability = ctx.settings().two_tile_probability;
    let mut current = state.clone();

    for _ in 0..max_moves {
        let moves: Vec<SearchState> = Direction::all()
            .iter()
            .filter_map(|&dir| current.after_move(dir))
            .collect();
        let next = match moves.choose(rng) {
            Some(next) => next.clone(),
            None => break,
        };

        let empty = next.board.empty_cells();
        current = match empty.choose(rng) {
            Some(&(row, col)) => {
                let tile = if rng.random_bool(two_probability) { 2 } else { 4 };
                next.with_tile(row, col, tile)
            }
            None => next,
        };
    }

    ctx.evaluate(&current)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarlo;

impl MonteCarlo {
    /// Runs simulations until the budget or the deadline runs out and returns the tree
    pub fn build_tree(
        &self,
        state: &SearchState,
        budget: &SearchBudget,
        ctx: &mut SearchContext<'_>,
        rng: &mut dyn RngCore,
    ) -> MctsTree {
        let mut tree = MctsTree::new(state.clone(), ctx.settings().exploration_constant);

        for _ in 0..budget.simulations {
            if ctx.timed_out() {
                log::debug!("MCTS stopped after {} simulations", tree.root_visits());
                break;
            }

            let leaf = tree.select();
            let reward = rollout(&tree.node(leaf).state, ctx, rng);
            tree.backpropagate(leaf, reward);
            ctx.count_node();
        }
        tree
    }
}

impl SearchStrategy for MonteCarlo {
    fn name(&self) -> &'static str {
        "monte_carlo"
    }

    fn search(
        &self,
        state: &SearchState,
        budget: &SearchBudget,
        ctx: &mut SearchContext<'_>,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let tree = self.build_tree(state, budget, ctx, rng);
        let best = tree.best_child();

        // a root that was never expanded still answers with its first legal move
        let best_move = best.map(|b| b.direction).or_else(|| {
            Direction::all()
                .iter()
                .copied()
                .find(|&dir| state.board.apply(dir).changed)
        });

        SearchOutcome {
            best_move,
            evaluation: best.map(|b| b.mean_reward),
            nodes_evaluated: ctx.nodes(),
        }
    }
}
