// Board mechanics for 2048
//
// Sliding, merging, empty-cell enumeration and tile placement. Every operation
// returns a new board; search branches never share mutable state.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Probability that a spawned tile is a 2 rather than a 4
pub const TWO_TILE_PROBABILITY: f64 = 0.9;

/// Square N×N grid stored row-major; 0 is empty, everything else a power of two
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
}

/// Canonical cache key: one byte per cell holding log2 of the tile (0 for empty)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardKey(Vec<u8>);

/// Outcome of sliding a board in one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub board: Board,
    pub score_delta: u64,
    pub changed: bool,
}

impl Board {
    /// Creates an empty board of the given dimension
    pub fn new(size: usize) -> Self {
        Board {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Builds a board from rows, rejecting anything that is not square
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self, String> {
        let size = rows.len();
        if size < 2 {
            return Err(format!("Board must have at least 2 rows, got {}", size));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(format!(
                    "Board must be square: row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    size
                ));
            }
            cells.extend_from_slice(row);
        }

        Ok(Board { size, cells })
    }

    /// Creates a board with two random tiles, as at the start of a game
    pub fn new_game<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let board = Board::new(size);
        let board = board.spawn_random_tile(rng).unwrap_or(board);
        board.spawn_random_tile(rng).unwrap_or(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }

    /// Slides and merges every line toward `direction`
    ///
    /// Each tile merges at most once per move and the merged value is added to
    /// the score delta. Deterministic: no tile is spawned here.
    pub fn apply(&self, direction: Direction) -> Transition {
        let mut cells = self.cells.clone();
        let mut score_delta = 0;

        for line in 0..self.size {
            let indices = self.line_indices(direction, line);
            let values: Vec<u32> = indices.iter().map(|&idx| self.cells[idx]).collect();
            let (merged, gained) = slide_line(&values);
            score_delta += gained;
            for (&idx, value) in indices.iter().zip(merged) {
                cells[idx] = value;
            }
        }

        let changed = cells != self.cells;
        Transition {
            board: Board {
                size: self.size,
                cells,
            },
            score_delta,
            changed,
        }
    }

    /// Cell indices of one line, ordered from the edge tiles slide toward
    fn line_indices(&self, direction: Direction, line: usize) -> Vec<usize> {
        let n = self.size;
        match direction {
            Direction::Left => (0..n).map(|col| line * n + col).collect(),
            Direction::Right => (0..n).rev().map(|col| line * n + col).collect(),
            Direction::Up => (0..n).map(|row| row * n + line).collect(),
            Direction::Down => (0..n).rev().map(|row| row * n + line).collect(),
        }
    }

    /// Transitions that change the board, in fixed direction order
    pub fn legal_moves(&self) -> Vec<(Direction, Transition)> {
        Direction::all()
            .iter()
            .map(|&dir| (dir, self.apply(dir)))
            .filter(|(_, transition)| transition.changed)
            .collect()
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Returns a copy with `value` placed at (row, col)
    pub fn with_tile(&self, row: usize, col: usize, value: u32) -> Board {
        let mut cells = self.cells.clone();
        cells[row * self.size + col] = value;
        Board {
            size: self.size,
            cells,
        }
    }

    /// Places a 2 (90%) or 4 (10%) on a uniformly chosen empty cell
    pub fn spawn_random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Board> {
        let empty = self.empty_cells();
        let &(row, col) = empty.choose(rng)?;
        let value = if rng.random_bool(TWO_TILE_PROBABILITY) { 2 } else { 4 };
        Some(self.with_tile(row, col, value))
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// True when no direction changes the board
    pub fn is_terminal(&self) -> bool {
        if self.cells.contains(&0) {
            return false;
        }

        let n = self.size;
        for row in 0..n {
            for col in 0..n {
                let value = self.get(row, col);
                if col + 1 < n && self.get(row, col + 1) == value {
                    return false;
                }
                if row + 1 < n && self.get(row + 1, col) == value {
                    return false;
                }
            }
        }
        true
    }

    pub fn key(&self) -> BoardKey {
        BoardKey(self.cells.iter().map(|&v| log2_tile(v) as u8).collect())
    }
}

/// Compacts non-zero values toward index 0 and merges equal neighbours once
fn slide_line(values: &[u32]) -> (Vec<u32>, u64) {
    let tiles: Vec<u32> = values.iter().copied().filter(|&v| v != 0).collect();
    let mut merged = Vec::with_capacity(values.len());
    let mut gained = 0u64;

    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            let doubled = tiles[i] * 2;
            merged.push(doubled);
            gained += doubled as u64;
            i += 2;
        } else {
            merged.push(tiles[i]);
            i += 1;
        }
    }

    merged.resize(values.len(), 0);
    (merged, gained)
}

/// log2 of a tile value, 0 for empty cells
pub fn log2_tile(value: u32) -> u32 {
    if value == 0 {
        0
    } else {
        31 - value.leading_zeros()
    }
}

impl TryFrom<Vec<Vec<u32>>> for Board {
    type Error = String;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Board::from_rows(&rows)
    }
}

impl From<Board> for Vec<Vec<u32>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}
