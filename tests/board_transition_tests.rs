//! Board Transition Tests
//!
//! Sliding, merging, terminal detection and tile spawning on concrete boards.

use fancy_2048_ai::board::Board;
use fancy_2048_ai::types::Direction;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn board(rows: &[[u32; 4]; 4]) -> Board {
    let rows: Vec<Vec<u32>> = rows.iter().map(|r| r.to_vec()).collect();
    Board::from_rows(&rows).unwrap()
}

fn checkerboard() -> Board {
    board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]])
}

#[test]
fn test_left_merges_pair_into_corner() {
    let start = board(&[[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    let transition = start.apply(Direction::Left);

    assert!(transition.changed);
    assert_eq!(transition.score_delta, 4);
    assert_eq!(
        transition.board.to_rows(),
        vec![
            vec![4, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]
    );
}

#[test]
fn test_right_merges_from_the_far_edge() {
    let start = board(&[[2, 2, 2, 2], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    let transition = start.apply(Direction::Right);

    assert_eq!(transition.board.to_rows()[0], vec![0, 0, 4, 4]);
    assert_eq!(transition.score_delta, 8);
}

#[test]
fn test_vertical_moves_use_columns() {
    let start = board(&[[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0]]);

    let up = start.apply(Direction::Up);
    assert_eq!(
        up.board.to_rows().iter().map(|r| r[0]).collect::<Vec<_>>(),
        vec![4, 4, 0, 0]
    );
    assert_eq!(up.score_delta, 4);

    let down = start.apply(Direction::Down);
    assert_eq!(
        down.board.to_rows().iter().map(|r| r[0]).collect::<Vec<_>>(),
        vec![0, 0, 4, 4]
    );
}

#[test]
fn test_blocked_move_reports_unchanged() {
    let start = board(&[[2, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    let transition = start.apply(Direction::Left);

    assert!(!transition.changed);
    assert_eq!(transition.score_delta, 0);
    assert_eq!(transition.board, start);
    assert!(start.legal_moves().iter().all(|(dir, _)| *dir != Direction::Left));
}

#[test]
fn test_apply_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut current = Board::new_game(4, &mut rng);

    for _ in 0..20 {
        for direction in Direction::all() {
            assert_eq!(current.apply(direction), current.apply(direction));
        }
        let (_, transition) = match current.legal_moves().into_iter().next() {
            Some(step) => step,
            None => break,
        };
        current = transition.board.spawn_random_tile(&mut rng).unwrap();
    }
}

#[test]
fn test_checkerboard_is_terminal() {
    let full = checkerboard();

    assert!(full.is_terminal());
    assert!(full.legal_moves().is_empty());
    for direction in Direction::all() {
        assert!(!full.apply(direction).changed);
    }
}

#[test]
fn test_full_board_with_merge_is_not_terminal() {
    let full = board(&[[2, 2, 4, 8], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]]);
    assert!(!full.is_terminal());
    assert_eq!(full.empty_count(), 0);
}

#[test]
fn test_spawn_fills_exactly_one_cell() {
    let mut rng = StdRng::seed_from_u64(3);
    let start = board(&[[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);

    let spawned = start.spawn_random_tile(&mut rng).unwrap();
    assert_eq!(spawned.empty_count(), start.empty_count() - 1);

    let new_tiles: Vec<u32> = start
        .empty_cells()
        .iter()
        .map(|&(r, c)| spawned.get(r, c))
        .filter(|&v| v != 0)
        .collect();
    assert_eq!(new_tiles.len(), 1);
    assert!(new_tiles[0] == 2 || new_tiles[0] == 4);

    assert!(checkerboard().spawn_random_tile(&mut rng).is_none());
}

#[test]
fn test_new_game_has_two_tiles() {
    let mut rng = StdRng::seed_from_u64(5);
    for size in 2..=6 {
        let game = Board::new_game(size, &mut rng);
        assert_eq!(game.size(), size);
        assert_eq!(game.empty_count(), size * size - 2);
    }
}

#[test]
fn test_from_rows_rejects_malformed_shapes() {
    assert!(Board::from_rows(&[vec![2]]).is_err());
    assert!(Board::from_rows(&[vec![2, 0], vec![0]]).is_err());
    assert!(Board::from_rows(&[vec![2, 0, 0], vec![0, 0, 0]]).is_err());
}

#[test]
fn test_board_deserializes_from_nested_rows() {
    let parsed: Board = serde_json::from_str("[[2,0,0],[0,4,0],[0,0,8]]").unwrap();
    assert_eq!(parsed.size(), 3);
    assert_eq!(parsed.get(1, 1), 4);
    assert_eq!(
        serde_json::to_string(&parsed).unwrap(),
        "[[2,0,0],[0,4,0],[0,0,8]]"
    );

    assert!(serde_json::from_str::<Board>("[[2,0],[0]]").is_err());
}
