use std::time::Duration;

use rand::Rng;
use ratatui::style::Color;

use crate::games::{Game, GameKind, RoundStatus};
use crate::input::{Command, Direction};
use crate::notify::Notice;
use crate::scene::{Scene, Tone};

const SIZE: usize = 4;
const WIN_TILE: u32 = 2048;

pub type Board = [[u32; SIZE]; SIZE];

/// Compact a row to the left and merge equal neighbours once each.
/// Returns the new row and the points earned.
pub fn slide_row(row: [u32; SIZE]) -> ([u32; SIZE], u32) {
    let tiles: Vec<u32> = row.into_iter().filter(|&v| v != 0).collect();
    let mut out = [0; SIZE];
    let mut gained = 0;
    let mut i = 0;
    let mut w = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            let merged = tiles[i] * 2;
            out[w] = merged;
            gained += merged;
            i += 2;
        } else {
            out[w] = tiles[i];
            i += 1;
        }
        w += 1;
    }
    (out, gained)
}

/// Quarter turn clockwise.
pub fn rotate(board: &Board) -> Board {
    let mut out = [[0; SIZE]; SIZE];
    for (i, row) in board.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            out[j][SIZE - 1 - i] = v;
        }
    }
    out
}

fn rotations(dir: Direction) -> usize {
    match dir {
        Direction::Left => 0,
        Direction::Down => 1,
        Direction::Right => 2,
        Direction::Up => 3,
    }
}

/// Apply one move. Rotates so `dir` points left, slides, rotates back.
pub fn shift(board: &Board, dir: Direction) -> (Board, u32) {
    let turns = rotations(dir);
    let mut b = *board;
    for _ in 0..turns {
        b = rotate(&b);
    }
    let mut gained = 0;
    for row in b.iter_mut() {
        let (new_row, pts) = slide_row(*row);
        *row = new_row;
        gained += pts;
    }
    for _ in 0..(4 - turns) % 4 {
        b = rotate(&b);
    }
    (b, gained)
}

/// No empty cell and no equal neighbour in either axis.
pub fn is_stuck(board: &Board) -> bool {
    for i in 0..SIZE {
        for j in 0..SIZE {
            let v = board[i][j];
            if v == 0 {
                return false;
            }
            if i + 1 < SIZE && board[i + 1][j] == v {
                return false;
            }
            if j + 1 < SIZE && board[i][j + 1] == v {
                return false;
            }
        }
    }
    true
}

/// Drop a 2 (90%) or 4 (10%) on a random empty cell.
fn add_random_tile(board: &mut Board) {
    let empty: Vec<(usize, usize)> = (0..SIZE)
        .flat_map(|i| (0..SIZE).map(move |j| (i, j)))
        .filter(|&(i, j)| board[i][j] == 0)
        .collect();
    if empty.is_empty() {
        return;
    }
    let mut rng = rand::thread_rng();
    let (i, j) = empty[rng.gen_range(0..empty.len())];
    board[i][j] = if rng.gen_bool(0.9) { 2 } else { 4 };
}

fn tile_color(value: u32) -> Color {
    match value {
        0 => Color::Rgb(40, 40, 55),
        2 => Color::Rgb(226, 232, 240),
        4 => Color::Rgb(203, 213, 225),
        8 => Color::Rgb(253, 186, 116),
        16 => Color::Rgb(251, 146, 60),
        32 => Color::Rgb(249, 115, 22),
        64 => Color::Rgb(248, 113, 113),
        128 => Color::Rgb(236, 72, 153),
        256 => Color::Rgb(34, 211, 238),
        512 => Color::Rgb(168, 85, 247),
        1024 => Color::Rgb(244, 63, 94),
        2048 => Color::Rgb(250, 204, 21),
        _ => Color::Rgb(99, 102, 241),
    }
}

pub struct Game2048 {
    board: Board,
    score: u32,
    high_score: u32,
    over: bool,
    reached_goal: bool,
    best_announced: bool,
    notices: Vec<Notice>,
}

impl Game2048 {
    pub fn new(high_score: u32) -> Self {
        let mut board = [[0; SIZE]; SIZE];
        add_random_tile(&mut board);
        add_random_tile(&mut board);
        Self::with_board(board, high_score)
    }

    /// Start from a given board instead of two random tiles.
    pub fn with_board(board: Board, high_score: u32) -> Self {
        Self {
            board,
            score: 0,
            high_score,
            over: false,
            reached_goal: false,
            best_announced: false,
            notices: Vec::new(),
        }
    }

    /// Returns false if the move changed nothing.
    pub fn make_move(&mut self, dir: Direction) -> bool {
        if self.over {
            return false;
        }
        let (moved, gained) = shift(&self.board, dir);
        if moved == self.board {
            return false;
        }
        self.board = moved;
        add_random_tile(&mut self.board);
        self.score += gained;

        if self.score > self.high_score {
            self.high_score = self.score;
            if !self.best_announced {
                self.best_announced = true;
                self.notices.push(Notice::success("New best score!"));
            }
        }
        if !self.reached_goal && self.board.iter().flatten().any(|&v| v >= WIN_TILE) {
            self.reached_goal = true;
            self.notices.push(Notice::success("🎉 You reached 2048! 🎉"));
        }
        if is_stuck(&self.board) {
            self.over = true;
            self.notices.push(Notice::error("Game Over!"));
        }
        true
    }
}

impl Game for Game2048 {
    fn kind(&self) -> GameKind {
        GameKind::Game2048
    }

    fn update(&mut self, _dt: Duration) {}

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Move(dir) => {
                self.make_move(dir);
            }
            Command::Action => {
                if self.over {
                    self.reset();
                }
            }
            Command::Restart => self.reset(),
            Command::Pointer { .. } | Command::Select { .. } | Command::Pause => {}
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(SIZE as f32, SIZE as f32, Color::Rgb(20, 20, 30));
        for (i, row) in self.board.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                let label = (v != 0).then(|| v.to_string());
                scene.cell(j as u16, i as u16, tile_color(v), label, v >= WIN_TILE);
            }
        }
        scene.hud("Score", self.score, Color::Yellow);
        scene.hud("Best", self.high_score, Color::Cyan);
        if self.reached_goal {
            scene.hud("🏆", "Winner!", Color::Rgb(250, 204, 21));
        }
        if self.over {
            scene.banner(
                "Game Over!",
                format!("Final score: {} · Space to try again", self.score),
                Tone::Bad,
            );
        }
        scene.help = "←↑↓→ Slide tiles │ R Reset │ Esc Back";
        scene
    }

    fn reset(&mut self) {
        *self = Game2048::new(self.high_score);
    }

    fn status(&self) -> RoundStatus {
        if self.over {
            RoundStatus::Over
        } else {
            RoundStatus::Running
        }
    }

    fn high_score(&self) -> Option<u32> {
        Some(self.high_score)
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tile_count(b: &Board) -> usize {
        b.iter().flatten().filter(|&&v| v != 0).count()
    }

    #[test]
    fn test_slide_row_merges_once_left_to_right() {
        assert_eq!(slide_row([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(slide_row([2, 2, 4, 0]), ([4, 4, 0, 0], 4));
        assert_eq!(slide_row([4, 0, 4, 8]), ([8, 8, 0, 0], 8));
        assert_eq!(slide_row([2, 2, 2, 0]), ([4, 2, 0, 0], 4));
        assert_eq!(slide_row([0, 0, 0, 2]), ([2, 0, 0, 0], 0));
    }

    #[test]
    fn test_shift_each_direction() {
        let b: Board = [[0, 0, 0, 0], [0, 2, 0, 2], [0, 0, 0, 0], [0, 0, 0, 0]];
        assert_eq!(shift(&b, Direction::Left).0[1], [4, 0, 0, 0]);
        assert_eq!(shift(&b, Direction::Right).0[1], [0, 0, 0, 4]);
        let (up, pts) = shift(&b, Direction::Up);
        assert_eq!(up[0], [0, 2, 0, 2]);
        assert_eq!(pts, 0);
        let (down, _) = shift(&b, Direction::Down);
        assert_eq!(down[3], [0, 2, 0, 2]);
    }

    #[test]
    fn test_vertical_merge() {
        let b: Board = [[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [4, 0, 0, 0]];
        let (down, pts) = shift(&b, Direction::Down);
        assert_eq!(pts, 12);
        assert_eq!([down[0][0], down[1][0], down[2][0], down[3][0]], [0, 0, 4, 8]);
    }

    #[test]
    fn test_noop_move_adds_no_tile_and_no_score() {
        let b: Board = [[2, 4, 8, 16], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
        let mut g = Game2048::with_board(b, 0);
        assert!(!g.make_move(Direction::Left));
        assert_eq!(&g.board, &b);
        assert_eq!(g.score, 0);
        assert!(!g.make_move(Direction::Up));
        assert_eq!(&g.board, &b);
    }

    #[test]
    fn test_effective_move_adds_exactly_one_tile() {
        let b: Board = [[0, 0, 0, 2], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
        let mut g = Game2048::with_board(b, 0);
        assert!(g.make_move(Direction::Left));
        assert_eq!(tile_count(&g.board), 2);
        assert_eq!(g.board[0][0], 2);
    }

    #[test]
    fn test_stuck_board_is_game_over() {
        let stuck: Board = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
        assert!(is_stuck(&stuck));
        let mut g = Game2048::with_board(stuck, 0);
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert!(!g.make_move(dir));
        }
        let mut open = stuck;
        open[3][3] = 4;
        assert!(!is_stuck(&open));
    }

    #[test]
    fn test_merge_score_raises_best() {
        let b: Board = [[1024, 1024, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
        let mut g = Game2048::with_board(b, 100);
        assert!(g.make_move(Direction::Left));
        assert_eq!(g.score, 2048);
        assert_eq!(g.high_score(), Some(2048));
        assert!(g.reached_goal);
        assert_eq!(g.status(), RoundStatus::Running);
    }

    proptest! {
        #[test]
        fn prop_slide_conserves_sum_and_scores_merges(
            row in proptest::array::uniform4(prop_oneof![Just(0u32), Just(2), Just(4), Just(8)])
        ) {
            let (out, gained) = slide_row(row);
            let before: u32 = row.iter().sum();
            let after: u32 = out.iter().sum();
            prop_assert_eq!(before, after);
            let tiles_before = row.iter().filter(|&&v| v != 0).count();
            let tiles_after = out.iter().filter(|&&v| v != 0).count();
            // Each merge removes one tile and at most two merges fit in a row
            prop_assert!(tiles_before - tiles_after <= 2);
            prop_assert_eq!(gained == 0, tiles_before == tiles_after);
            // No gaps between tiles after a slide
            let first_zero = out.iter().position(|&v| v == 0).unwrap_or(SIZE);
            prop_assert!(out[first_zero..].iter().all(|&v| v == 0));
        }

        #[test]
        fn prop_four_rotations_is_identity(cells in proptest::array::uniform16(0u32..5)) {
            let mut b: Board = [[0; SIZE]; SIZE];
            for (k, v) in cells.iter().enumerate() {
                b[k / SIZE][k % SIZE] = *v;
            }
            let r = rotate(&rotate(&rotate(&rotate(&b))));
            prop_assert_eq!(r, b);
        }
    }
}
