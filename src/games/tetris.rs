use std::time::Duration;

use rand::Rng;
use ratatui::style::Color;

use crate::clock::Interval;
use crate::games::{status_banner, toggle_pause, Game, GameKind, RoundStatus};
use crate::input::{Command, Direction};
use crate::notify::Notice;
use crate::scene::Scene;

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
const SPAWN_X: i32 = BOARD_WIDTH as i32 / 2 - 1;

type Board = [[u8; BOARD_WIDTH]; BOARD_HEIGHT];

/// Piece shapes as row-major masks: I O T S Z J L.
const PIECES: [&[&[u8]]; 7] = [
    &[&[1, 1, 1, 1]],
    &[&[1, 1], &[1, 1]],
    &[&[0, 1, 0], &[1, 1, 1]],
    &[&[0, 1, 1], &[1, 1, 0]],
    &[&[1, 1, 0], &[0, 1, 1]],
    &[&[1, 0, 0], &[1, 1, 1]],
    &[&[0, 0, 1], &[1, 1, 1]],
];

const COLORS: [Color; 7] = [
    Color::Rgb(0, 240, 240),
    Color::Rgb(240, 240, 0),
    Color::Rgb(160, 0, 240),
    Color::Rgb(0, 240, 0),
    Color::Rgb(240, 0, 0),
    Color::Rgb(0, 0, 240),
    Color::Rgb(240, 160, 0),
];

#[derive(Debug, Clone, PartialEq)]
struct Piece {
    cells: Vec<Vec<u8>>,
    kind: usize,
    x: i32,
    y: i32,
}

impl Piece {
    fn new(kind: usize) -> Self {
        Self {
            cells: PIECES[kind].iter().map(|row| row.to_vec()).collect(),
            kind,
            x: SPAWN_X,
            y: 0,
        }
    }

    fn random() -> Self {
        Self::new(rand::thread_rng().gen_range(0..PIECES.len()))
    }

    /// Occupied board coordinates for the piece at its current offset.
    fn blocks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(py, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0)
                .map(move |(px, _)| (self.x + px as i32, self.y + py as i32))
        })
    }

    fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    fn rotated(&self) -> Self {
        let rows = self.cells.len();
        let cols = self.cells[0].len();
        let cells = (0..cols)
            .map(|i| (0..rows).rev().map(|j| self.cells[j][i]).collect())
            .collect();
        Self { cells, ..self.clone() }
    }
}

fn fits(board: &Board, piece: &Piece) -> bool {
    piece.blocks().all(|(x, y)| {
        if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
            return false;
        }
        y < 0 || board[y as usize][x as usize] == 0
    })
}

/// Removes full rows, shifting everything above down. Returns the count.
fn clear_lines(board: &mut Board) -> u32 {
    let kept: Vec<[u8; BOARD_WIDTH]> = board
        .iter()
        .filter(|row| row.iter().any(|&c| c == 0))
        .copied()
        .collect();
    let cleared = BOARD_HEIGHT - kept.len();
    let mut next = [[0; BOARD_WIDTH]; BOARD_HEIGHT];
    next[cleared..].copy_from_slice(&kept);
    *board = next;
    cleared as u32
}

fn drop_interval(level: u32) -> Duration {
    let ms = 1000u64.saturating_sub(u64::from(level.saturating_sub(1)) * 100).max(50);
    Duration::from_millis(ms)
}

pub struct Tetris {
    board: Board,
    piece: Piece,
    score: u32,
    lines: u32,
    level: u32,
    high_score: u32,
    gravity: Interval,
    status: RoundStatus,
    notices: Vec<Notice>,
}

impl Tetris {
    pub fn new(high_score: u32) -> Self {
        Self {
            board: [[0; BOARD_WIDTH]; BOARD_HEIGHT],
            piece: Piece::new(0),
            score: 0,
            lines: 0,
            level: 1,
            high_score,
            gravity: Interval::new(drop_interval(1)),
            status: RoundStatus::NotStarted,
            notices: Vec::new(),
        }
    }

    fn start(&mut self) {
        self.piece = Piece::random();
        self.status = RoundStatus::Running;
    }

    fn try_move(&mut self, candidate: Piece) -> bool {
        if fits(&self.board, &candidate) {
            self.piece = candidate;
            true
        } else {
            false
        }
    }

    fn hard_drop(&mut self) {
        while self.try_move(self.piece.shifted(0, 1)) {}
    }

    fn fall(&mut self) {
        if self.try_move(self.piece.shifted(0, 1)) {
            return;
        }
        self.lock();
    }

    fn lock(&mut self) {
        let color = self.piece.kind as u8 + 1;
        for (x, y) in self.piece.blocks() {
            if y >= 0 {
                self.board[y as usize][x as usize] = color;
            }
        }
        let cleared = clear_lines(&mut self.board);

        let next = Piece::random();
        if !fits(&self.board, &next) {
            self.status = RoundStatus::Over;
            self.notices.push(Notice::error("Game Over!"));
            if self.score > self.high_score {
                self.high_score = self.score;
                self.notices.push(Notice::success("New high score!"));
            }
            return;
        }
        self.piece = next;

        if cleared > 0 {
            let gain = cleared * 100 * self.level;
            self.score += gain;
            self.lines += cleared;
            self.level = self.lines / 10 + 1;
            self.gravity.set_period(drop_interval(self.level));
            let plural = if cleared > 1 { "s" } else { "" };
            let text = format!("{} line{} cleared! +{} points", cleared, plural, gain);
            self.notices.push(Notice::success(text));
        }
    }
}

impl Game for Tetris {
    fn kind(&self) -> GameKind {
        GameKind::Tetris
    }

    fn update(&mut self, dt: Duration) {
        if self.status != RoundStatus::Running {
            return;
        }
        for _ in 0..self.gravity.advance(dt) {
            self.fall();
            if self.status != RoundStatus::Running {
                break;
            }
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Action => match self.status {
                RoundStatus::NotStarted => self.start(),
                RoundStatus::Running => self.hard_drop(),
                RoundStatus::Over | RoundStatus::Won => self.reset(),
                RoundStatus::Paused => {}
            },
            Command::Move(dir) if self.status == RoundStatus::Running => {
                let candidate = match dir {
                    Direction::Left => self.piece.shifted(-1, 0),
                    Direction::Right => self.piece.shifted(1, 0),
                    Direction::Down => self.piece.shifted(0, 1),
                    Direction::Up => self.piece.rotated(),
                };
                self.try_move(candidate);
            }
            Command::Pause => toggle_pause(&mut self.status),
            Command::Restart => self.reset(),
            Command::Move(_) | Command::Pointer { .. } | Command::Select { .. } => {}
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(BOARD_WIDTH as f32, BOARD_HEIGHT as f32, Color::Black);
        let mut display = self.board;
        if self.status == RoundStatus::Running || self.status == RoundStatus::Paused {
            for (x, y) in self.piece.blocks() {
                if (0..BOARD_WIDTH as i32).contains(&x) && (0..BOARD_HEIGHT as i32).contains(&y) {
                    display[y as usize][x as usize] = self.piece.kind as u8 + 1;
                }
            }
        }
        for (y, row) in display.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    scene.cell(x as u16, y as u16, COLORS[cell as usize - 1], None, false);
                }
            }
        }
        scene.hud("Score", self.score, Color::Yellow);
        scene.hud("Lines", self.lines, Color::Green);
        scene.hud("Level", self.level, Color::Magenta);
        scene.hud("High", self.high_score, Color::Cyan);
        status_banner(&mut scene, self.status, "Space to start", self.score);
        scene.help = "←→ Move │ ↓ Soft drop │ ↑ Rotate │ Space Drop │ P Pause │ R Restart │ Esc Back";
        scene
    }

    fn reset(&mut self) {
        *self = Tetris::new(self.high_score);
    }

    fn status(&self) -> RoundStatus {
        self.status
    }

    fn high_score(&self) -> Option<u32> {
        Some(self.high_score)
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
