use std::time::Duration;

use ratatui::style::Color;

use crate::games::{Game, GameKind, RoundStatus};
use crate::input::{Command, Direction};
use crate::notify::Notice;
use crate::scene::{Scene, Tone};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    X,
    O,
}

impl Player {
    fn other(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    fn mark(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }

    fn color(self) -> Color {
        match self {
            Player::X => Color::Rgb(255, 120, 200),
            Player::O => Color::Rgb(80, 220, 255),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Player),
    Draw,
}

pub type Board = [Option<Player>; 9];

/// Winner if any line is uniform and non-empty, draw if the board is full,
/// otherwise nothing.
pub fn check_winner(board: &Board) -> Option<Outcome> {
    for [a, b, c] in LINES {
        if let Some(p) = board[a] {
            if board[b] == Some(p) && board[c] == Some(p) {
                return Some(Outcome::Winner(p));
            }
        }
    }
    if board.iter().all(|cell| cell.is_some()) {
        return Some(Outcome::Draw);
    }
    None
}

fn winning_line(board: &Board) -> Option<[usize; 3]> {
    LINES
        .into_iter()
        .find(|&[a, b, c]| board[a].is_some() && board[a] == board[b] && board[a] == board[c])
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub x: u32,
    pub o: u32,
    pub draws: u32,
}

pub struct TicTacToe {
    board: Board,
    current: Player,
    outcome: Option<Outcome>,
    tally: Tally,
    cursor: usize,
    notices: Vec<Notice>,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            current: Player::X,
            outcome: None,
            tally: Tally::default(),
            cursor: 4,
            notices: Vec::new(),
        }
    }

    /// Place the current player's mark. Occupied cells and finished rounds
    /// are ignored.
    pub fn play(&mut self, index: usize) {
        if index >= 9 || self.board[index].is_some() || self.outcome.is_some() {
            return;
        }
        self.board[index] = Some(self.current);
        match check_winner(&self.board) {
            Some(Outcome::Winner(p)) => {
                self.outcome = Some(Outcome::Winner(p));
                match p {
                    Player::X => self.tally.x += 1,
                    Player::O => self.tally.o += 1,
                }
                self.notices.push(Notice::success(format!("Player {} wins!", p.mark())));
            }
            Some(Outcome::Draw) => {
                self.outcome = Some(Outcome::Draw);
                self.tally.draws += 1;
                self.notices.push(Notice::info("It's a draw!"));
            }
            None => self.current = self.current.other(),
        }
    }

    fn move_cursor(&mut self, dir: Direction) {
        let (dx, dy) = dir.delta();
        let col = (self.cursor % 3) as i32 + dx;
        let row = (self.cursor / 3) as i32 + dy;
        if (0..3).contains(&col) && (0..3).contains(&row) {
            self.cursor = (row * 3 + col) as usize;
        }
    }

    fn new_round(&mut self) {
        self.board = [None; 9];
        self.current = Player::X;
        self.outcome = None;
    }
}

impl Game for TicTacToe {
    fn kind(&self) -> GameKind {
        GameKind::TicTacToe
    }

    fn update(&mut self, _dt: Duration) {}

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Move(dir) => self.move_cursor(dir),
            Command::Action => {
                if self.outcome.is_some() {
                    self.new_round();
                } else {
                    self.play(self.cursor);
                }
            }
            Command::Select { x, y } => {
                let col = ((x * 3.0) as usize).min(2);
                let row = ((y * 3.0) as usize).min(2);
                self.cursor = row * 3 + col;
                self.play(self.cursor);
            }
            Command::Restart => self.reset(),
            Command::Pointer { .. } | Command::Pause => {}
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(3.0, 3.0, Color::Rgb(15, 15, 25));
        let line = winning_line(&self.board);
        for (i, cell) in self.board.iter().enumerate() {
            let in_line = line.is_some_and(|l| l.contains(&i));
            let color = match (cell, in_line) {
                (_, true) => Color::Rgb(60, 140, 60),
                (Some(p), false) => p.color(),
                (None, false) => Color::Rgb(40, 40, 60),
            };
            let label = cell.map(|p| p.mark().to_string());
            let highlight = i == self.cursor && self.outcome.is_none();
            scene.cell((i % 3) as u16, (i / 3) as u16, color, label, highlight);
        }

        match self.outcome {
            None => scene.hud("Turn", self.current.mark(), self.current.color()),
            Some(Outcome::Winner(p)) => {
                scene.hud("Winner", p.mark(), p.color());
                scene.banner(
                    format!("Player {} wins!", p.mark()),
                    "Space for another round",
                    Tone::Good,
                );
            }
            Some(Outcome::Draw) => {
                scene.hud("Result", "Draw", Color::Gray);
                scene.banner("It's a draw!", "Space for another round", Tone::Neutral);
            }
        }
        scene.hud("X", self.tally.x, Player::X.color());
        scene.hud("O", self.tally.o, Player::O.color());
        scene.hud("Draws", self.tally.draws, Color::Gray);
        scene.help = "←↑↓→ Move │ Space Place │ Click cell │ R Restart │ Esc Back";
        scene
    }

    fn reset(&mut self) {
        self.new_round();
        self.cursor = 4;
    }

    fn status(&self) -> RoundStatus {
        match self.outcome {
            None => RoundStatus::Running,
            Some(Outcome::Winner(_)) => RoundStatus::Won,
            Some(Outcome::Draw) => RoundStatus::Over,
        }
    }

    fn high_score(&self) -> Option<u32> {
        None
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
