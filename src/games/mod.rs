pub mod breakout;
pub mod dino;
pub mod flappy;
pub mod game2048;
pub mod memory;
pub mod pong;
pub mod snake;
pub mod tetris;
pub mod tictactoe;

use std::time::Duration;

use ratatui::style::Color;

use crate::input::Command;
use crate::notify::Notice;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    NotStarted,
    Running,
    Paused,
    Over,
    Won,
}

impl RoundStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundStatus::Over | RoundStatus::Won)
    }
}

/// One game's state plus its transition functions.
pub trait Game {
    fn kind(&self) -> GameKind;
    /// Advance one tick. `dt` is the wall time since the previous tick.
    fn update(&mut self, dt: Duration);
    fn handle_command(&mut self, cmd: Command);
    /// Describe the current frame. Must not change state.
    fn scene(&self) -> Scene;
    /// Throw the round away and start from the initial state.
    fn reset(&mut self);
    fn status(&self) -> RoundStatus;
    /// Best score to persist, for games that keep one.
    fn high_score(&self) -> Option<u32>;
    fn take_notices(&mut self) -> Vec<Notice>;

    fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    TicTacToe,
    Snake,
    Tetris,
    FlappyBird,
    Breakout,
    Pong,
    DinoRunner,
    Game2048,
    Memory,
}

impl GameKind {
    pub fn all() -> &'static [GameKind] {
        &[
            GameKind::TicTacToe,
            GameKind::Snake,
            GameKind::Tetris,
            GameKind::FlappyBird,
            GameKind::Breakout,
            GameKind::Pong,
            GameKind::DinoRunner,
            GameKind::Game2048,
            GameKind::Memory,
        ]
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "Tic Tac Toe",
            GameKind::Snake => "Snake",
            GameKind::Tetris => "Tetris",
            GameKind::FlappyBird => "Flappy Bird",
            GameKind::Breakout => "Breakout",
            GameKind::Pong => "Pong",
            GameKind::DinoRunner => "Dino Runner",
            GameKind::Game2048 => "2048",
            GameKind::Memory => "Memory Match",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "Get three in\na row to win!",
            GameKind::Snake => "Eat, grow, and\ndodge the walls!",
            GameKind::Tetris => "Clear lines by\nfilling rows!",
            GameKind::FlappyBird => "Flap through\nthe pipes!",
            GameKind::Breakout => "Break every\nbrick!",
            GameKind::Pong => "Beat the AI\nto 5 points!",
            GameKind::DinoRunner => "Jump the cacti,\nrun forever!",
            GameKind::Game2048 => "Merge tiles to\nreach 2048!",
            GameKind::Memory => "Flip cards and\nfind the pairs!",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "Strategy",
            GameKind::Snake
            | GameKind::FlappyBird
            | GameKind::Breakout
            | GameKind::DinoRunner => "Arcade",
            GameKind::Tetris | GameKind::Game2048 => "Puzzle",
            GameKind::Pong => "Classic",
            GameKind::Memory => "Memory",
        }
    }

    pub fn difficulty(self) -> &'static str {
        match self {
            GameKind::TicTacToe | GameKind::Pong => "Easy",
            GameKind::Snake
            | GameKind::Breakout
            | GameKind::DinoRunner
            | GameKind::Memory => "Medium",
            GameKind::Tetris | GameKind::FlappyBird | GameKind::Game2048 => "Hard",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "⭕",
            GameKind::Snake => "🐍",
            GameKind::Tetris => "🧩",
            GameKind::FlappyBird => "🐦",
            GameKind::Breakout => "🧱",
            GameKind::Pong => "🏓",
            GameKind::DinoRunner => "🦖",
            GameKind::Game2048 => "🔢",
            GameKind::Memory => "🃏",
        }
    }

    pub fn color(self) -> Color {
        match self {
            GameKind::TicTacToe => Color::Rgb(255, 180, 80),
            GameKind::Snake => Color::Rgb(80, 220, 80),
            GameKind::Tetris => Color::Rgb(160, 80, 240),
            GameKind::FlappyBird => Color::Rgb(80, 200, 255),
            GameKind::Breakout => Color::Rgb(220, 80, 80),
            GameKind::Pong => Color::Rgb(220, 220, 220),
            GameKind::DinoRunner => Color::Rgb(200, 120, 255),
            GameKind::Game2048 => Color::Rgb(240, 160, 60),
            GameKind::Memory => Color::Rgb(255, 100, 180),
        }
    }

    /// Storage key for the persisted best, if this game keeps one.
    pub fn score_key(self) -> Option<&'static str> {
        match self {
            GameKind::Snake => Some("snake-high-score"),
            GameKind::Game2048 => Some("2048-best-score"),
            GameKind::FlappyBird => Some("flappy-bird-high-score"),
            GameKind::DinoRunner => Some("dino-runner-high-score"),
            GameKind::Breakout => Some("breakout-high-score"),
            GameKind::Tetris => Some("tetris-high-score"),
            GameKind::TicTacToe | GameKind::Pong | GameKind::Memory => None,
        }
    }

    pub fn create(self, best: u32) -> Box<dyn Game> {
        match self {
            GameKind::TicTacToe => Box::new(tictactoe::TicTacToe::new()),
            GameKind::Snake => Box::new(snake::Snake::new(best)),
            GameKind::Tetris => Box::new(tetris::Tetris::new(best)),
            GameKind::FlappyBird => Box::new(flappy::FlappyBird::new(best)),
            GameKind::Breakout => Box::new(breakout::Breakout::new(best)),
            GameKind::Pong => Box::new(pong::Pong::new()),
            GameKind::DinoRunner => Box::new(dino::DinoRunner::new(best)),
            GameKind::Game2048 => Box::new(game2048::Game2048::new(best)),
            GameKind::Memory => Box::new(memory::Memory::new()),
        }
    }
}

/// Axis-aligned box, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Touching edges count as overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }
}

/// A moving body centred on (`x`, `y`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Self {
        Self { x, y, vx, vy, radius }
    }

    pub fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.x - self.radius,
            self.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Where `hit` lands along a paddle starting at `start`, mapped to `-0.5..=0.5`.
pub fn contact_offset(hit: f32, start: f32, len: f32) -> f32 {
    ((hit - start) / len).clamp(0.0, 1.0) - 0.5
}

/// Toggle between running and paused; other states are untouched.
pub fn toggle_pause(status: &mut RoundStatus) {
    *status = match *status {
        RoundStatus::Running => RoundStatus::Paused,
        RoundStatus::Paused => RoundStatus::Running,
        other => other,
    };
}

fn play_again(score: u32) -> String {
    format!("Final score: {} · Space to play again", score)
}

/// Banner for the non-running states, shared by the real-time games.
pub fn status_banner(scene: &mut Scene, status: RoundStatus, start_hint: &str, score: u32) {
    use crate::scene::Tone;
    match status {
        RoundStatus::NotStarted => scene.banner("Ready?", start_hint, Tone::Neutral),
        RoundStatus::Paused => scene.banner("Paused", "P to resume", Tone::Neutral),
        RoundStatus::Over => scene.banner("Game Over!", play_again(score), Tone::Bad),
        RoundStatus::Won => scene.banner("You Win!", play_again(score), Tone::Good),
        RoundStatus::Running => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap_and_separation() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.overlaps(&Aabb::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Aabb::new(11.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Aabb::new(0.0, -6.0, 5.0, 5.0)));
    }

    #[test]
    fn test_contact_offset_range() {
        assert_eq!(contact_offset(0.0, 0.0, 100.0), -0.5);
        assert_eq!(contact_offset(50.0, 0.0, 100.0), 0.0);
        assert_eq!(contact_offset(130.0, 0.0, 100.0), 0.5);
    }

    #[test]
    fn test_every_kind_creates_its_own_game() {
        for &kind in GameKind::all() {
            let game = kind.create(0);
            assert_eq!(game.kind(), kind);
            assert!(!game.is_terminal());
        }
    }

    #[test]
    fn test_scene_is_idempotent_for_fresh_games() {
        for &kind in GameKind::all() {
            let game = kind.create(7);
            assert_eq!(game.scene(), game.scene());
        }
    }

    #[test]
    fn test_scene_is_idempotent_mid_round() {
        for &kind in GameKind::all() {
            let mut game = kind.create(7);
            game.handle_command(Command::Action);
            game.handle_command(Command::Select { x: 0.1, y: 0.1 });
            game.handle_command(Command::Select { x: 0.6, y: 0.1 });
            for _ in 0..10 {
                game.update(Duration::from_millis(16));
            }
            assert_eq!(game.scene(), game.scene(), "{:?}", kind);
        }
    }

    #[test]
    fn test_memory_scene_stable_with_pending_pair() {
        let mut game = GameKind::Memory.create(0);
        game.handle_command(Command::Select { x: 0.1, y: 0.1 });
        game.handle_command(Command::Select { x: 0.6, y: 0.1 });
        let first = game.scene();
        assert_eq!(first, game.scene());
        assert_eq!(game.status(), RoundStatus::Running);
    }

    #[test]
    fn test_pause_toggle_only_between_running_and_paused() {
        let mut s = RoundStatus::Running;
        toggle_pause(&mut s);
        assert_eq!(s, RoundStatus::Paused);
        toggle_pause(&mut s);
        assert_eq!(s, RoundStatus::Running);
        let mut over = RoundStatus::Over;
        toggle_pause(&mut over);
        assert_eq!(over, RoundStatus::Over);
    }
}
