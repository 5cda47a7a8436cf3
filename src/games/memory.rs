use std::time::Duration;

use rand::seq::SliceRandom;
use ratatui::style::Color;

use crate::clock::{Interval, Timeout};
use crate::games::{Game, GameKind, RoundStatus};
use crate::input::{Command, Direction};
use crate::notify::Notice;
use crate::scene::{Scene, Tone};

pub const CARD_VALUES: [&str; 8] = ["♠", "♥", "♦", "♣", "★", "☀", "☂", "♪"];
const COLS: usize = 4;
const MATCH_DELAY_MS: u64 = 500;
const MISMATCH_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
struct Card {
    value: &'static str,
    flipped: bool,
    matched: bool,
}

/// Two face-up cards waiting to be settled.
#[derive(Debug)]
struct Pending {
    cards: [usize; 2],
    matched: bool,
    timeout: Timeout,
}

pub struct Memory {
    cards: Vec<Card>,
    first: Option<usize>,
    pending: Option<Pending>,
    moves: u32,
    matches: usize,
    elapsed_secs: u32,
    clock: Interval,
    status: RoundStatus,
    cursor: usize,
    notices: Vec<Notice>,
}

fn format_time(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl Memory {
    pub fn new() -> Self {
        let mut deck: Vec<&'static str> =
            CARD_VALUES.iter().chain(CARD_VALUES.iter()).copied().collect();
        deck.shuffle(&mut rand::thread_rng());
        Self::with_deck(deck)
    }

    fn with_deck(deck: Vec<&'static str>) -> Self {
        Self {
            cards: deck
                .into_iter()
                .map(|value| Card {
                    value,
                    flipped: false,
                    matched: false,
                })
                .collect(),
            first: None,
            pending: None,
            moves: 0,
            matches: 0,
            elapsed_secs: 0,
            clock: Interval::from_millis(1000),
            status: RoundStatus::NotStarted,
            cursor: 0,
            notices: Vec::new(),
        }
    }

    pub fn flip(&mut self, idx: usize) {
        if idx >= self.cards.len() || self.status.is_terminal() {
            return;
        }
        if self.status == RoundStatus::NotStarted {
            self.status = RoundStatus::Running;
        }
        if self.pending.is_some() || self.cards[idx].flipped || self.cards[idx].matched {
            return;
        }
        self.cards[idx].flipped = true;

        match self.first.take() {
            None => self.first = Some(idx),
            Some(first) => {
                self.moves += 1;
                let matched = self.cards[first].value == self.cards[idx].value;
                let delay = if matched { MATCH_DELAY_MS } else { MISMATCH_DELAY_MS };
                self.pending = Some(Pending {
                    cards: [first, idx],
                    matched,
                    timeout: Timeout::from_millis(delay),
                });
            }
        }
    }

    fn settle(&mut self, pending: Pending) {
        for i in pending.cards {
            if pending.matched {
                self.cards[i].matched = true;
            } else {
                self.cards[i].flipped = false;
            }
        }
        if !pending.matched {
            return;
        }
        self.matches += 1;
        self.notices.push(Notice::success("Match found!"));
        if self.matches == CARD_VALUES.len() {
            self.status = RoundStatus::Won;
            self.notices.push(Notice::success(format!(
                "Congratulations! Completed in {} moves and {} seconds!",
                self.moves, self.elapsed_secs
            )));
        }
    }

    fn move_cursor(&mut self, dir: Direction) {
        let rows = self.cards.len() / COLS;
        let (dx, dy) = dir.delta();
        let col = (self.cursor % COLS) as i32 + dx;
        let row = (self.cursor / COLS) as i32 + dy;
        if (0..COLS as i32).contains(&col) && (0..rows as i32).contains(&row) {
            self.cursor = row as usize * COLS + col as usize;
        }
    }
}

impl Game for Memory {
    fn kind(&self) -> GameKind {
        GameKind::Memory
    }

    fn update(&mut self, dt: Duration) {
        if self.status != RoundStatus::Running {
            return;
        }
        self.elapsed_secs += self.clock.advance(dt);
        let due = self
            .pending
            .as_mut()
            .map(|p| p.timeout.advance(dt))
            .unwrap_or(false);
        if due {
            if let Some(pending) = self.pending.take() {
                self.settle(pending);
            }
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Move(dir) => self.move_cursor(dir),
            Command::Action => {
                if self.status.is_terminal() {
                    self.reset();
                } else {
                    self.flip(self.cursor);
                }
            }
            Command::Select { x, y } => {
                let rows = self.cards.len() / COLS;
                let col = ((x * COLS as f32) as usize).min(COLS - 1);
                let row = ((y * rows as f32) as usize).min(rows - 1);
                self.cursor = row * COLS + col;
                self.flip(self.cursor);
            }
            Command::Restart => self.reset(),
            Command::Pointer { .. } | Command::Pause => {}
        }
    }

    fn scene(&self) -> Scene {
        let rows = self.cards.len() / COLS;
        let mut scene = Scene::new(COLS as f32, rows as f32, Color::Rgb(18, 14, 28));
        for (i, card) in self.cards.iter().enumerate() {
            let (color, label) = if card.matched {
                (Color::Rgb(40, 150, 90), card.value)
            } else if card.flipped {
                (Color::Rgb(150, 80, 230), card.value)
            } else {
                (Color::Rgb(55, 55, 80), "?")
            };
            let highlight = i == self.cursor && !self.status.is_terminal();
            let (col, row) = ((i % COLS) as u16, (i / COLS) as u16);
            scene.cell(col, row, color, Some(label.to_string()), highlight);
        }
        scene.hud("Moves", self.moves, Color::Yellow);
        scene.hud("Matches", format!("{}/{}", self.matches, CARD_VALUES.len()), Color::Green);
        scene.hud("Time", format_time(self.elapsed_secs), Color::Cyan);
        if self.status == RoundStatus::Won {
            scene.banner(
                "🎉 Congratulations!",
                format!(
                    "{} moves in {} · Space to play again",
                    self.moves,
                    format_time(self.elapsed_secs)
                ),
                Tone::Good,
            );
        }
        scene.help = "←↑↓→ Move │ Space Flip │ Click card │ R Restart │ Esc Back";
        scene
    }

    fn reset(&mut self) {
        *self = Memory::new();
    }

    fn status(&self) -> RoundStatus {
        self.status
    }

    fn high_score(&self) -> Option<u32> {
        None
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pairs laid out side by side: cards 2k and 2k+1 match.
    fn ordered() -> Memory {
        let deck = CARD_VALUES.iter().flat_map(|v| [*v, *v]).collect();
        Memory::with_deck(deck)
    }

    fn wait(g: &mut Memory, ms: u64) {
        g.update(Duration::from_millis(ms));
    }

    #[test]
    fn test_new_deck_has_every_value_twice() {
        let g = Memory::new();
        assert_eq!(g.cards.len(), CARD_VALUES.len() * 2);
        for v in CARD_VALUES {
            assert_eq!(g.cards.iter().filter(|c| c.value == v).count(), 2);
        }
    }

    #[test]
    fn test_first_flip_starts_round() {
        let mut g = ordered();
        assert_eq!(g.status(), RoundStatus::NotStarted);
        wait(&mut g, 3000);
        assert_eq!(g.elapsed_secs, 0);
        g.flip(0);
        assert_eq!(g.status(), RoundStatus::Running);
        wait(&mut g, 2000);
        assert_eq!(g.elapsed_secs, 2);
    }

    #[test]
    fn test_match_settles_after_delay() {
        let mut g = ordered();
        g.flip(0);
        g.flip(1);
        assert_eq!(g.moves, 1);
        wait(&mut g, MATCH_DELAY_MS - 100);
        assert_eq!(g.matches, 0);
        wait(&mut g, 100);
        assert_eq!(g.matches, 1);
        assert!(g.cards[0].matched && g.cards[1].matched);
    }

    #[test]
    fn test_mismatch_flips_back_and_blocks_third_card() {
        let mut g = ordered();
        g.flip(0);
        g.flip(2);
        g.flip(4);
        assert!(!g.cards[4].flipped);
        wait(&mut g, MISMATCH_DELAY_MS);
        assert!(!g.cards[0].flipped && !g.cards[2].flipped);
        assert_eq!(g.matches, 0);
        assert_eq!(g.moves, 1);
    }

    #[test]
    fn test_flipping_same_card_twice_is_ignored() {
        let mut g = ordered();
        g.flip(0);
        g.flip(0);
        assert_eq!(g.moves, 0);
        assert!(g.pending.is_none());
    }

    #[test]
    fn test_round_completes_when_all_pairs_match_and_timer_stops() {
        let mut g = ordered();
        for k in 0..CARD_VALUES.len() {
            g.flip(2 * k);
            g.flip(2 * k + 1);
            wait(&mut g, MATCH_DELAY_MS);
        }
        assert_eq!(g.matches, CARD_VALUES.len());
        assert_eq!(g.status(), RoundStatus::Won);
        let frozen = g.elapsed_secs;
        wait(&mut g, 10_000);
        assert_eq!(g.elapsed_secs, frozen);
    }

    #[test]
    fn test_reset_drops_pending_flip_back() {
        let mut g = ordered();
        g.flip(0);
        g.flip(2);
        g.reset();
        assert!(g.pending.is_none());
        assert_eq!(g.moves, 0);
        wait(&mut g, MISMATCH_DELAY_MS);
        assert!(g.cards.iter().all(|c| !c.flipped));
    }

    #[test]
    fn test_click_selects_card_under_pointer() {
        let mut g = ordered();
        g.handle_command(Command::Select { x: 0.3, y: 0.6 });
        assert_eq!(g.cursor, 9);
        assert!(g.cards[9].flipped);
    }
}
