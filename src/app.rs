use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::games::GameKind;
use crate::input::Command;
use crate::notify::{Notice, NoticeBoard};
use crate::scores::HighScores;
use crate::session::Session;

/// Catalog tiles per row.
pub const GRID_COLS: usize = 3;

pub enum Screen {
    Catalog,
    Playing(Session),
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub selected_game: usize,
    pub show_high_scores: bool,
    pub scores: HighScores,
    pub notices: NoticeBoard,
    /// Catalog tile areas from the last draw, for mouse hit-testing.
    pub tile_areas: Vec<Rect>,
}

impl App {
    pub fn new(scores: HighScores, notice_ttl: Duration) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Catalog,
            selected_game: 0,
            show_high_scores: false,
            scores,
            notices: NoticeBoard::new(notice_ttl),
            tile_areas: Vec::new(),
        }
    }

    pub fn current_game(&self) -> Option<GameKind> {
        match &self.screen {
            Screen::Catalog => None,
            Screen::Playing(session) => Some(session.kind()),
        }
    }

    pub fn open(&mut self, kind: GameKind) {
        self.close();
        if let Some(idx) = GameKind::all().iter().position(|&k| k == kind) {
            self.selected_game = idx;
        }
        self.show_high_scores = false;
        self.notices.clear();
        self.screen = Screen::Playing(Session::open(kind, &self.scores));
    }

    /// Back to the catalog. The session is cancelled before it is dropped.
    pub fn close(&mut self) {
        if let Screen::Playing(session) = &mut self.screen {
            session.close();
        }
        self.screen = Screen::Catalog;
    }

    pub fn on_tick(&mut self) {
        let now = Instant::now();
        self.notices.prune(now);
        if let Screen::Playing(session) = &mut self.screen {
            let notices = session.on_frame(now, &mut self.scores);
            self.post(notices, now);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.cycle(1);
                return;
            }
            KeyCode::BackTab => {
                self.cycle(GameKind::all().len() - 1);
                return;
            }
            KeyCode::Esc if matches!(self.screen, Screen::Playing(_)) => {
                self.close();
                return;
            }
            _ => {}
        }

        if let Screen::Playing(session) = &mut self.screen {
            if let Some(cmd) = session.route_key(key) {
                self.dispatch(cmd);
            }
            return;
        }

        if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
            return;
        }
        let count = GameKind::all().len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_high_scores = !self.show_high_scores
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(&kind) = GameKind::all().get(idx) {
                    self.open(kind);
                }
            }
            KeyCode::Right => self.selected_game = (self.selected_game + 1) % count,
            KeyCode::Left => self.selected_game = (self.selected_game + count - 1) % count,
            KeyCode::Down => self.selected_game = (self.selected_game + GRID_COLS) % count,
            KeyCode::Up => self.selected_game = (self.selected_game + count - GRID_COLS) % count,
            KeyCode::Enter | KeyCode::Char(' ') => {
                let kind = GameKind::all()[self.selected_game];
                self.open(kind);
            }
            _ => {}
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if let Screen::Playing(session) = &self.screen {
            if let Some(cmd) = session.route_mouse(mouse) {
                self.dispatch(cmd);
            }
            return;
        }

        let at = Position::new(mouse.column, mouse.row);
        let hit = self.tile_areas.iter().position(|area| area.contains(at));
        match mouse.kind {
            MouseEventKind::Moved => {
                if let Some(idx) = hit {
                    self.selected_game = idx;
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(&kind) = hit.and_then(|idx| GameKind::all().get(idx)) {
                    self.open(kind);
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, cmd: Command) {
        let now = Instant::now();
        if let Screen::Playing(session) = &mut self.screen {
            let notices = session.dispatch(cmd, now, &mut self.scores);
            self.post(notices, now);
        }
    }

    fn post(&mut self, notices: Vec<Notice>, now: Instant) {
        for notice in notices {
            self.notices.push(notice, now);
        }
    }

    /// Step through the games in catalog order, opening the next one.
    fn cycle(&mut self, step: usize) {
        let all = GameKind::all();
        let next = match self.current_game() {
            Some(kind) => {
                let idx = all.iter().position(|&k| k == kind).unwrap_or(0);
                all[(idx + step) % all.len()]
            }
            None => all[self.selected_game],
        };
        self.open(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(HighScores::in_memory(), Duration::from_secs(2))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_grid_navigation_wraps() {
        let mut a = app();
        press(&mut a, KeyCode::Left);
        assert_eq!(a.selected_game, 8);
        press(&mut a, KeyCode::Down);
        assert_eq!(a.selected_game, 2);
        press(&mut a, KeyCode::Up);
        assert_eq!(a.selected_game, 8);
    }

    #[test]
    fn test_enter_opens_selected_and_esc_returns() {
        let mut a = app();
        press(&mut a, KeyCode::Right);
        press(&mut a, KeyCode::Enter);
        assert_eq!(a.current_game(), Some(GameKind::Snake));
        press(&mut a, KeyCode::Esc);
        assert_eq!(a.current_game(), None);
        assert!(!a.should_quit);
    }

    #[test]
    fn test_digit_opens_game_directly() {
        let mut a = app();
        press(&mut a, KeyCode::Char('8'));
        assert_eq!(a.current_game(), Some(GameKind::Game2048));
        assert_eq!(a.selected_game, 7);
    }

    #[test]
    fn test_tab_cycles_through_games() {
        let mut a = app();
        press(&mut a, KeyCode::Char('9'));
        press(&mut a, KeyCode::Tab);
        assert_eq!(a.current_game(), Some(GameKind::TicTacToe));
        press(&mut a, KeyCode::BackTab);
        assert_eq!(a.current_game(), Some(GameKind::Memory));
    }

    #[test]
    fn test_q_only_quits_from_catalog() {
        let mut a = app();
        press(&mut a, KeyCode::Char('2'));
        press(&mut a, KeyCode::Char('q'));
        assert!(!a.should_quit);
        press(&mut a, KeyCode::Esc);
        press(&mut a, KeyCode::Char('q'));
        assert!(a.should_quit);
    }

    #[test]
    fn test_game_notices_reach_the_board() {
        let mut a = app();
        a.open(GameKind::TicTacToe);
        // X takes the left column while O plays the middle one
        a.dispatch(Command::Select { x: 0.1, y: 0.1 });
        a.dispatch(Command::Select { x: 0.5, y: 0.1 });
        a.dispatch(Command::Select { x: 0.1, y: 0.5 });
        a.dispatch(Command::Select { x: 0.5, y: 0.5 });
        a.dispatch(Command::Select { x: 0.1, y: 0.9 });
        assert!(a.notices.visible().any(|n| n.text.contains('X')));
    }

    #[test]
    fn test_catalog_click_opens_tile() {
        let mut a = app();
        a.tile_areas = (0..9).map(|i| Rect::new((i % 3) * 10, (i / 3) * 5, 10, 5)).collect();
        a.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 22,
            row: 6,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(a.current_game(), Some(GameKind::Pong));
    }
}
