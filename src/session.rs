//! Host for one mounted game: wires input and frames into it and persists
//! its best score.

use std::time::Instant;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;

use crate::clock::FrameLoop;
use crate::games::{Game, GameKind, RoundStatus};
use crate::input::{Command, InputRouter};
use crate::notify::Notice;
use crate::scene::Scene;
use crate::scores::HighScores;

pub struct Session {
    kind: GameKind,
    game: Box<dyn Game>,
    frames: FrameLoop,
    router: InputRouter,
    last_status: RoundStatus,
}

impl Session {
    pub fn open(kind: GameKind, scores: &HighScores) -> Self {
        let best = kind.score_key().map(|key| scores.load(key)).unwrap_or(0);
        log::info!("opening {} (best {})", kind.title(), best);
        let game = kind.create(best);
        Self {
            kind,
            last_status: game.status(),
            game,
            frames: FrameLoop::new(),
            router: InputRouter::new(),
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn scene(&self) -> Scene {
        self.game.scene()
    }

    pub fn is_closed(&self) -> bool {
        self.frames.is_cancelled()
    }

    /// Where the field was last painted, for pointer mapping.
    pub fn set_field(&mut self, area: Rect) {
        self.router.set_field(area);
    }

    pub fn route_key(&self, key: KeyEvent) -> Option<Command> {
        self.router.route_key(key)
    }

    pub fn route_mouse(&self, mouse: MouseEvent) -> Option<Command> {
        self.router.route_mouse(mouse)
    }

    pub fn dispatch(&mut self, cmd: Command, now: Instant, scores: &mut HighScores) -> Vec<Notice> {
        if self.is_closed() {
            return Vec::new();
        }
        if cmd == Command::Restart {
            log::info!("restarting {}", self.kind.title());
        }
        self.game.handle_command(cmd);
        self.sync_loop(now);
        self.settle(scores)
    }

    /// One display tick. Does nothing unless the frame loop is armed.
    pub fn on_frame(&mut self, now: Instant, scores: &mut HighScores) -> Vec<Notice> {
        let Some(dt) = self.frames.frame(now) else {
            return Vec::new();
        };
        self.game.update(dt);
        self.sync_loop(now);
        self.settle(scores)
    }

    /// Tear down: no further frame or command reaches the game.
    pub fn close(&mut self) {
        log::info!("closing {}", self.kind.title());
        self.frames.cancel();
    }

    fn sync_loop(&mut self, now: Instant) {
        if self.game.status() == RoundStatus::Running {
            self.frames.schedule(now);
        } else {
            self.frames.park();
        }
    }

    fn settle(&mut self, scores: &mut HighScores) -> Vec<Notice> {
        let status = self.game.status();
        if status != self.last_status && status.is_terminal() {
            log::info!("{} round ended: {:?}", self.kind.title(), status);
        }
        self.last_status = status;
        if let (Some(key), Some(best)) = (self.kind.score_key(), self.game.high_score()) {
            scores.save(key, best);
        }
        self.game.take_notices()
    }
}
