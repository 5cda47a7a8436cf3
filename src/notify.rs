use std::time::{Duration, Instant};

use ratatui::style::Color;

/// Most notices kept on screen at once; older ones drop off first.
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn color(self) -> Color {
        match self {
            Level::Info => Color::Rgb(120, 180, 255),
            Level::Success => Color::Rgb(80, 220, 120),
            Level::Warning => Color::Rgb(255, 200, 60),
            Level::Error => Color::Rgb(255, 90, 90),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Level::Info => "ℹ",
            Level::Success => "✔",
            Level::Warning => "⚠",
            Level::Error => "✖",
        }
    }
}

/// A transient, fire-and-forget message raised by a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: Level::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { level: Level::Success, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: Level::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: Level::Error, text: text.into() }
    }
}

pub struct NoticeBoard {
    ttl: Duration,
    items: Vec<(Notice, Instant)>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, items: Vec::new() }
    }

    pub fn push(&mut self, notice: Notice, now: Instant) {
        log::debug!("notice: {}", notice.text);
        self.items.push((notice, now + self.ttl));
        if self.items.len() > MAX_VISIBLE {
            let excess = self.items.len() - MAX_VISIBLE;
            self.items.drain(..excess);
        }
    }

    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|(_, expires)| *expires > now);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter().map(|(n, _)| n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_expire() {
        let t0 = Instant::now();
        let mut board = NoticeBoard::new(Duration::from_secs(2));
        board.push(Notice::success("+10 points!"), t0);
        board.prune(t0 + Duration::from_secs(1));
        assert_eq!(board.visible().count(), 1);
        board.prune(t0 + Duration::from_secs(3));
        assert!(board.items.is_empty());
    }

    #[test]
    fn test_oldest_notice_dropped_when_full() {
        let t0 = Instant::now();
        let mut board = NoticeBoard::new(Duration::from_secs(2));
        for i in 0..6 {
            board.push(Notice::info(format!("n{}", i)), t0);
        }
        let texts: Vec<_> = board.visible().map(|n| n.text.clone()).collect();
        assert_eq!(texts, vec!["n2", "n3", "n4", "n5"]);
    }
}
