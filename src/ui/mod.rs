pub mod canvas;
pub mod home;
pub mod play;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Screen};
use crate::notify::NoticeBoard;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    if let Screen::Playing(session) = &mut app.screen {
        play::render_session(frame, chunks[1], session);
    } else {
        home::render_home(frame, chunks[1], app);
    }

    // Notices render on top of everything
    render_notices(frame, frame.area(), &app.notices);
}

fn render_notices(frame: &mut Frame, area: Rect, notices: &NoticeBoard) {
    let width = 40u16.min(area.width);
    let mut y = area.y + 1;
    for notice in notices.visible() {
        if y + 3 > area.y + area.height {
            break;
        }
        let toast = Rect::new(area.x + area.width - width, y, width, 3);
        frame.render_widget(Clear, toast);
        let color = notice.level.color();
        let p = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", notice.level.icon()), Style::default().fg(color)),
            Span::styled(notice.text.clone(), Style::default().fg(Color::White)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(Color::Rgb(15, 15, 25))),
        );
        frame.render_widget(p, toast);
        y += 3;
    }
}
