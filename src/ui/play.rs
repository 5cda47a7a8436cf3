use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::scene::{Banner, Tone};
use crate::session::Session;
use crate::ui::canvas;

pub fn render_session(frame: &mut Frame, area: Rect, session: &mut Session) {
    let kind = session.kind();
    let scene = session.scene();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(kind.color()))
        .title(format!(" {} {} ", kind.icon(), kind.title()))
        .title_style(Style::default().fg(kind.color()).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(3),    // Game field
            Constraint::Length(1), // Help
        ])
        .split(inner);

    // Status bar
    let mut spans = vec![Span::raw(" ")];
    for (i, item) in scene.hud.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(format!("{}: ", item.label), Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            item.value.clone(),
            Style::default().fg(item.color).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    // Game field
    let field = canvas::fit_field(chunks[1], &scene);
    session.set_field(field);
    let lines = canvas::paint(&scene, field.width as usize, field.height as usize);
    frame.render_widget(Paragraph::new(lines), field);

    if let Some(banner) = &scene.banner {
        render_banner(frame, field, banner);
    }

    let help = Paragraph::new(Line::from(Span::styled(
        scene.help,
        Style::default().fg(Color::Rgb(100, 100, 130)),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}

fn render_banner(frame: &mut Frame, field: Rect, banner: &Banner) {
    let color = match banner.tone {
        Tone::Neutral => Color::Rgb(80, 200, 255),
        Tone::Good => Color::Rgb(80, 220, 120),
        Tone::Bad => Color::Rgb(255, 90, 90),
    };
    let text_w = banner.title.chars().count().max(banner.subtitle.chars().count()) as u16 + 4;
    let w = text_w.min(field.width);
    let h = 4u16.min(field.height);
    if w == 0 || h == 0 {
        return;
    }
    let area = Rect::new(
        field.x + (field.width - w) / 2,
        field.y + (field.height - h) / 2,
        w,
        h,
    );
    frame.render_widget(Clear, area);
    let p = Paragraph::new(vec![
        Line::from(Span::styled(
            banner.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(banner.subtitle.clone(), Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(Color::Rgb(15, 15, 25))),
    );
    frame.render_widget(p, area);
}
