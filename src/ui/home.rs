use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, GRID_COLS};
use crate::games::GameKind;
use crate::scores::HighScores;

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════════════╗
 ║  ██████╗ ██╗      █████╗ ██╗   ██╗  ██████╗ ███████╗ ██████╗██╗  ██╗  ║
 ║  ██╔══██╗██║     ██╔══██╗╚██╗ ██╔╝  ██╔══██╗██╔════╝██╔════╝██║ ██╔╝  ║
 ║  ██████╔╝██║     ███████║ ╚████╔╝   ██║  ██║█████╗  ██║     █████╔╝   ║
 ║  ██╔═══╝ ██║     ██╔══██║  ╚██╔╝    ██║  ██║██╔══╝  ██║     ██╔═██╗   ║
 ║  ██║     ███████╗██║  ██║   ██║     ██████╔╝███████╗╚██████╗██║  ██╗  ║
 ║  ╚═╝     ╚══════╝╚═╝  ╚═╝   ╚═╝     ╚═════╝ ╚══════╝ ╚═════╝╚═╝  ╚═╝  ║
 ╚═══════════════════════════════════════════════════════════════════════╝"#;

const KEY_STYLE: Color = Color::Rgb(80, 200, 255);
const MUTED: Color = Color::Rgb(140, 140, 140);

fn dim(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(r / 2, g / 2, b / 2),
        other => other,
    }
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn render_game_tile(
    frame: &mut Frame,
    area: Rect,
    index: usize,
    kind: GameKind,
    best: Option<u32>,
    selected: bool,
) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { dim(kind.color()) };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { kind.color() };
    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled(format!("[{}] ", index + 1), bold(Color::Rgb(255, 220, 80))),
        Span::styled(format!("{} ", kind.icon()), Style::default()),
        Span::styled(kind.title(), bold(name_color)),
    ])];

    for desc_line in kind.description().split('\n') {
        lines.push(Line::from(Span::styled(desc_line, Style::default().fg(desc_color))));
    }

    lines.push(Line::from(vec![
        Span::styled(kind.category(), Style::default().fg(Color::Rgb(120, 180, 255))),
        Span::styled(" · ", Style::default().fg(Color::Rgb(60, 60, 80))),
        Span::styled(kind.difficulty(), Style::default().fg(difficulty_color(kind.difficulty()))),
    ]));

    if let Some(best) = best {
        let trophy = Style::default().fg(Color::Rgb(255, 215, 0));
        lines.push(Line::from(Span::styled(format!("🏆 {}", best), trophy)));
    }

    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            bold(Color::Rgb(255, 220, 80)),
        )));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}

fn difficulty_color(difficulty: &str) -> Color {
    match difficulty {
        "Easy" => Color::Rgb(80, 220, 120),
        "Medium" => Color::Rgb(255, 200, 60),
        _ => Color::Rgb(255, 90, 90),
    }
}

fn key_line(key: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<17}", key), Style::default().fg(KEY_STYLE)),
        Span::styled(what, Style::default().fg(MUTED)),
    ])
}

pub fn render_home(frame: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Banner
            Constraint::Length(2), // Subtitle
            Constraint::Min(15),   // Game tiles
            Constraint::Length(9), // Controls
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "  ⚡ Nine quick games, one terminal ⚡  ",
        Style::default()
            .fg(Color::Rgb(255, 220, 80))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games · ↑↓←→ Select, Enter or click to Play ")
        .title_style(bold(Color::Rgb(200, 120, 255)));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let kinds = GameKind::all();
    let rows = kinds.len().div_ceil(GRID_COLS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(games_inner);

    app.tile_areas.clear();
    for (r, row_area) in row_areas.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLS as u32); GRID_COLS])
            .split(*row_area);
        for (c, tile_area) in cols.iter().enumerate() {
            let idx = r * GRID_COLS + c;
            if let Some(&kind) = kinds.get(idx) {
                let best = kind.score_key().map(|key| app.scores.load(key));
                render_game_tile(frame, *tile_area, idx, kind, best, app.selected_game == idx);
                app.tile_areas.push(*tile_area);
            }
        }
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);

    let controls = Paragraph::new(vec![
        key_line("↑ ↓ ← →", "Select game"),
        key_line("1-9 / Enter", "Launch game"),
        key_line("Tab / Shift+Tab", "Next / previous game"),
        key_line("Esc", "Back to catalog"),
        key_line("H", "Best scores"),
        key_line("q / Ctrl+C", "Quit"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation ")
            .title_style(bold(Color::Rgb(200, 120, 255))),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    let selected = kinds[app.selected_game.min(kinds.len() - 1)];
    let mut about: Vec<Line> = game_detail(selected, &app.scores);
    about.push(key_line("R", "Restart game"));
    about.push(key_line("P", "Pause (real-time games)"));
    let detail = Paragraph::new(about).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(dim(selected.color())))
            .title(format!(" {} {} ", selected.icon(), selected.title()))
            .title_style(bold(selected.color())),
    );
    frame.render_widget(detail, ctrl_cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(
            concat!("v", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Rgb(80, 80, 100)),
        ),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", bold(Color::Rgb(255, 220, 80))),
        Span::styled(" Best Scores", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);

    if app.show_high_scores {
        render_high_scores_overlay(frame, area, &app.scores);
    }
}

fn game_detail(kind: GameKind, scores: &HighScores) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("    ", Style::default()),
        Span::styled(kind.category(), bold(Color::Rgb(120, 180, 255))),
        Span::styled(" · ", Style::default().fg(Color::Rgb(60, 60, 80))),
        Span::styled(kind.difficulty(), Style::default().fg(difficulty_color(kind.difficulty()))),
    ])];
    lines.push(Line::from(Span::styled(
        format!("    {}", kind.description().replace('\n', " ")),
        Style::default().fg(Color::Rgb(180, 180, 200)),
    )));
    let best = match kind.score_key() {
        Some(key) => format!("    🏆 Best: {}", scores.load(key)),
        None => "    No score kept".to_string(),
    };
    lines.push(Line::from(Span::styled(best, Style::default().fg(Color::Rgb(255, 215, 0)))));
    lines
}

fn render_high_scores_overlay(frame: &mut Frame, area: Rect, scores: &HighScores) {
    let overlay_w = 44u16.min(area.width.saturating_sub(4));
    let overlay_h = 14u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" 🏆 Best Scores ")
        .title_style(bold(Color::Rgb(255, 220, 80)))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for &kind in GameKind::all() {
        let Some(key) = kind.score_key() else { continue };
        let best = scores.load(key);
        let value = if best > 0 {
            Span::styled(best.to_string(), bold(Color::Rgb(255, 215, 0)))
        } else {
            Span::styled("No score yet", Style::default().fg(Color::Rgb(60, 60, 80)))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", kind.icon()), Style::default()),
            Span::styled(format!("{:<14}", kind.title()), bold(kind.color())),
            value,
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", bold(Color::Rgb(255, 220, 80))),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
