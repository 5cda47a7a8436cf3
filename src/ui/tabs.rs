use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::games::GameKind;

/// "Catalog" followed by every game, highlighting where the player is.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.current_game();
    let selected = current
        .and_then(|kind| GameKind::all().iter().position(|&k| k == kind))
        .map_or(0, |idx| idx + 1);

    let mut titles: Vec<Line> = vec![Line::from(" Catalog ")];
    titles.extend(GameKind::all().iter().map(|kind| {
        let style = if Some(*kind) == current {
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(120, 120, 140))
        };
        Line::from(Span::styled(format!(" {} ", kind.title()), style))
    }));

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
                .border_type(BorderType::Rounded)
                .title(" 🕹 PlayDeck ")
                .title_style(
                    Style::default()
                        .fg(Color::Rgb(200, 120, 255))
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("│", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}
