//! Rasterizes a [`Scene`] into a grid of styled terminal cells.

use ratatui::prelude::*;

use crate::scene::{Scene, Shape};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

type Grid = Vec<Vec<(char, Style)>>;

/// Largest centred sub-area of `area` that keeps the scene's proportions.
pub fn fit_field(area: Rect, scene: &Scene) -> Rect {
    if area.width == 0 || area.height == 0 || scene.width <= 0.0 || scene.height <= 0.0 {
        return Rect::new(area.x, area.y, 0, 0);
    }
    let want = scene.width / scene.height * CELL_ASPECT;
    let (mut w, mut h) = (area.width as f32, area.height as f32);
    if w / h > want {
        w = (h * want).round().max(1.0);
    } else {
        h = (w / want).round().max(1.0);
    }
    let (w, h) = (w as u16, h as u16);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Span of cells covered by `[start, start + len)` in scene units, at least one wide.
fn cover(start: f32, len: f32, scale: f32, limit: usize) -> Option<(usize, usize)> {
    let lo = (start * scale).floor();
    let hi = ((start + len) * scale).ceil().max(lo + 1.0);
    let lo = lo.max(0.0);
    let hi = hi.min(limit as f32);
    if lo >= hi {
        return None;
    }
    Some((lo as usize, hi as usize))
}

fn fill(grid: &mut Grid, cols: (usize, usize), rows: (usize, usize), style: Style) {
    for row in &mut grid[rows.0..rows.1] {
        for cell in &mut row[cols.0..cols.1] {
            *cell = (' ', style);
        }
    }
}

fn write_text(grid: &mut Grid, col: i32, row: i32, text: &str, style: Style) {
    let Some(line) = usize::try_from(row).ok().and_then(|r| grid.get_mut(r)) else {
        return;
    };
    for (i, ch) in text.chars().enumerate() {
        let x = col + i as i32;
        if let Some(cell) = usize::try_from(x).ok().and_then(|x| line.get_mut(x)) {
            *cell = (ch, cell.1.patch(style));
        }
    }
}

pub fn paint(scene: &Scene, cols: usize, rows: usize) -> Vec<Line<'static>> {
    if cols == 0 || rows == 0 || scene.width <= 0.0 || scene.height <= 0.0 {
        return Vec::new();
    }
    let sx = cols as f32 / scene.width;
    let sy = rows as f32 / scene.height;
    let mut grid: Grid = vec![vec![(' ', Style::default().bg(scene.background)); cols]; rows];

    for shape in &scene.shapes {
        match shape {
            Shape::Rect { x, y, w, h, color } => {
                if let (Some(c), Some(r)) = (cover(*x, *w, sx, cols), cover(*y, *h, sy, rows)) {
                    fill(&mut grid, c, r, Style::default().bg(*color));
                }
            }
            Shape::Circle { cx, cy, r, color } => {
                let mut hit = false;
                let cols_hit = cover(cx - r, r * 2.0, sx, cols);
                let rows_hit = cover(cy - r, r * 2.0, sy, rows);
                if let (Some(cs), Some(rs)) = (cols_hit, rows_hit) {
                    for row in rs.0..rs.1 {
                        for col in cs.0..cs.1 {
                            let px = (col as f32 + 0.5) / sx - cx;
                            let py = (row as f32 + 0.5) / sy - cy;
                            if px * px + py * py <= r * r {
                                grid[row][col] = (' ', Style::default().bg(*color));
                                hit = true;
                            }
                        }
                    }
                }
                // Too small to cover a cell centre: mark the cell it sits in
                if !hit {
                    let col = (cx * sx).floor() as i32;
                    let row = (cy * sy).floor() as i32;
                    write_text(&mut grid, col, row, "●", Style::default().fg(*color));
                }
            }
            Shape::Cell { col, row, color, label, highlight } => {
                let Some(cs) = cover(*col as f32, 1.0, sx, cols) else { continue };
                let Some(rs) = cover(*row as f32, 1.0, sy, rows) else { continue };
                fill(&mut grid, cs, rs, Style::default().bg(*color));
                let mid_row = ((rs.0 + rs.1 - 1) / 2) as i32;
                if let Some(label) = label {
                    let len = label.chars().count();
                    let width = cs.1 - cs.0;
                    let start = cs.0 + width.saturating_sub(len) / 2;
                    write_text(
                        &mut grid,
                        start as i32,
                        mid_row,
                        label,
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    );
                }
                if *highlight {
                    let marker = Style::default()
                        .fg(Color::Rgb(255, 220, 80))
                        .add_modifier(Modifier::BOLD);
                    if cs.1 - cs.0 >= 3 {
                        write_text(&mut grid, cs.0 as i32, mid_row, "▶", marker);
                        write_text(&mut grid, cs.1 as i32 - 1, mid_row, "◀", marker);
                    } else {
                        for c in cs.0..cs.1 {
                            let cell = &mut grid[mid_row as usize][c];
                            cell.1 = cell.1.add_modifier(Modifier::REVERSED);
                        }
                    }
                }
            }
        }
    }

    grid.into_iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .map(|(ch, style)| Span::styled(String::from(ch), style))
                .collect();
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bg_at(lines: &[Line], col: usize, row: usize) -> Option<Color> {
        lines[row].spans[col].style.bg
    }

    #[test]
    fn test_empty_area_paints_nothing() {
        let scene = Scene::new(100.0, 100.0, Color::Black);
        assert!(paint(&scene, 0, 10).is_empty());
        assert!(paint(&scene, 10, 0).is_empty());
        let field = fit_field(Rect::new(3, 4, 0, 0), &scene);
        assert_eq!((field.width, field.height), (0, 0));
    }

    #[test]
    fn test_fit_field_keeps_proportions() {
        let scene = Scene::new(600.0, 400.0, Color::Black);
        let field = fit_field(Rect::new(0, 0, 200, 30), &scene);
        assert_eq!(field.height, 30);
        assert_eq!(field.width, 90);
        assert_eq!(field.x, 55);
    }

    #[test]
    fn test_rect_fills_covered_cells() {
        let mut scene = Scene::new(10.0, 10.0, Color::Black);
        scene.rect(2.0, 3.0, 4.0, 2.0, Color::Red);
        let lines = paint(&scene, 10, 10);
        assert_eq!(bg_at(&lines, 2, 3), Some(Color::Red));
        assert_eq!(bg_at(&lines, 5, 4), Some(Color::Red));
        assert_eq!(bg_at(&lines, 6, 4), Some(Color::Black));
        assert_eq!(bg_at(&lines, 2, 5), Some(Color::Black));
    }

    #[test]
    fn test_shapes_outside_the_field_are_clipped() {
        let mut scene = Scene::new(10.0, 10.0, Color::Black);
        scene.rect(-5.0, -5.0, 7.0, 7.0, Color::Red);
        scene.rect(20.0, 20.0, 3.0, 3.0, Color::Blue);
        let lines = paint(&scene, 10, 10);
        assert_eq!(bg_at(&lines, 1, 1), Some(Color::Red));
        assert_eq!(bg_at(&lines, 2, 2), Some(Color::Black));
        assert_eq!(lines[9].spans.len(), 10);
    }

    #[test]
    fn test_tiny_circle_still_visible() {
        let mut scene = Scene::new(600.0, 400.0, Color::Black);
        scene.circle(300.0, 200.0, 1.0, Color::Yellow);
        let lines = paint(&scene, 60, 20);
        assert_eq!(lines[10].spans[30].content, "●");
    }

    #[test]
    fn test_cell_label_is_centred() {
        let mut scene = Scene::new(4.0, 4.0, Color::Black);
        scene.cell(1, 2, Color::Green, Some("64".into()), false);
        let lines = paint(&scene, 24, 12);
        // Cell (1,2) covers columns 6..12 and rows 6..9
        assert_eq!(bg_at(&lines, 6, 6), Some(Color::Green));
        assert_eq!(lines[7].spans[8].content, "6");
        assert_eq!(lines[7].spans[9].content, "4");
    }
}
