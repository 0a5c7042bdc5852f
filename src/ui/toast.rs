use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::toast::{Content, Palette, Segment, ToastSnapshot, TransitionPhase};

/// Dismiss glyph drawn at the right edge
const CLOSE_GLYPH: &str = "✕";
/// Gap between the toast and the edges of the area
const MARGIN: u16 = 1;
/// Columns reserved right of the text for the glyph
const GLYPH_COLUMNS: u16 = 2;

/// Bottom-anchored toast, sliding up as it becomes visible.
pub struct ToastWidget<'a> {
    snapshot: &'a ToastSnapshot,
    palette: &'a Palette,
}

impl<'a> ToastWidget<'a> {
    pub fn new(snapshot: &'a ToastSnapshot, palette: &'a Palette) -> Self {
        Self { snapshot, palette }
    }

    /// Rect the toast covers inside `area` (for click hit-testing), or
    /// `None` while hidden.
    pub fn area(&self, area: Rect) -> Option<Rect> {
        self.layout(area).map(|(rect, _)| rect)
    }

    fn layout(&self, area: Rect) -> Option<(Rect, Vec<Line<'static>>)> {
        if !self.snapshot.surface_open || self.snapshot.phase == TransitionPhase::Hidden {
            return None;
        }

        let width = area.width.saturating_sub(MARGIN * 2);
        if width < GLYPH_COLUMNS + 3 || area.height < MARGIN + 3 {
            return None;
        }
        let text_width = (width - 2 - GLYPH_COLUMNS) as usize;
        let max_lines = (area.height - MARGIN - 2) as usize;

        let content = Content::new(self.snapshot.content.as_str());
        let lines = wrap_segments(&content.lines(), text_width, max_lines, self.link_style());
        let height = lines.len() as u16 + 2;

        // Resting position, then pushed down by the hidden fraction.
        let rest_y = area.bottom().saturating_sub(MARGIN + height).max(area.y);
        let hidden = 1.0 - self.snapshot.visibility.clamp(0.0, 1.0);
        let offset = (hidden * f32::from(height + MARGIN)).round() as u16;
        let y = rest_y.saturating_add(offset);
        if y >= area.bottom() {
            return None;
        }

        let rect = Rect {
            x: area.x + MARGIN,
            y,
            width,
            height: height.min(area.bottom() - y),
        };
        Some((rect, lines))
    }

    fn background(&self) -> Color {
        fade(
            self.palette.background(self.snapshot.color.as_ref()),
            self.snapshot.visibility,
        )
    }

    fn link_style(&self) -> Style {
        Style::default()
            .fg(self.background())
            .bg(Color::White)
            .add_modifier(Modifier::UNDERLINED)
    }
}

impl Widget for ToastWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((rect, lines)) = self.layout(area) else {
            return;
        };

        let style = Style::default()
            .bg(self.background())
            .fg(fade(Color::White, self.snapshot.visibility))
            .add_modifier(Modifier::BOLD);
        let block = Block::default()
            .style(style)
            .padding(Padding::new(1, 1 + GLYPH_COLUMNS, 1, 1));

        Clear.render(rect, buf);
        Paragraph::new(lines)
            .block(block)
            .style(style)
            .render(rect, buf);

        // Glyph on the first text row, if that row is on screen.
        if rect.height > 1 {
            let x = rect.right().saturating_sub(1 + GLYPH_COLUMNS / 2);
            buf.set_string(x, rect.y + 1, CLOSE_GLYPH, style);
        }
    }
}

/// Wrap segment lines to `width` display columns, keeping each segment's
/// style. Stops after `max_lines`.
pub fn wrap_segments(
    lines: &[Vec<Segment>],
    width: usize,
    max_lines: usize,
    link_style: Style,
) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut out: Vec<Line<'static>> = Vec::new();

    'lines: for segments in lines {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut used = 0;

        for segment in segments {
            let style = match segment {
                Segment::Text(_) => Style::default(),
                Segment::Link { .. } => link_style,
            };
            let mut run = String::new();
            for ch in segment.text().chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used + ch_width > width && used > 0 {
                    if !run.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut run), style));
                    }
                    out.push(Line::from(std::mem::take(&mut spans)));
                    if out.len() >= max_lines {
                        break 'lines;
                    }
                    used = 0;
                }
                run.push(ch);
                used += ch_width;
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, style));
            }
        }

        out.push(Line::from(spans));
        if out.len() >= max_lines {
            break;
        }
    }

    if out.is_empty() {
        out.push(Line::from(""));
    }
    out
}

/// Darken toward black as the toast fades in or out.
fn fade(color: Color, visibility: f32) -> Color {
    let v = visibility.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (f32::from(c) * v).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        _ if v < 0.5 => Color::DarkGray,
        other => other,
    }
}
