use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use super::activity::ActivityLog;
use crate::toast::{
    Content, DisplayState, Palette, ToastColor, ToastSnapshot, TransitionPhase,
};

/// Get display color and text for a DisplayState.
pub fn state_display(state: DisplayState) -> (Color, &'static str) {
    match state {
        DisplayState::Open => (Color::Green, "OPEN"),
        DisplayState::Closed => (Color::DarkGray, "CLOSED"),
    }
}

fn phase_display(phase: TransitionPhase) -> &'static str {
    match phase {
        TransitionPhase::Hidden => "hidden",
        TransitionPhase::Entering => "entering",
        TransitionPhase::Shown => "shown",
        TransitionPhase::Leaving => "leaving",
    }
}

fn color_display(color: Option<&ToastColor>) -> String {
    match color {
        None => "primary".to_string(),
        Some(ToastColor::Token(token)) => format!("{:?}", token).to_lowercase(),
        Some(ToastColor::Explicit(value)) => format!("{} (override)", value),
    }
}

fn timer_display(remaining_ms: Option<u64>) -> Span<'static> {
    match remaining_ms {
        Some(ms) => Span::styled(format!("{}ms", ms), Style::default().fg(Color::Yellow)),
        None => Span::styled("-", Style::default().fg(Color::DarkGray)),
    }
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().add_modifier(Modifier::BOLD))
}

/// Render the toast state panel.
pub fn render_state(f: &mut ratatui::Frame, area: Rect, snapshot: &ToastSnapshot, palette: &Palette) {
    let (state_color, state_text) = state_display(snapshot.state);
    let swatch = palette.background(snapshot.color.as_ref());

    let mut lines = vec![
        Line::from(vec![
            label("State: "),
            Span::styled(state_text, Style::default().fg(state_color)),
        ]),
        Line::from(vec![
            label("is_open(): "),
            Span::raw(snapshot.surface_open.to_string()),
        ]),
        Line::from(vec![
            label("Transition: "),
            Span::raw(format!(
                "{} ({:>3.0}%)",
                phase_display(snapshot.phase),
                snapshot.visibility * 100.0
            )),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Color: "),
            Span::styled("  ", Style::default().bg(swatch)),
            Span::raw(format!(" {}", color_display(snapshot.color.as_ref()))),
        ]),
        Line::from(vec![
            label("Duration: "),
            Span::raw(format!("{}ms", snapshot.duration_ms)),
        ]),
        Line::from(""),
        Line::from(vec![label("Auto-dismiss in: "), timer_display(snapshot.auto_dismiss_in_ms)]),
        Line::from(vec![label("Finalize in: "), timer_display(snapshot.finalize_in_ms)]),
        Line::from(""),
        Line::from(vec![label("Content:")]),
    ];

    if snapshot.content.is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        let plain = Content::new(snapshot.content.as_str()).plain_text();
        for line in plain.lines() {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(Color::Cyan),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Toast "))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Render the activity panel.
pub fn render_activity(f: &mut ratatui::Frame, area: Rect, activity: &ActivityLog) {
    let items: Vec<ListItem> = activity
        .entries()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", entry.at.format("%H:%M:%S%.3f")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(entry.message.clone()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Activity ({}) ", activity.len())),
    );

    f.render_widget(list, area);
}

/// Render the footer with keybindings help.
pub fn render_footer(f: &mut ratatui::Frame, area: Rect) {
    let help_text = Line::from(vec![
        Span::styled("[s/e/w/i]", Style::default().fg(Color::Cyan)),
        Span::raw("Open "),
        Span::styled("[c]", Style::default().fg(Color::Cyan)),
        Span::raw("Color "),
        Span::styled("[l]", Style::default().fg(Color::Cyan)),
        Span::raw("Long "),
        Span::styled("[m]", Style::default().fg(Color::Cyan)),
        Span::raw("Link "),
        Span::styled("[x/click]", Style::default().fg(Color::Cyan)),
        Span::raw("Close "),
        Span::styled("[q]", Style::default().fg(Color::Cyan)),
        Span::raw("Quit"),
    ]);

    let paragraph = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));

    f.render_widget(paragraph, area);
}
