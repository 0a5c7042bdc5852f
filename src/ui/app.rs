use anyhow::Result;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use super::activity::ActivityLog;
use super::event::{category_for_key, is_close_key, is_quit_key, Event, EventHandler};
use super::render::{render_activity, render_footer, render_state};
use super::toast::ToastWidget;
use crate::toast::{Category, OpenOptions, Palette, ToastController, TransitionPhase};

/// Interactive demo of a single toast
pub struct App {
    toast: ToastController,
    palette: Palette,
    tick_rate: Duration,
    activity: ActivityLog,
    /// Dirty flag (needs redraw)
    dirty: bool,
    /// Toast Rect from the last draw (for click hit-testing)
    toast_area: Option<Rect>,
}

impl App {
    pub fn new(toast: ToastController, palette: Palette, tick_rate: Duration) -> Self {
        Self {
            toast,
            palette,
            tick_rate,
            activity: ActivityLog::new(),
            dirty: true,
            toast_area: None,
        }
    }

    /// Open with preset content for a category
    pub fn open_category(&mut self, category: Category) {
        let text = match category {
            Category::Success => "Document saved.",
            Category::Error => "Could not reach the server.\nChanges are kept locally.",
            Category::Warning => "Disk space is running low.",
            Category::Info => "A new version is available.",
        };
        self.open(OpenOptions::new(text).with_category(category));
    }

    pub fn open(&mut self, options: OpenOptions) {
        let handle = self.toast.open(&options);
        self.activity.push(format!(
            "open({}) auto-dismiss in {}ms",
            options.category.unwrap_or_default().as_str(),
            handle
                .deadline
                .saturating_duration_since(Instant::now())
                .as_millis()
        ));
        self.dirty = true;
    }

    pub fn close(&mut self) {
        self.toast.close();
        self.activity.push("close()");
        self.dirty = true;
    }

    /// Handle a key press. Returns false when the app should quit.
    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if is_quit_key(key) {
            return false;
        }
        if let Some(category) = category_for_key(key) {
            self.open_category(category);
        } else if is_close_key(key) {
            self.close();
        } else {
            match key.code {
                KeyCode::Char('c') => self.open(
                    // Explicit color takes precedence over the category
                    OpenOptions::new("Custom color override.")
                        .with_background_color("#8e24aa")
                        .with_category(Category::Error),
                ),
                KeyCode::Char('l') => self.open(
                    OpenOptions::new("This one stays for fifteen seconds. Click it to dismiss.")
                        .with_duration(15_000),
                ),
                KeyCode::Char('m') => self.open(
                    OpenOptions::new(r#"Export finished. <a href="file:///tmp/export.csv">Open file</a>"#)
                        .with_category(Category::Success),
                ),
                _ => {}
            }
        }
        true
    }

    /// Clicking anywhere on the toast dismisses it
    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if self.hit_toast(mouse.column, mouse.row) {
                self.close();
            }
        }
    }

    fn hit_toast(&self, column: u16, row: u16) -> bool {
        self.toast_area.is_some_and(|area| {
            column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
        })
    }

    /// Run TUI
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let event_handler = EventHandler::new(self.tick_rate);
        self.activity.observe(&self.toast.snapshot());

        // Main loop
        let result = loop {
            // Only draw when dirty flag is set
            if self.dirty {
                terminal.draw(|f| self.render(f))?;
                self.dirty = false;
            }

            match event_handler.next()? {
                Event::Key(key) => {
                    if !self.handle_key(&key) {
                        break Ok(());
                    }
                }
                Event::Mouse(mouse) => self.handle_mouse(&mouse),
                Event::Resize(_, _) => {
                    self.dirty = true;
                }
                Event::Tick => {
                    for purpose in self.toast.tick(Instant::now()) {
                        self.activity.push(format!("timer fired: {:?}", purpose));
                        self.dirty = true;
                    }
                    // Redraw while animating and while timers count down
                    let snapshot = self.toast.snapshot();
                    if snapshot.phase != TransitionPhase::Hidden {
                        self.dirty = true;
                    }
                }
            }

            if self.activity.observe(&self.toast.snapshot()) {
                self.dirty = true;
            }
        };

        // Cleanup terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    /// Render
    fn render(&mut self, f: &mut ratatui::Frame) {
        self.render_at(f, Instant::now());
    }

    fn render_at(&mut self, f: &mut ratatui::Frame, now: Instant) {
        let size = f.area();
        let snapshot = self.toast.snapshot_at(now);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        // 2-column layout (left: state 45%, right: activity 55%)
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[0]);

        render_state(f, chunks[0], &snapshot, &self.palette);
        render_activity(f, chunks[1], &self.activity);
        render_footer(f, rows[1]);

        // Toast overlays the panels, anchored above the footer
        let widget = ToastWidget::new(&snapshot, &self.palette);
        self.toast_area = widget.area(rows[0]);
        f.render_widget(widget, rows[0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::DisplayState;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(
            ToastController::new(),
            Palette::default(),
            Duration::from_millis(33),
        )
    }

    fn press(app: &mut App, c: char) -> bool {
        app.handle_key(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_category_key_opens_toast() {
        let mut app = app();
        assert!(press(&mut app, 's'));
        assert!(app.toast.is_visible());
        assert_eq!(app.toast.content().as_str(), "Document saved.");
    }

    #[test]
    fn test_close_key_closes_toast() {
        let mut app = app();
        press(&mut app, 'e');
        press(&mut app, 'x');
        assert_eq!(app.toast.state(), DisplayState::Closed);
        assert!(app.toast.is_open());
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        assert!(!press(&mut app, 'q'));
    }

    #[test]
    fn test_render_records_toast_area_and_click_hits_it() {
        let mut app = app();
        app.open(OpenOptions::new("Hello"));
        // Let the entrance finish so the toast sits at its resting place
        let later = Instant::now() + Duration::from_millis(400);
        app.toast.tick(later);

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| app.render_at(f, later)).unwrap();

        let area = app.toast_area.expect("toast drawn");
        assert!(app.hit_toast(area.x, area.y));
        assert!(!app.hit_toast(0, 0));
    }

    fn click(column: u16, row: u16, kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_click_on_toast_closes_it() {
        let mut app = app();
        app.open(OpenOptions::new("Hello"));
        let later = Instant::now() + Duration::from_millis(400);
        app.toast.tick(later);

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| app.render_at(f, later)).unwrap();
        let area = app.toast_area.expect("toast drawn");

        // Right button and clicks outside are ignored
        app.handle_mouse(&click(area.x, area.y, MouseEventKind::Down(MouseButton::Right)));
        app.handle_mouse(&click(0, 0, MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(app.toast.state(), DisplayState::Open);

        app.handle_mouse(&click(area.x + 1, area.y, MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(app.toast.state(), DisplayState::Closed);
        assert!(app.toast.is_open());
    }

    #[test]
    fn test_click_outside_when_hidden_does_nothing() {
        let app = app();
        assert!(!app.hit_toast(10, 10));
    }
}
