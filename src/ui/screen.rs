use ratatui::Frame;

use crate::console::{Console, Mode};
use crate::ui::help::render_help;

/// A UI Screen boundary: responsible for rendering one console mode
pub trait Screen {
    fn render(&self, console: &Console, f: &mut Frame);
}

/// Lesson screen, also used while the roster has focus
pub struct LessonScreen;

impl Screen for LessonScreen {
    fn render(&self, console: &Console, f: &mut Frame) {
        f.render_widget(console, f.area());
    }
}

/// Key reference drawn over the lesson screen
pub struct HelpScreen;

impl Screen for HelpScreen {
    fn render(&self, console: &Console, f: &mut Frame) {
        f.render_widget(console, f.area());
        render_help(f);
    }
}

pub fn current_screen(mode: &Mode) -> Box<dyn Screen> {
    match mode {
        Mode::Lesson | Mode::Roster { .. } => Box::new(LessonScreen),
        Mode::Help => Box::new(HelpScreen),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::ui::buffer_rows;
    use crate::ui::test_support::{console, squash};

    fn draw(console: &Console) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|f| current_screen(console.mode()).render(console, f))
            .unwrap();
        squash(&buffer_rows(terminal.backend().buffer()))
    }

    #[test]
    fn help_overlay_follows_mode() {
        let (mut c, t0) = console();
        assert!(!draw(&c).contains("キー操作"));

        c.handle_key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE), t0);
        let text = draw(&c);

        assert!(text.contains("キー操作"));
        assert!(text.contains("速読インストラクター専用アプリ"));
    }
}
