use ratatui::layout::Rect;
use scicalc::calc_engine::{EvalError, EvaluationTrace, Step};
use scicalc::keypad::{Keypad, BUTTON_LABELS};
use std::time::{Duration, Instant};

pub struct HistoryEntry {
    pub input: String,
    pub result: Result<f64, EvalError>,
    pub detailed_steps: Vec<Step>,
    pub detailed_mode: bool,
    pub duration: Duration,
}

pub struct App {
    pub keypad: Keypad,
    pub history: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub detailed_mode: bool,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub terminal_too_small: bool,
    /// Screen areas of the keypad buttons from the last draw, in
    /// `BUTTON_LABELS` order.
    pub button_areas: Vec<Rect>,
    pub hovered: Option<usize>,
    pub pressed: Option<usize>,
}

impl App {
    pub fn new(detailed_mode: bool) -> Self {
        App {
            keypad: Keypad::new(),
            history: Vec::new(),
            cursor_history: 0,
            history_scroll: 0,
            scroll_to_bottom: false,
            detailed_mode,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            terminal_too_small: false,
            button_areas: Vec::new(),
            hovered: None,
            pressed: None,
        }
    }

    /// Index of the button under the terminal cell `(column, row)`.
    pub fn button_at(&self, column: u16, row: u16) -> Option<usize> {
        self.button_areas.iter().position(|area| {
            column >= area.x
                && column < area.x + area.width
                && row >= area.y
                && row < area.y + area.height
        })
    }

    pub fn press_button(&mut self, index: usize) {
        if let Some(label) = BUTTON_LABELS.get(index) {
            self.press(label);
        }
    }

    pub fn press(&mut self, label: &str) {
        if label == "=" {
            self.submit();
        } else {
            self.keypad.press(label);
        }
    }

    pub fn submit(&mut self) {
        let input = self.keypad.display().to_string();
        let mut trace = EvaluationTrace::new(self.detailed_mode);

        let start_time = Instant::now();
        let result = self.keypad.calculate_with_trace(&mut trace);
        let duration = start_time.elapsed();

        self.history.push(HistoryEntry {
            input,
            result,
            detailed_steps: trace.steps,
            detailed_mode: self.detailed_mode,
            duration,
        });
        self.cursor_history = self.history.len().saturating_sub(1);
        self.scroll_to_bottom = true;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if self.history.is_empty() {
            return;
        }
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.history.len() - 1 {
            self.cursor_history += 1;
        }

        let input = self.history[self.cursor_history].input.clone();
        self.keypad.clear();
        self.keypad.append(&input);
        self.scroll_to_bottom = false;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.cursor_history = 0;
        self.history_scroll = 0;
    }

    pub fn toggle_details(&mut self) {
        self.detailed_mode = !self.detailed_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_app() -> App {
        let mut app = App::new(false);
        // 4 columns of 5x3 cells starting at (10, 4)
        for i in 0..BUTTON_LABELS.len() as u16 {
            app.button_areas.push(Rect::new(10 + (i % 4) * 5, 4 + (i / 4) * 3, 5, 3));
        }
        app
    }

    #[test]
    fn hit_testing() {
        let app = grid_app();
        assert_eq!(app.button_at(10, 4), Some(0));
        assert_eq!(app.button_at(14, 6), Some(0));
        assert_eq!(app.button_at(15, 4), Some(1));
        assert_eq!(app.button_at(10, 7), Some(4));
        assert_eq!(app.button_at(9, 4), None);
        assert_eq!(app.button_at(30, 4), None);
    }

    #[test]
    fn clicking_buttons_evaluates() {
        let mut app = grid_app();
        let index = |label: &str| BUTTON_LABELS.iter().position(|l| *l == label).unwrap();
        for label in ["7", "*", "6", "="] {
            app.press_button(index(label));
        }
        assert_eq!(app.keypad.display(), "42");
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].input, "7*6");
        assert_eq!(app.history[0].result, Ok(42.0));
    }

    #[test]
    fn errors_are_kept_in_history() {
        let mut app = App::new(true);
        for label in ["sqrt", "(", "-", "4", ")", "="] {
            app.press(label);
        }
        assert_eq!(app.keypad.display(), "Error");
        assert!(app.history[0].result.is_err());
        assert!(app.history[0].detailed_mode);
    }

    #[test]
    fn history_navigation_recalls_input() {
        let mut app = App::new(false);
        for label in ["1", "+", "1", "=", "AC", "2", "*", "3", "="] {
            app.press(label);
        }
        app.navigate_history(-1);
        assert_eq!(app.keypad.display(), "1+1");
        app.navigate_history(1);
        assert_eq!(app.keypad.display(), "2*3");
        app.navigate_history(1);
        assert_eq!(app.keypad.display(), "2*3");
    }
}
