//! Button-driven calculator state, independent of any particular UI.
//!
//! A front end forwards button labels to [`Keypad::press`] and draws
//! [`Keypad::display`]. Evaluation itself is delegated to the engine.

use crate::calc_engine::{evaluate_with_trace, EvalError, EvaluationTrace};
use crate::format::format_number;
use unicode_segmentation::UnicodeSegmentation;

pub const ERROR_TEXT: &str = "Error";

/// Keypad labels in reading order, four per row.
pub const BUTTON_LABELS: [&str; 24] = [
    "7", "8", "9", "/",
    "4", "5", "6", "*",
    "1", "2", "3", "-",
    "(", "0", ")", "+",
    "sin", "=", "AC", "cos",
    "tan", "log", "ln", "sqrt",
];

pub const COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Digit,
    Operator,
    Function,
    Control,
}

pub fn button_kind(label: &str) -> ButtonKind {
    match label {
        "=" | "AC" => ButtonKind::Control,
        "/" | "*" | "-" | "+" | "^" => ButtonKind::Operator,
        "sin" | "cos" | "tan" | "log" | "ln" | "sqrt" | "exp" => ButtonKind::Function,
        _ => ButtonKind::Digit,
    }
}

#[derive(Debug, Default)]
pub struct Keypad {
    input: String,
    last_error: Option<EvalError>,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the display shows: the expression being typed, the last result,
    /// or `Error`.
    pub fn display(&self) -> &str {
        &self.input
    }

    pub fn last_error(&self) -> Option<&EvalError> {
        self.last_error.as_ref()
    }

    pub fn is_error(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn press(&mut self, label: &str) -> Option<Result<f64, EvalError>> {
        match label {
            "AC" => {
                self.clear();
                None
            }
            "=" => Some(self.calculate()),
            _ => {
                self.append(label);
                None
            }
        }
    }

    pub fn append(&mut self, text: &str) {
        if self.last_error.take().is_some() {
            self.input.clear();
        }
        self.input.push_str(text);
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.last_error = None;
    }

    /// Removes the last grapheme; clears the display after an error.
    pub fn backspace(&mut self) {
        if self.last_error.take().is_some() {
            self.input.clear();
            return;
        }
        if let Some((idx, _)) = self.input.grapheme_indices(true).next_back() {
            self.input.truncate(idx);
        }
    }

    /// Evaluates the current text. The display is replaced with the result,
    /// or with `Error` if evaluation fails.
    pub fn calculate(&mut self) -> Result<f64, EvalError> {
        self.calculate_with_trace(&mut EvaluationTrace::new(false))
    }

    pub fn calculate_with_trace(&mut self, trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
        let result = evaluate_with_trace(&self.input, trace);
        match &result {
            Ok(value) => {
                self.input = format_number(*value);
                self.last_error = None;
            }
            Err(e) => {
                log::debug!("keypad evaluation failed: {}", e);
                self.input = ERROR_TEXT.to_string();
                self.last_error = Some(e.clone());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::ErrorKind;

    fn press_all(keypad: &mut Keypad, labels: &[&str]) {
        for label in labels {
            keypad.press(label);
        }
    }

    #[test]
    fn buttons_accumulate_and_evaluate() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["2", "+", "3", "*", "4"]);
        assert_eq!(keypad.display(), "2+3*4");
        assert_eq!(keypad.press("=").unwrap().unwrap(), 14.0);
        assert_eq!(keypad.display(), "14");
    }

    #[test]
    fn function_buttons_append_their_name() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["sin", "(", "3", "0", ")"]);
        assert_eq!(keypad.display(), "sin(30)");
        keypad.press("=");
        let shown: f64 = keypad.display().parse().unwrap();
        assert!((shown - 0.5).abs() < 1e-12);
    }

    #[test]
    fn result_can_be_extended() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["8", "/", "2", "=", "+", "1", "="]);
        assert_eq!(keypad.display(), "5");
    }

    #[test]
    fn scientific_result_can_be_extended() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["1", "0", "^", "2", "0", "="]);
        assert_eq!(keypad.display(), "1e20");
        press_all(&mut keypad, &["/", "2", "="]);
        assert_eq!(keypad.display(), "5e19");

        keypad.clear();
        press_all(&mut keypad, &["1", "/", "3", "0", "0", "0", "0", "0", "0", "="]);
        assert!(keypad.display().contains("e-7"));
        press_all(&mut keypad, &["*", "3", "="]);
        assert!(!keypad.is_error());
        let shown: f64 = keypad.display().parse().unwrap();
        assert!((shown - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn failure_shows_error() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["1", "/", "0"]);
        let err = keypad.press("=").unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivisionByZero);
        assert_eq!(keypad.display(), ERROR_TEXT);
        assert!(keypad.is_error());
        assert_eq!(keypad.last_error(), Some(&EvalError::DivisionByZero));
    }

    #[test]
    fn typing_after_error_starts_over() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["(", "="]);
        assert_eq!(keypad.display(), ERROR_TEXT);
        press_all(&mut keypad, &["7", "="]);
        assert_eq!(keypad.display(), "7");
        assert!(!keypad.is_error());
    }

    #[test]
    fn empty_input_is_an_error() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.press("=").unwrap().unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(keypad.display(), ERROR_TEXT);
    }

    #[test]
    fn detailed_calculation_keeps_steps() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["(", "1", "+", "2", ")", "*", "3"]);
        let mut trace = EvaluationTrace::new(true);
        assert_eq!(keypad.calculate_with_trace(&mut trace).unwrap(), 9.0);
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(keypad.display(), "9");
    }

    #[test]
    fn all_clear() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["1", "2", "AC"]);
        assert_eq!(keypad.display(), "");
        press_all(&mut keypad, &["1", "/", "0", "=", "AC"]);
        assert_eq!(keypad.display(), "");
        assert!(!keypad.is_error());
    }

    #[test]
    fn backspace() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["1", "2", "+"]);
        keypad.backspace();
        assert_eq!(keypad.display(), "12");
        keypad.backspace();
        keypad.backspace();
        keypad.backspace();
        assert_eq!(keypad.display(), "");

        press_all(&mut keypad, &[")", "="]);
        keypad.backspace();
        assert_eq!(keypad.display(), "");
    }

    #[test]
    fn button_kinds() {
        assert_eq!(button_kind("="), ButtonKind::Control);
        assert_eq!(button_kind("AC"), ButtonKind::Control);
        assert_eq!(button_kind("*"), ButtonKind::Operator);
        assert_eq!(button_kind("sqrt"), ButtonKind::Function);
        assert_eq!(button_kind("7"), ButtonKind::Digit);
        assert_eq!(button_kind("("), ButtonKind::Digit);
        assert_eq!(BUTTON_LABELS.len() % COLUMNS, 0);
    }
}
