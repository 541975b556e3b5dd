use anyhow::{Context, Result};
use scicalc::format::{format_number, format_with_spaces};
use scicalc::{evaluate_with_trace, EvaluationTrace};
use std::io::{stdin, stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "Expression: ";

// Функция для преобразования позиции символа в байтовую позицию
fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

fn remove_char_at(s: &mut String, char_index: usize) {
    let byte_idx = char_index_to_byte_index(s, char_index);
    if let Some(c) = s[byte_idx..].chars().next() {
        s.drain(byte_idx..byte_idx + c.len_utf8());
    }
}

pub fn run_line(details_by_default: bool) -> Result<()> {
    println!("Scientific Calculator");
    println!("Supports: +, -, *, /, ^, parentheses, sin, cos, tan (degrees), log, ln, sqrt, exp, pow");
    println!("Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for history");
    println!("Special commands: 'quit' to exit, 'clear' to reset history");
    println!("\rAdd 'details' before expression for step-by-step evaluation\n");

    let mut stdout = stdout()
        .into_raw_mode()
        .context("failed to switch the terminal to raw mode")?;
    let mut history: Vec<String> = Vec::new();
    let mut history_index = 0;

    loop {
        write!(stdout, "{}{}", ClearLine, PROMPT)?;
        stdout.flush()?;

        let mut expression = String::new();
        let mut cursor_pos = 0; // позиция курсора в символах
        let (_, initial_y) = stdout.cursor_pos()?;

        let stdin = stdin();
        let mut keys = stdin.keys();

        loop {
            write!(stdout, "{}{}{}{}", Goto(1, initial_y), ClearLine, PROMPT, expression)?;

            let before_cursor: String = expression.chars().take(cursor_pos).collect();
            let column = 1 + PROMPT.len() + before_cursor.width();
            write!(stdout, "{}", Goto(column as u16, initial_y))?;
            stdout.flush()?;

            let Some(key) = keys.next() else {
                return Ok(());
            };

            match key? {
                Key::Char('\n') => break,
                Key::Ctrl('c') | Key::Ctrl('d') => {
                    write!(stdout, "\r\n")?;
                    return Ok(());
                }
                Key::Char(c) => {
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    expression.insert(byte_idx, c);
                    cursor_pos += 1;
                }
                Key::Backspace if cursor_pos > 0 => {
                    cursor_pos -= 1;
                    remove_char_at(&mut expression, cursor_pos);
                }
                Key::Delete if cursor_pos < expression.chars().count() => {
                    remove_char_at(&mut expression, cursor_pos);
                }
                Key::Left if cursor_pos > 0 => cursor_pos -= 1,
                Key::Right if cursor_pos < expression.chars().count() => cursor_pos += 1,
                Key::Home => cursor_pos = 0,
                Key::End => cursor_pos = expression.chars().count(),
                Key::Up => {
                    if history_index > 0 {
                        history_index -= 1;
                        expression = history[history_index].clone();
                        cursor_pos = expression.chars().count();
                    }
                }
                Key::Down => {
                    if history_index < history.len().saturating_sub(1) {
                        history_index += 1;
                        expression = history[history_index].clone();
                    } else {
                        history_index = history.len();
                        expression.clear();
                    }
                    cursor_pos = expression.chars().count();
                }
                _ => {}
            }
        }

        let input = expression.trim();
        if input.is_empty() {
            write!(stdout, "\r\n")?;
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                write!(stdout, "\r\nGoodbye!\r\n")?;
                return Ok(());
            }
            "clear" | "reset" => {
                history.clear();
                history_index = 0;
                write!(stdout, "\r\nHistory cleared\r\n\n")?;
                continue;
            }
            _ => {}
        }

        let (detailed_mode, processed_input) = split_details(input, details_by_default);

        history.push(input.to_string());
        history_index = history.len();

        if processed_input.is_empty() {
            write!(stdout, "\r\nPlease enter a valid expression after 'details'\r\n\n")?;
            continue;
        }

        let formatted_expr = format_with_spaces(processed_input);
        let mut trace = EvaluationTrace::new(detailed_mode);

        match evaluate_with_trace(processed_input, &mut trace) {
            Ok(result) => {
                write!(stdout, "\r\n  {} = {}\r\n", formatted_expr, format_number(result))?;

                if !trace.steps.is_empty() {
                    write!(stdout, "\r\n  Step-by-step evaluation:\r\n")?;
                    for (i, step) in trace.steps.iter().enumerate() {
                        write!(
                            stdout,
                            "\r  Step {}: {} = {}\r\n",
                            i + 1,
                            format_with_spaces(&step.operation),
                            format_number(step.result)
                        )?;
                    }
                }
                write!(stdout, "\r\n")?;
            }
            Err(e) => {
                write!(stdout, "\r\n  {} = Error: {}\r\n\n", formatted_expr, e)?;
            }
        }
    }
}

/// Strips a leading `details ` or trailing ` details` marker.
fn split_details(input: &str, default: bool) -> (bool, &str) {
    const MARKER: &str = "details";
    let n = MARKER.len();

    if input.eq_ignore_ascii_case(MARKER) {
        return (true, "");
    }
    if let Some(prefix) = input.get(..n + 1) {
        if prefix.trim_end().eq_ignore_ascii_case(MARKER) && prefix.ends_with(' ') {
            return (true, input[n + 1..].trim());
        }
    }
    if let Some(split) = input.len().checked_sub(n + 1) {
        if let Some(suffix) = input.get(split..) {
            if suffix.trim_start().eq_ignore_ascii_case(MARKER) && suffix.starts_with(' ') {
                return (true, input[..split].trim());
            }
        }
    }
    (default, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_marker() {
        assert_eq!(split_details("details 1+2", false), (true, "1+2"));
        assert_eq!(split_details("1+2 details", false), (true, "1+2"));
        assert_eq!(split_details("details", false), (true, ""));
        assert_eq!(split_details("1+2", false), (false, "1+2"));
        assert_eq!(split_details("1+2", true), (true, "1+2"));
    }

    #[test]
    fn char_editing() {
        let mut s = "sin(30)".to_string();
        remove_char_at(&mut s, 3);
        assert_eq!(s, "sin30)");
        assert_eq!(char_index_to_byte_index("2×3", 2), 3);
        assert_eq!(char_index_to_byte_index("ab", 5), 2);
    }
}
