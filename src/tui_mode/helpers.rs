use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use scicalc::calc_engine::Function;
use scicalc::keypad::ButtonKind;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec!["".to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            let mut remaining = word;
            while !remaining.is_empty() {
                let mut chunk_width = 0;
                let mut chunk_byte_len = 0;

                for c in remaining.chars() {
                    let char_width = UnicodeWidthChar::width(c).unwrap_or(1);
                    if chunk_width + char_width > width && chunk_byte_len > 0 {
                        break;
                    }
                    chunk_width += char_width;
                    chunk_byte_len += c.len_utf8();
                }

                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }

                lines.push(remaining[..chunk_byte_len].to_string());
                remaining = &remaining[chunk_byte_len..];
            }
            continue;
        }

        if current_width + word_width + 1 > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        if !current_line.is_empty() {
            current_line.push(' ');
            current_width += 1;
        }

        current_line.push_str(word);
        current_width += word_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

pub fn is_math_function(word: &str) -> bool {
    // `log` is the keypad spelling of log10
    word == "log" || Function::lookup(word).is_some()
}

/// Colours of a keypad button as (normal, hovered, pressed).
pub fn button_colors(kind: ButtonKind) -> (Color, Color, Color) {
    match kind {
        ButtonKind::Control => (
            Color::Rgb(240, 154, 55),
            Color::Rgb(243, 201, 149),
            Color::Rgb(240, 180, 120),
        ),
        ButtonKind::Operator | ButtonKind::Function => (
            Color::Rgb(165, 165, 165),
            Color::Rgb(217, 217, 217),
            Color::Rgb(190, 190, 190),
        ),
        ButtonKind::Digit => (
            Color::Rgb(51, 51, 51),
            Color::Rgb(115, 115, 115),
            Color::Rgb(80, 80, 80),
        ),
    }
}

pub fn highlight_functions(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let function_style = Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD);

    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let number_style = Style::default().fg(Color::LightGreen);

    let word_style = |word: &str| {
        if is_math_function(word) {
            function_style
        } else {
            base_style
        }
    };

    let mut spans = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_number = false;

    for c in expr.chars() {
        if c.is_ascii_alphabetic() || c == '_' || (in_word && c.is_ascii_digit()) {
            if in_number {
                spans.push(Span::styled(std::mem::take(&mut current), number_style));
                in_number = false;
            }
            current.push(c);
            in_word = true;
        } else if c.is_ascii_digit() || c == '.' {
            current.push(c);
            in_number = true;
        } else {
            if in_word {
                spans.push(Span::styled(current.clone(), word_style(&current)));
                current.clear();
                in_word = false;
            } else if in_number {
                spans.push(Span::styled(std::mem::take(&mut current), number_style));
                in_number = false;
            }

            match c {
                '+' | '-' | '*' | '/' | '^' => {
                    spans.push(Span::styled(c.to_string(), operator_style));
                }
                ' ' => spans.push(Span::raw(" ")),
                _ => spans.push(Span::styled(c.to_string(), base_style)),
            }
        }
    }

    if in_word {
        let style = word_style(&current);
        spans.push(Span::styled(current, style));
    } else if in_number {
        spans.push(Span::styled(current, number_style));
    }

    spans
}
