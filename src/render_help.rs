use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use scicalc::calc_engine::MAX_DEPTH;

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, scroll: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" SciCalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(Span::styled(
            "SciCalc - Scientific Calculator",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Basic Operations:"),
        Line::from("  + : Addition        (e.g., 5 + 3 = 8)"),
        Line::from("  - : Subtraction     (e.g., 10 - 4 = 6)"),
        Line::from("  * : Multiplication  (e.g., 6 * 7 = 42)"),
        Line::from("  / : Division        (e.g., 15 / 3 = 5)"),
        Line::from("  ^ : Exponentiation  (e.g., 2 ^ 3 = 8, right-associative)"),
        Line::from("  - : Negation        (e.g., -2 ^ 2 = 4, 2 ^ -1 = 0.5)"),
        Line::from("  Numbers may carry an exponent: 1e20, 2.5e-3"),
        Line::from(format!("  Parentheses and calls nest up to {} levels deep", MAX_DEPTH)),
        Line::from(""),
        heading("Functions:"),
        Line::from("  sin(x)    : Sine (x in degrees)"),
        Line::from("  cos(x)    : Cosine (x in degrees)"),
        Line::from("  tan(x)    : Tangent (x in degrees)"),
        Line::from("  ln(x)     : Natural logarithm (x > 0)"),
        Line::from("  log(x)    : Base-10 logarithm (x > 0)"),
        Line::from("  sqrt(x)   : Square root (x >= 0)"),
        Line::from("  exp(x)    : Exponential function"),
        Line::from("  pow(x, y) : x raised to y"),
        Line::from(""),
        heading("Keypad:"),
        Line::from("  Click a button or type on the keyboard"),
        Line::from("  Function buttons insert their name; type ( ) around the argument"),
        Line::from("  = / Enter : Calculate"),
        Line::from("  AC / Esc  : Clear the display"),
        Line::from("  Backspace : Delete the last character"),
        Line::from("  A failed calculation shows Error; the next key starts over"),
        Line::from(""),
        heading("Advanced Features:"),
        Line::from("  F2 : Toggle step-by-step evaluation with time"),
        Line::from("  Ctrl+L : Clear calculation history"),
        Line::from("  F1 : Show this help screen"),
        Line::from("  Ctrl+Q : Exit the calculator"),
        Line::from(""),
        heading("Navigation:"),
        Line::from("  ↑ ↓ : Recall previous expressions"),
        Line::from("  Mouse wheel : Scroll through history"),
        Line::from(""),
        heading("Examples:"),
        Line::from("  sin(30)            = 0.5"),
        Line::from("  cos(sin(0))        = 1"),
        Line::from("  log(1000) + ln(1)  = 3"),
        Line::from("  sqrt(2 ^ 2 + 5)    = 3"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
