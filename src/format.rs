/// Renders a result for display.
///
/// Uses the shortest decimal that reads back to the same `f64`, switching to
/// scientific notation for very large or very small magnitudes so the
/// display never fills up with zeros.
pub fn format_number(x: f64) -> String {
    if x == 0.0 {
        // also folds -0 into 0
        return "0".to_string();
    }
    let magnitude = x.abs();
    if magnitude >= 1e16 || magnitude < 1e-6 {
        format!("{:e}", x)
    } else {
        format!("{}", x)
    }
}

/// Spaces out operators for history listings: `2+3*sin(4)` → `2 + 3 * sin(4)`.
pub fn format_with_spaces(expr: &str) -> String {
    let mut result = String::new();
    let mut prev: Option<char> = None;

    for c in expr.chars() {
        match c {
            '+' | '-' | '*' | '/' | '^' => {
                let unary = matches!(prev, None | Some('(') | Some(',') | Some('+') | Some('-') | Some('*') | Some('/') | Some('^'));
                if unary {
                    if prev.is_some() && prev != Some('(') {
                        result.push(' ');
                    }
                    result.push(c);
                } else {
                    result.push(' ');
                    result.push(c);
                    result.push(' ');
                }
            }
            ',' => result.push_str(", "),
            _ if c.is_whitespace() => continue,
            _ => result.push(c),
        }
        prev = Some(c);
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_round_trip() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-2.25), "-2.25");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn zero_has_no_sign() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn extreme_magnitudes_use_exponents() {
        assert_eq!(format_number(1e20), "1e20");
        assert_eq!(format_number(-2.5e-7), "-2.5e-7");
        assert_eq!(format_number(123456789.0), "123456789");
    }

    #[test]
    fn spaces_binary_operators_only() {
        assert_eq!(format_with_spaces("2+3*sin(4)"), "2 + 3 * sin(4)");
        assert_eq!(format_with_spaces("-2^-1"), "-2 ^ -1");
        assert_eq!(format_with_spaces("pow(2,3)"), "pow(2, 3)");
        assert_eq!(format_with_spaces("(-1)  -  2"), "(-1) - 2");
    }
}
