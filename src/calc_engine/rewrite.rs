//! Degree-mode preprocessing.
//!
//! Trigonometric calls take their argument in degrees, so `sin(x)` becomes
//! `sin(deg_to_rad(x))`. The `log` spelling is normalized to `log10`. The
//! text is segmented the same way the tokenizer segments it (numbers,
//! identifiers, single characters), so a rule only ever fires on a whole
//! identifier: `asin(` never matches `sin(` and `ln(` never matches `log(`.

use super::registry::Function;

const DEG_TO_RAD: &str = "deg_to_rad";
// deeper trig nesting is copied verbatim; the parser rejects it anyway
const MAX_NESTING: usize = 100;

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte length of the run at the start of `s` whose chars satisfy `pred`.
fn run_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Byte offset of the `)` that closes the `(` at `open`.
fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in s.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Whether `arg` is exactly one `deg_to_rad(...)` call.
fn is_converted(arg: &str) -> bool {
    let arg = arg.trim();
    let Some(rest) = arg.strip_prefix(DEG_TO_RAD) else {
        return false;
    };
    if rest.starts_with(is_ident_char) {
        return false;
    }
    let open = arg.len() - rest.trim_start().len();
    arg[open..].starts_with('(') && matching_paren(arg, open) == Some(arg.len() - 1)
}

/// Byte length of the number at the start of `s`, including an
/// `e[+-]digits` exponent when one follows.
fn number_len(s: &str) -> usize {
    let mantissa = run_len(s, |c| c.is_ascii_digit() || c == '.');
    let rest = &s[mantissa..];
    let Some(after_e) = rest.strip_prefix(['e', 'E']) else {
        return mantissa;
    };
    let unsigned = after_e.strip_prefix(['+', '-']).unwrap_or(after_e);
    match run_len(unsigned, |c| c.is_ascii_digit()) {
        0 => mantissa,
        digits => s.len() - unsigned.len() + digits,
    }
}

/// Whether `arg` is a single, non-empty argument. Calls with no argument or
/// several are left unwrapped so the parser reports them against the
/// function the user wrote.
fn is_single_argument(arg: &str) -> bool {
    if arg.trim().is_empty() {
        return false;
    }
    let mut depth = 0usize;
    for b in arg.bytes() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return false,
            _ => {}
        }
    }
    true
}

/// Rewritten text together with where each of its characters came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub text: String,
    // char offset in the input for every char of `text`
    origins: Vec<usize>,
    input_len: usize,
}

impl Rewritten {
    fn empty(input_len: usize) -> Self {
        Rewritten {
            text: String::new(),
            origins: Vec::new(),
            input_len,
        }
    }

    /// Maps a char offset in [`text`](Self::text) back to the input.
    /// Inserted characters map to the argument or parenthesis they belong
    /// to; offsets at or past the end map to the end of the input.
    pub fn origin(&self, position: usize) -> usize {
        self.origins.get(position).copied().unwrap_or(self.input_len)
    }

    fn copy(&mut self, s: &str, from: usize) {
        self.text.push_str(s);
        self.origins.extend(from..from + s.chars().count());
    }

    fn insert(&mut self, s: &str, at: usize) {
        self.text.push_str(s);
        self.origins.extend(std::iter::repeat(at).take(s.chars().count()));
    }

    fn append(&mut self, other: Rewritten) {
        self.text.push_str(&other.text);
        self.origins.extend(other.origins);
    }
}

/// Rewrites `input` for evaluation. Applying it twice gives the same text as
/// applying it once.
///
/// A trigonometric call without a closing parenthesis leaves the rest of the
/// text untouched; the parser reports it.
pub fn rewrite(input: &str) -> String {
    rewrite_mapped(input).text
}

/// Same as [`rewrite`], keeping the mapping back to `input` for diagnostics.
pub fn rewrite_mapped(input: &str) -> Rewritten {
    let mut out = Rewritten::empty(input.chars().count());
    rewrite_into(&mut out, input, 0, 0);
    out
}

/// Rewrites `input`, whose first char sits at char offset `base` of the
/// whole expression, appending to `out`.
fn rewrite_into(out: &mut Rewritten, input: &str, base: usize, depth: usize) {
    let mut i = 0;
    let mut at = base;

    while i < input.len() {
        let rest = &input[i..];
        let Some(c) = rest.chars().next() else { break };

        if c.is_ascii_digit() || c == '.' {
            let len = number_len(rest);
            out.copy(&rest[..len], at);
            i += len;
            at += len;
            continue;
        }

        if !is_ident_start(c) {
            out.copy(&rest[..c.len_utf8()], at);
            i += c.len_utf8();
            at += 1;
            continue;
        }

        let name_len = run_len(rest, is_ident_char);
        let name = &rest[..name_len];
        let gap = run_len(&rest[name_len..], char::is_whitespace);
        let open = i + name_len + gap;
        let open_at = at + name_len + rest[name_len..name_len + gap].chars().count();

        if !input[open..].starts_with('(') {
            out.copy(name, at);
            i += name_len;
            at += name_len;
            continue;
        }

        if name == "log" {
            out.copy(name, at);
            out.insert("10", at + name_len - 1);
            out.copy("(", open_at);
        } else if Function::lookup(name).is_some_and(Function::is_trigonometric) {
            let close = match matching_paren(input, open) {
                Some(close) if depth < MAX_NESTING => close,
                _ => {
                    out.copy(rest, at);
                    break;
                }
            };
            let body = &input[open + 1..close];
            let body_at = open_at + 1;
            let close_at = body_at + body.chars().count();

            let mut arg = Rewritten::empty(out.input_len);
            rewrite_into(&mut arg, body, body_at, depth + 1);

            out.copy(name, at);
            out.copy("(", open_at);
            if is_converted(&arg.text) || !is_single_argument(&arg.text) {
                out.append(arg);
            } else {
                out.insert(DEG_TO_RAD, body_at);
                out.insert("(", body_at);
                out.append(arg);
                out.insert(")", close_at);
            }
            out.copy(")", close_at);
            i = close + 1;
            at = close_at + 1;
            continue;
        } else {
            out.copy(name, at);
            out.copy("(", open_at);
        }
        i = open + 1;
        at = open_at + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_trig_arguments() {
        assert_eq!(rewrite("sin(30)"), "sin(deg_to_rad(30))");
        assert_eq!(rewrite("2*cos(60)+tan(45)"), "2*cos(deg_to_rad(60))+tan(deg_to_rad(45))");
    }

    #[test]
    fn nested_calls_keep_their_boundaries() {
        assert_eq!(
            rewrite("sin(cos(30))"),
            "sin(deg_to_rad(cos(deg_to_rad(30))))"
        );
        assert_eq!(
            rewrite("sin((1+2)*(3+4))+1"),
            "sin(deg_to_rad((1+2)*(3+4)))+1"
        );
        assert_eq!(
            rewrite("cos(sqrt(4)+log(10))"),
            "cos(deg_to_rad(sqrt(4)+log10(10)))"
        );
    }

    #[test]
    fn log_becomes_log10() {
        assert_eq!(rewrite("log(100)"), "log10(100)");
        assert_eq!(rewrite("log(log(100))"), "log10(log10(100))");
        assert_eq!(rewrite("log(10)log(10)"), "log10(10)log10(10)");
    }

    #[test]
    fn only_whole_identifiers_match() {
        assert_eq!(rewrite("ln(5)"), "ln(5)");
        assert_eq!(rewrite("log10(5)"), "log10(5)");
        assert_eq!(rewrite("asin(1)"), "asin(1)");
        assert_eq!(rewrite("xlog(2)"), "xlog(2)");
        assert_eq!(rewrite("sin"), "sin");
    }

    #[test]
    fn whitespace_before_paren_is_normalized() {
        assert_eq!(rewrite("sin (30)"), "sin(deg_to_rad(30))");
        assert_eq!(rewrite("log  (2)"), "log10(2)");
    }

    #[test]
    fn unclosed_trig_call_is_left_alone() {
        assert_eq!(rewrite("sin(30"), "sin(30");
        assert_eq!(rewrite("1+cos(2*(3)"), "1+cos(2*(3)");
    }

    #[test]
    fn rewriting_is_idempotent() {
        for input in [
            "sin(30)",
            "cos(sin(0))",
            "tan(45)+log(100)-ln(2)",
            "sin( deg_to_rad(30) )",
            "sin(deg_to_rad(1)+2)",
            "sin(30",
            "",
        ] {
            let once = rewrite(input);
            assert_eq!(rewrite(&once), once, "input: {input}");
        }
    }

    #[test]
    fn already_converted_argument_is_not_wrapped_again() {
        assert_eq!(rewrite("sin(deg_to_rad(30))"), "sin(deg_to_rad(30))");
        assert_eq!(
            rewrite("sin(deg_to_rad(1)+2)"),
            "sin(deg_to_rad(deg_to_rad(1)+2))"
        );
    }

    #[test]
    fn very_deep_nesting_is_left_for_the_parser() {
        let deep = format!("{}0{}", "sin(".repeat(1000), ")".repeat(1000));
        let rewritten = rewrite(&deep);
        // the innermost levels come through untouched
        assert!(rewritten.contains(&deep[4 * MAX_NESTING..deep.len() - MAX_NESTING]));
        assert_eq!(
            crate::calc_engine::evaluate(&deep).unwrap_err().kind(),
            crate::calc_engine::ErrorKind::Syntax
        );
    }

    #[test]
    fn exponents_stay_with_their_number() {
        assert_eq!(rewrite("sin(1e1)"), "sin(deg_to_rad(1e1))");
        assert_eq!(rewrite("2e-3+cos(0)"), "2e-3+cos(deg_to_rad(0))");
        assert_eq!(number_len("1.5E+10*2"), 7);
        assert_eq!(number_len("2exp"), 1);
        assert_eq!(number_len("3e-"), 1);
    }

    #[test]
    fn empty_or_multiple_arguments_are_not_wrapped() {
        assert_eq!(rewrite("sin()"), "sin()");
        assert_eq!(rewrite("sin( )"), "sin( )");
        assert_eq!(rewrite("sin(1,2)"), "sin(1,2)");
        assert_eq!(rewrite("sin(pow(2,3))"), "sin(deg_to_rad(pow(2,3)))");
    }

    #[test]
    fn origins_point_back_into_the_input() {
        let rewritten = rewrite_mapped("sin(30)+@");
        assert_eq!(rewritten.text, "sin(deg_to_rad(30))+@");
        // '@'
        assert_eq!(rewritten.origin(20), 8);
        // inserted 'deg_to_rad(' maps to the argument, inserted ')' to the closing paren
        assert_eq!(rewritten.origin(4), 4);
        assert_eq!(rewritten.origin(17), 6);
        assert_eq!(rewritten.origin(18), 6);
        assert_eq!(rewritten.origin(21), 9);

        let rewritten = rewrite_mapped("log (100)*2");
        assert_eq!(rewritten.text, "log10(100)*2");
        assert_eq!(rewritten.origin(5), 4);
        assert_eq!(rewritten.origin(11), 10);
    }

    #[test]
    fn origins_count_characters_not_bytes() {
        let rewritten = rewrite_mapped("é+sin(1)");
        assert_eq!(rewritten.text, "é+sin(deg_to_rad(1))");
        assert_eq!(rewritten.origin(1), 1);
        assert_eq!(rewritten.origin(17), 6);
    }

    #[test]
    fn non_ascii_is_copied_through() {
        assert_eq!(rewrite("2×3"), "2×3");
    }
}
