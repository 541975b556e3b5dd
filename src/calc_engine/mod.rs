//! Expression evaluation engine.
//!
//! Text goes through [`rewrite`] (degree mode, `log` spelling), then the
//! tokenizer and parser build an [`Expr`] tree, which [`eval`] reduces to a
//! finite `f64`. Every failure comes back as an [`EvalError`]; nothing here
//! panics on malformed input.

pub mod ast;
pub mod error;
pub mod eval;
pub mod parser;
pub mod registry;
pub mod rewrite;
pub mod token;

pub use ast::Expr;
pub use error::{ErrorKind, EvalError};
pub use eval::{eval, EvaluationTrace, Step};
pub use parser::{parse, MAX_DEPTH};
pub use registry::Function;
pub use rewrite::{rewrite, rewrite_mapped, Rewritten};
pub use token::{tokenize, Token, Tokenizer};

/// Evaluates `expression` and returns the raw number; formatting is up to
/// the caller.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    evaluate_with_trace(expression, &mut EvaluationTrace::new(false))
}

/// Same as [`evaluate`], recording each operation into `trace` when it is in
/// detailed mode.
pub fn evaluate_with_trace(expression: &str, trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
    let processed = rewrite_mapped(expression);
    log::debug!("processed expression: {}", processed.text);

    let result = parse(&processed.text)
        .and_then(|tree| {
            log::trace!("parsed as {}", tree);
            eval(&tree, trace)
        })
        .map_err(|e| e.relocate(|position| processed.origin(position)));

    if let Err(e) = &result {
        log::debug!("evaluation of {:?} failed: {}", expression, e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn degree_mode_trigonometry() {
        assert_close(evaluate("sin(30)").unwrap(), 0.5);
        assert_close(evaluate("cos(60)").unwrap(), 0.5);
        assert_close(evaluate("tan(45)").unwrap(), 1.0);
        assert_close(evaluate("cos(sin(0))").unwrap(), 1.0);
        assert_close(evaluate("sin(90)^2+cos(90)^2").unwrap(), 1.0);
    }

    #[test]
    fn logarithms() {
        assert_close(evaluate("log(1000)").unwrap(), 3.0);
        assert_close(evaluate("ln(1)").unwrap(), 0.0);
        assert_close(evaluate("log(100)+ln(exp(1))").unwrap(), 3.0);
        assert_eq!(evaluate("log(0)").unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(evaluate("ln(-1)").unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn degree_conversion_is_callable_directly() {
        assert_close(evaluate("deg_to_rad(180)").unwrap(), std::f64::consts::PI);
    }

    #[test]
    fn error_kinds() {
        assert_eq!(evaluate("").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(evaluate("2+(3*4").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(evaluate("sin(30").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(evaluate("1/0").unwrap_err().kind(), ErrorKind::DivisionByZero);
        assert_eq!(evaluate("sqrt(-1)").unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(evaluate("2 # 3").unwrap_err().kind(), ErrorKind::Lexical);
        assert_eq!(evaluate("cot(1)").unwrap_err().kind(), ErrorKind::UnknownFunction);
    }

    #[test]
    fn errors_describe_what_was_typed() {
        assert_eq!(
            evaluate("sin()").unwrap_err().to_string(),
            "'sin' takes 1 argument(s) but 0 were given at position 0"
        );
        assert_eq!(
            evaluate("1+sin(1,2)").unwrap_err().to_string(),
            "'sin' takes 1 argument(s) but 2 were given at position 2"
        );
        assert_eq!(
            evaluate("sin(30)+@").unwrap_err(),
            EvalError::Lexical { ch: '@', position: 8 }
        );
        assert_eq!(
            evaluate("cos(10)*(2").unwrap_err().to_string(),
            "'(' is never closed at position 8"
        );
        assert_eq!(
            evaluate("sin(2+)").unwrap_err().to_string(),
            "unexpected ')' at position 6"
        );
        assert_eq!(
            evaluate("log(2)+").unwrap_err().to_string(),
            "unexpected end of expression at position 7"
        );
    }

    #[test]
    fn exponent_notation() {
        assert_close(evaluate("1e20/2").unwrap(), 5e19);
        assert_close(evaluate("3.3333333333333335e-7*3").unwrap() * 1e6, 1.0);
        assert_close(evaluate("sin(3E1)").unwrap(), 0.5);
    }

    #[test]
    fn trace_through_the_pipeline() {
        let mut trace = EvaluationTrace::new(true);
        assert_close(evaluate_with_trace("sin(30)", &mut trace).unwrap(), 0.5);
        assert_eq!(trace.steps.len(), 2);
        assert!(trace.steps[0].operation.starts_with("deg_to_rad(30)"));
        assert!(trace.steps[1].operation.starts_with("sin("));
    }
}
