//! Scientific calculator: an expression engine with degree-mode
//! trigonometry, and the keypad model the front ends drive.

pub mod calc_engine;
pub mod format;
pub mod keypad;

pub use calc_engine::{evaluate, evaluate_with_trace, ErrorKind, EvalError, EvaluationTrace};
