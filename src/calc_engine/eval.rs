use super::ast::{Expr, UnaryOp};
use super::error::EvalError;
use super::registry::power;
use super::token::Op;

pub struct Step {
    pub operation: String,
    pub result: f64,
}

/// Record of the operations performed during one evaluation. Steps are only
/// kept in detailed mode.
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: impl FnOnce() -> String, result: f64) {
        if self.detailed_mode {
            self.steps.push(Step {
                operation: operation(),
                result,
            });
        }
    }
}

fn finite(value: f64, what: impl FnOnce() -> String) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::domain(format!("{} is not a finite number", what())))
    }
}

/// Evaluates a tree bottom-up, left operand first.
pub fn eval(expr: &Expr, trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
    match expr {
        Expr::Literal(n) => finite(*n, || format!("literal {}", n)),
        Expr::Unary { op: UnaryOp::Neg, operand } => {
            let value = eval(operand, trace)?;
            let result = -value;
            trace.add_step(|| format!("-({})", value), result);
            Ok(result)
        }
        Expr::Binary { op, left, right } => {
            let left = eval(left, trace)?;
            let right = eval(right, trace)?;
            let result = match op {
                Op::Plus => left + right,
                Op::Minus => left - right,
                Op::Mult => left * right,
                Op::Div => {
                    if right == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    left / right
                }
                Op::Pow => power(left, right)?,
            };
            let result = finite(result, || format!("{} {} {}", left, op.symbol(), right))?;
            trace.add_step(|| format!("{} {} {}", left, op.symbol(), right), result);
            Ok(result)
        }
        Expr::Call { function, args } => {
            let values = args
                .iter()
                .map(|arg| eval(arg, trace))
                .collect::<Result<Vec<f64>, EvalError>>()?;
            let descriptor = function.descriptor();
            let call = || {
                let args = values
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", descriptor.name, args)
            };
            let result = finite(descriptor.apply(&values)?, call)?;
            trace.add_step(call, result);
            Ok(result)
        }
    }
}
