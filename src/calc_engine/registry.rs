//! Built-in functions known to the calculator.
//!
//! The table is fixed at compile time. The parser resolves a name to a
//! [`Function`] tag once, so evaluation never looks names up again.

use super::error::EvalError;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Ln,
    Log10,
    Sqrt,
    Exp,
    Pow,
    DegToRad,
}

pub struct FunctionDescriptor {
    pub function: Function,
    pub name: &'static str,
    pub arity: usize,
    apply: fn(&[f64]) -> Result<f64, EvalError>,
}

impl FunctionDescriptor {
    /// Runs the operation. `args.len()` must equal `arity`; the parser
    /// guarantees this for every call it builds.
    pub fn apply(&self, args: &[f64]) -> Result<f64, EvalError> {
        debug_assert_eq!(args.len(), self.arity);
        (self.apply)(args)
    }
}

static REGISTRY: [FunctionDescriptor; 9] = [
    FunctionDescriptor { function: Function::Sin, name: "sin", arity: 1, apply: |a| Ok(a[0].sin()) },
    FunctionDescriptor { function: Function::Cos, name: "cos", arity: 1, apply: |a| Ok(a[0].cos()) },
    FunctionDescriptor { function: Function::Tan, name: "tan", arity: 1, apply: |a| Ok(a[0].tan()) },
    FunctionDescriptor { function: Function::Ln, name: "ln", arity: 1, apply: ln },
    FunctionDescriptor { function: Function::Log10, name: "log10", arity: 1, apply: log10 },
    FunctionDescriptor { function: Function::Sqrt, name: "sqrt", arity: 1, apply: sqrt },
    FunctionDescriptor { function: Function::Exp, name: "exp", arity: 1, apply: |a| Ok(a[0].exp()) },
    FunctionDescriptor { function: Function::Pow, name: "pow", arity: 2, apply: |a| power(a[0], a[1]) },
    FunctionDescriptor { function: Function::DegToRad, name: "deg_to_rad", arity: 1, apply: |a| Ok(deg_to_rad(a[0])) },
];

impl Function {
    /// Exact, case-sensitive lookup by canonical name.
    pub fn lookup(name: &str) -> Option<Function> {
        REGISTRY.iter().find(|d| d.name == name).map(|d| d.function)
    }

    pub fn descriptor(self) -> &'static FunctionDescriptor {
        // Table order follows the enum declaration order.
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn arity(self) -> usize {
        self.descriptor().arity
    }

    pub fn is_trigonometric(self) -> bool {
        matches!(self, Function::Sin | Function::Cos | Function::Tan)
    }
}

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

fn ln(args: &[f64]) -> Result<f64, EvalError> {
    if args[0] <= 0.0 {
        return Err(EvalError::domain("ln requires a positive argument"));
    }
    Ok(args[0].ln())
}

fn log10(args: &[f64]) -> Result<f64, EvalError> {
    if args[0] <= 0.0 {
        return Err(EvalError::domain("log requires a positive argument"));
    }
    Ok(args[0].log10())
}

fn sqrt(args: &[f64]) -> Result<f64, EvalError> {
    if args[0] < 0.0 {
        return Err(EvalError::domain("sqrt of a negative number"));
    }
    Ok(args[0].sqrt())
}

/// Real power. A negative base only admits integer exponents.
pub fn power(base: f64, exponent: f64) -> Result<f64, EvalError> {
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(EvalError::domain(format!(
            "{} ^ {} has no real value",
            base, exponent
        )));
    }
    Ok(base.powf(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::error::ErrorKind;

    #[test]
    fn table_order_matches_tags() {
        for descriptor in REGISTRY.iter() {
            assert_eq!(descriptor.function.descriptor().name, descriptor.name);
            assert_eq!(Function::lookup(descriptor.name), Some(descriptor.function));
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(Function::lookup("sin"), Some(Function::Sin));
        assert_eq!(Function::lookup("log10"), Some(Function::Log10));
        assert_eq!(Function::lookup("Sin"), None);
        assert_eq!(Function::lookup("log"), None);
        assert_eq!(Function::lookup("si"), None);
        assert_eq!(Function::Pow.arity(), 2);
        assert_eq!(Function::DegToRad.arity(), 1);
    }

    #[test]
    fn domain_checks() {
        let ln = Function::Ln.descriptor();
        assert_eq!(ln.apply(&[0.0]).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(ln.apply(&[-2.0]).unwrap_err().kind(), ErrorKind::Domain);
        assert!((ln.apply(&[std::f64::consts::E]).unwrap() - 1.0).abs() < 1e-12);

        let log = Function::Log10.descriptor();
        assert_eq!(log.apply(&[0.0]).unwrap_err().kind(), ErrorKind::Domain);
        assert!((log.apply(&[1000.0]).unwrap() - 3.0).abs() < 1e-12);

        let sqrt = Function::Sqrt.descriptor();
        assert_eq!(sqrt.apply(&[-1.0]).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(sqrt.apply(&[0.0]).unwrap(), 0.0);
        assert_eq!(sqrt.apply(&[16.0]).unwrap(), 4.0);
    }

    #[test]
    fn power_rejects_complex_results() {
        assert_eq!(power(-8.0, 0.5).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(power(-2.0, 3.0).unwrap(), -8.0);
        assert!((power(4.0, -0.5).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn degrees_to_radians() {
        assert!((deg_to_rad(180.0) - PI).abs() < 1e-12);
        assert_eq!(deg_to_rad(0.0), 0.0);
    }
}
