use log::debug;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::expression::ast::{Expression, Operator};
use crate::expression::errors::FormatError;

/// Applies `op` to two exact values
///
/// # Errors
///
/// Returns `DivisionByZero` when dividing by a value that is exactly zero.
pub fn apply_operator(
    op: Operator,
    left: &BigRational,
    right: &BigRational,
) -> Result<BigRational, FormatError> {
    match op {
        Operator::Add => Ok(left + right),
        Operator::Sub => Ok(left - right),
        Operator::Mul => Ok(left * right),
        Operator::Div => {
            if right.is_zero() {
                debug!("Division by zero attempted");
                Err(FormatError::DivisionByZero)
            } else {
                Ok(left / right)
            }
        }
    }
}

pub fn rational_from(n: u64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

impl Expression {
    /// The operator at the root, or `None` for a literal
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Expression::Number(_) => None,
            Expression::Add(_, _) => Some(Operator::Add),
            Expression::Sub(_, _) => Some(Operator::Sub),
            Expression::Mul(_, _) => Some(Operator::Mul),
            Expression::Div(_, _) => Some(Operator::Div),
        }
    }

    /// # Errors
    ///
    /// Returns `DivisionByZero` when any divisor, literal or sub-expression,
    /// evaluates to exactly zero.
    pub fn evaluate(&self) -> Result<BigRational, FormatError> {
        let result = match self {
            Expression::Number(n) => Ok(rational_from(*n)),
            Expression::Add(l, r) => Self::evaluate_binary(Operator::Add, l, r),
            Expression::Sub(l, r) => Self::evaluate_binary(Operator::Sub, l, r),
            Expression::Mul(l, r) => Self::evaluate_binary(Operator::Mul, l, r),
            Expression::Div(l, r) => Self::evaluate_binary(Operator::Div, l, r),
        };

        if let Err(e) = &result {
            debug!("Evaluation of {} failed: {}", self, e);
        }
        result
    }

    fn evaluate_binary(
        op: Operator,
        left: &Expression,
        right: &Expression,
    ) -> Result<BigRational, FormatError> {
        let left = left.evaluate()?;
        let right = right.evaluate()?;
        apply_operator(op, &left, &right)
    }

    /// Literal values in left-to-right order
    pub fn extract(&self) -> Vec<u64> {
        let mut numbers = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expression::Number(n) => numbers.push(*n),
                Expression::Add(l, r)
                | Expression::Sub(l, r)
                | Expression::Mul(l, r)
                | Expression::Div(l, r) => {
                    stack.push(r);
                    stack.push(l);
                }
            }
        }
        numbers
    }
}
