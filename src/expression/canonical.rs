use std::fmt;

use crate::expression::ast::{Expression, Operator};

/// Normal form of an expression under associativity and commutativity of `+` and `*`
///
/// `Sum` and `Product` hold flattened operand lists (no direct child of the
/// same kind) sorted by the derived total order, so two expressions that only
/// differ by regrouping or reordering sums and products compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Canonical {
    Literal(u64),
    Sum(Vec<Canonical>),
    Product(Vec<Canonical>),
    Difference(Box<Canonical>, Box<Canonical>),
    Quotient(Box<Canonical>, Box<Canonical>),
}

fn push_operand(op: Operator, node: Canonical, operands: &mut Vec<Canonical>) {
    match (op, node) {
        (Operator::Add, Canonical::Sum(items)) | (Operator::Mul, Canonical::Product(items)) => {
            operands.extend(items);
        }
        (_, other) => operands.push(other),
    }
}

impl Canonical {
    /// Canonical form of `left <op> right`, given canonical operands
    pub fn combine(op: Operator, left: Canonical, right: Canonical) -> Canonical {
        match op {
            Operator::Add | Operator::Mul => {
                let mut operands = Vec::new();
                push_operand(op, left, &mut operands);
                push_operand(op, right, &mut operands);
                operands.sort();
                if op == Operator::Add {
                    Canonical::Sum(operands)
                } else {
                    Canonical::Product(operands)
                }
            }
            Operator::Sub => Canonical::Difference(Box::new(left), Box::new(right)),
            Operator::Div => Canonical::Quotient(Box::new(left), Box::new(right)),
        }
    }
}

impl Expression {
    pub fn canonical(&self) -> Canonical {
        let (op, l, r) = match self {
            Expression::Number(n) => return Canonical::Literal(*n),
            Expression::Add(l, r) => (Operator::Add, l, r),
            Expression::Sub(l, r) => (Operator::Sub, l, r),
            Expression::Mul(l, r) => (Operator::Mul, l, r),
            Expression::Div(l, r) => (Operator::Div, l, r),
        };
        Canonical::combine(op, l.canonical(), r.canonical())
    }

    /// True when both expressions share a canonical form
    pub fn is_equivalent(&self, other: &Expression) -> bool {
        self.canonical() == other.canonical()
    }
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn write_list(f: &mut fmt::Formatter, items: &[Canonical], symbol: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", symbol)?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, ")")
        }

        match self {
            Canonical::Literal(n) => write!(f, "{}", n),
            Canonical::Sum(items) => write_list(f, items, "+"),
            Canonical::Product(items) => write_list(f, items, "*"),
            Canonical::Difference(l, r) => write!(f, "({} - {})", l, r),
            Canonical::Quotient(l, r) => write!(f, "({} / {})", l, r),
        }
    }
}
