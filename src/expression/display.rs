use std::fmt;

use crate::expression::ast::Expression;

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn precedence(expr: &Expression) -> u8 {
            match expr {
                Expression::Add(_, _) | Expression::Sub(_, _) => 1,
                Expression::Mul(_, _) | Expression::Div(_, _) => 2,
                Expression::Number(_) => 3,
            }
        }

        fn write_with_parens(
            f: &mut fmt::Formatter,
            expr: &Expression,
            need_parens: bool,
        ) -> fmt::Result {
            if need_parens {
                write!(f, "(")?;
                fmt_expression(f, expr)?;
                write!(f, ")")
            } else {
                fmt_expression(f, expr)
            }
        }

        fn fmt_expression(f: &mut fmt::Formatter, expr: &Expression) -> fmt::Result {
            let (l, r, symbol, level) = match expr {
                Expression::Number(n) => return write!(f, "{}", n),
                Expression::Add(l, r) => (l, r, "+", 1),
                Expression::Sub(l, r) => (l, r, "-", 1),
                Expression::Mul(l, r) => (l, r, "*", 2),
                Expression::Div(l, r) => (l, r, "/", 2),
            };

            // Left-associative: only the right operand of `-` and `/` needs
            // parentheses at equal precedence.
            let need_l = precedence(l) < level;
            let need_r = match expr {
                Expression::Sub(_, _) | Expression::Div(_, _) => precedence(r) <= level,
                _ => precedence(r) < level,
            };
            write_with_parens(f, l, need_l)?;
            write!(f, " {} ", symbol)?;
            write_with_parens(f, r, need_r)
        }

        fmt_expression(f, self)
    }
}
