//! Expression module: normalization, parsing, exact evaluation and canonical forms

mod ast;
mod canonical;
mod display;
mod errors;
mod eval;
mod normalize;
mod parser;

pub use ast::{Expression, Operator};
pub use canonical::Canonical;
pub use errors::FormatError;
pub use eval::{apply_operator, rational_from};
pub use normalize::{MAX_EXPRESSION_LENGTH, check_length, normalize};
pub use parser::{MAX_NESTING_DEPTH, parse};
