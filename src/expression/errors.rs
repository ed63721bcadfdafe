use thiserror::Error;

/// Errors raised while turning submitted text into a checked expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("FormatError:ExpressionTooLong[{0}]")]
    ExpressionTooLong(usize),
    #[error("FormatError:FailedToParse[{0}]")]
    FailedToParse(String),
    #[error("FormatError:UnallowedOperator[{0}]")]
    UnallowedOperator(String),
    #[error("FormatError:DivisionByZero[-]")]
    DivisionByZero,
    #[error("FormatError:NotAnInteger[{0}]")]
    NotAnInteger(String),
    #[error("FormatError:UnmatchedNumber[{0}]")]
    UnmatchedNumber(String),
}

impl FormatError {
    pub fn code(&self) -> u8 {
        match self {
            FormatError::ExpressionTooLong(_) => 0x10,
            FormatError::FailedToParse(_) => 0x11,
            FormatError::UnallowedOperator(_) => 0x12,
            FormatError::DivisionByZero => 0x13,
            FormatError::NotAnInteger(_) => 0x14,
            FormatError::UnmatchedNumber(_) => 0x15,
        }
    }
}
