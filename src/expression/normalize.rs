use log::{debug, warn};

use crate::expression::errors::FormatError;

/// Submissions at or above this many characters (after normalization) are rejected
pub const MAX_EXPRESSION_LENGTH: usize = 30;

/// Strips whitespace and maps look-alike symbols onto the ASCII operators
pub fn normalize(text: &str) -> String {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '×' | 'x' | 'X' | '∗' | '·' => '*',
            '÷' | '∕' => '/',
            '−' | '–' => '-',
            '＋' => '+',
            '（' => '(',
            '）' => ')',
            other => other,
        })
        .collect();
    debug!("Normalized '{}' to '{}'", text, normalized);
    normalized
}

/// # Errors
///
/// Returns `ExpressionTooLong` when the normalized text reaches `MAX_EXPRESSION_LENGTH`.
pub fn check_length(normalized: &str) -> Result<(), FormatError> {
    let length = normalized.chars().count();
    if length >= MAX_EXPRESSION_LENGTH {
        warn!("Rejecting expression of length {}", length);
        return Err(FormatError::ExpressionTooLong(length));
    }
    Ok(())
}
