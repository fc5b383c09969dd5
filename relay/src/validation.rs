//! Input-size policy for summarization.

use errors::RelayError;

pub const MIN_TEXT_LENGTH: usize = 10;
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Length in Unicode scalar values, the unit both bounds are expressed in.
pub fn text_length(text: &str) -> usize {
    text.chars().count()
}

pub fn validate_text(text: &str) -> Result<(), RelayError> {
    let length = text_length(text);
    if length < MIN_TEXT_LENGTH {
        return Err(RelayError::TextTooShort {
            length,
            min: MIN_TEXT_LENGTH
        });
    }
    if length > MAX_TEXT_LENGTH {
        return Err(RelayError::TextTooLong {
            length,
            max: MAX_TEXT_LENGTH
        });
    }
    Ok(())
}
