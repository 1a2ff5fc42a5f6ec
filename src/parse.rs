// src/parse.rs
//! Text-input validation for numeric fields.
//!
//! The `sanitize_*` functions implement the keystroke-filter contract: given
//! the field's previous text and the edited text, return what the field
//! should now contain (the edit is rejected wholesale when it would make the
//! text invalid). The `parse_*` functions turn committed text into values.

use thiserror::Error;

use crate::models::SprintTime;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid duration '{0}', expected HH:MM or HH:MM:SS")]
    InvalidDuration(String),
    #[error("invalid sprint time '{0}', expected SS.HH")]
    InvalidSprintTime(String),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// True when `text` is a partial decimal: digits, at most one `,` or `.`
/// separator, and at most `max_places` digits after it (unlimited when 0).
fn is_partial_decimal(text: &str, max_places: usize) -> bool {
    let mut seen_separator = false;
    let mut fraction_digits = 0;
    for c in text.chars() {
        match c {
            '0'..='9' => {
                if seen_separator {
                    fraction_digits += 1;
                    if max_places > 0 && fraction_digits > max_places {
                        return false;
                    }
                }
            }
            ',' | '.' => {
                if seen_separator {
                    return false;
                }
                seen_separator = true;
            }
            _ => return false,
        }
    }
    true
}

/// Filters a decimal field edit. Accepted text has commas normalised to
/// periods; rejected edits restore `old`.
#[must_use]
pub fn sanitize_decimal(old: &str, new: &str, max_places: usize) -> String {
    if new.is_empty() {
        return String::new();
    }
    if is_partial_decimal(new, max_places) {
        new.replace(',', ".")
    } else {
        old.to_string()
    }
}

/// Filters an integer field edit: digits only, otherwise restore `old`.
#[must_use]
pub fn sanitize_integer(old: &str, new: &str) -> String {
    if new.is_empty() || new.chars().all(|c| c.is_ascii_digit()) {
        new.to_string()
    } else {
        old.to_string()
    }
}

/// Parses `HH:MM` or `HH:MM:SS` into whole seconds. Minutes and seconds must
/// be below 60.
pub fn parse_duration_secs(text: &str) -> Result<u32, ParseError> {
    let err = || ParseError::InvalidDuration(text.to_string());
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(err());
    }
    let mut fields = [0u32; 3];
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        fields[i] = part.parse().map_err(|_| err())?;
    }
    let (hours, minutes, seconds) = (fields[0], fields[1], fields[2]);
    if minutes > 59 || seconds > 59 {
        return Err(err());
    }
    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Parses `SS.HH` (seconds and hundredths) into a `SprintTime`.
pub fn parse_sprint_time(text: &str) -> Result<SprintTime, ParseError> {
    let err = || ParseError::InvalidSprintTime(text.to_string());
    let trimmed = text.trim().trim_end_matches('s');
    let (secs_text, hundredths_text) = trimmed.split_once('.').ok_or_else(err)?;
    let all_digits =
        |s: &str| !s.is_empty() && s.len() <= 2 && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(secs_text) || !all_digits(hundredths_text) {
        return Err(err());
    }
    let seconds: u8 = secs_text.parse().map_err(|_| err())?;
    let hundredths: u8 = hundredths_text.parse().map_err(|_| err())?;
    if seconds > 59 {
        return Err(err());
    }
    Ok(SprintTime::new(seconds, hundredths))
}

/// Parses a non-negative decimal, accepting the comma separator.
pub fn parse_decimal(text: &str) -> Result<f64, ParseError> {
    let normalised = text.trim().replace(',', ".");
    let value: f64 = normalised
        .parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParseError::InvalidNumber(text.to_string()))
    }
}
