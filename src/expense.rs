use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%m/%d/%Y";
pub const TODAY_KEYWORD: &str = "today";

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid date format or impossible date: {0}. Please use MM/DD/YYYY.")]
    InvalidDate(String),

    #[error("Invalid amount: {0}. Please enter a number.")]
    InvalidAmount(String),

    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,

    #[error("{0} cannot be empty.")]
    EmptyField(&'static str),
}

/// A single expense entry, as held in memory and stored in the CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl Expense {
    /// Checks a record that did not come through the prompts, e.g. one read back from disk.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !has_date_shape(&self.date) || NaiveDate::parse_from_str(&self.date, DATE_FORMAT).is_err() {
            return Err(ValidationError::InvalidDate(self.date.clone()));
        }
        check_amount(self.amount)?;
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyField("Category"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyField("Description"));
        }
        Ok(())
    }
}

/// Parses a date entered at the prompt. `today` resolves to the given date.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<String, ValidationError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case(TODAY_KEYWORD) {
        return Ok(today.format(DATE_FORMAT).to_string());
    }

    // chrono accepts unpadded fields, the stored format does not
    if !has_date_shape(input) {
        return Err(ValidationError::InvalidDate(input.to_string()));
    }

    match NaiveDate::parse_from_str(input, DATE_FORMAT) {
        Ok(_) => Ok(input.to_string()),
        Err(_) => Err(ValidationError::InvalidDate(input.to_string())),
    }
}

pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let input = input.trim();
    let digits = input.strip_prefix('$').unwrap_or(input).trim();

    let amount: f64 = digits
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(input.to_string()))?;
    check_amount(amount)?;
    Ok(amount)
}

/// Trims a free-text field and rejects it when nothing is left.
pub fn parse_text(input: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

fn check_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount(amount.to_string()));
    }
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
}

// MM/DD/YYYY, digits only
fn has_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit())
}
