use chrono::{NaiveDate, Utc};
use validator::ValidationError;

pub(crate) fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut error = ValidationError::new("future_date");
        error.message = Some("must not be in the future".into());
        return Err(error);
    }
    Ok(())
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Usernames are stored trimmed, so the length rule applies to the trimmed
/// value.
pub(crate) fn username_length(value: &str) -> Result<(), ValidationError> {
    let length = value.trim().chars().count();
    if !(3..=50).contains(&length) {
        let mut error = ValidationError::new("length");
        error.message = Some("must be between 3 and 50 characters".into());
        return Err(error);
    }
    Ok(())
}
