use chrono::NaiveDate;

use crate::server::response::ApiError;

const MAX_HABIT_NAME_LEN: usize = 100;
const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("Email cannot be empty"));
    }
    // Shape check only; deliverability is not validated here.
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_habit_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("Habit name cannot be empty"));
    }
    if name.len() > MAX_HABIT_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "Habit name cannot exceed {MAX_HABIT_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_goal_days(goal_days: i64) -> Result<(), ApiError> {
    if goal_days < 1 {
        return Err(ApiError::bad_request("Goal length must be at least 1 day"));
    }
    Ok(())
}

pub fn validate_month(month: u32) -> Result<(), ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::bad_request("Month must be between 1 and 12"));
    }
    Ok(())
}

pub fn validate_year(year: i32) -> Result<(), ApiError> {
    if !(1..=9999).contains(&year) {
        return Err(ApiError::bad_request("Year must be between 1 and 9999"));
    }
    Ok(())
}

pub fn parse_date_param(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request("Dates must be formatted YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("a@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("trailing@").is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
    }

    #[test]
    fn test_habit_name_validation() {
        assert!(validate_habit_name("Read").is_ok());
        assert!(validate_habit_name("").is_err());
        assert!(validate_habit_name("   ").is_err());
        assert!(validate_habit_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_goal_days_validation() {
        assert!(validate_goal_days(1).is_ok());
        assert!(validate_goal_days(0).is_err());
        assert!(validate_goal_days(-5).is_err());
    }

    #[test]
    fn test_date_param_parsing() {
        assert_eq!(
            parse_date_param("2024-01-10").unwrap(),
            "2024-01-10".parse::<NaiveDate>().unwrap()
        );
        assert!(parse_date_param("01/10/2024").is_err());
        assert!(parse_date_param("2024-13-40").is_err());
    }

    #[test]
    fn test_month_and_year_bounds() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
        assert!(validate_year(2024).is_ok());
        assert!(validate_year(0).is_err());
    }
}
