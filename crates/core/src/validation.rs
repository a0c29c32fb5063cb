//! Input validation rules for everything the API accepts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::ActivityType;

/// Validation failures, one per rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is missing or blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// Email address is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// A quantity or threshold is below zero.
    #[error("{0} must not be negative")]
    Negative(&'static str),

    /// A value that must be strictly positive is not.
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    /// A schedule date lies before today.
    #[error("scheduled date {0} is in the past")]
    DateInPast(NaiveDate),

    /// A date range is inverted.
    #[error("invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// Start date.
        from: NaiveDate,
        /// End date.
        to: NaiveDate,
    },

    /// An amount has more decimal places than are stored.
    #[error("{field} must have at most {scale} decimal places")]
    TooPrecise {
        /// Field name.
        field: &'static str,
        /// Maximum number of decimal places.
        scale: u32,
    },

    /// An amount does not fit the money columns.
    #[error("{0} is too large")]
    OutOfRange(&'static str),

    /// Text exceeds the column width.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum length.
        max: usize,
    },
}

/// Width of the `VARCHAR` text columns.
pub const MAX_TEXT_LENGTH: usize = 255;

/// Width of `resources.unit`.
pub const MAX_UNIT_LENGTH: usize = 50;

/// Decimal places kept by the `NUMERIC(19, 4)` money columns.
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Exclusive upper bound of `NUMERIC(19, 4)`: 15 integer digits.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Trims `value` and rejects blank or oversized input.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    require_text_max(field, value, MAX_TEXT_LENGTH)
}

/// [`require_text`] with a column width other than [`MAX_TEXT_LENGTH`].
pub fn require_text_max(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Like [`require_text`] for optional fields; blank input becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, ValidationError> {
    optional_text_max(field, value, MAX_TEXT_LENGTH)
}

/// [`optional_text`] with a column width other than [`MAX_TEXT_LENGTH`].
pub fn optional_text_max(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => require_text_max(field, v, max).map(Some),
    }
}

/// Rejects amounts the money columns would overflow or round.
pub fn storable_amount(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(ValidationError::TooPrecise {
            field,
            scale: MAX_AMOUNT_SCALE,
        });
    }
    if value.abs() >= MAX_AMOUNT {
        return Err(ValidationError::OutOfRange(field));
    }
    Ok(value)
}

/// Minimal structural email check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = require_text("email", email)?;
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !email.contains(char::is_whitespace)
    });
    if valid {
        Ok(email.to_ascii_lowercase())
    } else {
        Err(ValidationError::InvalidEmail(email))
    }
}

/// Revenue and expense amounts must be positive; neutral ones may be zero.
pub fn validate_activity_amount(
    activity_type: ActivityType,
    amount: Decimal,
) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::Negative("amount"));
    }
    if activity_type.is_monetary() && amount.is_zero() {
        return Err(ValidationError::NotPositive("amount"));
    }
    storable_amount("amount", amount)?;
    Ok(())
}

/// Rejects negative counts.
pub fn non_negative(field: &'static str, value: i32) -> Result<i32, ValidationError> {
    if value < 0 {
        Err(ValidationError::Negative(field))
    } else {
        Ok(value)
    }
}

/// Rejects zero and negative counts.
pub fn positive(field: &'static str, value: i32) -> Result<i32, ValidationError> {
    if value <= 0 {
        Err(ValidationError::NotPositive(field))
    } else {
        Ok(value)
    }
}

/// Rejects zero, negative, and unstorable amounts.
pub fn positive_amount(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        Err(ValidationError::NotPositive(field))
    } else {
        storable_amount(field, value)
    }
}

/// Schedules may be created for today or later.
pub fn validate_schedule_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        Err(ValidationError::DateInPast(date))
    } else {
        Ok(())
    }
}

/// Checks an optional `[from, to]` filter.
pub fn validate_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(ValidationError::InvalidDateRange { from, to }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("name", "  North Field ").unwrap(), "North Field");
        assert_eq!(
            require_text("name", "   "),
            Err(ValidationError::Required("name"))
        );
    }

    #[test]
    fn test_require_text_length() {
        let long = "x".repeat(MAX_TEXT_LENGTH + 1);
        assert!(matches!(
            require_text("name", &long),
            Err(ValidationError::TooLong { field: "name", .. })
        ));
    }

    #[test]
    fn test_max_amount_is_ten_to_the_fifteenth() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
    }

    #[test]
    fn test_storable_amount_errors() {
        assert_eq!(
            storable_amount("hourly_rate", dec!(0.00001)),
            Err(ValidationError::TooPrecise {
                field: "hourly_rate",
                scale: MAX_AMOUNT_SCALE
            })
        );
        assert_eq!(
            positive_amount("hourly_rate", dec!(1000000000000000)),
            Err(ValidationError::OutOfRange("hourly_rate"))
        );
    }

    #[test]
    fn test_unit_width() {
        let fits = "u".repeat(MAX_UNIT_LENGTH);
        let too_wide = "u".repeat(MAX_UNIT_LENGTH + 1);
        assert_eq!(
            optional_text_max("unit", Some(&fits), MAX_UNIT_LENGTH).unwrap(),
            Some(fits.clone())
        );
        assert_eq!(
            optional_text_max("unit", Some(&too_wide), MAX_UNIT_LENGTH),
            Err(ValidationError::TooLong {
                field: "unit",
                max: MAX_UNIT_LENGTH
            })
        );
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("unit", None).unwrap(), None);
        assert_eq!(optional_text("unit", Some("  ")).unwrap(), None);
        assert_eq!(
            optional_text("unit", Some(" kg ")).unwrap(),
            Some("kg".to_string())
        );
    }

    #[rstest]
    #[case("farmer@example.com", true)]
    #[case("Farmer@Example.COM", true)]
    #[case("no-at-sign.example.com", false)]
    #[case("@example.com", false)]
    #[case("a@b@example.com", false)]
    #[case("a@localhost", false)]
    #[case("a b@example.com", false)]
    fn test_validate_email(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }

    #[test]
    fn test_email_lowercased() {
        assert_eq!(
            validate_email("Farmer@Example.COM").unwrap(),
            "farmer@example.com"
        );
    }

    #[rstest]
    #[case(ActivityType::Revenue, dec!(100), true)]
    #[case(ActivityType::Revenue, dec!(0), false)]
    #[case(ActivityType::Expense, dec!(-5), false)]
    #[case(ActivityType::Neutral, dec!(0), true)]
    #[case(ActivityType::Neutral, dec!(-1), false)]
    #[case(ActivityType::Revenue, dec!(1.2345), true)]
    #[case(ActivityType::Revenue, dec!(1.23450000), true)]
    #[case(ActivityType::Revenue, dec!(1.23456789), false)]
    #[case(ActivityType::Expense, dec!(999999999999999.9999), true)]
    #[case(ActivityType::Expense, dec!(1000000000000000), false)]
    #[case(ActivityType::Revenue, dec!(10000000000000000), false)]
    fn test_activity_amount(
        #[case] activity_type: ActivityType,
        #[case] amount: Decimal,
        #[case] ok: bool,
    ) {
        assert_eq!(validate_activity_amount(activity_type, amount).is_ok(), ok);
    }

    #[test]
    fn test_counts() {
        assert_eq!(non_negative("quantity", 0), Ok(0));
        assert_eq!(
            non_negative("quantity", -1),
            Err(ValidationError::Negative("quantity"))
        );
        assert_eq!(
            positive("work hours", 0),
            Err(ValidationError::NotPositive("work hours"))
        );
        assert!(positive_amount("hourly rate", dec!(12.50)).is_ok());
        assert!(positive_amount("hourly rate", dec!(0)).is_err());
    }

    #[test]
    fn test_schedule_date() {
        let today = NaiveDate::from_ymd_opt(2024, 10, 18).unwrap();
        assert!(validate_schedule_date(today, today).is_ok());
        assert!(validate_schedule_date(today.succ_opt().unwrap(), today).is_ok());
        assert_eq!(
            validate_schedule_date(today.pred_opt().unwrap(), today),
            Err(ValidationError::DateInPast(today.pred_opt().unwrap()))
        );
    }

    #[test]
    fn test_date_range() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(validate_date_range(Some(a), Some(b)).is_ok());
        assert!(validate_date_range(Some(b), None).is_ok());
        assert!(validate_date_range(Some(b), Some(a)).is_err());
    }
}
