//! Typed well parameter values.
//!
//! Storage keeps one nullable column per data type; the domain sees a single
//! tagged union selected by the parameter's declared [`DataType`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Date format accepted and produced for `date` parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Declared data type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    /// Free-form choice from a list; stored like a string.
    Enum,
    Integer,
    Decimal,
    Boolean,
    Date,
}

impl DataType {
    /// Get the string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Enum => "enum",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "enum" => Ok(Self::Enum),
            "integer" => Ok(Self::Integer),
            "decimal" => Ok(Self::Decimal),
            "boolean" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            other => Err(DomainError::parse(format!("Unknown data type: {other}"))),
        }
    }
}

/// A parameter value, tagged by its storage type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    String(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl ParameterValue {
    /// Parse raw input according to the declared data type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when `raw` cannot be read as the
    /// declared type.
    pub fn parse(data_type: DataType, raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        match data_type {
            DataType::String | DataType::Enum => Ok(Self::String(raw.to_string())),
            DataType::Integer => trimmed
                .parse()
                .map(Self::Integer)
                .map_err(|_| DomainError::validation(format!("Not an integer: {raw:?}"))),
            DataType::Decimal => trimmed
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Decimal)
                .ok_or_else(|| DomainError::validation(format!("Not a decimal: {raw:?}"))),
            DataType::Boolean => parse_bool(trimmed)
                .map(Self::Boolean)
                .ok_or_else(|| DomainError::validation(format!("Not a boolean: {raw:?}"))),
            DataType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(Self::Date)
                .map_err(|_| DomainError::validation(format!("Not a date (YYYY-MM-DD): {raw:?}"))),
        }
    }

    /// Whether this value can be stored for a parameter of `data_type`.
    pub fn matches(&self, data_type: DataType) -> bool {
        matches!(
            (self, data_type),
            (Self::String(_), DataType::String | DataType::Enum)
                | (Self::Integer(_), DataType::Integer)
                | (Self::Decimal(_), DataType::Decimal)
                | (Self::Boolean(_), DataType::Boolean)
                | (Self::Date(_), DataType::Date)
        )
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => f.write_str(v),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{}", v.format(DATE_FORMAT)),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_declared_type() {
        assert_eq!(
            ParameterValue::parse(DataType::Integer, " 42 "),
            Ok(ParameterValue::Integer(42))
        );
        assert_eq!(
            ParameterValue::parse(DataType::Decimal, "3,5"),
            Ok(ParameterValue::Decimal(3.5))
        );
        assert_eq!(
            ParameterValue::parse(DataType::Boolean, "yes"),
            Ok(ParameterValue::Boolean(true))
        );
        assert_eq!(
            ParameterValue::parse(DataType::Enum, "producing"),
            Ok(ParameterValue::String("producing".to_string()))
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        assert_eq!(
            ParameterValue::parse(DataType::Date, "2024-03-01"),
            Ok(ParameterValue::Date(date))
        );
    }

    #[test]
    fn rejects_input_that_does_not_fit_the_type() {
        assert!(ParameterValue::parse(DataType::Integer, "4.2").is_err());
        assert!(ParameterValue::parse(DataType::Decimal, "NaN").is_err());
        assert!(ParameterValue::parse(DataType::Boolean, "maybe").is_err());
        assert!(ParameterValue::parse(DataType::Date, "01.03.2024").is_err());
    }

    #[test]
    fn enum_values_match_string_storage() {
        let value = ParameterValue::String("gas lift".to_string());
        assert!(value.matches(DataType::Enum));
        assert!(value.matches(DataType::String));
        assert!(!value.matches(DataType::Integer));
    }
}
