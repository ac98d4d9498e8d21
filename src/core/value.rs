//! Dynamically-typed column values.
//!
//! Values are always bound through `?` placeholders, never interpolated
//! into SQL text.

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single SQLite column value.
///
/// # Examples
///
/// ```
/// use rowstore::core::Value;
///
/// assert_eq!(Value::from("Opel"), Value::Text("Opel".to_string()));
/// assert_eq!(Value::from(2000), Value::Integer(2000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl Value {
    /// Parses a command-line literal for a numeric column.
    ///
    /// `null` (any case) becomes [`Value::Null`], integers and floats become
    /// numeric values, anything else is text. Wrap a literal in single quotes
    /// to force text, e.g. `'2000'`.
    #[must_use]
    pub fn parse_literal(raw: &str) -> Self {
        let text = Self::parse_text_literal(raw);
        if text.is_null() || is_quoted(raw) {
            return text;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>()
            && f.is_finite()
        {
            return Self::Real(f);
        }
        text
    }

    /// Parses a command-line literal for a text column.
    ///
    /// Only `null` and the single-quote wrapper are interpreted; everything
    /// else is kept verbatim, so `007` and `1.20` stay text.
    #[must_use]
    pub fn parse_text_literal(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("null") {
            return Self::Null;
        }
        let text = raw
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
            .unwrap_or(raw);
        Self::Text(text.to_string())
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

fn is_quoted(raw: &str) -> bool {
    raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'')
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value_ref = match self {
            Self::Null => ValueRef::Null,
            Self::Integer(i) => ValueRef::Integer(*i),
            Self::Real(r) => ValueRef::Real(*r),
            Self::Text(s) => ValueRef::Text(s.as_bytes()),
            Self::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(value_ref))
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(r) => Self::Real(r),
            // Non-UTF-8 text keeps its bytes rather than being replaced
            ValueRef::Text(t) => match std::str::from_utf8(t) {
                Ok(text) => Self::Text(text.to_string()),
                Err(_) => Self::Blob(t.to_vec()),
            },
            ValueRef::Blob(b) => Self::Blob(b.to_vec()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        assert_eq!(Value::parse_literal("NULL"), Value::Null);
        assert_eq!(Value::parse_literal("2011"), Value::Integer(2011));
        assert_eq!(Value::parse_literal("-3"), Value::Integer(-3));
        assert_eq!(Value::parse_literal("1.5"), Value::Real(1.5));
        assert_eq!(
            Value::parse_literal("Sedan 1.4"),
            Value::Text("Sedan 1.4".to_string())
        );
        assert_eq!(
            Value::parse_literal("'2000'"),
            Value::Text("2000".to_string())
        );
    }

    #[test]
    fn test_parse_text_literal_keeps_digits() {
        assert_eq!(Value::parse_text_literal("007"), Value::Text("007".to_string()));
        assert_eq!(Value::parse_text_literal("1.20"), Value::Text("1.20".to_string()));
        assert_eq!(Value::parse_text_literal("null"), Value::Null);
        assert_eq!(Value::parse_text_literal("'null'"), Value::Text("null".to_string()));
        assert_eq!(Value::parse_text_literal("'"), Value::Text("'".to_string()));
    }

    #[test]
    fn test_parse_literal_rejects_non_finite() {
        assert_eq!(Value::parse_literal("inf"), Value::Text("inf".to_string()));
        assert_eq!(Value::parse_literal("NaN"), Value::Text("NaN".to_string()));
    }

    #[test]
    fn test_from_sql_keeps_invalid_utf8_bytes() {
        let value = Value::column_result(ValueRef::Text(&[0x4b, 0xff])).unwrap();
        assert_eq!(value, Value::Blob(vec![0x4b, 0xff]));
        let value = Value::column_result(ValueRef::Text("Łódź".as_bytes())).unwrap();
        assert_eq!(value, Value::Text("Łódź".to_string()));
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("Kia")), Value::Text("Kia".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Blob(vec![1, 2, 3]).to_string(), "<3 bytes>");
    }

    #[test]
    fn test_json_is_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Integer(1),
            Value::Text("Opel".to_string()),
            Value::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[1,"Opel",null]"#);
    }
}
