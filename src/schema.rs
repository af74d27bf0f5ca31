//! Declarative description of the wire payloads.
//!
//! serde builds the typed models, but it gives up at the first problem it
//! meets. Every model therefore also carries a [`Schema`] table (wire name,
//! domain name, kind, presence) that is walked before serde runs, so a
//! rejected payload reports every offending field in one go.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Schema description
// ---------------------------------------------------------------------------

/// Whether a field may be left out of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-null.
    Required,
    /// May be absent (the server applies a default); never null.
    Defaulted,
    /// May be absent or null.
    Nullable,
}

/// Accepted JSON shape of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Str,
    /// Integral JSON number. Floats and numeric strings are rejected.
    Int,
    /// Any JSON number.
    Float,
    Bool,
    /// ISO 8601 datetime string, with or without offset.
    DateTime,
    /// ISO 8601 date string, or a datetime string at midnight.
    Date,
    Uuid,
    Email,
    /// A string restricted to a literal set.
    OneOf(&'static [&'static str]),
    Object(&'static Schema),
    StrList,
    ObjectList(&'static Schema),
}

/// One entry of a model's alias table.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Rust field name.
    pub name: &'static str,
    /// Key used on the wire.
    pub wire: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl Field {
    pub const fn required(name: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire,
            kind,
            presence: Presence::Required,
        }
    }

    pub const fn defaulted(name: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire,
            kind,
            presence: Presence::Defaulted,
        }
    }

    pub const fn nullable(name: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire,
            kind,
            presence: Presence::Nullable,
        }
    }
}

/// Closed description of a JSON object: keys not listed in `fields` are
/// rejected.
#[derive(Debug)]
pub struct Schema {
    pub model: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    /// Look up a field by its wire name.
    pub fn field(&self, wire: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.wire == wire)
    }

    /// Check a single object against the schema, collecting every issue.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        self.check_object(value, "", &mut issues);
        self.finish(issues)
    }

    /// Check a JSON array whose elements must all match the schema.
    pub fn validate_list(&self, value: &Value) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        match value.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.check_object(item, &index.to_string(), &mut issues);
                }
            }
            None => issues.push(FieldIssue::new("", None, expected("a list", value))),
        }
        self.finish(issues)
    }

    fn finish(&self, issues: Vec<FieldIssue>) -> Result<(), ValidationError> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                model: self.model,
                issues,
            })
        }
    }

    fn check_object(&self, value: &Value, path: &str, issues: &mut Vec<FieldIssue>) {
        let Some(object) = value.as_object() else {
            issues.push(FieldIssue::new(path, None, expected("an object", value)));
            return;
        };

        for field in self.fields {
            let field_path = join(path, field.wire);
            match (object.get(field.wire), field.presence) {
                (None, Presence::Required) => {
                    issues.push(FieldIssue::new(&field_path, Some(field.name), "field required"));
                }
                (None, _) => {}
                (Some(Value::Null), Presence::Nullable) => {}
                (Some(value), _) => field.kind.check(value, &field_path, Some(field.name), issues),
            }
        }

        self.check_extra_keys(object, path, issues);
    }

    fn check_extra_keys(&self, object: &Map<String, Value>, path: &str, issues: &mut Vec<FieldIssue>) {
        for key in object.keys() {
            if self.field(key).is_none() {
                issues.push(FieldIssue::new(
                    &join(path, key),
                    None,
                    "extra fields not permitted",
                ));
            }
        }
    }
}

impl FieldKind {
    fn check(
        &self,
        value: &Value,
        path: &str,
        name: Option<&'static str>,
        issues: &mut Vec<FieldIssue>,
    ) {
        let problem = match self {
            FieldKind::Str => (!value.is_string()).then(|| expected("a string", value)),
            FieldKind::Int => (!value.is_i64()).then(|| expected("an integer", value)),
            FieldKind::Float => (!value.is_number()).then(|| expected("a number", value)),
            FieldKind::Bool => (!value.is_boolean()).then(|| expected("a boolean", value)),
            FieldKind::DateTime => match value.as_str() {
                Some(s) => parse_datetime(s)
                    .err()
                    .map(|e| format!("invalid datetime `{s}`: {e}")),
                None => Some(expected("an ISO 8601 datetime string", value)),
            },
            FieldKind::Date => match value.as_str() {
                Some(s) => parse_date(s).err().map(|e| format!("invalid date `{s}`: {e}")),
                None => Some(expected("an ISO 8601 date string", value)),
            },
            FieldKind::Uuid => match value.as_str() {
                Some(s) => Uuid::parse_str(s)
                    .err()
                    .map(|e| format!("invalid UUID `{s}`: {e}")),
                None => Some(expected("a UUID string", value)),
            },
            FieldKind::Email => match value.as_str() {
                Some(s) if is_email(s) => None,
                Some(s) => Some(format!("`{s}` is not a valid email address")),
                None => Some(expected("an email string", value)),
            },
            FieldKind::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => None,
                Some(s) => Some(format!(
                    "`{s}` is not one of {}",
                    allowed
                        .iter()
                        .map(|a| format!("'{a}'"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
                None => Some(expected("a string literal", value)),
            },
            FieldKind::Object(schema) => {
                schema.check_object(value, path, issues);
                None
            }
            FieldKind::StrList => match value.as_array() {
                Some(items) => {
                    for (index, item) in items.iter().enumerate() {
                        FieldKind::Str.check(item, &join(path, &index.to_string()), None, issues);
                    }
                    None
                }
                None => Some(expected("a list", value)),
            },
            FieldKind::ObjectList(schema) => match value.as_array() {
                Some(items) => {
                    for (index, item) in items.iter().enumerate() {
                        schema.check_object(item, &join(path, &index.to_string()), issues);
                    }
                    None
                }
                None => Some(expected("a list", value)),
            },
        };

        if let Some(reason) = problem {
            issues.push(FieldIssue::new(path, name, reason));
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn expected(what: &str, value: &Value) -> String {
    let got = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a float",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    };
    format!("expected {what}, got {got}")
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !s.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

// ---------------------------------------------------------------------------
// Lenient ISO parsing (the only fields allowed to read typed values from strings)
// ---------------------------------------------------------------------------

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// `%z` takes both `+0000` and `+00:00`.
const OFFSET_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Parse an ISO 8601 datetime. Values without an offset are taken as UTC,
/// and a bare date is UTC midnight.
pub fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, OFFSET_DATETIME_FORMAT))
        .or_else(|err| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .map(|date| date.and_time(NaiveTime::MIN))
                })
                .map(|naive| naive.and_utc().fixed_offset())
                .ok_or(err)
        })
}

/// Parse an ISO 8601 date. A datetime string is accepted when its time part
/// is exactly midnight.
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").or_else(|err| match parse_datetime(s) {
        Ok(dt) if dt.time() == NaiveTime::MIN => Ok(dt.date_naive()),
        _ => Err(err),
    })
}

pub(crate) mod iso_datetime {
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_datetime(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, FixedOffset};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<FixedOffset>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => s.serialize_str(&dt.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|raw| super::super::parse_datetime(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}

pub(crate) mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// A single offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted wire path, e.g. `shippingAddress.zip` or `lines.0.qty`.
    /// Empty for the payload root.
    pub path: String,
    /// Rust field name, when the path ends on a declared field.
    pub field: Option<&'static str>,
    pub reason: String,
}

impl FieldIssue {
    fn new(path: &str, field: Option<&'static str>, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        match self.field {
            Some(name) if !self.path.ends_with(name) => {
                write!(f, "{path} ({name}): {}", self.reason)
            }
            _ => write!(f, "{path}: {}", self.reason),
        }
    }
}

/// A payload failed its model's schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} validation error(s) for {model}: {}", .issues.len(), summarize(.issues))]
pub struct ValidationError {
    pub model: &'static str,
    pub issues: Vec<FieldIssue>,
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub(crate) fn single(model: &'static str, path: &str, reason: impl Into<String>) -> Self {
        Self {
            model,
            issues: vec![FieldIssue::new(path, None, reason)],
        }
    }

    fn from_serde(model: &'static str, err: &serde_json::Error) -> Self {
        Self::single(model, "", err.to_string())
    }

    /// Wire paths of every offending field.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|i| i.path.as_str())
    }

    /// The issue reported for a given wire path, if any.
    pub fn issue(&self, path: &str) -> Option<&FieldIssue> {
        self.issues.iter().find(|i| i.path == path)
    }
}

/// Parse a raw body as JSON, reporting syntax errors against `model`.
pub fn parse_json(model: &'static str, body: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(body)
        .map_err(|e| ValidationError::single(model, "", format!("invalid JSON: {e}")))
}

// ---------------------------------------------------------------------------
// Model binding
// ---------------------------------------------------------------------------

/// A typed model bound to its wire schema.
///
/// Decoding always runs the schema first and only then lets serde build the
/// value, so callers see the complete list of problems.
pub trait WireModel: Serialize + DeserializeOwned {
    fn schema() -> &'static Schema;

    fn from_value(value: Value) -> Result<Self, ValidationError> {
        let schema = Self::schema();
        schema.validate(&value)?;
        serde_json::from_value(value).map_err(|e| ValidationError::from_serde(schema.model, &e))
    }

    fn from_json(json: &str) -> Result<Self, ValidationError> {
        Self::from_value(parse_json(Self::schema().model, json)?)
    }

    fn list_from_value(value: Value) -> Result<Vec<Self>, ValidationError> {
        let schema = Self::schema();
        schema.validate_list(&value)?;
        serde_json::from_value(value).map_err(|e| ValidationError::from_serde(schema.model, &e))
    }

    fn list_from_json(json: &str) -> Result<Vec<Self>, ValidationError> {
        Self::list_from_value(parse_json(Self::schema().model, json)?)
    }

    /// Wire representation, using wire names and omitting unset optionals.
    fn to_value(&self) -> Result<Value, ValidationError> {
        serde_json::to_value(self).map_err(|e| ValidationError::from_serde(Self::schema().model, &e))
    }

    /// Run the schema against this value's wire representation.
    fn validate(&self) -> Result<(), ValidationError> {
        Self::schema().validate(&self.to_value()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static INNER: Schema = Schema {
        model: "Inner",
        fields: &[Field::required("code", "Code", FieldKind::OneOf(&["a", "b"]))],
    };

    static OUTER: Schema = Schema {
        model: "Outer",
        fields: &[
            Field::required("count", "count", FieldKind::Int),
            Field::required("price", "price", FieldKind::Float),
            Field::defaulted("flag", "flag", FieldKind::Bool),
            Field::nullable("note", "note", FieldKind::Str),
            Field::nullable("when", "when", FieldKind::DateTime),
            Field::defaulted("inner", "inner", FieldKind::Object(&INNER)),
            Field::defaulted("items", "items", FieldKind::ObjectList(&INNER)),
        ],
    };

    #[test]
    fn accepts_minimal_payload() {
        assert!(OUTER.validate(&json!({"count": 1, "price": 2})).is_ok());
    }

    #[test]
    fn reports_every_issue_at_once() {
        let err = OUTER
            .validate(&json!({
                "price": "1.50",
                "flag": null,
                "inner": {"Code": "z"},
                "items": [{"Code": "a"}, {"Code": "b", "extra": 1}],
                "bogus": true,
            }))
            .unwrap_err();

        let paths: Vec<_> = err.paths().collect();
        assert_eq!(
            paths,
            vec!["count", "price", "flag", "inner.Code", "items.1.extra", "bogus"]
        );
        assert_eq!(err.issue("count").unwrap().reason, "field required");
        assert_eq!(err.issue("price").unwrap().reason, "expected a number, got a string");
        assert_eq!(err.issue("flag").unwrap().reason, "expected a boolean, got null");
        assert!(err.issue("inner.Code").unwrap().reason.contains("not one of 'a', 'b'"));
        assert_eq!(err.model, "Outer");
    }

    #[test]
    fn integers_reject_floats_and_strings() {
        let err = OUTER.validate(&json!({"count": 1.5, "price": 1})).unwrap_err();
        assert_eq!(err.issue("count").unwrap().reason, "expected an integer, got a float");

        let err = OUTER.validate(&json!({"count": "3", "price": 1})).unwrap_err();
        assert_eq!(err.issue("count").unwrap().reason, "expected an integer, got a string");
    }

    #[test]
    fn nullable_fields_accept_null() {
        assert!(OUTER
            .validate(&json!({"count": 1, "price": 1.0, "note": null, "when": null}))
            .is_ok());
    }

    #[test]
    fn datetime_fields_parse_iso_strings() {
        assert!(OUTER
            .validate(&json!({"count": 1, "price": 1.0, "when": "2024-03-01T12:30:00"}))
            .is_ok());
        assert!(OUTER
            .validate(&json!({"count": 1, "price": 1.0, "when": "2024-03-01T12:30:00-05:00"}))
            .is_ok());

        let err = OUTER
            .validate(&json!({"count": 1, "price": 1.0, "when": "yesterday"}))
            .unwrap_err();
        assert!(err.issue("when").unwrap().reason.starts_with("invalid datetime"));
    }

    #[test]
    fn list_validation_prefixes_index() {
        let err = INNER
            .validate_list(&json!([{"Code": "a"}, {"Code": 7}]))
            .unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["1.Code"]);

        let err = INNER.validate_list(&json!({"Code": "a"})).unwrap_err();
        assert_eq!(err.issue("").unwrap().reason, "expected a list, got an object");
    }

    #[test]
    fn naive_datetimes_are_utc() {
        let dt = parse_datetime("2019-06-28T13:08:28.193").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.to_rfc3339(), "2019-06-28T13:08:28.193+00:00");
    }

    #[test]
    fn minute_precision_datetimes_parse() {
        let dt = parse_datetime("2024-05-01T10:15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T10:15:00+00:00");
        let dt = parse_datetime("2024-05-01 10:15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T10:15:00+00:00");
    }

    #[test]
    fn bare_dates_are_utc_midnight() {
        let dt = parse_datetime("2024-05-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn compact_offsets_parse() {
        let dt = parse_datetime("2024-05-01T10:15:00+0000").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.to_rfc3339(), "2024-05-01T10:15:00+00:00");

        let dt = parse_datetime("2024-05-01T10:15:00.5-0500").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn datetime_rejects_partial_values() {
        assert!(parse_datetime("2024-05").is_err());
        assert!(parse_datetime("2024-05-01T10").is_err());
        assert!(parse_datetime("2024-05-01T25:00").is_err());
    }

    #[test]
    fn dates_accept_minute_precision_midnight() {
        assert_eq!(
            parse_date("2024-05-01T00:00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert!(parse_date("2024-05-01T00:01").is_err());
    }

    #[test]
    fn dates_accept_midnight_datetimes_only() {
        assert_eq!(
            parse_date("2019-07-01T00:00:00").unwrap(),
            NaiveDate::from_ymd_opt(2019, 7, 1).unwrap()
        );
        assert!(parse_date("2019-07-01T08:00:00").is_err());
        assert!(parse_date("07/01/2019").is_err());
    }

    #[test]
    fn email_check_is_syntactic() {
        assert!(is_email("buyer@example.com"));
        assert!(!is_email("buyer@localhost"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("buyer example@example.com"));
    }

    #[test]
    fn display_names_domain_field_when_alias_differs() {
        let issue = FieldIssue::new("shippingAddress.zip", Some("postal_code"), "field required");
        assert_eq!(issue.to_string(), "shippingAddress.zip (postal_code): field required");

        let issue = FieldIssue::new("lines.0.identifier", Some("identifier"), "field required");
        assert_eq!(issue.to_string(), "lines.0.identifier: field required");
    }
}
