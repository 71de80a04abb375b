//! Form validation.
//!
//! `FormValidator` evaluates an ordered list of `(field, predicate, message)`
//! rules against submitted form values and collects failures into
//! [`FieldErrors`]. Evaluation short-circuits per field: the first failing rule
//! of a field records its message and the remaining rules of that field are
//! skipped. Other fields are still evaluated.
//!
//! Values are normalized before any rule runs: surrounding whitespace is
//! trimmed and an empty value counts as absent. An absent value fails only the
//! `required` rule; optional absent fields skip their rules entirely.
//!
//! ```ignore
//! let result = FormValidator::new()
//!     .field("name", input.text("name"))
//!     .required("Nama wajib diisi.")
//!     .max_chars(255, "Nama maksimal 255 karakter.")
//!     .field("price", input.text("price"))
//!     .required("Harga wajib diisi.")
//!     .numeric("Harga harus berupa angka.")
//!     .validate();
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{ValidateLength, ValidateUrl};

lazy_static! {
    /// Characters allowed to survive in a stored upload filename.
    /// Every run of other characters is replaced by a single underscore.
    /// - "foto produk (1).png" -> "foto_produk_1_.png"
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

// =============================================================================
// FIELD ERRORS
// =============================================================================

/// Field name -> error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
impl FieldErrors {
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All messages flattened in field order
    pub fn messages(&self) -> Vec<String> {
        self.0.values().flatten().cloned().collect()
    }
}

// =============================================================================
// VALIDATOR
// =============================================================================

type Predicate<'a> = Box<dyn Fn(&str) -> bool + Send + 'a>;

struct Rule<'a> {
    check: Predicate<'a>,
    message: String,
}

struct FieldSpec<'a> {
    name: &'static str,
    value: Option<&'a str>,
    required: Option<String>,
    rules: Vec<Rule<'a>>,
}

/// Builder for an ordered rule set. Rule methods attach to the most recently
/// declared field.
#[derive(Default)]
pub struct FormValidator<'a> {
    fields: Vec<FieldSpec<'a>>,
}

impl<'a> FormValidator<'a> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare the next field and its submitted value.
    pub fn field(mut self, name: &'static str, value: Option<&'a str>) -> Self {
        self.fields.push(FieldSpec {
            name,
            value: value.map(str::trim).filter(|v| !v.is_empty()),
            required: None,
            rules: Vec::new(),
        });
        self
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.required = Some(message.into());
        }
        self
    }

    /// Add an arbitrary predicate over the normalized value.
    pub fn check(
        mut self,
        predicate: impl Fn(&str) -> bool + Send + 'a,
        message: impl Into<String>,
    ) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.rules.push(Rule {
                check: Box::new(predicate),
                message: message.into(),
            });
        }
        self
    }

    /// Add a rule whose outcome was computed beforehand (e.g. a uniqueness lookup).
    pub fn holds(self, ok: bool, message: impl Into<String>) -> Self {
        self.check(move |_| ok, message)
    }

    pub fn max_chars(self, max: u64, message: impl Into<String>) -> Self {
        self.check(
            move |v| v.validate_length(None, Some(max), None),
            message,
        )
    }

    pub fn numeric(self, message: impl Into<String>) -> Self {
        self.check(|v| parse_decimal(v).is_some(), message)
    }

    pub fn integer(self, message: impl Into<String>) -> Self {
        self.check(|v| parse_integer(v).is_some(), message)
    }

    /// Value parses as a number that is zero or greater
    pub fn non_negative(self, message: impl Into<String>) -> Self {
        self.check(
            |v| parse_decimal(v).is_some_and(|d| d >= Decimal::ZERO),
            message,
        )
    }

    /// Value parses as a number no greater than `max`
    pub fn max_decimal(self, max: Decimal, message: impl Into<String>) -> Self {
        self.check(move |v| parse_decimal(v).is_some_and(|d| d <= max), message)
    }

    pub fn boolean(self, message: impl Into<String>) -> Self {
        self.check(|v| parse_strict_bool(v).is_some(), message)
    }

    pub fn url(self, message: impl Into<String>) -> Self {
        self.check(|v| v.validate_url(), message)
    }

    /// Run every field's rules in declaration order.
    pub fn validate(self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        for field in self.fields {
            let Some(value) = field.value else {
                if let Some(message) = field.required {
                    errors.add(field.name, message);
                }
                continue;
            };

            if let Some(rule) = field.rules.iter().find(|rule| !(rule.check)(value)) {
                errors.add(field.name, rule.message.clone());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// =============================================================================
// VALUE PARSING
// =============================================================================

/// Parse a decimal number, accepting scientific notation ("1e3").
/// Digit separators ("1_000") are not numbers here.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if value.contains('_') {
        return None;
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

pub fn parse_integer(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok()
}

/// Boolean form flag: only "1", "0", "true" and "false" are accepted.
pub fn parse_strict_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Lenient truthiness: "1", "true", "on" and "yes" are true, anything else
/// (including a missing value) is false.
pub fn parse_permissive_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    })
}

/// Reduce a client-supplied filename to a safe single path segment.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}
