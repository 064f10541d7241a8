//! Form validation rules.
//!
//! Every form in the storefront and the back-office validates with the same
//! handful of rules. Errors are collected per field so a form can show all
//! problems at once instead of failing on the first.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// A single field error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field name.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Accumulated validation errors for a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the outcome of a rule.
    pub fn check(&mut self, field: &'static str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether a given field has at least one error.
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// First message recorded for a field.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Merge another set of errors into this one.
    pub fn extend(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    /// `Ok(())` when no errors were recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // +56 9 XXXX XXXX, or the bare 9-digit mobile number
    RE.get_or_init(|| Regex::new(r"^(\+?56)?9\d{8}$").expect("phone pattern is valid"))
}

/// Field must contain something other than whitespace.
pub fn required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{label} es obligatorio"))
    } else {
        Ok(())
    }
}

/// Minimum length after trimming, counted in characters.
pub fn min_len(value: &str, min: usize, label: &str) -> Result<(), String> {
    if value.trim().chars().count() < min {
        Err(format!("{label} debe tener al menos {min} caracteres"))
    } else {
        Ok(())
    }
}

pub fn email(value: &str) -> Result<(), String> {
    if email_regex().is_match(value.trim()) {
        Ok(())
    } else {
        Err("Email inválido".to_string())
    }
}

pub fn positive_price(amount: i64) -> Result<(), String> {
    if amount > 0 {
        Ok(())
    } else {
        Err("El precio debe ser mayor a 0".to_string())
    }
}

pub fn non_negative(value: i64, label: &str) -> Result<(), String> {
    if value >= 0 {
        Ok(())
    } else {
        Err(format!("{label} no puede ser negativo"))
    }
}

/// Chilean mobile number; spaces and dashes are ignored.
pub fn phone_cl(value: &str) -> Result<(), String> {
    let digits: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if phone_regex().is_match(&digits) {
        Ok(())
    } else {
        Err("Teléfono inválido (formato +569XXXXXXXX)".to_string())
    }
}

pub fn url(value: &str) -> Result<(), String> {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
        _ => Err("URL inválida".to_string()),
    }
}
