//! Payment step of the checkout.
//!
//! Card data is validated and then reduced to a [`PaymentSummary`]; the full
//! number and CVV never leave [`PaymentDetails`].

use crate::validation::FieldErrors;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    DebitCard,
    /// Bank transfer, no card data required.
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Transfer => "transfer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Tarjeta de crédito",
            PaymentMethod::DebitCard => "Tarjeta de débito",
            PaymentMethod::Transfer => "Transferencia bancaria",
        }
    }

    pub fn requires_card(&self) -> bool {
        !matches!(self, PaymentMethod::Transfer)
    }

    pub fn all() -> &'static [PaymentMethod] {
        &[
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::Transfer,
        ]
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "credit_card" | "credito" | "credit" => Ok(PaymentMethod::CreditCard),
            "debit_card" | "debito" | "debit" => Ok(PaymentMethod::DebitCard),
            "transfer" | "transferencia" => Ok(PaymentMethod::Transfer),
            _ => Err(format!("Método de pago desconocido: {s}")),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Raw payment form input.
#[derive(Clone, Default, PartialEq)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    /// 16 digits, spaces allowed.
    pub card_number: String,
    pub holder_name: String,
    /// MM/YY
    pub expiry: String,
    pub cvv: String,
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("method", &self.method)
            .field("card_number", &mask(&self.card_digits()))
            .field("holder_name", &self.holder_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

impl PaymentDetails {
    pub fn transfer() -> Self {
        Self {
            method: PaymentMethod::Transfer,
            ..Default::default()
        }
    }

    pub fn card(
        method: PaymentMethod,
        card_number: impl Into<String>,
        holder_name: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            method,
            card_number: card_number.into(),
            holder_name: holder_name.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    fn card_digits(&self) -> String {
        self.card_number.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Validate against `today` (expiry must not be in the past).
    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !self.method.requires_card() {
            return Ok(());
        }

        let digits = self.card_digits();
        if digits.is_empty() {
            errors.add("card_number", "El número de tarjeta es obligatorio");
        } else if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
            errors.add("card_number", "El número de tarjeta debe tener 16 dígitos");
        }

        if self.holder_name.trim().is_empty() {
            errors.add("holder_name", "El nombre del titular es obligatorio");
        }

        match parse_expiry(&self.expiry) {
            None => errors.add("expiry", "La fecha de vencimiento debe tener formato MM/AA"),
            Some((year, month)) => {
                if (year, month) < (today.year(), today.month()) {
                    errors.add("expiry", "La tarjeta está vencida");
                }
            }
        }

        let cvv = self.cvv.trim();
        if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
            errors.add("cvv", "El CVV debe tener 3 o 4 dígitos");
        }

        errors.into_result()
    }

    /// Validate and keep only what the summary step shows.
    pub fn summarize(&self, today: NaiveDate) -> Result<PaymentSummary, FieldErrors> {
        self.validate(today)?;
        let (last_four, holder_name) = if self.method.requires_card() {
            let digits = self.card_digits();
            (
                Some(digits[digits.len() - 4..].to_string()),
                Some(self.holder_name.trim().to_string()),
            )
        } else {
            (None, None)
        };
        Ok(PaymentSummary {
            method: self.method,
            last_four,
            holder_name,
        })
    }
}

/// What remains of the payment data after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub method: PaymentMethod,
    #[serde(default)]
    pub last_four: Option<String>,
    #[serde(default)]
    pub holder_name: Option<String>,
}

impl PaymentSummary {
    /// "Tarjeta de crédito •••• 4242"
    pub fn describe(&self) -> String {
        match &self.last_four {
            Some(last_four) => format!("{} •••• {}", self.method.display_name(), last_four),
            None => self.method.display_name().to_string(),
        }
    }
}

/// Parse `MM/YY` into (year, month).
fn parse_expiry(value: &str) -> Option<(i32, u32)> {
    let (month, year) = value.trim().split_once('/')?;
    if month.len() != 2 || year.len() != 2 {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((2000 + year, month))
}

fn mask(digits: &str) -> String {
    if digits.len() < 4 {
        return "****".to_string();
    }
    format!("****{}", &digits[digits.len() - 4..])
}
