//! Checkout flow state machine.

use crate::checkout::{PaymentDetails, PaymentSummary, ShippingAddress};
use crate::validation::FieldErrors;
use crate::CommerceError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps in the checkout flow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Shipping address.
    #[default]
    Address,
    /// Payment details.
    Payment,
    /// Order review before confirmation.
    Summary,
    /// Order placed.
    Confirmed,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Address => "address",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Summary => "summary",
            CheckoutStep::Confirmed => "confirmed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Address => "Dirección",
            CheckoutStep::Payment => "Pago",
            CheckoutStep::Summary => "Resumen",
            CheckoutStep::Confirmed => "Confirmado",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Address => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Summary => 3,
            CheckoutStep::Confirmed => 4,
        }
    }

    pub fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Address => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => Some(CheckoutStep::Summary),
            CheckoutStep::Summary => Some(CheckoutStep::Confirmed),
            CheckoutStep::Confirmed => None,
        }
    }

    pub fn previous(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Address => None,
            CheckoutStep::Payment => Some(CheckoutStep::Address),
            CheckoutStep::Summary => Some(CheckoutStep::Payment),
            // No way back from a placed order.
            CheckoutStep::Confirmed => None,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Checkout flow state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CheckoutFlow {
    /// Current step.
    pub step: CheckoutStep,
    /// Completed steps.
    pub completed_steps: Vec<CheckoutStep>,
    /// Shipping address, stored once valid.
    pub shipping_address: Option<ShippingAddress>,
    /// Validated payment data.
    pub payment: Option<PaymentSummary>,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the data needed to enter `step` is present.
    pub fn can_advance_to(&self, step: CheckoutStep) -> bool {
        match step {
            CheckoutStep::Address => true,
            CheckoutStep::Payment => self.shipping_address.is_some(),
            CheckoutStep::Summary => {
                self.can_advance_to(CheckoutStep::Payment) && self.payment.is_some()
            }
            CheckoutStep::Confirmed => self.can_advance_to(CheckoutStep::Summary),
        }
    }

    /// Advance to the next step.
    pub fn advance(&mut self) -> Result<CheckoutStep, CommerceError> {
        let next = self
            .step
            .next()
            .ok_or_else(|| CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            })?;

        if !self.can_advance_to(next) {
            return Err(CommerceError::CheckoutIncomplete(
                self.missing_for_step(next).join(", "),
            ));
        }

        if !self.completed_steps.contains(&self.step) {
            self.completed_steps.push(self.step);
        }
        self.step = next;

        Ok(next)
    }

    /// Go back to the previous step.
    pub fn go_back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let prev = self
            .step
            .previous()
            .ok_or_else(|| CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            })?;
        self.step = prev;
        Ok(prev)
    }

    /// Revisit a completed step (or stay on the current one).
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), CommerceError> {
        if self.step == CheckoutStep::Confirmed && step != CheckoutStep::Confirmed {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: step.as_str().to_string(),
            });
        }
        if step == self.step || self.completed_steps.contains(&step) {
            self.step = step;
            Ok(())
        } else {
            Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: step.as_str().to_string(),
            })
        }
    }

    fn missing_for_step(&self, step: CheckoutStep) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if step >= CheckoutStep::Payment && self.shipping_address.is_none() {
            missing.push("dirección de envío");
        }
        if step >= CheckoutStep::Summary && self.payment.is_none() {
            missing.push("método de pago");
        }
        missing
    }

    /// Validate and store the shipping address.
    pub fn set_shipping_address(&mut self, address: ShippingAddress) -> Result<(), FieldErrors> {
        let address = address.normalized();
        address.validate()?;
        self.shipping_address = Some(address);
        Ok(())
    }

    /// Validate the payment form and keep its summary.
    pub fn set_payment(
        &mut self,
        details: &PaymentDetails,
        today: NaiveDate,
    ) -> Result<(), FieldErrors> {
        self.payment = Some(details.summarize(today)?);
        Ok(())
    }

    pub fn is_confirmed(&self) -> bool {
        self.step == CheckoutStep::Confirmed
    }

    /// Progress through the three visible steps, as a percentage.
    pub fn progress_percent(&self) -> u8 {
        (self.step.number().min(3) as u16 * 100 / 3) as u8
    }
}
