//! Three-step checkout over the current cart.

use crate::error::Result;
use crate::state::CartStore;
use aurum_commerce::cart::{Cart, CartPricing};
use aurum_commerce::checkout::{
    CheckoutFlow, CheckoutStep, OrderConfirmation, PaymentDetails, ShippingAddress,
    ShippingPolicy,
};
use aurum_commerce::CommerceError;
use chrono::{DateTime, NaiveDate, Utc};

/// Drives [`CheckoutFlow`] for one purchase.
///
/// No order is sent to the API: confirming builds a simulated
/// [`OrderConfirmation`] and empties the cart.
#[derive(Debug, Clone)]
pub struct CheckoutWizard {
    flow: CheckoutFlow,
    policy: ShippingPolicy,
    pricing: CartPricing,
}

impl CheckoutWizard {
    /// Refuses an empty cart.
    pub fn start(cart: &Cart, policy: ShippingPolicy) -> Result<Self> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }
        let pricing = cart.calculate_pricing(&policy)?;
        Ok(Self {
            flow: CheckoutFlow::new(),
            policy,
            pricing,
        })
    }

    pub fn step(&self) -> CheckoutStep {
        self.flow.step
    }

    pub fn flow(&self) -> &CheckoutFlow {
        &self.flow
    }

    pub fn pricing(&self) -> &CartPricing {
        &self.pricing
    }

    /// Recompute totals after the cart changed mid-checkout.
    pub fn reprice(&mut self, cart: &Cart) -> Result<()> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }
        self.pricing = cart.calculate_pricing(&self.policy)?;
        Ok(())
    }

    /// Step 1: store the address and move to payment.
    pub fn submit_address(&mut self, address: ShippingAddress) -> Result<CheckoutStep> {
        self.flow.go_to(CheckoutStep::Address)?;
        self.flow.set_shipping_address(address)?;
        Ok(self.flow.advance()?)
    }

    /// Step 2: validate the payment form and move to the summary.
    pub fn submit_payment(&mut self, details: &PaymentDetails, today: NaiveDate) -> Result<CheckoutStep> {
        self.flow.go_to(CheckoutStep::Payment)?;
        self.flow.set_payment(details, today)?;
        Ok(self.flow.advance()?)
    }

    pub fn back(&mut self) -> Result<CheckoutStep> {
        Ok(self.flow.go_back()?)
    }

    /// Revisit a completed step.
    pub fn edit(&mut self, step: CheckoutStep) -> Result<()> {
        Ok(self.flow.go_to(step)?)
    }

    /// Step 3: place the (simulated) order and empty the cart.
    pub async fn confirm_at(
        &mut self,
        cart: &mut CartStore,
        now: DateTime<Utc>,
    ) -> Result<OrderConfirmation> {
        if self.flow.step != CheckoutStep::Summary {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.flow.step.as_str().to_string(),
                to: CheckoutStep::Confirmed.as_str().to_string(),
            }
            .into());
        }
        self.reprice(cart.cart())?;

        let (Some(address), Some(payment)) =
            (self.flow.shipping_address.clone(), self.flow.payment.clone())
        else {
            return Err(CommerceError::CheckoutIncomplete("resumen".to_string()).into());
        };

        let confirmation = OrderConfirmation::simulate(
            cart.cart(),
            self.pricing.clone(),
            address,
            payment,
            now,
        );
        self.flow.advance()?;
        cart.clear().await?;

        tracing::info!(
            order = %confirmation.order_number,
            total = confirmation.pricing.total.amount,
            items = confirmation.item_count(),
            "order confirmed"
        );
        Ok(confirmation)
    }

    pub async fn confirm(&mut self, cart: &mut CartStore) -> Result<OrderConfirmation> {
        self.confirm_at(cart, Utc::now()).await
    }
}
