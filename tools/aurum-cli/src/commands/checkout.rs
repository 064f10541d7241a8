//! Three-step checkout: address, payment, summary.

use anyhow::{bail, Result};
use aurum_auth::AuthError;
use aurum_commerce::prelude::*;
use aurum_storefront::{CheckoutWizard, Storefront, StorefrontError};
use chrono::Local;

use crate::context::Context;
use crate::prompts;

const SUMMARY_ACTIONS: [&str; 4] = [
    "Confirmar pedido",
    "Cambiar dirección",
    "Cambiar método de pago",
    "Cancelar",
];

/// Run the checkout command.
pub async fn run(ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    let mut wizard = match shop.begin_checkout() {
        Ok(wizard) => wizard,
        Err(StorefrontError::Auth(AuthError::NotAuthenticated)) => {
            bail!("Inicia sesión para finalizar la compra: aurum login")
        }
        Err(e) => return Err(e.into()),
    };

    let mut address_draft = saved_address(&shop).await;

    loop {
        let step = wizard.step();
        ctx.output.step(step.number(), 3, step.display_name());
        match step {
            CheckoutStep::Address => {
                let initial = wizard
                    .flow()
                    .shipping_address
                    .clone()
                    .or_else(|| address_draft.take());
                let draft = prompts::address(initial.as_ref())?;
                if let Err(e) = wizard.submit_address(draft.clone()) {
                    if !prompts::report_field_errors(&ctx.output, &e) {
                        return Err(e.into());
                    }
                    address_draft = Some(draft);
                }
            }
            CheckoutStep::Payment => {
                let details = prompts::payment()?;
                let today = Local::now().date_naive();
                if let Err(e) = wizard.submit_payment(&details, today) {
                    if !prompts::report_field_errors(&ctx.output, &e) {
                        return Err(e.into());
                    }
                }
            }
            CheckoutStep::Summary => {
                wizard.reprice(shop.cart.cart())?;
                print_summary(&wizard, &shop, ctx);
                match prompts::select("¿Qué deseas hacer?", &SUMMARY_ACTIONS, 0)? {
                    0 => break,
                    1 => wizard.edit(CheckoutStep::Address)?,
                    2 => wizard.edit(CheckoutStep::Payment)?,
                    _ => {
                        ctx.output.info("Compra cancelada. Tu carrito se mantiene.");
                        return Ok(());
                    }
                }
            }
            CheckoutStep::Confirmed => break,
        }
    }

    let spinner = ctx.output.spinner("Procesando pedido...");
    let confirmation = wizard.confirm(&mut shop.cart).await;
    spinner.finish_and_clear();
    let confirmation = confirmation?;

    if ctx.output.is_json() {
        ctx.output.json(&confirmation);
        return Ok(());
    }
    ctx.output.success("¡Gracias por tu compra!");
    ctx.output.kv("Pedido", &confirmation.order_number);
    ctx.output.kv("Total", &confirmation.pricing.total.display());
    ctx.output.kv("Pago", &confirmation.payment.describe());
    ctx.output.kv(
        "Entrega estimada",
        &confirmation.estimated_delivery.format("%d-%m-%Y").to_string(),
    );
    Ok(())
}

/// The customer's default address, when the API has one.
async fn saved_address(shop: &Storefront) -> Option<ShippingAddress> {
    let customer = shop.auth.customer_id()?.clone();
    match shop.addresses().default_for(&customer).await {
        Ok(found) => found.map(|a| a.address),
        Err(e) => {
            tracing::debug!(error = %e, "no saved address");
            None
        }
    }
}

fn print_summary(wizard: &CheckoutWizard, shop: &Storefront, ctx: &Context) {
    let pricing = wizard.pricing();
    for line in &pricing.lines {
        ctx.output.list_item(&format!(
            "{} x{} · {}",
            line.name,
            line.quantity,
            line.line_total.display()
        ));
    }
    println!();
    ctx.output.pricing(pricing, &shop.cart.policy().free_threshold);
    if let Some(address) = &wizard.flow().shipping_address {
        ctx.output.kv("Enviar a", &address.one_line());
    }
    if let Some(payment) = &wizard.flow().payment {
        ctx.output.kv("Pago", &payment.describe());
    }
}
