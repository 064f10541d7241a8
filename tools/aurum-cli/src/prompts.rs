//! Interactive form prompts.

use anyhow::Result;
use aurum_commerce::prelude::*;
use aurum_storefront::StorefrontError;
use dialoguer::{Confirm, Input, Password, Select};

use crate::output::Output;

/// Text field, pre-filled with `initial`.
pub fn text(prompt: &str, initial: &str) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if !initial.is_empty() {
        input = input.with_initial_text(initial);
    }
    Ok(input.interact_text()?)
}

/// Text field that may be left blank.
pub fn optional(prompt: &str, initial: Option<&str>) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(initial.unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim().to_string();
    Ok((!value.is_empty()).then_some(value))
}

pub fn secret(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(default).interact()?)
}

/// Pick one of `items`; returns its index.
pub fn select<T: ToString>(prompt: &str, items: &[T], default: usize) -> Result<usize> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()?)
}

/// Shipping address form.
pub fn address(initial: Option<&ShippingAddress>) -> Result<ShippingAddress> {
    let base = initial.cloned().unwrap_or_default();
    Ok(ShippingAddress {
        full_name: text("Nombre completo", &base.full_name)?,
        street: text("Calle", &base.street)?,
        number: text("Número", &base.number)?,
        apartment: optional("Depto / oficina", base.apartment.as_deref())?,
        commune: text("Comuna", &base.commune)?,
        city: text("Ciudad", &base.city)?,
        region: text("Región", &base.region)?,
        phone: text("Teléfono (+56 9 ...)", &base.phone)?,
        notes: optional("Indicaciones de entrega", base.notes.as_deref())?,
    })
}

/// Payment form. Card data is only asked for card methods.
pub fn payment() -> Result<PaymentDetails> {
    let methods: Vec<&str> = PaymentMethod::all().iter().map(|m| m.display_name()).collect();
    let method = PaymentMethod::all()[select("Método de pago", &methods, 0)?];
    if !method.requires_card() {
        return Ok(PaymentDetails::transfer());
    }
    Ok(PaymentDetails::card(
        method,
        text("Número de tarjeta", "")?,
        text("Titular", "")?,
        text("Vencimiento (MM/AA)", "")?,
        secret("CVV")?,
    ))
}

/// Print per-field messages. Returns false when `err` is not a form error.
pub fn report_field_errors(output: &Output, err: &StorefrontError) -> bool {
    let Some(errors) = err.field_errors() else {
        return false;
    };
    output.warn("Revisa los datos del formulario:");
    for error in errors.iter() {
        output.list_item(&format!("{}: {}", error.field, error.message));
    }
    true
}
