//! Commerce error types.

use crate::validation::FieldErrors;
use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Producto no encontrado: {0}")]
    ProductNotFound(String),

    /// Item not in cart.
    #[error("El producto {0} no está en el carrito")]
    ItemNotInCart(String),

    /// Product cannot be bought right now.
    #[error("Producto sin stock: {0}")]
    OutOfStock(String),

    /// Invalid quantity.
    #[error("Cantidad inválida: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("La cantidad {0} supera el máximo permitido ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Checkout started without items.
    #[error("El carrito está vacío")]
    EmptyCart,

    /// Invalid checkout state transition.
    #[error("Transición de checkout inválida: {from} -> {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout step data missing or invalid.
    #[error("Checkout incompleto: {0}")]
    CheckoutIncomplete(String),

    /// Currency mismatch.
    #[error("Moneda incompatible: se esperaba {expected}, se recibió {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Desbordamiento aritmético en cálculo de montos")]
    Overflow,

    /// Form validation failed.
    #[error("Error de validación: {0}")]
    Validation(FieldErrors),
}

impl From<FieldErrors> for CommerceError {
    fn from(errors: FieldErrors) -> Self {
        CommerceError::Validation(errors)
    }
}
