//! Shopping cart commands.

use anyhow::{bail, Result};
use aurum_commerce::prelude::*;
use aurum_storefront::state::CartMode;
use aurum_storefront::Storefront;
use dialoguer::Confirm;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add { id, quantity } => {
            let product = find_product(&ProductId::new(id), &mut shop).await?;
            let total = shop.cart.add(&product, quantity).await?;
            ctx.output
                .success(&format!("{} agregado al carrito ({} en total)", product.name, total));
        }
        CartCommand::Decrease { id } => match shop.cart.decrease(&ProductId::new(id)).await? {
            Some(left) => ctx.output.success(&format!("Quedan {left}")),
            None => ctx.output.success("Producto quitado del carrito"),
        },
        CartCommand::Set { id, quantity } => {
            if !shop.cart.set_quantity(&ProductId::new(id.clone()), quantity).await? {
                bail!("El producto {id} no está en el carrito");
            }
            ctx.output.success("Cantidad actualizada");
        }
        CartCommand::Remove { id } => {
            if !shop.cart.remove(&ProductId::new(id.clone())).await? {
                bail!("El producto {id} no está en el carrito");
            }
            ctx.output.success("Producto quitado del carrito");
        }
        CartCommand::Clear { yes } => {
            if shop.cart.cart().is_empty() {
                ctx.output.info("El carrito ya está vacío");
                return Ok(());
            }
            if !yes
                && !Confirm::new()
                    .with_prompt("¿Vaciar el carrito?")
                    .default(false)
                    .interact()?
            {
                return Ok(());
            }
            shop.cart.clear().await?;
            ctx.output.success("Carrito vaciado");
        }
    }
    if shop.cart.is_offline() {
        ctx.output.warn(&format!(
            "Sin conexión con la tienda: {} cambios guardados en este equipo se enviarán al reconectar",
            shop.cart.pending_changes()
        ));
    }
    show(&shop, ctx)
}

/// The product from the cached catalog, or straight from the API.
async fn find_product(id: &ProductId, shop: &mut Storefront) -> Result<Product> {
    if let Some(product) = shop.catalog.load().await?.product(id) {
        return Ok(product.clone());
    }
    Ok(shop.products().get(id).await?)
}

pub(crate) fn show(shop: &Storefront, ctx: &Context) -> Result<()> {
    let cart = shop.cart.cart();
    let pricing = shop.cart.pricing()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "cart": cart, "pricing": pricing }));
        return Ok(());
    }

    let owner = match shop.cart.mode() {
        CartMode::Guest => "invitado".to_string(),
        CartMode::Backend(_) => shop.user().display_name().to_string(),
    };
    ctx.output.header(&format!("Carrito ({owner})"));
    if cart.is_empty() {
        ctx.output.info("Tu carrito está vacío");
        return Ok(());
    }

    let widths = [6, 30, 5, 12];
    ctx.output.table_row(&["ID", "Producto", "Cant.", "Total"], &widths);
    for line in &pricing.lines {
        ctx.output.table_row(
            &[
                line.product_id.as_str(),
                &truncate(&line.name, 30),
                &line.quantity.to_string(),
                &line.line_total.display(),
            ],
            &widths,
        );
    }
    println!();
    ctx.output.pricing(&pricing, &shop.cart.policy().free_threshold);
    Ok(())
}
