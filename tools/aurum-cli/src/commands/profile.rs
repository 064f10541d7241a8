//! Account page: profile, purchase history and saved addresses.

use anyhow::{anyhow, Result};
use aurum_commerce::prelude::*;
use aurum_storefront::Storefront;

use super::{AddressCommand, ProfileArgs, ProfileCommand};
use crate::context::Context;
use crate::output::status_badge;
use crate::prompts;

/// Run the profile command.
pub async fn run(args: ProfileArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    let customer = shop
        .auth
        .customer_id()
        .cloned()
        .ok_or_else(|| anyhow!("Inicia sesión para ver tu perfil: aurum login"))?;

    match args.command.unwrap_or(ProfileCommand::Show) {
        ProfileCommand::Show => show(&mut shop, ctx).await,
        ProfileCommand::Update { name, phone } => {
            let update = CustomerUpdate { name, phone };
            let updated = shop.customers().update_profile(&customer, update).await?;
            shop.auth.apply_profile(&updated)?;
            ctx.output.success("Perfil actualizado");
            Ok(())
        }
        ProfileCommand::Orders => orders(&shop, &customer, ctx).await,
        ProfileCommand::Addresses { command } => {
            addresses(command.unwrap_or(AddressCommand::List), &shop, &customer, ctx).await
        }
    }
}

async fn show(shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let customer = shop.auth.refresh_profile().await?;
    if ctx.output.is_json() {
        ctx.output.json(&customer);
        return Ok(());
    }
    ctx.output.header("Mi cuenta");
    ctx.output.kv("Nombre", &customer.name);
    ctx.output.kv("Email", &customer.email);
    ctx.output
        .kv("Teléfono", customer.phone.as_deref().unwrap_or("-"));
    ctx.output.kv("Rol", customer.role.display_name());
    if let Some(created) = customer.created_at {
        ctx.output
            .kv("Cliente desde", &created.format("%d-%m-%Y").to_string());
    }
    Ok(())
}

async fn orders(shop: &Storefront, customer: &CustomerId, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Cargando pedidos...");
    let orders = shop.orders().history(customer).await;
    spinner.finish_and_clear();
    let orders = orders?;

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }
    ctx.output.header("Mis pedidos");
    if orders.is_empty() {
        ctx.output.info("Aún no tienes pedidos");
        return Ok(());
    }
    print_orders(&orders, ctx);
    Ok(())
}

pub(crate) fn print_orders(orders: &[Order], ctx: &Context) {
    let widths = [8, 12, 14, 12, 6];
    ctx.output
        .table_row(&["Pedido", "Fecha", "Estado", "Total", "Items"], &widths);
    for order in orders {
        let date = order
            .created_at
            .map(|d| d.format("%d-%m-%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                order.id.as_str(),
                &date,
                &status_badge(order.status),
                &order.total.display(),
                &order.item_count().to_string(),
            ],
            &widths,
        );
    }
}

async fn addresses(
    command: AddressCommand,
    shop: &Storefront,
    customer: &CustomerId,
    ctx: &Context,
) -> Result<()> {
    let service = shop.addresses();
    match command {
        AddressCommand::List => {
            let addresses = service.list(customer).await?;
            if ctx.output.is_json() {
                ctx.output.json(&addresses);
                return Ok(());
            }
            ctx.output.header("Mis direcciones");
            if addresses.is_empty() {
                ctx.output.info("No tienes direcciones guardadas");
            }
            for a in &addresses {
                let marker = if a.is_default { " (predeterminada)" } else { "" };
                ctx.output
                    .list_item(&format!("[{}] {}{}", a.id, a.address.one_line(), marker));
            }
            Ok(())
        }
        AddressCommand::Add { default } => {
            let mut draft = None;
            loop {
                let address = prompts::address(draft.as_ref())?;
                match service.create(customer, address.clone(), default).await {
                    Ok(saved) => {
                        ctx.output
                            .success(&format!("Dirección guardada ({})", saved.id));
                        return Ok(());
                    }
                    Err(e) if prompts::report_field_errors(&ctx.output, &e) => {
                        draft = Some(address);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
        AddressCommand::Default { id } => {
            let mut address = service
                .list(customer)
                .await?
                .into_iter()
                .find(|a| a.id.as_str() == id)
                .ok_or_else(|| anyhow!("No existe la dirección {id}"))?;
            address.is_default = true;
            service.update(address).await?;
            ctx.output.success("Dirección predeterminada actualizada");
            Ok(())
        }
        AddressCommand::Delete { id } => {
            service.delete(&AddressId::new(id)).await?;
            ctx.output.success("Dirección eliminada");
            Ok(())
        }
    }
}
