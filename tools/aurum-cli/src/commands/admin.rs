//! Back-office: dashboard, catalog management, users, inbox and orders.

use anyhow::{anyhow, bail, Result};
use aurum_auth::User;
use aurum_commerce::prelude::*;
use aurum_storefront::{Resolution, Storefront, StorefrontError};
use dialoguer::{Input, MultiSelect};

use super::{
    AdminArgs, AdminCommand, AdminProductCommand, MessageCommand, OrderCommand, TaxonomyCommand,
    UserCommand,
};
use crate::context::Context;
use crate::output::{status_badge, truncate};
use crate::prompts;

/// Run the admin command.
pub async fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    if let Resolution::Redirect { .. } = shop.navigate("/admin") {
        bail!("Se requieren permisos de administrador");
    }
    let acting = shop.user();

    match args.command {
        AdminCommand::Dashboard => dashboard(&shop, &acting, ctx).await,
        AdminCommand::Products { command } => {
            products(command.unwrap_or(AdminProductCommand::List), &mut shop, ctx).await
        }
        AdminCommand::Categories { command } => {
            categories(command.unwrap_or(TaxonomyCommand::List), &mut shop, ctx).await
        }
        AdminCommand::Collections { command } => {
            collections(command.unwrap_or(TaxonomyCommand::List), &mut shop, ctx).await
        }
        AdminCommand::Users { command } => {
            users(command.unwrap_or(UserCommand::List), &shop, &acting, ctx).await
        }
        AdminCommand::Messages { command } => {
            messages(command.unwrap_or(MessageCommand::List), &shop, &acting, ctx).await
        }
        AdminCommand::Orders { command } => {
            orders(
                command.unwrap_or(OrderCommand::List { status: None }),
                &shop,
                &acting,
                ctx,
            )
            .await
        }
    }
}

async fn dashboard(shop: &Storefront, acting: &User, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Calculando...");
    let stats = shop.dashboard().stats(acting).await;
    spinner.finish_and_clear();
    let stats = stats?;

    if ctx.output.is_json() {
        ctx.output.json(&stats);
        return Ok(());
    }
    ctx.output.header("Panel de administración");
    ctx.output.kv("Productos", &stats.product_count.to_string());
    ctx.output.kv("Categorías", &stats.category_count.to_string());
    ctx.output.kv("Colecciones", &stats.collection_count.to_string());
    ctx.output.kv("Clientes", &stats.customer_count.to_string());
    ctx.output
        .kv("Mensajes sin leer", &stats.unread_messages.to_string());
    ctx.output
        .kv("Valor del inventario", &stats.inventory_value.display());

    if !stats.by_category.is_empty() {
        ctx.output.header("Productos por categoría");
        for share in &stats.by_category {
            let bar = "█".repeat(usize::from(share.percent / 5));
            ctx.output.table_row(
                &[
                    &truncate(&share.name, 18),
                    &format!("{:>3}%", share.percent),
                    &bar,
                ],
                &[18, 4, 20],
            );
        }
    }
    if !stats.low_stock.is_empty() {
        ctx.output.header("Stock bajo");
        ctx.output.products(&stats.low_stock);
    }
    Ok(())
}

// Products

async fn products(command: AdminProductCommand, shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let service = shop.products();
    match command {
        AdminProductCommand::List => {
            let products = service.list().await?;
            ctx.output.header("Productos");
            ctx.output.products(&products);
            return Ok(());
        }
        AdminProductCommand::Create => {
            let mut draft = ProductDraft {
                active: true,
                ..Default::default()
            };
            loop {
                draft = product_form(draft, shop).await?;
                match service.create(draft.clone()).await {
                    Ok(product) => {
                        ctx.output
                            .success(&format!("Producto creado: {} ({})", product.name, product.id));
                        break;
                    }
                    Err(e) if prompts::report_field_errors(&ctx.output, &e) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
        AdminProductCommand::Edit { id } => {
            let id = ProductId::new(id);
            let mut draft = ProductDraft::from_product(&service.get(&id).await?);
            loop {
                draft = product_form(draft, shop).await?;
                match service.update(&id, draft.clone()).await {
                    Ok(_) => {
                        ctx.output.success("Producto actualizado");
                        break;
                    }
                    Err(e) if prompts::report_field_errors(&ctx.output, &e) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
        AdminProductCommand::Toggle { id } => {
            let product = service.get(&ProductId::new(id)).await?;
            let updated = service.set_active(&product, !product.active).await?;
            let state = if updated.active { "visible" } else { "oculto" };
            ctx.output
                .success(&format!("{} ahora está {}", updated.name, state));
        }
        AdminProductCommand::Delete { id, yes } => {
            if !confirm_delete(&format!("el producto {id}"), yes)? {
                return Ok(());
            }
            service.delete(&ProductId::new(id)).await?;
            ctx.output.success("Producto eliminado");
        }
    }
    shop.catalog_changed()?;
    Ok(())
}

async fn product_form(draft: ProductDraft, shop: &Storefront) -> Result<ProductDraft> {
    let (category_service, collection_service) = (shop.categories(), shop.collections());
    let (categories, collections) =
        tokio::try_join!(category_service.list(), collection_service.list())?;
    if categories.is_empty() {
        bail!("Crea una categoría antes de agregar productos");
    }

    let name = prompts::text("Nombre", &draft.name)?;
    let description = prompts::text("Descripción", &draft.description)?;
    let price: i64 = Input::new()
        .with_prompt("Precio (CLP)")
        .default(draft.price)
        .interact_text()?;
    let stock: i64 = Input::new()
        .with_prompt("Stock")
        .default(draft.stock)
        .interact_text()?;

    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    let current = draft
        .category_id
        .as_ref()
        .and_then(|id| categories.iter().position(|c| &c.id == id))
        .unwrap_or(0);
    let category = &categories[prompts::select("Categoría", &names, current)?];

    let collection_ids = if collections.is_empty() {
        Vec::new()
    } else {
        let names: Vec<&str> = collections.iter().map(|c| c.name.as_str()).collect();
        let checked: Vec<bool> = collections
            .iter()
            .map(|c| draft.collection_ids.contains(&c.id))
            .collect();
        MultiSelect::new()
            .with_prompt("Colecciones (espacio para marcar)")
            .items(&names)
            .defaults(&checked)
            .interact()?
            .into_iter()
            .map(|i| collections[i].id.clone())
            .collect()
    };

    Ok(ProductDraft {
        name,
        description,
        price,
        stock,
        image_url: prompts::optional("URL de imagen", draft.image_url.as_deref())?,
        category_id: Some(category.id.clone()),
        collection_ids,
        material: prompts::optional("Material", draft.material.as_deref())?,
        active: prompts::confirm("¿Visible en la tienda?", draft.active)?,
    })
}

// Categories and collections

fn taxonomy_form(draft: TaxonomyDraft, with_featured: bool) -> Result<TaxonomyDraft> {
    Ok(TaxonomyDraft {
        name: prompts::text("Nombre", &draft.name)?,
        description: prompts::optional("Descripción", draft.description.as_deref())?,
        image_url: prompts::optional("URL de imagen", draft.image_url.as_deref())?,
        featured: with_featured && prompts::confirm("¿Destacar en la portada?", draft.featured)?,
    })
}

async fn categories(command: TaxonomyCommand, shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let service = shop.categories();
    match command {
        TaxonomyCommand::List => {
            let categories = service.list().await?;
            if ctx.output.is_json() {
                ctx.output.json(&categories);
                return Ok(());
            }
            ctx.output.header("Categorías");
            for c in &categories {
                ctx.output.list_item(&format!("[{}] {}", c.id, c.name));
            }
            return Ok(());
        }
        TaxonomyCommand::Create => {
            let mut draft = TaxonomyDraft::default();
            loop {
                draft = taxonomy_form(draft, false)?;
                match service.create(draft.clone()).await {
                    Ok(c) => {
                        ctx.output.success(&format!("Categoría creada ({})", c.id));
                        break;
                    }
                    Err(e) if prompts::report_field_errors(&ctx.output, &e) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
        TaxonomyCommand::Edit { id } => {
            let id = CategoryId::new(id);
            let current = service.get(&id).await?;
            let mut draft = TaxonomyDraft {
                name: current.name,
                description: current.description,
                image_url: current.image_url,
                featured: false,
            };
            loop {
                draft = taxonomy_form(draft, false)?;
                match service.update(&id, draft.clone()).await {
                    Ok(_) => {
                        ctx.output.success("Categoría actualizada");
                        break;
                    }
                    Err(e) if prompts::report_field_errors(&ctx.output, &e) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
        TaxonomyCommand::Delete { id, yes } => {
            if !confirm_delete(&format!("la categoría {id}"), yes)? {
                return Ok(());
            }
            service.delete(&CategoryId::new(id)).await?;
            ctx.output.success("Categoría eliminada");
        }
    }
    shop.catalog_changed()?;
    Ok(())
}

async fn collections(command: TaxonomyCommand, shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let service = shop.collections();
    match command {
        TaxonomyCommand::List => {
            let collections = service.list().await?;
            if ctx.output.is_json() {
                ctx.output.json(&collections);
                return Ok(());
            }
            ctx.output.header("Colecciones");
            for c in &collections {
                let marker = if c.featured { " ★" } else { "" };
                ctx.output
                    .list_item(&format!("[{}] {}{}", c.id, c.name, marker));
            }
            return Ok(());
        }
        TaxonomyCommand::Create => {
            let mut draft = TaxonomyDraft::default();
            loop {
                draft = taxonomy_form(draft, true)?;
                match service.create(draft.clone()).await {
                    Ok(c) => {
                        ctx.output.success(&format!("Colección creada ({})", c.id));
                        break;
                    }
                    Err(e) if prompts::report_field_errors(&ctx.output, &e) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
        TaxonomyCommand::Edit { id } => {
            let id = CollectionId::new(id);
            let current = service.get(&id).await?;
            let mut draft = TaxonomyDraft {
                name: current.name,
                description: current.description,
                image_url: current.image_url,
                featured: current.featured,
            };
            loop {
                draft = taxonomy_form(draft, true)?;
                match service.update(&id, draft.clone()).await {
                    Ok(_) => {
                        ctx.output.success("Colección actualizada");
                        break;
                    }
                    Err(e) if prompts::report_field_errors(&ctx.output, &e) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
        TaxonomyCommand::Delete { id, yes } => {
            if !confirm_delete(&format!("la colección {id}"), yes)? {
                return Ok(());
            }
            service.delete(&CollectionId::new(id)).await?;
            ctx.output.success("Colección eliminada");
        }
    }
    shop.catalog_changed()?;
    Ok(())
}

// Users

async fn users(command: UserCommand, shop: &Storefront, acting: &User, ctx: &Context) -> Result<()> {
    let service = shop.customers();
    match command {
        UserCommand::List => {
            let customers = service.list(acting).await?;
            if ctx.output.is_json() {
                ctx.output.json(&customers);
                return Ok(());
            }
            ctx.output.header("Usuarios");
            let widths = [6, 24, 28, 14];
            ctx.output
                .table_row(&["ID", "Nombre", "Email", "Rol"], &widths);
            for c in &customers {
                ctx.output.table_row(
                    &[
                        c.id.as_str(),
                        &truncate(&c.name, 24),
                        &truncate(&c.email, 28),
                        c.role.display_name(),
                    ],
                    &widths,
                );
            }
        }
        UserCommand::Role { id, role } => {
            let updated = service
                .change_role(acting, &CustomerId::new(id), role)
                .await
                .map_err(explain_self_modification)?;
            ctx.output.success(&format!(
                "{} ahora es {}",
                updated.name,
                updated.role.display_name()
            ));
        }
        UserCommand::Delete { id, yes } => {
            if !confirm_delete(&format!("el usuario {id}"), yes)? {
                return Ok(());
            }
            service
                .delete(acting, &CustomerId::new(id))
                .await
                .map_err(explain_self_modification)?;
            ctx.output.success("Usuario eliminado");
        }
    }
    Ok(())
}

fn explain_self_modification(err: StorefrontError) -> anyhow::Error {
    match err {
        StorefrontError::SelfModification => {
            anyhow!("No puedes quitarte permisos ni eliminar tu propia cuenta")
        }
        other => other.into(),
    }
}

// Messages

async fn messages(
    command: MessageCommand,
    shop: &Storefront,
    acting: &User,
    ctx: &Context,
) -> Result<()> {
    let service = shop.contacts();
    match command {
        MessageCommand::List => {
            let inbox = service.inbox(acting).await?;
            if ctx.output.is_json() {
                ctx.output.json(&inbox);
                return Ok(());
            }
            ctx.output.header("Mensajes");
            if inbox.is_empty() {
                ctx.output.info("No hay mensajes");
            }
            for m in &inbox {
                let marker = if m.read { " " } else { "●" };
                ctx.output.list_item(&format!(
                    "{} [{}] {} · {}: {}",
                    marker,
                    m.id,
                    m.name,
                    m.subject,
                    m.preview(40)
                ));
            }
        }
        MessageCommand::Read { id } => {
            let message = service
                .inbox(acting)
                .await?
                .into_iter()
                .find(|m| m.id.as_str() == id)
                .ok_or_else(|| anyhow!("No existe el mensaje {id}"))?;
            if !message.read {
                service.mark_read(acting, &message.id).await?;
            }
            if ctx.output.is_json() {
                ctx.output.json(&message);
                return Ok(());
            }
            ctx.output.header(&message.subject);
            ctx.output
                .kv("De", &format!("{} <{}>", message.name, message.email));
            if let Some(at) = message.created_at {
                ctx.output
                    .kv("Fecha", &at.format("%d-%m-%Y %H:%M").to_string());
            }
            println!("\n{}\n", message.message);
        }
        MessageCommand::Delete { id, yes } => {
            if !confirm_delete(&format!("el mensaje {id}"), yes)? {
                return Ok(());
            }
            service.delete(acting, &ContactId::new(id)).await?;
            ctx.output.success("Mensaje eliminado");
        }
    }
    Ok(())
}

// Orders

async fn orders(command: OrderCommand, shop: &Storefront, acting: &User, ctx: &Context) -> Result<()> {
    let service = shop.orders();
    match command {
        OrderCommand::List { status } => {
            let orders = service.list(acting, status).await?;
            if ctx.output.is_json() {
                ctx.output.json(&orders);
                return Ok(());
            }
            let title = match status {
                Some(status) => format!("Pedidos · {}", status.display_name()),
                None => "Pedidos".to_string(),
            };
            ctx.output.header(&title);
            super::profile::print_orders(&orders, ctx);
        }
        OrderCommand::Show { id } => {
            let order = service.get(&OrderId::new(id)).await?;
            if ctx.output.is_json() {
                ctx.output.json(&order);
                return Ok(());
            }
            ctx.output.header(&format!("Pedido {}", order.id));
            ctx.output.kv("Estado", &status_badge(order.status));
            if let Some(customer) = &order.customer_id {
                ctx.output.kv("Cliente", customer.as_str());
            }
            for item in &order.items {
                ctx.output.list_item(&format!(
                    "{} x{} · {}",
                    item.name,
                    item.quantity,
                    item.unit_price.display()
                ));
            }
            ctx.output.kv("Total", &order.total.display());
            if let Some(address) = &order.shipping_address {
                ctx.output.kv("Envío", &address.one_line());
            }
        }
        OrderCommand::Status { id, status } => {
            let order = service
                .update_status(acting, &OrderId::new(id), status)
                .await?;
            ctx.output.success(&format!(
                "Pedido {} → {}",
                order.id,
                status_badge(order.status)
            ));
        }
    }
    Ok(())
}

fn confirm_delete(what: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    prompts::confirm(&format!("¿Eliminar {what}? Esta acción no se puede deshacer"), false)
}
