//! Catalog browsing: products, categories, collections and search.

use anyhow::{anyhow, Result};
use aurum_commerce::prelude::*;
use aurum_storefront::state::{CatalogSnapshot, SearchOutcome};
use aurum_storefront::Storefront;
use dialoguer::Input;

use super::{ListArgs, ProductsArgs, ProductsCommand, SearchArgs, TaxonomyArgs};
use crate::context::Context;

const RELATED_LIMIT: usize = 4;

/// Run the products command.
pub async fn products(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    match args.command.unwrap_or(ProductsCommand::List(ListArgs::default())) {
        ProductsCommand::List(list) => list_products(list, &mut shop, ctx).await,
        ProductsCommand::Show { id } => show_product(&ProductId::new(id), &mut shop, ctx).await,
    }
}

async fn load<'a>(shop: &'a mut Storefront, ctx: &Context) -> Result<&'a CatalogSnapshot> {
    let spinner = ctx.output.spinner("Cargando catálogo...");
    let snapshot = shop.catalog.load().await;
    spinner.finish_and_clear();
    Ok(snapshot?)
}

fn query_for(args: &ListArgs, per_page: usize) -> SearchQuery {
    let mut query = SearchQuery::new()
        .with_sort(args.sort)
        .with_price_range(args.min, args.max)
        .with_pagination(args.page, per_page);
    if let Some(category) = &args.category {
        query = query.with_category(category.as_str());
    }
    if let Some(collection) = &args.collection {
        query = query.with_collection(collection.as_str());
    }
    if args.available {
        query = query.only_available();
    }
    query
}

async fn list_products(args: ListArgs, shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let per_page = shop.config.shop.page_size;
    let snapshot = load(shop, ctx).await?;
    let page = snapshot.search(&query_for(&args, per_page));

    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }

    ctx.output.header(&format!("Productos · {}", args.sort.display_name()));
    print_page(&page, ctx);
    Ok(())
}

pub(crate) fn print_page(page: &Page<Product>, ctx: &Context) {
    ctx.output.products(&page.items);
    if !page.is_empty() {
        ctx.output.info(&format!(
            "{} (página {}/{})",
            page.pagination.summary(),
            page.pagination.page,
            page.pagination.total_pages
        ));
    }
}

async fn show_product(id: &ProductId, shop: &mut Storefront, ctx: &Context) -> Result<()> {
    let snapshot = load(shop, ctx).await?.clone();
    let product = match snapshot.product(id) {
        Some(product) => product.clone(),
        None => shop.products().get(id).await?,
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("Precio", &product.price.display());
    if let Some(material) = &product.material {
        ctx.output.kv("Material", material);
    }
    if let Some(category) = product.category_id.as_ref().and_then(|c| snapshot.category(c)) {
        ctx.output.kv("Categoría", &category.name);
    }
    let collections: Vec<&str> = product
        .collection_ids
        .iter()
        .filter_map(|c| snapshot.collection(c))
        .map(|c| c.name.as_str())
        .collect();
    if !collections.is_empty() {
        ctx.output.kv("Colecciones", &collections.join(", "));
    }
    let availability = if product.is_available() {
        format!("{} disponibles", product.stock)
    } else {
        "Agotado".to_string()
    };
    ctx.output.kv("Stock", &availability);
    if !product.description.is_empty() {
        println!("\n  {}", product.description);
    }

    let in_cart = shop.cart.cart().quantity_of(&product.id);
    if in_cart > 0 {
        ctx.output.info(&format!("Tienes {in_cart} en tu carrito"));
    }

    let related = snapshot.related(&product, RELATED_LIMIT);
    if !related.is_empty() {
        ctx.output.header("También te puede gustar");
        for p in related {
            ctx.output
                .list_item(&format!("{} · {} ({})", p.name, p.price.display(), p.id));
        }
    }
    Ok(())
}

/// Run the categories command.
pub async fn categories(args: TaxonomyArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    let per_page = shop.config.shop.page_size;
    let snapshot = load(&mut shop, ctx).await?;

    let Some(id) = args.id else {
        if ctx.output.is_json() {
            ctx.output.json(&snapshot.categories);
            return Ok(());
        }
        ctx.output.header("Categorías");
        for category in &snapshot.categories {
            let count = snapshot.by_category(&category.id).len();
            ctx.output
                .list_item(&format!("{} ({}) · {} productos", category.name, category.id, count));
        }
        return Ok(());
    };

    let id = CategoryId::new(id);
    let category = snapshot
        .category(&id)
        .ok_or_else(|| anyhow!("No existe la categoría {id}"))?;
    let page = snapshot.search(
        &SearchQuery::new()
            .with_category(id.clone())
            .with_pagination(args.page, per_page),
    );
    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }
    ctx.output.header(&category.name);
    if let Some(description) = &category.description {
        ctx.output.info(description);
    }
    print_page(&page, ctx);
    Ok(())
}

/// Run the collections command.
pub async fn collections(args: TaxonomyArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    let per_page = shop.config.shop.page_size;
    let snapshot = load(&mut shop, ctx).await?;

    let Some(id) = args.id else {
        if ctx.output.is_json() {
            ctx.output.json(&snapshot.collections);
            return Ok(());
        }
        ctx.output.header("Colecciones");
        for collection in &snapshot.collections {
            let marker = if collection.featured { " ★" } else { "" };
            ctx.output.list_item(&format!(
                "{}{} ({}) · {} productos",
                collection.name,
                marker,
                collection.id,
                snapshot.by_collection(&collection.id).len()
            ));
        }
        return Ok(());
    };

    let id = CollectionId::new(id);
    let collection = snapshot
        .collection(&id)
        .ok_or_else(|| anyhow!("No existe la colección {id}"))?;
    let page = snapshot.search(
        &SearchQuery::new()
            .with_collection(id.clone())
            .with_pagination(args.page, per_page),
    );
    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }
    ctx.output.header(&collection.name);
    if let Some(description) = &collection.description {
        ctx.output.info(description);
    }
    print_page(&page, ctx);
    Ok(())
}

/// Run the search command. Without text, reads queries until a blank line.
pub async fn search(args: SearchArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    let snapshot = load(&mut shop, ctx).await?.clone();

    if !args.text.is_empty() {
        let text = args.text.join(" ");
        return show_outcome(&text, shop.search.input(&text, &snapshot).await, ctx);
    }

    loop {
        let text: String = Input::new()
            .with_prompt("Buscar (vacío para salir)")
            .allow_empty(true)
            .interact_text()?;
        if text.trim().is_empty() {
            shop.search.input("", &snapshot).await;
            return Ok(());
        }
        show_outcome(&text, shop.search.input(&text, &snapshot).await, ctx)?;
    }
}

fn show_outcome(text: &str, outcome: SearchOutcome, ctx: &Context) -> Result<()> {
    match outcome {
        SearchOutcome::Results(page) => {
            if ctx.output.is_json() {
                ctx.output.json(&page);
            } else if page.is_empty() {
                ctx.output.info(&format!("Sin resultados para \"{}\"", text.trim()));
            } else {
                ctx.output.header(&format!("Resultados para \"{}\"", text.trim()));
                print_page(&page, ctx);
            }
        }
        SearchOutcome::Cleared | SearchOutcome::Superseded => {}
    }
    Ok(())
}
