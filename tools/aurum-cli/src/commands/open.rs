//! Resolve a storefront page the way the router would.

use anyhow::Result;
use aurum_storefront::{Resolution, Route};

use super::OpenArgs;
use crate::context::Context;

/// Run the open command: print the page a path renders, or where the guard
/// sends the current user instead.
pub async fn run(args: OpenArgs, ctx: &Context) -> Result<()> {
    let shop = ctx.storefront().await?;
    let resolution = shop.navigate(&args.path);

    match &resolution {
        Resolution::Render(route) => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "render": route.path(),
                    "title": route.title(),
                }));
                return Ok(());
            }
            ctx.output.kv("Página", route.title());
            ctx.output.kv("Ruta", &route.path());
            ctx.output.info(&hint(route));
        }
        Resolution::Redirect { to, next } => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "redirect": to.path(),
                    "next": next,
                }));
                return Ok(());
            }
            ctx.output
                .warn(&format!("Acceso restringido: redirigiendo a {}", to.title()));
            if let Some(next) = next {
                ctx.output.info(&format!("Después de iniciar sesión: {next}"));
            }
        }
    }
    Ok(())
}

/// The command that shows this page.
fn hint(route: &Route) -> String {
    let command = match route {
        Route::Home | Route::Products => "aurum products".to_string(),
        Route::ProductDetail(id) => format!("aurum products show {id}"),
        Route::Category(id) => format!("aurum categories {id}"),
        Route::Collection(id) => format!("aurum collections {id}"),
        Route::Search { query } => format!("aurum search {}", query.as_deref().unwrap_or_default()),
        Route::Cart => "aurum cart".to_string(),
        Route::Checkout => "aurum checkout".to_string(),
        Route::Login => "aurum login".to_string(),
        Route::Register => "aurum register".to_string(),
        Route::Contact => "aurum contact".to_string(),
        Route::Profile => "aurum profile".to_string(),
        Route::Admin(_) => "aurum admin --help".to_string(),
        Route::NotFound(_) => "aurum open /".to_string(),
    };
    format!("Usa: {command}")
}
