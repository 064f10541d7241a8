//! Configuration management commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};
use aurum_storefront::config::default_config_template;
use aurum_storefront::AurumConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => {
            let value = get_config_value(&ctx.config, &key)?;
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
            } else {
                println!("{}", value);
            }
            Ok(())
        }
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Configuración actual");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("archivo", &path.display().to_string()),
        None => ctx.output.kv("archivo", "(valores por defecto)"),
    }

    let config = &ctx.config;
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &config.api.base_url);
    ctx.output.kv("timeout_secs", &config.api.timeout_secs.to_string());
    ctx.output.kv("max_retries", &config.api.max_retries.to_string());

    ctx.output.info("[storage]");
    ctx.output
        .kv("dir", &config.storage_dir().display().to_string());

    ctx.output.info("[shop]");
    ctx.output.kv(
        "free_shipping_threshold",
        &config.shop.free_shipping_threshold.to_string(),
    );
    ctx.output
        .kv("flat_shipping_rate", &config.shop.flat_shipping_rate.to_string());
    ctx.output.kv("page_size", &config.shop.page_size.to_string());
    ctx.output
        .kv("search_debounce_ms", &config.shop.search_debounce_ms.to_string());
    ctx.output
        .kv("catalog_ttl_secs", &config.shop.catalog_ttl_secs.to_string());
    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = ctx.config_path.clone() else {
        bail!("No hay archivo de configuración. Ejecuta `aurum config init` primero.");
    };

    // Re-read the file so environment overrides are not written back.
    let mut config = AurumConfig::load(&path)?;
    set_config_value(&mut config, key, value)?;
    if let Err(problems) = config.validate() {
        bail!("Valor inválido: {}", problems.join("; "));
    }
    config.save(&path)?;

    ctx.output.success(&format!("{} = {}", key, value));
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path: PathBuf = ctx.default_config_path();

    if config_path.exists() && !force {
        bail!(
            "Ya existe {}. Usa --force para sobrescribirlo.",
            config_path.display()
        );
    }

    fs::write(&config_path, default_config_template())?;
    ctx.output
        .success(&format!("Creado: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    match ctx.config.validate() {
        Ok(()) => {
            ctx.output.success("La configuración es válida");
            Ok(())
        }
        Err(problems) => {
            for problem in &problems {
                ctx.output.error(problem);
            }
            bail!("La configuración tiene {} error(es)", problems.len())
        }
    }
}

fn get_config_value(config: &AurumConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    Ok(match parts.as_slice() {
        ["api", "base_url"] => config.api.base_url.clone(),
        ["api", "timeout_secs"] => config.api.timeout_secs.to_string(),
        ["api", "max_retries"] => config.api.max_retries.to_string(),
        ["storage", "dir"] => config.storage_dir().display().to_string(),
        ["shop", "free_shipping_threshold"] => config.shop.free_shipping_threshold.to_string(),
        ["shop", "flat_shipping_rate"] => config.shop.flat_shipping_rate.to_string(),
        ["shop", "page_size"] => config.shop.page_size.to_string(),
        ["shop", "search_debounce_ms"] => config.shop.search_debounce_ms.to_string(),
        ["shop", "catalog_ttl_secs"] => config.shop.catalog_ttl_secs.to_string(),
        _ => bail!("Clave desconocida: {}", key),
    })
}

fn set_config_value(config: &mut AurumConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "base_url"] => config.api.base_url = value.to_string(),
        ["api", "timeout_secs"] => config.api.timeout_secs = value.parse()?,
        ["api", "max_retries"] => config.api.max_retries = value.parse()?,
        ["storage", "dir"] => config.storage.dir = Some(PathBuf::from(value)),
        ["shop", "free_shipping_threshold"] => config.shop.free_shipping_threshold = value.parse()?,
        ["shop", "flat_shipping_rate"] => config.shop.flat_shipping_rate = value.parse()?,
        ["shop", "page_size"] => config.shop.page_size = value.parse()?,
        ["shop", "search_debounce_ms"] => config.shop.search_debounce_ms = value.parse()?,
        ["shop", "catalog_ttl_secs"] => config.shop.catalog_ttl_secs = value.parse()?,
        _ => bail!("Clave desconocida: {}", key),
    }

    Ok(())
}
