//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use aurum_storefront::config::CONFIG_FILE_NAMES;
use aurum_storefront::{AurumConfig, Storefront};

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    pub config: AurumConfig,
    /// File the config was read from, if any.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
}

impl Context {
    /// Resolve configuration from `--config`, a discovered file or defaults.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("No se pudo leer el directorio actual")?;
        let explicit = config_path.map(|p| resolve_path(&cwd, p));

        let config = AurumConfig::resolve(explicit.as_deref(), &cwd)?;
        let config_path = explicit.or_else(|| AurumConfig::discover(&cwd));

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Open the storefront and restore any saved session.
    ///
    /// A restored session sends cart changes left over from an offline run;
    /// failures there are reported but do not stop the command.
    pub async fn storefront(&self) -> Result<Storefront> {
        let mut shop = Storefront::open(self.config.clone())?;
        match shop.start().await {
            Ok(Some(report)) if !report.reloaded => {
                self.output.warn("Sin conexión: usando el carrito guardado en este equipo")
            }
            Ok(Some(report)) if report.replayed > 0 => self.output.debug(&format!(
                "{} cambios del carrito enviados al servidor",
                report.replayed
            )),
            Ok(_) => {}
            Err(e) => self.output.warn(&format!("No se pudo sincronizar el carrito: {e}")),
        }
        Ok(shop)
    }

    /// Where `config init` writes by default.
    pub fn default_config_path(&self) -> PathBuf {
        self.cwd.join(CONFIG_FILE_NAMES[0])
    }
}

fn resolve_path(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_config_path_is_joined_to_cwd() {
        let cwd = Path::new("/tienda");
        assert_eq!(resolve_path(cwd, "aurum.toml"), PathBuf::from("/tienda/aurum.toml"));
        assert_eq!(resolve_path(cwd, "/etc/aurum.toml"), PathBuf::from("/etc/aurum.toml"));
    }
}
