//! Output formatting for the CLI.

use aurum_commerce::checkout::OrderStatus;
use aurum_commerce::prelude::{CartPricing, Money, Product};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Only in verbose mode.
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// A checkout step, e.g. `[2/3] Pago`.
    pub fn step(&self, num: u8, total: u8, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style(format!("[{}/{}]", num, total)).dim(), msg);
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Spinner for a request in flight.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.yellow} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Product table used by every listing.
    pub fn products(&self, products: &[Product]) {
        if self.json {
            self.json(&products);
            return;
        }
        if products.is_empty() {
            self.info("No hay productos");
            return;
        }
        let widths = [6, 32, 12, 8];
        self.table_row(&["ID", "Nombre", "Precio", "Stock"], &widths);
        for p in products {
            let stock = stock_badge(p);
            self.table_row(
                &[p.id.as_str(), &truncate(&p.name, 32), &p.price.display(), &stock],
                &widths,
            );
        }
    }

    /// Subtotal, shipping and total lines of a cart or order.
    pub fn pricing(&self, pricing: &CartPricing, free_threshold: &Money) {
        if self.json {
            return;
        }
        self.kv("Subtotal", &pricing.subtotal.display());
        if pricing.has_free_shipping() {
            self.kv("Envío", &style("Gratis").green().to_string());
        } else {
            self.kv("Envío", &pricing.shipping.display());
            if let Some(missing) = pricing.missing_for_free_shipping(free_threshold) {
                self.kv(
                    "Envío gratis",
                    &format!("agrega {} más", missing.display()),
                );
            }
        }
        self.kv("Total", &style(pricing.total.display()).bold().to_string());
    }
}

/// Colored order status.
pub fn status_badge(status: OrderStatus) -> String {
    let label = status.display_name();
    match status {
        OrderStatus::Delivered | OrderStatus::Paid => style(label).green().to_string(),
        OrderStatus::Pending | OrderStatus::Shipped => style(label).yellow().to_string(),
        OrderStatus::Cancelled => style(label).red().to_string(),
    }
}

fn stock_badge(product: &Product) -> String {
    if !product.active {
        style("inactivo").dim().to_string()
    } else if product.stock <= 0 {
        style("agotado").red().to_string()
    } else if product.is_low_stock() {
        style(product.stock).yellow().to_string()
    } else {
        product.stock.to_string()
    }
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Anillo", 10), "Anillo");
        assert_eq!(truncate("Collar de perlas cultivadas", 10), "Collar de…");
        assert_eq!(truncate("Añillo", 6), "Añillo");
    }

    #[test]
    fn test_status_badge_keeps_label() {
        console::set_colors_enabled(false);
        assert_eq!(status_badge(OrderStatus::Cancelled), OrderStatus::Cancelled.display_name());
    }
}
