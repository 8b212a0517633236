pub mod cart;
pub mod currencies;
pub mod products;
pub mod setup;
pub mod ui;

use crate::core::{CurrencyService, Session};
use anyhow::{Context, Result};
use tracing::warn;

/// Switches the session to `code`, fetching its live rate and display name
/// concurrently. Returns the display name when the service knows it.
pub async fn select_currency(
    service: &dyn CurrencyService,
    session: &mut Session,
    code: &str,
) -> Result<Option<String>> {
    let code = code.to_ascii_uppercase();
    let spinner = ui::new_spinner(&format!("Fetching {code} exchange rate..."));

    let (list, rate) = futures::join!(
        service.fetch_currency_list(),
        session.change_currency(service, &code)
    );
    spinner.finish_and_clear();

    rate.with_context(|| format!("Failed to fetch exchange rate for {code}"))?;

    let name = match list {
        Ok(currencies) => currencies.get(&code).cloned(),
        Err(e) => {
            warn!(error = %e, "Currency names unavailable");
            None
        }
    };
    Ok(name)
}

/// One-line heading naming the display currency.
pub fn currency_heading(session: &Session, name: Option<&str>) -> String {
    let code = session
        .formatter
        .currency_code()
        .unwrap_or(session.formatter.locale().default_currency())
        .to_string();
    let label = match name {
        Some(name) => format!("{code} ({name})"),
        None => code,
    };
    format!(
        "Prices in {}",
        ui::style_text(&label, ui::StyleType::TotalLabel)
    )
}
