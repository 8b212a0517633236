use super::ui;
use crate::core::config::AppConfig;
use crate::core::{CurrencyList, CurrencyService, FetchError, FetchOperation, Quotes};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::sync::Arc;
use tokio::sync::mpsc;

pub fn display_currencies(currencies: &CurrencyList) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Name")]);
    for (code, name) in currencies {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }

    format!(
        "{}\n\n{}\n\n{}",
        ui::style_text("Currencies", ui::StyleType::Title),
        table,
        ui::style_text(
            &format!("{} currencies available", currencies.len()),
            ui::StyleType::Subtle
        )
    )
}

pub fn display_rates(source: &str, quotes: &Quotes) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Pair"), ui::header_cell("Rate")]);
    for (pair, rate) in quotes {
        table.add_row(vec![Cell::new(pair), ui::rate_cell(*rate)]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text(&format!("Live rates ({source})"), ui::StyleType::Title),
        table
    )
}

/// Fetches the currency list through a [`FetchOperation`], handing whichever
/// handler fires back to the caller.
async fn fetch_currencies(service: Arc<dyn CurrencyService>) -> Result<CurrencyList> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Result<CurrencyList, FetchError>>();
    let failure_tx = tx.clone();

    FetchOperation::fetch_currencies(service).start(
        move |currencies| {
            let _ = tx.send(Ok(currencies));
        },
        move |e| {
            let _ = failure_tx.send(Err(e));
        },
    );

    let currencies = rx
        .recv()
        .await
        .context("Currency fetch ended without a result")??;
    Ok(currencies)
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let service: Arc<dyn CurrencyService> = Arc::new(config.currency_client()?);

    let spinner = ui::new_spinner("Fetching currencies...");
    let result = fetch_currencies(service).await;
    spinner.finish_and_clear();

    let currencies = result.context("Failed to fetch currency list")?;
    println!("{}", display_currencies(&currencies));
    Ok(())
}

pub async fn run_rates(config: &AppConfig, codes: &[String]) -> Result<()> {
    let client = config.currency_client()?;
    let codes: Vec<String> = codes.iter().map(|c| c.to_ascii_uppercase()).collect();
    let code_refs: Vec<&str> = codes.iter().map(String::as_str).collect();

    let spinner = ui::new_spinner("Fetching live rates...");
    let result = client.fetch_realtime_rates(&code_refs).await;
    spinner.finish_and_clear();

    let quotes = result.context("Failed to fetch live rates")?;
    println!("{}", display_rates(client.source_currency(), &quotes));
    Ok(())
}
