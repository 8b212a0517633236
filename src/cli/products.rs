use super::{currency_heading, select_currency, ui};
use crate::core::config::AppConfig;
use crate::core::{Catalog, PriceFormatter};
use anyhow::Result;
use comfy_table::Cell;

pub fn display_catalog(catalog: &Catalog, formatter: &PriceFormatter) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Product"),
        ui::header_cell("Details"),
        ui::header_cell("Price"),
    ]);

    for product in catalog.products() {
        table.add_row(vec![
            Cell::new(&product.name),
            Cell::new(&product.details),
            ui::price_cell(formatter.formatted_price(product.price)),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Products", ui::StyleType::Title),
        table
    )
}

pub async fn run(config: &AppConfig, currency: Option<&str>) -> Result<()> {
    let mut session = config.session();
    let mut name = None;
    if let Some(code) = currency {
        let client = config.currency_client()?;
        name = select_currency(&client, &mut session, code).await?;
    }

    println!("{}", display_catalog(&config.catalog(), &session.formatter));
    println!("\n{}", currency_heading(&session, name.as_deref()));
    Ok(())
}
