use super::{currency_heading, select_currency, ui};
use crate::core::config::AppConfig;
use crate::core::{Catalog, Session};
use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;
use tracing::debug;

/// Adds the named products, then removes the given 1-based line positions in
/// order. Positions refer to the cart as it is when each removal runs.
pub fn fill_cart(
    session: &mut Session,
    catalog: &Catalog,
    add: &[String],
    remove: &[usize],
) -> Result<()> {
    for name in add {
        let product = catalog
            .find(name)
            .ok_or_else(|| anyhow!("Unknown product: {}", name))?;
        debug!(product = %product.name, "Adding to cart");
        session.cart.add(product.clone());
    }

    for &position in remove {
        if position == 0 || position > session.cart.count() {
            bail!(
                "No line item at position {} (cart has {} items)",
                position,
                session.cart.count()
            );
        }
        let removed = session.cart.remove(position - 1);
        debug!(product = %removed.name, "Removed from cart");
    }
    Ok(())
}

pub fn display_cart(session: &Session) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text(&session.title(), ui::StyleType::Title)
    );

    if session.cart.is_empty() {
        output.push_str(&ui::style_text("Your cart is empty", ui::StyleType::Subtle));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Product"),
        ui::header_cell("Price"),
    ]);
    for (i, product) in session.cart.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&product.name),
            ui::price_cell(session.formatter.formatted_price(product.price)),
        ]);
    }
    output.push_str(&table.to_string());

    let total_style = if session
        .formatter
        .formatted_price(session.cart.total_price())
        .is_some()
    {
        ui::StyleType::TotalValue
    } else {
        ui::StyleType::Error
    };
    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(&session.checkout_label(), total_style)
    ));
    output
}

pub async fn run(
    config: &AppConfig,
    add: &[String],
    remove: &[usize],
    currency: Option<&str>,
) -> Result<()> {
    let mut session = config.session();
    fill_cart(&mut session, &config.catalog(), add, remove)?;

    let mut name = None;
    if let Some(code) = currency {
        let client = config.currency_client()?;
        name = select_currency(&client, &mut session, code).await?;
    }

    println!("{}", display_cart(&session));
    println!("\n{}", currency_heading(&session, name.as_deref()));
    Ok(())
}
