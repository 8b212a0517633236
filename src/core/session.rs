//! Per-session shopping state

use super::cart::Cart;
use super::currency::{CurrencyService, ExchangeRate, FetchError};
use super::price::{Locale, PriceFormatter};
use tracing::{debug, instrument, warn};

/// The cart and display currency of one shopping session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub cart: Cart,
    pub formatter: PriceFormatter,
}

impl Session {
    /// Starts a session showing prices unconverted, in `source_currency`.
    pub fn new(locale: Locale, source_currency: &str) -> Self {
        let mut formatter = PriceFormatter::new(locale);
        formatter.set_currency_code(Some(source_currency));
        Self {
            cart: Cart::new(),
            formatter,
        }
    }

    /// Fetches the live rate for `currency_code` and switches the display
    /// currency to it. The formatter is unchanged if the fetch fails.
    #[instrument(name = "ChangeCurrency", skip(self, service))]
    pub async fn change_currency(
        &mut self,
        service: &dyn CurrencyService,
        currency_code: &str,
    ) -> Result<ExchangeRate, FetchError> {
        match service.rate_for(currency_code).await {
            Ok(rate) => {
                debug!(rate = rate.rate, "Applying exchange rate");
                self.formatter.apply(&rate);
                Ok(rate)
            }
            Err(e) => {
                warn!(error = %e, "Keeping current currency");
                Err(e)
            }
        }
    }

    pub fn formatted_total(&self) -> String {
        self.formatter
            .formatted_price(self.cart.total_price())
            .unwrap_or_default()
    }

    pub fn title(&self) -> String {
        format!("Cart ({})", self.cart.count())
    }

    pub fn checkout_label(&self) -> String {
        format!("Pay {}", self.formatted_total())
    }
}
