//! Storefront domain: products, cart, pricing and currency data

pub mod cart;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod log;
pub mod operation;
pub mod price;
pub mod product;
pub mod session;

// Re-export main types for cleaner imports
pub use cart::Cart;
pub use catalog::Catalog;
pub use currency::{CurrencyList, CurrencyService, ExchangeRate, FetchError, Quotes};
pub use operation::{FetchOperation, OperationHandle, OperationState};
pub use price::{Locale, PriceFormatter};
pub use product::{Cents, Product};
pub use session::Session;
