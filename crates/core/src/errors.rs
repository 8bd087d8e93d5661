use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::entry::EntryId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("entry id {0} is already present in the collection")]
    DuplicateEntryId(EntryId),
    #[error("price {price} for `{name}` must not be negative")]
    InvalidPrice { name: String, price: Decimal },
    #[error("stock value of `{name}` does not fit a decimal amount")]
    StockValueOverflow { name: String },
    #[error("quantity for entry {0} is at its ceiling")]
    QuantityOverflow(EntryId),
    #[error("cart total cannot absorb the price of entry {0}")]
    TotalOverflow(EntryId),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("item {0} is not stocked by the store")]
    UnknownItem(EntryId),
    #[error("item {0} is not in the cart")]
    NotInCart(EntryId),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Shop(#[from] ShopError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("terminal i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::Shop(_) => "shop",
            Self::Configuration(_) => "config_validation",
            Self::Io(_) => "io",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Shop(ShopError::UnknownItem(_)) => "That item is not sold here.",
            Self::Shop(ShopError::NotInCart(_)) => "That item is not in your cart.",
            Self::Shop(ShopError::Domain(_)) | Self::Domain(_) => {
                "The shop could not apply that change."
            }
            Self::Configuration(_) => "The shop configuration is invalid. Check toyshop.toml.",
            Self::Io(_) => "The terminal could not be read or written.",
        }
    }
}
