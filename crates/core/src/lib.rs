pub mod config;
pub mod domain;
pub mod errors;
pub mod handles;
pub mod shop;

pub use domain::collection::Collection;
pub use domain::entry::{Entry, EntryId};
pub use errors::{ApplicationError, DomainError, ShopError};
pub use handles::HandleMap;
pub use shop::{Direction, SeedItem, Shop, ShopSnapshot, Transfer, TransferReceipt};
