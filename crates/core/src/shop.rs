use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::collection::Collection;
use crate::domain::entry::{Entry, EntryId};
use crate::errors::{DomainError, ShopError};

/// Initial store stock for one item, as supplied by configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedItem {
    #[serde(default)]
    pub id: Option<EntryId>,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ToCart,
    ToStore,
}

/// What a successful transfer changed, so the presentation layer knows which
/// rows to refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub id: EntryId,
    pub direction: Direction,
    pub store_quantity: u32,
    pub cart_quantity: u32,
    pub cart_entry_created: bool,
    pub cart_entry_removed: bool,
    pub total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transfer {
    Moved(TransferReceipt),
    OutOfStock { id: EntryId },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSnapshot {
    pub currency: String,
    pub total: Decimal,
    pub store: Vec<Entry>,
    pub cart: Vec<Entry>,
}

/// Store and cart collections plus the running cart total.
///
/// Every transfer moves exactly one unit and adjusts `total` by the item's
/// unit price, so `total` always equals the sum of the cart's line values.
#[derive(Clone, Debug)]
pub struct Shop {
    store: Collection,
    cart: Collection,
    total: Decimal,
    currency: String,
}

impl Shop {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            store: Collection::new(),
            cart: Collection::new(),
            total: Decimal::ZERO,
            currency: currency.into(),
        }
    }

    pub fn from_seed(
        currency: impl Into<String>,
        seed: impl IntoIterator<Item = SeedItem>,
    ) -> Result<Self, DomainError> {
        let mut shop = Self::new(currency);
        for item in seed {
            shop.stock(item)?;
        }

        info!(
            event_name = "shop.assembled",
            store_entries = shop.store.len(),
            currency = %shop.currency,
            "shop assembled from seed data"
        );
        Ok(shop)
    }

    pub fn stock(&mut self, item: SeedItem) -> Result<EntryId, DomainError> {
        if item.price < Decimal::ZERO {
            return Err(DomainError::InvalidPrice { name: item.name, price: item.price });
        }
        if item.price.checked_mul(Decimal::from(item.stock)).is_none() {
            return Err(DomainError::StockValueOverflow { name: item.name });
        }

        let entry = self.store.add(item.name, item.price, item.stock, item.id)?;
        Ok(entry.id())
    }

    pub fn store(&self) -> &Collection {
        &self.store
    }

    pub fn cart(&self) -> &Collection {
        &self.cart
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Sum of the cart's line values, computed from scratch. `None` when the
    /// sum does not fit a `Decimal`.
    pub fn cart_value(&self) -> Option<Decimal> {
        self.cart.iter().try_fold(Decimal::ZERO, |sum, entry| sum.checked_add(entry.line_value()?))
    }

    pub fn total_display(&self) -> String {
        format!("Total: {} {}", self.total, self.currency)
    }

    pub fn move_to_cart(&mut self, id: EntryId) -> Result<Transfer, ShopError> {
        let store_entry = self.store.find_by_id(id).ok_or(ShopError::UnknownItem(id))?;
        if store_entry.quantity() == 0 {
            debug!(event_name = "shop.transfer.out_of_stock", item_id = %id, "store is out of stock");
            return Ok(Transfer::OutOfStock { id });
        }

        let name = store_entry.name().to_string();
        let price = store_entry.price();
        let cart_quantity = self.cart.find_by_id(id).map(Entry::quantity).unwrap_or(0);
        if cart_quantity == u32::MAX {
            return Err(DomainError::QuantityOverflow(id).into());
        }
        let next_total = self.total.checked_add(price).ok_or(DomainError::TotalOverflow(id))?;

        let store_quantity = self
            .store
            .find_by_id_mut(id)
            .and_then(Entry::decrement)
            .ok_or(ShopError::UnknownItem(id))?;

        let cart_entry_created = !self.cart.contains(id);
        if cart_entry_created {
            self.cart.add(name, price, 0, Some(id))?;
        }
        let cart_quantity = self
            .cart
            .find_by_id_mut(id)
            .and_then(Entry::increment)
            .ok_or(DomainError::QuantityOverflow(id))?;

        self.total = next_total;

        debug!(
            event_name = "shop.transfer.to_cart",
            item_id = %id,
            store_quantity,
            cart_quantity,
            total = %self.total,
            "moved one unit to cart"
        );

        Ok(Transfer::Moved(TransferReceipt {
            id,
            direction: Direction::ToCart,
            store_quantity,
            cart_quantity,
            cart_entry_created,
            cart_entry_removed: false,
            total: self.total,
        }))
    }

    /// Returns one unit to the store. Unlike [`Shop::move_to_cart`] this never
    /// ends in an out-of-stock no-op: a missing cart entry is an error.
    pub fn move_to_store(&mut self, id: EntryId) -> Result<TransferReceipt, ShopError> {
        let cart_entry = self.cart.find_by_id(id).ok_or(ShopError::NotInCart(id))?;
        if cart_entry.quantity() == 0 {
            return Err(ShopError::NotInCart(id));
        }
        let price = cart_entry.price();

        let store_entry = self.store.find_by_id(id).ok_or(ShopError::UnknownItem(id))?;
        if store_entry.quantity() == u32::MAX {
            return Err(DomainError::QuantityOverflow(id).into());
        }
        let next_total = self.total.checked_sub(price).ok_or(DomainError::TotalOverflow(id))?;

        let store_quantity = self
            .store
            .find_by_id_mut(id)
            .and_then(Entry::increment)
            .ok_or(DomainError::QuantityOverflow(id))?;
        let cart_quantity = self
            .cart
            .find_by_id_mut(id)
            .and_then(Entry::decrement)
            .ok_or(ShopError::NotInCart(id))?;

        self.total = next_total;

        let cart_entry_removed = cart_quantity == 0;
        if cart_entry_removed {
            self.cart.remove_by_id(id);
        }

        debug!(
            event_name = "shop.transfer.to_store",
            item_id = %id,
            store_quantity,
            cart_quantity,
            cart_entry_removed,
            total = %self.total,
            "moved one unit back to store"
        );

        Ok(TransferReceipt {
            id,
            direction: Direction::ToStore,
            store_quantity,
            cart_quantity,
            cart_entry_created: false,
            cart_entry_removed,
            total: self.total,
        })
    }

    pub fn snapshot(&self) -> ShopSnapshot {
        ShopSnapshot {
            currency: self.currency.clone(),
            total: self.total,
            store: self.store.iter().cloned().collect(),
            cart: self.cart.iter().cloned().collect(),
        }
    }
}
