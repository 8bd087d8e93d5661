use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u32);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One item's record on one side of the shop.
///
/// `id`, `name` and `price` are fixed at construction; only the quantity moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    id: EntryId,
    name: String,
    price: Decimal,
    quantity: u32,
}

impl Entry {
    pub fn new(id: EntryId, name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self { id, name: name.into(), price, quantity }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Value of this line: `price * quantity`, or `None` if it does not fit a `Decimal`.
    pub fn line_value(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    pub fn describe(&self) -> String {
        format!("{} | {} | {}", self.name, self.price, self.quantity)
    }

    pub(crate) fn increment(&mut self) -> Option<u32> {
        self.quantity = self.quantity.checked_add(1)?;
        Some(self.quantity)
    }

    pub(crate) fn decrement(&mut self) -> Option<u32> {
        self.quantity = self.quantity.checked_sub(1)?;
        Some(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Entry, EntryId};

    #[test]
    fn describe_joins_name_price_and_quantity() {
        let entry = Entry::new(EntryId(0), "Milk", Decimal::new(200, 0), 3);
        assert_eq!(entry.describe(), "Milk | 200 | 3");
        assert_eq!(entry.describe(), entry.describe());
    }

    #[test]
    fn describe_keeps_decimal_scale() {
        let entry = Entry::new(EntryId(4), "Yo-yo", Decimal::new(1250, 2), 0);
        assert_eq!(entry.describe(), "Yo-yo | 12.50 | 0");
    }

    #[test]
    fn quantity_never_wraps_below_zero_or_past_ceiling() {
        let mut empty = Entry::new(EntryId(1), "Kite", Decimal::ONE, 0);
        assert_eq!(empty.decrement(), None);
        assert_eq!(empty.quantity(), 0);

        let mut full = Entry::new(EntryId(2), "Marble", Decimal::ONE, u32::MAX);
        assert_eq!(full.increment(), None);
        assert_eq!(full.quantity(), u32::MAX);
    }

    #[test]
    fn line_value_multiplies_price_by_quantity() {
        let entry = Entry::new(EntryId(3), "Robot", Decimal::new(1999, 2), 3);
        assert_eq!(entry.line_value(), Some(Decimal::new(5997, 2)));
    }

    #[test]
    fn line_value_reports_unrepresentable_products() {
        let entry = Entry::new(EntryId(5), "Gold kite", Decimal::MAX, 2);
        assert_eq!(entry.line_value(), None);
    }
}
