use std::hash::Hash;

use rust_decimal::Decimal;

use crate::domain::entry::{Entry, EntryId};
use crate::errors::DomainError;
use crate::handles::HandleMap;

/// Ordered, id-unique set of entries for one side of the shop.
///
/// Ids handed out by [`Collection::add`] come from a counter that only moves
/// forward, so removing an entry never frees its id for reuse.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    entries: Vec<Entry>,
    next_id: u32,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
        id: Option<EntryId>,
    ) -> Result<&Entry, DomainError> {
        let id = id.unwrap_or(EntryId(self.next_id));
        if self.contains(id) {
            return Err(DomainError::DuplicateEntryId(id));
        }

        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.entries.push(Entry::new(id, name, price, quantity));
        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    pub fn find_by_id(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub(crate) fn find_by_id_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    pub fn find_by_handle<H>(&self, handles: &HandleMap<H>, handle: &H) -> Option<&Entry>
    where
        H: Clone + Eq + Hash,
    {
        handles.id_of(handle).and_then(|id| self.find_by_id(id))
    }

    pub fn remove_by_id(&mut self, id: EntryId) -> Option<Entry> {
        let index = self.entries.iter().position(|entry| entry.id() == id)?;
        Some(self.entries.remove(index))
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.find_by_id(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
