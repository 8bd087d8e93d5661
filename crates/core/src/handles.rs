use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::entry::EntryId;

/// Association between presentation handles and entry ids.
///
/// Entries never hold their own display handle; the presentation layer keeps
/// one of these per collection and resolves events through it.
#[derive(Clone, Debug)]
pub struct HandleMap<H> {
    by_id: HashMap<EntryId, H>,
    by_handle: HashMap<H, EntryId>,
}

impl<H> Default for HandleMap<H> {
    fn default() -> Self {
        Self { by_id: HashMap::new(), by_handle: HashMap::new() }
    }
}

impl<H> HandleMap<H>
where
    H: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handle` to `id`, dropping any earlier binding of either side.
    pub fn register(&mut self, id: EntryId, handle: H) {
        if let Some(previous_id) = self.by_handle.remove(&handle) {
            self.by_id.remove(&previous_id);
        }
        if let Some(previous_handle) = self.by_id.insert(id, handle.clone()) {
            self.by_handle.remove(&previous_handle);
        }
        self.by_handle.insert(handle, id);
    }

    pub fn release(&mut self, id: EntryId) -> Option<H> {
        let handle = self.by_id.remove(&id)?;
        self.by_handle.remove(&handle);
        Some(handle)
    }

    pub fn handle_of(&self, id: EntryId) -> Option<&H> {
        self.by_id.get(&id)
    }

    pub fn id_of(&self, handle: &H) -> Option<EntryId> {
        self.by_handle.get(handle).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::HandleMap;
    use crate::domain::entry::EntryId;

    #[test]
    fn register_and_resolve_both_directions() {
        let mut handles = HandleMap::new();
        handles.register(EntryId(0), "c0");

        assert_eq!(handles.id_of(&"c0"), Some(EntryId(0)));
        assert_eq!(handles.handle_of(EntryId(0)), Some(&"c0"));
    }

    #[test]
    fn rebinding_a_handle_drops_the_stale_id() {
        let mut handles = HandleMap::new();
        handles.register(EntryId(0), "row");
        handles.register(EntryId(1), "row");

        assert_eq!(handles.id_of(&"row"), Some(EntryId(1)));
        assert_eq!(handles.handle_of(EntryId(0)), None);
        assert_eq!(handles.len(), 1);
    }

    #[test]
    fn rebinding_an_id_drops_the_stale_handle() {
        let mut handles = HandleMap::new();
        handles.register(EntryId(2), "old");
        handles.register(EntryId(2), "new");

        assert_eq!(handles.id_of(&"old"), None);
        assert_eq!(handles.id_of(&"new"), Some(EntryId(2)));
    }

    #[test]
    fn release_forgets_both_sides() {
        let mut handles = HandleMap::new();
        handles.register(EntryId(3), "c3");

        assert_eq!(handles.release(EntryId(3)), Some("c3"));
        assert_eq!(handles.release(EntryId(3)), None);
        assert_eq!(handles.id_of(&"c3"), None);
        assert!(handles.is_empty());
    }
}
