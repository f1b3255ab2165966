use std::collections::HashSet;

use crate::models::ListingId;

/// Listing ids already notified during one target scan.
///
/// Lives exactly as long as the scan of a single target. Nothing is persisted or
/// shared between targets or workers.
#[derive(Debug, Default)]
pub struct SeenListings {
    seen: HashSet<ListingId>,
}

impl SeenListings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time an id is offered and records it. Empty ids
    /// can't be tracked and always return `true`.
    pub fn should_notify(&mut self, listing_id: &ListingId) -> bool {
        if listing_id.is_empty() {
            return true;
        }
        self.seen.insert(listing_id.clone())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_each_id_once() {
        let mut seen = SeenListings::new();
        let id = ListingId("L1".to_string());

        assert!(seen.should_notify(&id));
        assert!(!seen.should_notify(&id));
        assert!(seen.should_notify(&ListingId("L2".to_string())));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn empty_ids_always_notify() {
        let mut seen = SeenListings::new();
        let empty = ListingId::default();

        assert!(seen.should_notify(&empty));
        assert!(seen.should_notify(&empty));
        assert!(seen.is_empty());
    }
}
