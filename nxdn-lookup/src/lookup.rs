//! Lookup service - read side of the table

use std::sync::Arc;

use crate::table::TableStore;

/// The all-call destination. Resolved without consulting the table.
pub const BROADCAST_ID: u32 = 0xFFFF;

const BROADCAST_CALLSIGN: &str = "ALL";

/// Cheap, cloneable read handle onto a [`TableStore`].
///
/// Every clone shares the same table, so a reload performed by the scheduler
/// is visible to all handles as soon as the swap completes.
#[derive(Debug, Clone)]
pub struct CallsignLookup {
    store: Arc<TableStore>,
}

impl CallsignLookup {
    pub fn new(store: Arc<TableStore>) -> Self {
        Self { store }
    }

    /// Resolve `id` to something displayable.
    ///
    /// Returns `"ALL"` for the broadcast id, the stored callsign on a hit, and
    /// the decimal id itself on a miss.
    pub fn find(&self, id: u32) -> String {
        if id == BROADCAST_ID {
            return BROADCAST_CALLSIGN.to_string();
        }

        match self.store.get(id) {
            Some(callsign) => callsign,
            None => id.to_string(),
        }
    }

    /// Stored callsign for `id`, without the broadcast or fallback rules.
    pub fn get(&self, id: u32) -> Option<String> {
        self.store.get(id)
    }

    /// Literal membership test (the broadcast id is only known if the source lists it).
    pub fn exists(&self, id: u32) -> bool {
        self.store.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_with(entries: &[(u32, &str)]) -> CallsignLookup {
        let store = Arc::new(TableStore::new());
        store.install(
            entries
                .iter()
                .map(|(id, callsign)| (*id, callsign.to_string()))
                .collect::<HashMap<_, _>>(),
        );
        CallsignLookup::new(store)
    }

    #[test]
    fn test_find_hit_and_miss() {
        let lookup = lookup_with(&[(12345, "ALICE")]);

        assert_eq!(lookup.find(12345), "ALICE");
        assert!(lookup.exists(12345));
        assert_eq!(lookup.find(54321), "54321");
        assert!(!lookup.exists(54321));
        assert_eq!(lookup.get(12345).as_deref(), Some("ALICE"));
        assert_eq!(lookup.get(54321), None);
    }

    #[test]
    fn test_broadcast_resolves_without_table() {
        let empty = lookup_with(&[]);
        assert_eq!(empty.find(BROADCAST_ID), "ALL");
        assert!(!empty.exists(BROADCAST_ID));

        let listed = lookup_with(&[(BROADCAST_ID, "EVERYONE")]);
        assert_eq!(listed.find(BROADCAST_ID), "ALL");
        assert!(listed.exists(BROADCAST_ID));
    }

    #[test]
    fn test_clones_share_table() {
        let lookup = lookup_with(&[(1, "OLD")]);
        let other = lookup.clone();

        lookup
            .store
            .install(HashMap::from([(1, "NEW".to_string())]));

        assert_eq!(other.find(1), "NEW");
    }
}
