//! Line-oriented query front end used by the gateway binary.

use nxdn_lookup::{CallsignLookup, BROADCAST_ID};

/// Answer one query line. Blank lines get no answer.
///
/// ```text
/// 12345      -> "12345 ALICE"
/// 99999      -> "99999 99999 (unknown)"
/// 65535      -> "65535 ALL"
/// ```
pub fn answer(lookup: &CallsignLookup, line: &str) -> Option<String> {
    let query = line.trim();
    if query.is_empty() {
        return None;
    }

    let Ok(id) = query.parse::<u32>() else {
        return Some(format!("invalid identifier: {}", query));
    };

    if id == BROADCAST_ID {
        return Some(format!("{} {}", id, lookup.find(id)));
    }

    // One table read, so a concurrent reload cannot split name and status.
    match lookup.get(id) {
        Some(callsign) => Some(format!("{} {}", id, callsign)),
        None => Some(format!("{} {} (unknown)", id, id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nxdn_lookup::TableStore;
    use std::sync::Arc;

    async fn lookup_from(content: &str) -> CallsignLookup {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NXDN.csv");
        std::fs::write(&path, content).unwrap();

        let store = Arc::new(TableStore::new());
        store.load(&path).await.unwrap();
        CallsignLookup::new(store)
    }

    #[tokio::test]
    async fn test_answer() {
        let lookup = lookup_from("12345,alice\n").await;

        assert_eq!(answer(&lookup, "12345\n").as_deref(), Some("12345 ALICE"));
        assert_eq!(answer(&lookup, " 99999 ").as_deref(), Some("99999 99999 (unknown)"));
        assert_eq!(answer(&lookup, "65535").as_deref(), Some("65535 ALL"));
        assert_eq!(answer(&lookup, "G4KLX").as_deref(), Some("invalid identifier: G4KLX"));
        assert_eq!(answer(&lookup, "   "), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_answer_consistent_across_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let with = dir.path().join("with.csv");
        let without = dir.path().join("without.csv");
        std::fs::write(&with, "1,anchor\n7,seven\n").unwrap();
        std::fs::write(&without, "1,anchor\n").unwrap();

        let store = Arc::new(TableStore::new());
        store.load(&with).await.unwrap();
        let lookup = CallsignLookup::new(store.clone());

        let reader = std::thread::spawn(move || {
            for _ in 0..20_000 {
                let reply = answer(&lookup, "7").unwrap();
                assert!(
                    reply == "7 SEVEN" || reply == "7 7 (unknown)",
                    "inconsistent reply {reply}"
                );
            }
        });

        while !reader.is_finished() {
            store.load(&without).await.unwrap();
            store.load(&with).await.unwrap();
        }
        reader.join().unwrap();
    }
}
