//! Table store - the in-memory identifier to callsign map
//!
//! Holds the current generation of the table behind a single mutex. A reload
//! parses the whole source into a fresh map first and then swaps it in under
//! the lock, so readers only ever see a complete generation.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::error::LoadError;

/// Lines starting with this character are ignored.
const COMMENT_MARKER: char = '#';

/// Field separators, applied the way `strtok` applies them: runs collapse and
/// empty fields are dropped.
const DELIMITERS: &[char] = &[',', '\t', '\r', '\n'];

/// Snapshot of the table's bookkeeping, taken under the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Number of identifiers in the active table
    pub entries: usize,
    /// Incremented every time a parsed source is installed (empty or not)
    pub generation: u64,
    /// When the active generation was installed (None until the first install)
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Table {
    entries: HashMap<u32, String>,
    generation: u64,
    loaded_at: Option<DateTime<Utc>>,
}

/// Records parsed out of one read of the source.
#[derive(Debug, Default)]
pub(crate) struct ParsedRecords {
    pub entries: HashMap<u32, String>,
    /// Non-comment lines that did not yield an entry
    pub skipped: usize,
}

/// Mutex-guarded table. Only lock-scoped accessors are exposed.
#[derive(Debug, Default)]
pub struct TableStore {
    table: Mutex<Table>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` and replace the table with its contents.
    ///
    /// Returns the number of entries installed. An unreadable source leaves the
    /// current table alone; a source without a single valid record still
    /// replaces the table (with an empty one) and reports [`LoadError::EmptyResult`].
    pub async fn load(&self, path: &Path) -> Result<usize, LoadError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "Cannot open the NXDN Id lookup file"
                );
                return Err(LoadError::SourceUnavailable {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let parsed = parse_records(&String::from_utf8_lossy(&bytes));
        if parsed.skipped > 0 {
            tracing::debug!(
                path = %path.display(),
                skipped = parsed.skipped,
                "Skipped malformed NXDN Id records"
            );
        }

        let size = self.install(parsed.entries);
        if size == 0 {
            return Err(LoadError::EmptyResult {
                path: path.to_path_buf(),
            });
        }

        tracing::info!(
            path = %path.display(),
            entries = size,
            "Loaded {} Ids to the NXDN callsign lookup table",
            size
        );

        Ok(size)
    }

    /// Swap in a new generation. The old map is dropped after the lock is released.
    pub(crate) fn install(&self, entries: HashMap<u32, String>) -> usize {
        let size = entries.len();
        let previous = {
            let mut table = self.table.lock();
            table.generation += 1;
            table.loaded_at = Some(Utc::now());
            std::mem::replace(&mut table.entries, entries)
        };
        drop(previous);
        size
    }

    /// Callsign stored for `id`, if any.
    pub fn get(&self, id: u32) -> Option<String> {
        self.table.lock().entries.get(&id).cloned()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.table.lock().entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.table.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> TableStats {
        let table = self.table.lock();
        TableStats {
            entries: table.entries.len(),
            generation: table.generation,
            loaded_at: table.loaded_at,
        }
    }
}

/// Parse the whole source text. Later duplicates overwrite earlier ones.
pub(crate) fn parse_records(content: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    for line in content.lines() {
        if line.starts_with(COMMENT_MARKER) {
            continue;
        }

        match parse_record(line) {
            Some((id, callsign)) => {
                parsed.entries.insert(id, callsign);
            }
            None => parsed.skipped += 1,
        }
    }

    parsed
}

/// `id,callsign[,anything else]` -> `(id, CALLSIGN)`
fn parse_record(line: &str) -> Option<(u32, String)> {
    let mut fields = line.split(DELIMITERS).filter(|field| !field.is_empty());
    let id_field = fields.next()?;
    let callsign = fields.next()?;

    let id = parse_id(id_field)?;
    Some((id, callsign.to_ascii_uppercase()))
}

/// Leading-digits integer parse. Zero is reserved and rejected, as is anything
/// negative, non-numeric or wider than 32 bits.
fn parse_id(field: &str) -> Option<u32> {
    let digits = field.trim_start();
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<u32>().ok().filter(|&id| id != 0)
}
