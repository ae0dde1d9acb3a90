//! Address book of labeled recipients
//!
//! Addresses may be entered as hex or as checksummed identifiers; they are
//! stored in canonical lower-case hex so either spelling finds the same entry.

use crate::error::{IbanError, Result};
use crate::normalize::Normalizer;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const MAX_LABEL_LENGTH: usize = 64;
const MAX_NOTES_LENGTH: usize = 512;
const MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressEntry {
    /// Display label (case-preserved)
    pub label: String,

    /// Canonical lower-case hex address
    pub address: String,

    pub notes: Option<String>,

    /// RFC3339 creation timestamp
    pub created_at: String,
}

/// Thread-safe address book
#[derive(Debug, Clone)]
pub struct AddressBook {
    inner: Arc<RwLock<AddressBookInner>>,
    normalizer: Normalizer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AddressBookInner {
    /// Entries keyed by lowercase label
    entries: HashMap<String, AddressEntry>,

    /// address -> label key
    #[serde(skip)]
    address_index: HashMap<String, String>,
}

impl AddressBookInner {
    /// Rebuild the address index, rejecting entries filed under the wrong key
    /// or sharing an address with another entry.
    fn rebuild_index(&mut self) -> Result<()> {
        self.address_index.clear();
        for (key, entry) in &self.entries {
            if *key != entry.label.to_lowercase() {
                return Err(IbanError::AddressBook(format!(
                    "Entry '{}' is stored under key '{}'",
                    entry.label, key
                )));
            }
            if let Some(other) = self.address_index.insert(entry.address.clone(), key.clone()) {
                return Err(IbanError::AddressBook(format!(
                    "Address {} is listed under both '{}' and '{}'",
                    entry.address, other, key
                )));
            }
        }
        Ok(())
    }
}

impl AddressBook {
    pub fn new(normalizer: Normalizer) -> Self {
        AddressBook {
            inner: Arc::new(RwLock::new(AddressBookInner::default())),
            normalizer,
        }
    }

    /// Add an entry. `address` may be hex or a checksummed identifier.
    pub fn add(&self, label: &str, address: &str, notes: Option<&str>) -> Result<AddressEntry> {
        let label = label.trim();
        validate_label(label)?;

        let address = self.normalizer.normalize(address).ok_or_else(|| {
            IbanError::AddressBook(format!("'{}' is not a recognized address", address.trim()))
        })?;

        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        if let Some(n) = notes {
            validate_notes(n)?;
        }

        let mut inner = self.inner.write();

        if inner.entries.len() >= MAX_ENTRIES {
            return Err(IbanError::AddressBook(format!(
                "Address book is full (max {} entries)",
                MAX_ENTRIES
            )));
        }

        let key = label.to_lowercase();
        if inner.entries.contains_key(&key) {
            return Err(IbanError::AddressBook(format!(
                "Label '{}' already exists",
                label
            )));
        }

        if let Some(existing) = inner
            .address_index
            .get(&address)
            .and_then(|k| inner.entries.get(k))
        {
            return Err(IbanError::AddressBook(format!(
                "Address already exists with label '{}'",
                existing.label
            )));
        }

        let entry = AddressEntry {
            label: label.to_string(),
            address: address.clone(),
            notes: notes.map(str::to_string),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        inner.address_index.insert(address, key.clone());
        inner.entries.insert(key, entry.clone());
        Ok(entry)
    }

    pub fn remove(&self, label: &str) -> Result<AddressEntry> {
        let mut inner = self.inner.write();
        let entry = inner
            .entries
            .remove(&label.trim().to_lowercase())
            .ok_or_else(|| IbanError::AddressBook(format!("Label '{}' not found", label)))?;
        inner.address_index.remove(&entry.address);
        Ok(entry)
    }

    /// Case-insensitive lookup by label
    pub fn get(&self, label: &str) -> Option<AddressEntry> {
        let inner = self.inner.read();
        inner.entries.get(&label.trim().to_lowercase()).cloned()
    }

    /// Reverse lookup; `address` may be in either format
    pub fn get_by_address(&self, address: &str) -> Option<AddressEntry> {
        let address = self.normalizer.normalize(address)?;
        let inner = self.inner.read();
        inner
            .address_index
            .get(&address)
            .and_then(|key| inner.entries.get(key).cloned())
    }

    /// Entries whose label, address or notes contain `query`
    pub fn search(&self, query: &str) -> Vec<AddressEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let inner = self.inner.read();
        let mut results: Vec<_> = inner
            .entries
            .values()
            .filter(|entry| {
                entry.label.to_lowercase().contains(&query)
                    || entry.address.contains(&query)
                    || entry
                        .notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&query))
            })
            .cloned()
            .collect();
        results.sort_by(|a, b| a.label.cmp(&b.label));
        results
    }

    /// All entries sorted by label
    pub fn list(&self) -> Vec<AddressEntry> {
        let inner = self.inner.read();
        let mut entries: Vec<_> = inner.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label));
        entries
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write as JSON via a temporary file and rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let inner = self.inner.read();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&*inner).map_err(|e| {
            IbanError::AddressBook(format!("Failed to serialize address book: {}", e))
        })?;

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, path)?;
        info!("Saved {} address book entries to {}", inner.entries.len(), path.display());
        Ok(())
    }

    /// Load from `path`. Every stored address is re-normalized.
    pub fn load(path: &Path, normalizer: Normalizer) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut inner: AddressBookInner = serde_json::from_str(&contents).map_err(|e| {
            IbanError::AddressBook(format!("Failed to parse address book: {}", e))
        })?;

        for entry in inner.entries.values_mut() {
            validate_label(&entry.label)?;
            if let Some(ref notes) = entry.notes {
                validate_notes(notes)?;
            }
            entry.address = normalizer.normalize(&entry.address).ok_or_else(|| {
                IbanError::AddressBook(format!(
                    "Entry '{}' has an invalid address '{}'",
                    entry.label, entry.address
                ))
            })?;
        }
        inner.rebuild_index()?;

        Ok(AddressBook {
            inner: Arc::new(RwLock::new(inner)),
            normalizer,
        })
    }

    /// Load from `path`, or start empty if it does not exist
    pub fn load_or_new(path: &Path, normalizer: Normalizer) -> Result<Self> {
        if path.exists() {
            Self::load(path, normalizer)
        } else {
            Ok(Self::new(normalizer))
        }
    }
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::new(Normalizer::default())
    }
}

fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(IbanError::AddressBook("Label cannot be empty".to_string()));
    }

    if label.chars().count() > MAX_LABEL_LENGTH {
        return Err(IbanError::AddressBook(format!(
            "Label too long (max {} characters)",
            MAX_LABEL_LENGTH
        )));
    }

    if !label
        .chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace() || "-_.,()[]{}".contains(c))
    {
        return Err(IbanError::AddressBook(
            "Label contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

fn validate_notes(notes: &str) -> Result<()> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(IbanError::AddressBook(format!(
            "Notes too long (max {} characters)",
            MAX_NOTES_LENGTH
        )));
    }
    Ok(())
}

/// Default address book location
pub fn get_addressbook_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".th-iban")
        .join("addressbook.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ALICE: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const ALICE_LOWER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const ALICE_ID: &str = "TH20SGHMIMLXXVYZDHFCOCE17IR4BLCSPYE";
    const BOB: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    const BOB_ID: &str = "TH22D5I4PJVDNO5SH9B600V1FSDRCJFLL8O";

    #[test]
    fn test_add_and_get() {
        let book = AddressBook::default();
        book.add("Alice", ALICE, None).unwrap();

        let entry = book.get("alice").unwrap();
        assert_eq!(entry.label, "Alice");
        assert_eq!(entry.address, ALICE_LOWER);
        assert!(book.get("ALICE").is_some());
    }

    #[test]
    fn test_add_checksummed_id() {
        let book = AddressBook::default();
        let entry = book.add("Bob", BOB_ID, Some("  colleague ")).unwrap();
        assert_eq!(entry.address, "0x70997970c51812dc3a010c7d01b50e0d17dc79c8");
        assert_eq!(entry.notes.as_deref(), Some("colleague"));
    }

    #[test]
    fn test_blank_notes_dropped() {
        let book = AddressBook::default();
        let entry = book.add("Bob", BOB, Some("   ")).unwrap();
        assert!(entry.notes.is_none());
    }

    #[test]
    fn test_rejects_unrecognized_address() {
        let book = AddressBook::default();
        assert!(matches!(
            book.add("Alice", "not an address", None),
            Err(IbanError::AddressBook(_))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn test_duplicate_label() {
        let book = AddressBook::default();
        book.add("Alice", ALICE, None).unwrap();
        assert!(book.add("alice", BOB, None).is_err());
    }

    #[test]
    fn test_duplicate_address_across_formats() {
        let book = AddressBook::default();
        book.add("Alice", ALICE, None).unwrap();
        assert!(book.add("Alice again", ALICE_ID, None).is_err());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_get_by_address_either_format() {
        let book = AddressBook::default();
        book.add("Alice", ALICE, None).unwrap();
        assert_eq!(book.get_by_address(ALICE_ID).unwrap().label, "Alice");
        assert_eq!(book.get_by_address(ALICE_LOWER).unwrap().label, "Alice");
        assert!(book.get_by_address(BOB).is_none());
        assert!(book.get_by_address("garbage").is_none());
    }

    #[test]
    fn test_remove() {
        let book = AddressBook::default();
        book.add("Bob", BOB, None).unwrap();
        let removed = book.remove("BOB").unwrap();
        assert_eq!(removed.label, "Bob");
        assert!(book.get_by_address(BOB).is_none());
        assert!(book.remove("bob").is_err());
    }

    #[test]
    fn test_search_and_list() {
        let book = AddressBook::default();
        book.add("Zed", ALICE, Some("Friend")).unwrap();
        book.add("Bob", BOB, None).unwrap();

        assert_eq!(book.search("friend")[0].label, "Zed");
        assert_eq!(book.search("70997970")[0].label, "Bob");
        assert!(book.search("  ").is_empty());

        let labels: Vec<_> = book.list().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Bob", "Zed"]);
    }

    #[test]
    fn test_label_validation() {
        let book = AddressBook::default();
        assert!(book.add("", ALICE, None).is_err());
        assert!(book.add(&"a".repeat(MAX_LABEL_LENGTH + 1), ALICE, None).is_err());
        assert!(book.add("semi;colon", ALICE, None).is_err());
        assert!(book
            .add("Alice", ALICE, Some(&"n".repeat(MAX_NOTES_LENGTH + 1)))
            .is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("addressbook.json");

        let book = AddressBook::default();
        book.add("Alice", ALICE, None).unwrap();
        book.add("Bob", BOB_ID, None).unwrap();
        book.save(&path).unwrap();

        let loaded = AddressBook::load(&path, Normalizer::default()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get_by_address(ALICE_ID).unwrap().label, "Alice");
        assert_eq!(loaded.get("bob"), book.get("bob"));
    }

    #[test]
    fn test_load_rejects_bad_address() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("addressbook.json");
        fs::write(
            &path,
            r#"{"entries":{"eve":{"label":"Eve","address":"0xnope","notes":null,"created_at":"2024-01-01T00:00:00Z"}}}"#,
        )
        .unwrap();

        assert!(matches!(
            AddressBook::load(&path, Normalizer::default()),
            Err(IbanError::AddressBook(_))
        ));
    }

    #[test]
    fn test_load_rejects_same_address_twice() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("addressbook.json");
        let json = format!(
            r#"{{"entries":{{
                "alice":{{"label":"Alice","address":"{}","notes":null,"created_at":"2024-01-01T00:00:00Z"}},
                "deployer":{{"label":"Deployer","address":"{}","notes":null,"created_at":"2024-01-01T00:00:00Z"}}
            }}}}"#,
            ALICE, ALICE_ID
        );
        fs::write(&path, json).unwrap();

        assert!(matches!(
            AddressBook::load(&path, Normalizer::default()),
            Err(IbanError::AddressBook(_))
        ));
    }

    #[test]
    fn test_load_rejects_mismatched_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("addressbook.json");
        let json = format!(
            r#"{{"entries":{{"bob":{{"label":"Alice","address":"{}","notes":null,"created_at":"2024-01-01T00:00:00Z"}}}}}}"#,
            ALICE
        );
        fs::write(&path, json).unwrap();

        assert!(matches!(
            AddressBook::load(&path, Normalizer::default()),
            Err(IbanError::AddressBook(_))
        ));
    }

    #[test]
    fn test_load_or_new_missing() {
        let temp_dir = TempDir::new().unwrap();
        let book =
            AddressBook::load_or_new(&temp_dir.path().join("none.json"), Normalizer::default())
                .unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn test_thread_safety() {
        use std::thread;

        let book = AddressBook::default();
        let book_clone = book.clone();

        let handle = thread::spawn(move || {
            book_clone.add("Alice", ALICE, None).unwrap();
        });
        book.add("Bob", BOB, None).unwrap();

        handle.join().unwrap();
        assert_eq!(book.len(), 2);
    }
}
