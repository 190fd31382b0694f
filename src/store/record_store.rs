use super::backend::StorageBackend;
use super::fs_backend::FsBackend;
use crate::config::StoreConfig;
use crate::error::{LumbungError, Result};
use crate::model::Record;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Snapshot of one or more namespaces, keyed by namespace name. The arrays
/// are kept as raw JSON so a snapshot taken with one record layout can be
/// re-imported after the layout has grown new optional fields.
pub type ExportData = BTreeMap<String, Vec<Value>>;

/// Namespace-scoped record persistence over a [`StorageBackend`].
///
/// Each namespace holds one JSON array of homogeneous records. Every
/// mutation rewrites the whole array in a single backend write, so a
/// namespace is always either fully updated or untouched. Reads never
/// fail: missing or unreadable data is logged and treated as empty.
pub struct RecordStore<B: StorageBackend> {
    pub(crate) backend: B,
    pretty: bool,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Create a store over the given backend. Lists are persisted as
    /// pretty-printed JSON unless [`with_pretty`](Self::with_pretty)
    /// says otherwise.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    // --- Reads ---

    /// Return every record in the namespace. Absent, unreadable, or
    /// non-array data recovers as an empty list with a warning, so a
    /// damaged namespace behaves like a fresh one.
    pub fn get_all<T: Record>(&self, namespace: &str) -> Vec<T> {
        let text = match self.read_text(namespace) {
            Some(text) => text,
            None => return Vec::new(),
        };
        match serde_json::from_str::<Vec<T>>(&text) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    "Unreadable data in '{}', recovering as empty: {}",
                    namespace,
                    err
                );
                Vec::new()
            }
        }
    }

    pub fn get_by_id<T: Record>(&self, namespace: &str, id: u64) -> Option<T> {
        self.get_all::<T>(namespace)
            .into_iter()
            .find(|record| record.id() == id)
    }

    /// Case-insensitive substring search over the named fields. String
    /// fields are lowercased; numeric fields match against their decimal
    /// rendering; anything else never matches. An empty term matches
    /// every record.
    pub fn search<T: Record>(&self, namespace: &str, term: &str, fields: &[&str]) -> Vec<T> {
        let needle = term.to_lowercase();
        self.get_all::<T>(namespace)
            .into_iter()
            .filter(|record| record_matches(record, &needle, fields))
            .collect()
    }

    pub fn filter<T, F>(&self, namespace: &str, mut predicate: F) -> Vec<T>
    where
        T: Record,
        F: FnMut(&T) -> bool,
    {
        self.get_all::<T>(namespace)
            .into_iter()
            .filter(|record| predicate(record))
            .collect()
    }

    // --- Writes ---

    /// Insert a record with a freshly assigned id and return the stored
    /// copy. Ids are one above the current maximum, so deleting the
    /// newest record frees its id for the next create.
    pub fn create<T: Record>(&self, namespace: &str, record: &T) -> Result<T> {
        let mut records = self.get_all::<T>(namespace);
        let next_id = records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;

        let mut created = record.clone();
        created.set_id(next_id);
        records.push(created.clone());
        self.save_all(namespace, &records)?;
        Ok(created)
    }

    /// Replace the stored record carrying the same id. Fails with
    /// [`LumbungError::RecordNotFound`] if no such record exists; the
    /// namespace is not written in that case.
    pub fn update<T: Record>(&self, namespace: &str, record: &T) -> Result<T> {
        let mut records = self.get_all::<T>(namespace);
        let index = records
            .iter()
            .position(|r| r.id() == record.id())
            .ok_or_else(|| LumbungError::RecordNotFound {
                namespace: namespace.to_string(),
                id: record.id(),
            })?;

        records[index] = record.clone();
        self.save_all(namespace, &records)?;
        Ok(record.clone())
    }

    /// Remove the record with the given id. Returns whether a removal
    /// happened; when nothing matched the namespace is left unwritten.
    pub fn delete(&self, namespace: &str, id: u64) -> Result<bool> {
        let mut records = self.load_raw(namespace);
        let before = records.len();
        records.retain(|value| record_id(value) != Some(id));
        if records.len() == before {
            return Ok(false);
        }
        self.write_list(namespace, &records)?;
        Ok(true)
    }

    /// Insert several records in one persisted write. Ids are assigned
    /// consecutively starting one above the current maximum, in input
    /// order.
    pub fn bulk_create<T: Record>(&self, namespace: &str, records: &[T]) -> Result<Vec<T>> {
        let mut existing = self.get_all::<T>(namespace);
        let mut next_id = existing.iter().map(|r| r.id()).max().unwrap_or(0) + 1;

        let mut created = Vec::with_capacity(records.len());
        for record in records {
            let mut item = record.clone();
            item.set_id(next_id);
            next_id += 1;
            existing.push(item.clone());
            created.push(item);
        }
        self.save_all(namespace, &existing)?;
        Ok(created)
    }

    /// Overwrite the namespace with exactly the given records.
    pub fn save_all<T: Record>(&self, namespace: &str, records: &[T]) -> Result<()> {
        self.write_list(namespace, records)
    }

    pub fn clear(&self, namespace: &str) -> Result<()> {
        self.backend.remove(namespace)
    }

    pub fn clear_all(&self, namespaces: &[&str]) -> Result<()> {
        for namespace in namespaces {
            self.backend.remove(namespace)?;
        }
        Ok(())
    }

    // --- Snapshots ---

    /// Capture the raw contents of the given namespaces.
    pub fn export_all(&self, namespaces: &[&str]) -> ExportData {
        namespaces
            .iter()
            .map(|namespace| (namespace.to_string(), self.load_raw(namespace)))
            .collect()
    }

    /// Restore a snapshot. With `overwrite` each namespace is replaced
    /// outright; otherwise the snapshot records are appended after the
    /// existing ones, ids untouched.
    pub fn import_all(&self, data: &ExportData, overwrite: bool) -> Result<()> {
        for (namespace, records) in data {
            if overwrite {
                self.write_list(namespace, records)?;
            } else {
                let mut existing = self.load_raw(namespace);
                existing.extend(records.iter().cloned());
                self.write_list(namespace, &existing)?;
            }
            tracing::debug!(
                "Imported {} records into '{}' (overwrite: {})",
                records.len(),
                namespace,
                overwrite
            );
        }
        Ok(())
    }

    /// Re-read a namespace item by item, keeping records that still
    /// deserialize as `T` and offering the rest to `migrate`. Whatever
    /// survives is persisted back and returned. A namespace whose stored
    /// text is not a JSON array is left alone. Best effort: a failed
    /// persist is logged and yields an empty list.
    pub fn validate_and_migrate<T, F>(&self, namespace: &str, migrate: F) -> Vec<T>
    where
        T: Record,
        F: Fn(&Value) -> Option<T>,
    {
        let text = match self.read_text(namespace) {
            Some(text) => text,
            None => return Vec::new(),
        };
        let raw = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            Ok(_) | Err(_) => {
                tracing::warn!("Data in '{}' is not a JSON array, nothing to clean", namespace);
                return Vec::new();
            }
        };

        let mut cleaned = Vec::with_capacity(raw.len());
        for value in &raw {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(record) => cleaned.push(record),
                Err(_) => {
                    if let Some(migrated) = migrate(value) {
                        cleaned.push(migrated);
                    }
                }
            }
        }

        let dropped = raw.len() - cleaned.len();
        if dropped > 0 {
            tracing::warn!("Dropped {} unreadable records from '{}'", dropped, namespace);
        }
        if let Err(err) = self.save_all(namespace, &cleaned) {
            tracing::warn!("Could not persist cleaned '{}': {}", namespace, err);
            return Vec::new();
        }
        cleaned
    }

    // --- Internals ---

    fn read_text(&self, namespace: &str) -> Option<String> {
        match self.backend.read(namespace) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Read failed for '{}', treating as empty: {}", namespace, err);
                None
            }
        }
    }

    fn load_raw(&self, namespace: &str) -> Vec<Value> {
        let text = match self.read_text(namespace) {
            Some(text) => text,
            None => return Vec::new(),
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                tracing::warn!(
                    "Data in '{}' is not a JSON array, recovering as empty",
                    namespace
                );
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(
                    "Unreadable data in '{}', recovering as empty: {}",
                    namespace,
                    err
                );
                Vec::new()
            }
        }
    }

    fn write_list<S: Serialize>(&self, namespace: &str, records: &[S]) -> Result<()> {
        let text = if self.pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };
        self.backend.write(namespace, &text)
    }
}

impl RecordStore<FsBackend> {
    /// Open a file-backed store rooted at the configured data directory.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let data_dir = config.resolve_data_dir()?;
        Ok(Self::with_backend(FsBackend::new(data_dir)).with_pretty(config.pretty))
    }
}

fn record_id(value: &Value) -> Option<u64> {
    value.get("id").and_then(Value::as_u64)
}

fn record_matches<T: Serialize>(record: &T, needle: &str, fields: &[&str]) -> bool {
    let value = match serde_json::to_value(record) {
        Ok(value) => value,
        Err(_) => return false,
    };
    fields.iter().any(|field| match value.get(field) {
        Some(Value::String(text)) => text.to_lowercase().contains(needle),
        Some(Value::Number(number)) => number.to_string().contains(needle),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct Crop {
        id: u64,
        name: String,
        price: u64,
        note: Option<String>,
    }

    impl Record for Crop {
        fn id(&self) -> u64 {
            self.id
        }
        fn set_id(&mut self, id: u64) {
            self.id = id;
        }
    }

    fn crop(name: &str, price: u64) -> Crop {
        Crop {
            id: 0,
            name: name.to_string(),
            price,
            note: None,
        }
    }

    fn store() -> RecordStore<MemBackend> {
        RecordStore::with_backend(MemBackend::new())
    }

    // --- Creation ---

    #[test]
    fn test_create_assigns_sequential_ids_starting_at_one() {
        let store = store();
        let a = store.create("crops", &crop("Padi", 100)).unwrap();
        let b = store.create("crops", &crop("Jagung", 200)).unwrap();
        let c = store.create("crops", &crop("Kedelai", 300)).unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[test]
    fn test_create_reuses_the_id_of_a_deleted_maximum() {
        let store = store();
        store.create("crops", &crop("Padi", 100)).unwrap();
        store.create("crops", &crop("Jagung", 200)).unwrap();
        store.delete("crops", 2).unwrap();

        // Ids come from max + 1 over live records, not a counter.
        let next = store.create("crops", &crop("Kedelai", 300)).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_created_records_round_trip_through_get_by_id() {
        let store = store();
        let mut wanted = crop("Padi", 100);
        wanted.note = Some("unggul".to_string());
        let created = store.create("crops", &wanted).unwrap();

        assert_eq!(store.get_by_id::<Crop>("crops", created.id), Some(created));
        assert_eq!(store.get_by_id::<Crop>("crops", 42), None);
    }

    #[test]
    fn test_create_surfaces_backend_write_failure() {
        let store = store();
        store.backend.set_simulate_write_error(true);
        let result = store.create("crops", &crop("Padi", 100));
        assert!(matches!(result, Err(LumbungError::Backend(_))));
    }

    #[test]
    fn test_bulk_create_assigns_consecutive_ids_in_input_order() {
        let store = store();
        store.create("crops", &crop("Padi", 100)).unwrap();

        let batch = vec![crop("Jagung", 200), crop("Kedelai", 300), crop("Ubi", 50)];
        let created = store.bulk_create("crops", &batch).unwrap();

        let ids: Vec<u64> = created.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        let names: Vec<&str> = created.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Jagung", "Kedelai", "Ubi"]);
        assert_eq!(store.get_all::<Crop>("crops").len(), 4);
    }

    // --- Update and delete ---

    #[test]
    fn test_update_replaces_the_record_wholesale() {
        let store = store();
        let created = store.create("crops", &crop("Padi", 100)).unwrap();

        let mut changed = created.clone();
        changed.price = 150;
        changed.note = Some("harga naik".to_string());
        store.update("crops", &changed).unwrap();

        assert_eq!(store.get_by_id::<Crop>("crops", created.id), Some(changed));
    }

    #[test]
    fn test_update_of_an_unknown_id_fails_without_writing() {
        let store = store();
        store.create("crops", &crop("Padi", 100)).unwrap();

        let mut ghost = crop("Jagung", 200);
        ghost.id = 99;
        let result = store.update("crops", &ghost);
        assert!(matches!(
            result,
            Err(LumbungError::RecordNotFound { id: 99, .. })
        ));
        assert_eq!(store.get_all::<Crop>("crops").len(), 1);
    }

    #[test]
    fn test_delete_removes_and_reports() {
        let store = store();
        let a = store.create("crops", &crop("Padi", 100)).unwrap();
        store.create("crops", &crop("Jagung", 200)).unwrap();

        assert!(store.delete("crops", a.id).unwrap());
        assert_eq!(store.get_all::<Crop>("crops").len(), 1);
        assert!(!store.delete("crops", a.id).unwrap());
    }

    #[test]
    fn test_delete_of_a_missing_id_never_touches_the_backend() {
        let store = store();
        store.create("crops", &crop("Padi", 100)).unwrap();

        store.backend.set_simulate_write_error(true);
        assert_eq!(store.delete("crops", 42).unwrap(), false);
    }

    #[test]
    fn test_delete_surfaces_persist_failure_and_keeps_the_record() {
        let store = store();
        let a = store.create("crops", &crop("Padi", 100)).unwrap();

        store.backend.set_simulate_write_error(true);
        assert!(store.delete("crops", a.id).is_err());

        store.backend.set_simulate_write_error(false);
        assert_eq!(store.get_all::<Crop>("crops").len(), 1);
    }

    #[test]
    fn test_create_then_delete_leaves_only_the_survivor() {
        let store = store();
        let a = store.create("crops", &crop("Padi", 100)).unwrap();
        let b = store.create("crops", &crop("Jagung", 200)).unwrap();

        assert!(store.delete("crops", a.id).unwrap());
        assert_eq!(store.get_all::<Crop>("crops"), vec![b]);
    }

    // --- Search and filter ---

    #[test]
    fn test_search_is_case_insensitive_substring_match() {
        let store = store();
        store.create("crops", &crop("Beras Premium", 12000)).unwrap();
        store.create("crops", &crop("Jagung Manis", 8000)).unwrap();

        let hits = store.search::<Crop>("crops", "PREMIUM", &["name"]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Beras Premium");
    }

    #[test]
    fn test_search_matches_numbers_through_their_digits() {
        let store = store();
        store.create("crops", &crop("Beras", 12000)).unwrap();
        store.create("crops", &crop("Jagung", 8000)).unwrap();

        let hits = store.search::<Crop>("crops", "200", &["name", "price"]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].price, 12000);
    }

    #[test]
    fn test_search_only_looks_at_the_named_fields() {
        let store = store();
        store.create("crops", &crop("Beras", 12000)).unwrap();
        assert!(store.search::<Crop>("crops", "12000", &["name"]).is_empty());
    }

    #[test]
    fn test_search_with_an_empty_term_returns_everything() {
        let store = store();
        store.create("crops", &crop("Padi", 100)).unwrap();
        store.create("crops", &crop("Jagung", 200)).unwrap();
        assert_eq!(store.search::<Crop>("crops", "", &["name"]).len(), 2);
    }

    #[test]
    fn test_search_skips_optional_fields_that_are_absent() {
        let store = store();
        let mut noted = crop("Padi", 100);
        noted.note = Some("varietas unggul".to_string());
        store.create("crops", &noted).unwrap();
        store.create("crops", &crop("Jagung", 200)).unwrap();

        let hits = store.search::<Crop>("crops", "unggul", &["note"]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Padi");
    }

    #[test]
    fn test_filter_applies_the_predicate() {
        let store = store();
        store.create("crops", &crop("Padi", 100)).unwrap();
        store.create("crops", &crop("Jagung", 200)).unwrap();
        store.create("crops", &crop("Kedelai", 300)).unwrap();

        let cheap = store.filter::<Crop, _>("crops", |c| c.price < 250);
        assert_eq!(cheap.len(), 2);
    }

    // --- Snapshots ---

    #[test]
    fn test_export_then_import_overwrite_round_trips() {
        let source = store();
        source.create("crops", &crop("Padi", 100)).unwrap();
        source.create("crops", &crop("Jagung", 200)).unwrap();
        source.create("tools", &crop("Cangkul", 50000)).unwrap();

        let snapshot = source.export_all(&["crops", "tools"]);

        let target = store();
        target.create("crops", &crop("Ubi", 10)).unwrap();
        target.import_all(&snapshot, true).unwrap();

        assert_eq!(
            target.get_all::<Crop>("crops"),
            source.get_all::<Crop>("crops")
        );
        assert_eq!(target.export_all(&["crops", "tools"]), snapshot);
    }

    #[test]
    fn test_import_append_keeps_existing_records_and_ids() {
        let source = store();
        source.create("crops", &crop("Padi", 100)).unwrap();
        let snapshot = source.export_all(&["crops"]);

        let target = store();
        target.create("crops", &crop("Jagung", 200)).unwrap();
        target.import_all(&snapshot, false).unwrap();

        // Appended raw, so the imported id 1 now appears twice.
        let ids: Vec<u64> = target
            .get_all::<Crop>("crops")
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1, 1]);
    }

    // --- Recovery ---

    #[test]
    fn test_unreadable_namespace_recovers_as_empty_and_restarts_ids() {
        let store = store();
        store.backend.write("crops", "definitely not json").unwrap();

        assert!(store.get_all::<Crop>("crops").is_empty());
        let created = store.create("crops", &crop("Padi", 100)).unwrap();
        assert_eq!(created.id, 1);
    }

    #[test]
    fn test_non_array_document_recovers_as_empty() {
        let store = store();
        store.backend.write("crops", "{\"id\": 1}").unwrap();
        assert!(store.get_all::<Crop>("crops").is_empty());
        assert!(store.export_all(&["crops"])["crops"].is_empty());
    }

    #[test]
    fn test_validate_and_migrate_salvages_what_it_can() {
        let store = store();
        let good = store.create("crops", &crop("Padi", 100)).unwrap();

        // Slip in one record with a wrong type and one legacy shape.
        let mut raw = store.export_all(&["crops"])["crops"].clone();
        raw.push(json!({"id": 2, "name": 3, "price": "many"}));
        raw.push(json!({"id": 3, "nama": "Jagung", "harga": 200}));
        let mut snapshot = ExportData::new();
        snapshot.insert("crops".to_string(), raw);
        store.import_all(&snapshot, true).unwrap();

        let cleaned = store.validate_and_migrate::<Crop, _>("crops", |value| {
            let name = value.get("nama")?.as_str()?.to_string();
            Some(Crop {
                id: record_id(value)?,
                name,
                price: value.get("harga")?.as_u64()?,
                note: None,
            })
        });

        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0], good);
        assert_eq!(cleaned[1].name, "Jagung");
        // The cleaned list is what later reads see.
        assert_eq!(store.get_all::<Crop>("crops"), cleaned);
    }

    #[test]
    fn test_validate_and_migrate_leaves_non_array_data_alone() {
        let store = store();
        store.backend.write("crops", "\"scalar\"").unwrap();

        let cleaned = store.validate_and_migrate::<Crop, _>("crops", |_| None);
        assert!(cleaned.is_empty());
        assert_eq!(
            store.backend.read("crops").unwrap().as_deref(),
            Some("\"scalar\"")
        );
    }

    // --- Housekeeping ---

    #[test]
    fn test_save_all_overwrites_wholesale() {
        let store = store();
        store.create("crops", &crop("Padi", 100)).unwrap();
        store.create("crops", &crop("Jagung", 200)).unwrap();

        let only = vec![crop("Kedelai", 300)];
        store.save_all("crops", &only).unwrap();
        assert_eq!(store.get_all::<Crop>("crops"), only);
    }

    #[test]
    fn test_clear_and_clear_all_empty_their_namespaces() {
        let store = store();
        store.create("crops", &crop("Padi", 100)).unwrap();
        store.create("tools", &crop("Cangkul", 50000)).unwrap();

        store.clear("crops").unwrap();
        assert!(store.get_all::<Crop>("crops").is_empty());
        assert_eq!(store.get_all::<Crop>("tools").len(), 1);

        store.clear_all(&["crops", "tools"]).unwrap();
        assert!(store.get_all::<Crop>("tools").is_empty());
    }

    #[test]
    fn test_pretty_and_compact_output_follow_the_flag() {
        let pretty = store();
        pretty.create("crops", &crop("Padi", 100)).unwrap();
        assert!(pretty.backend.read("crops").unwrap().unwrap().contains('\n'));

        let compact = RecordStore::with_backend(MemBackend::new()).with_pretty(false);
        compact.create("crops", &crop("Padi", 100)).unwrap();
        assert!(!compact.backend.read("crops").unwrap().unwrap().contains('\n'));
    }
}
