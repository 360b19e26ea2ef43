use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::{Record, RecordStore, RepositoryError};

type UniqueKey<T> = fn(&T) -> String;

struct Slots<T: Record> {
    next_slot: u64,
    records: BTreeMap<u64, T>,
    index: HashMap<T::Id, u64>,
}

impl<T: Record> Default for Slots<T> {
    fn default() -> Self {
        Self {
            next_slot: 0,
            records: BTreeMap::new(),
            index: HashMap::new(),
        }
    }
}

/// Mutex-guarded collection that lists records in insertion order.
///
/// Unique keys are checked under the same lock as the write, so two racing inserts of the
/// same key cannot both succeed.
pub struct InMemoryStore<T: Record> {
    slots: Mutex<Slots<T>>,
    unique_keys: Vec<UniqueKey<T>>,
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            unique_keys: Vec::new(),
        }
    }
}

impl<T: Record> InMemoryStore<T> {
    pub fn with_unique_key(mut self, key: UniqueKey<T>) -> Self {
        self.unique_keys.push(key);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slots<T>>, RepositoryError> {
        self.slots
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }

    fn collides(&self, slots: &Slots<T>, candidate: &T, own_slot: Option<u64>) -> bool {
        self.unique_keys.iter().any(|key| {
            let wanted = key(candidate);
            slots
                .records
                .iter()
                .filter(|(slot, _)| Some(**slot) != own_slot)
                .any(|(_, existing)| key(existing) == wanted)
        })
    }
}

impl<T: Record> RecordStore<T> for InMemoryStore<T> {
    fn insert(&self, record: T) -> Result<T, RepositoryError> {
        let mut slots = self.lock()?;
        if slots.index.contains_key(record.record_id()) || self.collides(&slots, &record, None) {
            return Err(RepositoryError::Conflict);
        }

        let slot = slots.next_slot;
        slots.next_slot += 1;
        slots.index.insert(record.record_id().clone(), slot);
        slots.records.insert(slot, record.clone());
        Ok(record)
    }

    fn update(&self, record: T) -> Result<T, RepositoryError> {
        let mut slots = self.lock()?;
        let slot = *slots
            .index
            .get(record.record_id())
            .ok_or(RepositoryError::NotFound)?;
        if self.collides(&slots, &record, Some(slot)) {
            return Err(RepositoryError::Conflict);
        }

        slots.records.insert(slot, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &T::Id) -> Result<Option<T>, RepositoryError> {
        let slots = self.lock()?;
        Ok(slots
            .index
            .get(id)
            .and_then(|slot| slots.records.get(slot))
            .cloned())
    }

    fn remove(&self, id: &T::Id) -> Result<bool, RepositoryError> {
        let mut slots = self.lock()?;
        match slots.index.remove(id) {
            Some(slot) => {
                slots.records.remove(&slot);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn find(&self, filter: &dyn Fn(&T) -> bool, limit: usize) -> Result<Vec<T>, RepositoryError> {
        let slots = self.lock()?;
        Ok(slots
            .records
            .values()
            .filter(|record| filter(record))
            .take(limit)
            .cloned()
            .collect())
    }

    fn count(&self, filter: &dyn Fn(&T) -> bool) -> Result<usize, RepositoryError> {
        let slots = self.lock()?;
        Ok(slots.records.values().filter(|record| filter(record)).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::domain::{Category, CategoryId};

    fn category(id: u32, name: &str) -> Category {
        Category {
            id: CategoryId(id),
            name: name.to_string(),
        }
    }

    fn named_store() -> InMemoryStore<Category> {
        InMemoryStore::default().with_unique_key(|category: &Category| category.name.clone())
    }

    #[test]
    fn insert_rejects_duplicate_ids_and_unique_keys() {
        let store = named_store();
        store.insert(category(1, "Books")).expect("first insert");

        assert_eq!(
            store.insert(category(1, "Music")),
            Err(RepositoryError::Conflict)
        );
        assert_eq!(
            store.insert(category(2, "Books")),
            Err(RepositoryError::Conflict)
        );
        assert_eq!(store.count(&|_: &Category| true), Ok(1));
    }

    #[test]
    fn update_keeps_listing_order_and_ignores_own_key() {
        let store = named_store();
        store.insert(category(1, "Books")).expect("insert");
        store.insert(category(2, "Electronics")).expect("insert");

        store
            .update(category(1, "Books"))
            .expect("re-saving the same key is not a collision");
        store.update(category(1, "Novels")).expect("rename");

        let names: Vec<String> = store
            .find(&|_: &Category| true, 10)
            .expect("find")
            .into_iter()
            .map(|category| category.name)
            .collect();
        assert_eq!(names, vec!["Novels".to_string(), "Electronics".to_string()]);

        assert_eq!(
            store.update(category(2, "Novels")),
            Err(RepositoryError::Conflict)
        );
        assert_eq!(
            store.update(category(9, "Games")),
            Err(RepositoryError::NotFound)
        );
    }

    #[test]
    fn find_respects_filter_and_limit() {
        let store: InMemoryStore<Category> = InMemoryStore::default();
        for id in 1..=5 {
            store
                .insert(category(id, &format!("cat-{id}")))
                .expect("insert");
        }

        let odd = store
            .find(&|category: &Category| category.id.0 % 2 == 1, 2)
            .expect("find");
        assert_eq!(
            odd.iter().map(|category| category.id.0).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(store.count(&|category: &Category| category.id.0 > 3), Ok(2));
    }

    #[test]
    fn remove_reports_whether_anything_was_deleted() {
        let store: InMemoryStore<Category> = InMemoryStore::default();
        store.insert(category(1, "Books")).expect("insert");

        assert_eq!(store.remove(&CategoryId(1)), Ok(true));
        assert_eq!(store.remove(&CategoryId(1)), Ok(false));
        assert_eq!(store.fetch(&CategoryId(1)), Ok(None));
    }
}
