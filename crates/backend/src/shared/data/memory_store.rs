//! In-memory record store
//!
//! Holds the records of one aggregate in insertion order. Identifiers are
//! allocated from a per-store sequence, so an id is never reused within a
//! process even after its record was removed. Nothing is durable.

use contracts::domain::common::{AggregateId, AggregateRoot};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("ไม่พบ{element} (id: {id})")]
    NotFound { element: &'static str, id: String },
}

#[derive(Debug, Clone)]
pub struct MemoryStore<T: AggregateRoot> {
    records: Vec<T>,
    sequence: u64,
}

impl<T: AggregateRoot> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AggregateRoot> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            sequence: 0,
        }
    }

    /// All records in insertion order
    pub fn list(&self) -> Vec<T> {
        self.records.clone()
    }

    /// Records matching `predicate`, in insertion order
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.records.iter().filter(|r| predicate(r)).cloned().collect()
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.records.iter().find(|r| predicate(r)).cloned()
    }

    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.records.iter().find(|r| r.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record under a freshly allocated id; returns the stored copy
    pub fn add(&mut self, mut record: T) -> T {
        self.sequence += 1;
        record.assign_id(T::Id::from_sequence(self.sequence));
        *record.metadata_mut() = Default::default();
        tracing::debug!("{}: added {}", T::collection_name(), record.id().as_string());
        self.records.push(record.clone());
        record
    }

    /// Replace the record stored under `id`. The id and creation time are
    /// preserved, the version is bumped.
    pub fn update(&mut self, id: &T::Id, mut record: T) -> Result<T, StoreError> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;

        record.assign_id(id.clone());
        let mut metadata = slot.metadata().clone();
        metadata.touch();
        *record.metadata_mut() = metadata;

        *slot = record.clone();
        tracing::debug!("{}: replaced {}", T::collection_name(), id.as_string());
        Ok(record)
    }

    /// [`add`](Self::add) once `check` accepts the record against the
    /// current contents. Callers hold the write lock across both steps.
    pub fn add_checked<E>(
        &mut self,
        record: T,
        check: impl FnOnce(&Self, &T) -> Result<(), E>,
    ) -> Result<T, E> {
        check(self, &record)?;
        Ok(self.add(record))
    }

    /// [`update`](Self::update) once `check` accepts the replacement against
    /// the current contents.
    pub fn update_checked<E: From<StoreError>>(
        &mut self,
        id: &T::Id,
        record: T,
        check: impl FnOnce(&Self, &T) -> Result<(), E>,
    ) -> Result<T, E> {
        check(self, &record)?;
        Ok(self.update(id, record)?)
    }

    /// Remove the record stored under `id`; `false` when there was none
    pub fn remove(&mut self, id: &T::Id) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        self.records.len() != before
    }
}

pub fn not_found<T: AggregateRoot>(id: &T::Id) -> StoreError {
    StoreError::NotFound {
        element: T::element_name(),
        id: id.as_string(),
    }
}
