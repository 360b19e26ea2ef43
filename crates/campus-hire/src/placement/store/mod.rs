//! Record store collaborator: persistence by identifier, filtered lookup, and counting.
//!
//! Stores carry no business rules. Services resolve references and enforce invariants before
//! calling in here; the only rule a store applies itself is rejecting records that collide on a
//! declared unique key.

mod memory;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

pub use memory::InMemoryStore;

use super::domain::{
    Application, ApplicationId, Category, CategoryId, Company, CompanyId, Drive, DriveId,
    MediaEntry, MediaId,
    OfferLetter, OfferLetterId, Student, StudentId,
};

/// Entity persisted by a [`RecordStore`].
pub trait Record: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Debug + Send + Sync;

    fn record_id(&self) -> &Self::Id;
}

/// Storage abstraction so services can be exercised against in-memory or failing stores.
pub trait RecordStore<T: Record>: Send + Sync {
    fn insert(&self, record: T) -> Result<T, RepositoryError>;
    /// Replace an existing record, keeping its position in listing order.
    fn update(&self, record: T) -> Result<T, RepositoryError>;
    fn fetch(&self, id: &T::Id) -> Result<Option<T>, RepositoryError>;
    /// Returns `false` when nothing was stored under `id`.
    fn remove(&self, id: &T::Id) -> Result<bool, RepositoryError>;
    /// Matching records in insertion order, at most `limit` of them.
    fn find(&self, filter: &dyn Fn(&T) -> bool, limit: usize) -> Result<Vec<T>, RepositoryError>;
    fn count(&self, filter: &dyn Fn(&T) -> bool) -> Result<usize, RepositoryError>;

    fn find_one(&self, filter: &dyn Fn(&T) -> bool) -> Result<Option<T>, RepositoryError> {
        Ok(self.find(filter, 1)?.into_iter().next())
    }
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl Record for Student {
    type Id = StudentId;

    fn record_id(&self) -> &StudentId {
        &self.id
    }
}

impl Record for Company {
    type Id = CompanyId;

    fn record_id(&self) -> &CompanyId {
        &self.id
    }
}

impl Record for Drive {
    type Id = DriveId;

    fn record_id(&self) -> &DriveId {
        &self.id
    }
}

impl Record for Application {
    type Id = ApplicationId;

    fn record_id(&self) -> &ApplicationId {
        &self.id
    }
}

impl Record for OfferLetter {
    type Id = OfferLetterId;

    fn record_id(&self) -> &OfferLetterId {
        &self.id
    }
}

impl Record for Category {
    type Id = CategoryId;

    fn record_id(&self) -> &CategoryId {
        &self.id
    }
}

impl Record for MediaEntry {
    type Id = MediaId;

    fn record_id(&self) -> &MediaId {
        &self.id
    }
}

/// One store handle per collection the placement services read or write.
#[derive(Clone)]
pub struct PlacementStores {
    pub students: Arc<dyn RecordStore<Student>>,
    pub companies: Arc<dyn RecordStore<Company>>,
    pub drives: Arc<dyn RecordStore<Drive>>,
    pub applications: Arc<dyn RecordStore<Application>>,
    pub offer_letters: Arc<dyn RecordStore<OfferLetter>>,
    pub categories: Arc<dyn RecordStore<Category>>,
    pub media: Arc<dyn RecordStore<MediaEntry>>,
}

impl PlacementStores {
    /// In-memory collections with the unique keys a document store would index:
    /// roll numbers and (student, drive) application pairs.
    pub fn in_memory() -> Self {
        Self {
            students: Arc::new(
                InMemoryStore::<Student>::default().with_unique_key(|student: &Student| {
                    student.profile.roll_no.clone()
                }),
            ),
            companies: Arc::new(InMemoryStore::<Company>::default()),
            drives: Arc::new(InMemoryStore::<Drive>::default()),
            applications: Arc::new(InMemoryStore::<Application>::default().with_unique_key(
                |application: &Application| {
                    format!("{}\u{1f}{}", application.student_id, application.drive_id)
                },
            )),
            offer_letters: Arc::new(InMemoryStore::<OfferLetter>::default()),
            categories: Arc::new(InMemoryStore::<Category>::default()),
            media: Arc::new(InMemoryStore::<MediaEntry>::default()),
        }
    }
}
