//! Campus placement records: students, companies, drives, applications, offer letters, and
//! the category and media catalogs kept alongside them.
//!
//! Services enforce the cross-entity rules (an application references a real student and
//! drive exactly once, selection stamps a timestamp, offer letters snapshot their sources)
//! on top of the [`store::RecordStore`] collaborator.

pub mod applications;
pub mod categories;
pub mod companies;
pub mod dashboard;
pub mod domain;
pub mod drives;
pub mod error;
pub mod media;
pub mod offers;
pub mod router;
pub mod service;
pub mod store;
pub mod students;
pub mod validation;

#[cfg(test)]
mod tests;

pub use applications::{ApplicationFilter, ApplicationLifecycle};
pub use categories::{CategoryCatalog, CategoryQuery};
pub use companies::CompanyDirectory;
pub use dashboard::{placement_rate, DashboardReporter, DashboardStats};
pub use domain::{
    Application, ApplicationId, ApplicationRequest, ApplicationStatus, BacklogStatus, Category,
    CategoryDraft, CategoryId, Company, CompanyId, CompanyProfile, CrtFeeStatus, Drive, DriveId,
    DriveRequest, DriveStatus, MediaDraft, MediaEntry, MediaId, MediaPatch, OfferLetter,
    OfferLetterId, OfferLetterRequest, StatusUpdate, Student, StudentId, StudentProfile,
};
pub use drives::DriveScheduler;
pub use error::PlacementError;
pub use media::{MediaCatalog, MediaQuery};
pub use offers::{compose_letter, format_rupees, OfferLetterFilter, OfferLetterGenerator};
pub use router::placement_router;
pub use service::PlacementService;
pub use store::{InMemoryStore, PlacementStores, Record, RecordStore, RepositoryError};
pub use students::StudentRegistry;
pub use validation::{FieldIssue, Validate, ValidationError};
