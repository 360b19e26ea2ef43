use crate::config::StoreConfig;

use super::applications::ApplicationLifecycle;
use super::categories::CategoryCatalog;
use super::companies::CompanyDirectory;
use super::dashboard::DashboardReporter;
use super::drives::DriveScheduler;
use super::media::MediaCatalog;
use super::offers::OfferLetterGenerator;
use super::store::PlacementStores;
use super::students::StudentRegistry;

/// Service composing every placement component over one set of stores.
pub struct PlacementService {
    students: StudentRegistry,
    companies: CompanyDirectory,
    drives: DriveScheduler,
    applications: ApplicationLifecycle,
    offers: OfferLetterGenerator,
    dashboard: DashboardReporter,
    categories: CategoryCatalog,
    media: MediaCatalog,
}

impl PlacementService {
    pub fn new(stores: PlacementStores, config: &StoreConfig) -> Self {
        let limit = config.fetch_limit;
        Self {
            students: StudentRegistry::new(&stores, limit),
            companies: CompanyDirectory::new(&stores, limit),
            drives: DriveScheduler::new(&stores, limit),
            applications: ApplicationLifecycle::new(&stores, limit),
            offers: OfferLetterGenerator::new(&stores, limit),
            dashboard: DashboardReporter::new(&stores),
            categories: CategoryCatalog::new(&stores, limit),
            media: MediaCatalog::new(&stores, limit),
        }
    }

    pub fn in_memory(config: &StoreConfig) -> Self {
        Self::new(PlacementStores::in_memory(), config)
    }

    pub fn students(&self) -> &StudentRegistry {
        &self.students
    }

    pub fn companies(&self) -> &CompanyDirectory {
        &self.companies
    }

    pub fn drives(&self) -> &DriveScheduler {
        &self.drives
    }

    pub fn applications(&self) -> &ApplicationLifecycle {
        &self.applications
    }

    pub fn offers(&self) -> &OfferLetterGenerator {
        &self.offers
    }

    pub fn dashboard(&self) -> &DashboardReporter {
        &self.dashboard
    }

    pub fn categories(&self) -> &CategoryCatalog {
        &self.categories
    }

    pub fn media(&self) -> &MediaCatalog {
        &self.media
    }
}
