use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Company, CompanyId, CompanyProfile};
use super::error::PlacementError;
use super::store::{PlacementStores, RecordStore};
use super::validation::Validate;

/// Hiring companies. Created once and read thereafter.
pub struct CompanyDirectory {
    companies: Arc<dyn RecordStore<Company>>,
    fetch_limit: usize,
}

impl CompanyDirectory {
    pub fn new(stores: &PlacementStores, fetch_limit: usize) -> Self {
        Self {
            companies: stores.companies.clone(),
            fetch_limit,
        }
    }

    pub fn create(&self, profile: CompanyProfile) -> Result<Company, PlacementError> {
        profile.validate()?;

        let company = Company {
            id: CompanyId::generate(),
            profile,
            created_at: Utc::now(),
        };

        let stored = self.companies.insert(company)?;
        info!(company_id = %stored.id, name = %stored.profile.name, "company created");
        Ok(stored)
    }

    pub fn list(&self) -> Result<Vec<Company>, PlacementError> {
        Ok(self.companies.find(&|_: &Company| true, self.fetch_limit)?)
    }

    pub fn get(&self, id: &CompanyId) -> Result<Company, PlacementError> {
        self.companies
            .fetch(id)?
            .ok_or_else(|| PlacementError::not_found("Company"))
    }
}
