use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Company, Drive, DriveId, DriveRequest, DriveStatus};
use super::error::PlacementError;
use super::store::{PlacementStores, RecordStore};
use super::validation::Validate;

/// Schedules recruitment drives and tracks their status.
pub struct DriveScheduler {
    drives: Arc<dyn RecordStore<Drive>>,
    companies: Arc<dyn RecordStore<Company>>,
    fetch_limit: usize,
}

impl DriveScheduler {
    pub fn new(stores: &PlacementStores, fetch_limit: usize) -> Self {
        Self {
            drives: stores.drives.clone(),
            companies: stores.companies.clone(),
            fetch_limit,
        }
    }

    /// Create an upcoming drive, copying the company's current name onto it.
    pub fn schedule(&self, request: DriveRequest) -> Result<Drive, PlacementError> {
        request.validate()?;
        let company = self
            .companies
            .fetch(&request.company_id)?
            .ok_or_else(|| PlacementError::not_found("Company"))?;

        let DriveRequest {
            company_id,
            role,
            job_description,
            ctc,
            eligibility_criteria,
            drive_date,
            location,
        } = request;

        let drive = Drive {
            id: DriveId::generate(),
            company_id,
            company_name: company.profile.name,
            role,
            job_description,
            ctc,
            eligibility_criteria,
            drive_date,
            location,
            status: DriveStatus::Upcoming,
            created_at: Utc::now(),
        };

        let stored = self.drives.insert(drive)?;
        info!(drive_id = %stored.id, company = %stored.company_name, role = %stored.role, "drive scheduled");
        Ok(stored)
    }

    pub fn list(&self, status: Option<DriveStatus>) -> Result<Vec<Drive>, PlacementError> {
        let filter = |drive: &Drive| status.map_or(true, |wanted| drive.status == wanted);
        Ok(self.drives.find(&filter, self.fetch_limit)?)
    }

    pub fn get(&self, id: &DriveId) -> Result<Drive, PlacementError> {
        self.drives
            .fetch(id)?
            .ok_or_else(|| PlacementError::not_found("Drive"))
    }

    /// Any status may follow any other; the drive lifecycle is not enforced.
    pub fn update_status(&self, id: &DriveId, status: DriveStatus) -> Result<Drive, PlacementError> {
        let mut drive = self.get(id)?;
        let previous = drive.status;
        drive.status = status;

        let stored = self
            .drives
            .update(drive)
            .map_err(|err| PlacementError::from_store(err, "Drive", "drive already exists"))?;
        info!(
            drive_id = %stored.id,
            from = previous.label(),
            to = status.label(),
            "drive status updated"
        );
        Ok(stored)
    }
}
