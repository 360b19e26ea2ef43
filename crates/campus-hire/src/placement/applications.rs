use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{
    empty_string_as_none, Application, ApplicationId, ApplicationRequest, ApplicationStatus,
    Drive, DriveId, Student, StudentId,
};
use super::error::PlacementError;
use super::store::{PlacementStores, RecordStore};

const DUPLICATE_APPLICATION: &str = "Application already exists";

/// Optional exact-match narrowing for application listings. Both filters must match when set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationFilter {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<StudentId>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub drive_id: Option<DriveId>,
}

impl ApplicationFilter {
    pub fn for_student(student_id: StudentId) -> Self {
        Self {
            student_id: Some(student_id),
            drive_id: None,
        }
    }

    pub fn for_drive(drive_id: DriveId) -> Self {
        Self {
            student_id: None,
            drive_id: Some(drive_id),
        }
    }

    pub fn matches(&self, application: &Application) -> bool {
        self.student_id
            .as_ref()
            .map_or(true, |id| &application.student_id == id)
            && self
                .drive_id
                .as_ref()
                .map_or(true, |id| &application.drive_id == id)
    }
}

/// Keeps applications consistent with the students and drives they reference and owns the
/// application status state machine.
pub struct ApplicationLifecycle {
    students: Arc<dyn RecordStore<Student>>,
    drives: Arc<dyn RecordStore<Drive>>,
    applications: Arc<dyn RecordStore<Application>>,
    fetch_limit: usize,
}

impl ApplicationLifecycle {
    pub fn new(stores: &PlacementStores, fetch_limit: usize) -> Self {
        Self {
            students: stores.students.clone(),
            drives: stores.drives.clone(),
            applications: stores.applications.clone(),
            fetch_limit,
        }
    }

    /// Apply a student to a drive.
    ///
    /// Resolves the student, then the drive, then rejects an existing (student, drive) pair;
    /// nothing is written unless all three checks pass. The store's unique key on the pair
    /// catches a concurrent duplicate that slips past the lookup.
    pub fn apply(&self, request: ApplicationRequest) -> Result<Application, PlacementError> {
        let ApplicationRequest {
            student_id,
            drive_id,
        } = request;

        let student = self
            .students
            .fetch(&student_id)?
            .ok_or_else(|| PlacementError::not_found("Student"))?;
        let drive = self
            .drives
            .fetch(&drive_id)?
            .ok_or_else(|| PlacementError::not_found("Drive"))?;

        let existing = self
            .applications
            .find_one(&|application: &Application| application.is_for(&student_id, &drive_id))?;
        if let Some(existing) = existing {
            warn!(
                application_id = %existing.id,
                %student_id,
                %drive_id,
                "duplicate application rejected"
            );
            return Err(PlacementError::Conflict(DUPLICATE_APPLICATION.to_string()));
        }

        let application = Application {
            id: ApplicationId::generate(),
            student_id,
            student_name: student.profile.name,
            drive_id,
            company_name: drive.company_name,
            role: drive.role,
            application_status: ApplicationStatus::Applied,
            applied_date: Utc::now(),
            selected_date: None,
        };

        let stored = self.applications.insert(application).map_err(|err| {
            PlacementError::from_store(err, "Application", DUPLICATE_APPLICATION)
        })?;
        info!(
            application_id = %stored.id,
            student_id = %stored.student_id,
            drive_id = %stored.drive_id,
            "application created"
        );
        Ok(stored)
    }

    pub fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, PlacementError> {
        let matches = |application: &Application| filter.matches(application);
        Ok(self.applications.find(&matches, self.fetch_limit)?)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<Application, PlacementError> {
        self.applications
            .fetch(id)?
            .ok_or_else(|| PlacementError::not_found("Application"))
    }

    /// Set the status and persist it. Re-applying the current status is accepted.
    ///
    /// `selected` stamps `selected_date` with the current time; other statuses keep whatever
    /// stamp an earlier selection left behind.
    pub fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, PlacementError> {
        let mut application = self.get(id)?;
        let previous = application.application_status;
        application.transition(status, Utc::now());

        let stored = self.applications.update(application).map_err(|err| {
            PlacementError::from_store(err, "Application", DUPLICATE_APPLICATION)
        })?;
        info!(
            application_id = %stored.id,
            from = previous.label(),
            to = status.label(),
            "application status updated"
        );
        Ok(stored)
    }
}
