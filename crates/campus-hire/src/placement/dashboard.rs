use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationStatus, Company, Drive, DriveStatus, Student};
use super::error::PlacementError;
use super::store::PlacementStores;

/// Counts shown on the placement dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_students: usize,
    pub total_companies: usize,
    pub total_drives: usize,
    pub upcoming_drives: usize,
    pub total_applications: usize,
    /// Applications in the `selected` state; a student selected twice counts twice.
    pub selected_students: usize,
    pub placement_rate: f64,
}

pub struct DashboardReporter {
    stores: PlacementStores,
}

impl DashboardReporter {
    pub fn new(stores: &PlacementStores) -> Self {
        Self {
            stores: stores.clone(),
        }
    }

    pub fn stats(&self) -> Result<DashboardStats, PlacementError> {
        let total_students = self.stores.students.count(&|_: &Student| true)?;
        let total_companies = self.stores.companies.count(&|_: &Company| true)?;
        let total_drives = self.stores.drives.count(&|_: &Drive| true)?;
        let upcoming_drives = self
            .stores
            .drives
            .count(&|drive: &Drive| drive.status == DriveStatus::Upcoming)?;
        let total_applications = self.stores.applications.count(&|_: &Application| true)?;
        let selected_students = self.stores.applications.count(&|application: &Application| {
            application.application_status == ApplicationStatus::Selected
        })?;

        Ok(DashboardStats {
            total_students,
            total_companies,
            total_drives,
            upcoming_drives,
            total_applications,
            selected_students,
            placement_rate: placement_rate(selected_students, total_students),
        })
    }
}

/// Selected applications per hundred registered students, to one decimal place.
///
/// The denominator is the whole student population, not the applicant pool, so the rate
/// exceeds 100 when students hold several selections.
pub fn placement_rate(selected_applications: usize, total_students: usize) -> f64 {
    if total_students == 0 {
        return 0.0;
    }

    let rate = selected_applications as f64 / total_students as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::placement_rate;

    #[test]
    fn placement_rate_handles_empty_population() {
        assert_eq!(placement_rate(0, 0), 0.0);
        assert_eq!(placement_rate(5, 0), 0.0);
    }

    #[test]
    fn placement_rate_rounds_to_one_decimal() {
        assert_eq!(placement_rate(2, 4), 50.0);
        assert_eq!(placement_rate(4, 3), 133.3);
        assert_eq!(placement_rate(1, 3), 33.3);
        assert_eq!(placement_rate(2, 3), 66.7);
    }
}
