use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::placement::domain::{
    BacklogStatus, Company, CompanyProfile, CrtFeeStatus, Drive, DriveRequest, Student,
    StudentProfile,
};
use crate::placement::store::{PlacementStores, Record, RecordStore, RepositoryError};
use crate::placement::{placement_router, PlacementService};

pub(super) fn student_profile(roll_no: &str, name: &str) -> StudentProfile {
    StudentProfile {
        name: name.to_string(),
        roll_no: roll_no.to_string(),
        branch: "Computer Science".to_string(),
        section: "A".to_string(),
        year: 4,
        cgpa: 8.2,
        skills: vec!["Rust".to_string(), "SQL".to_string()],
        email: format!("{}@campus.example.edu", roll_no.to_ascii_lowercase()),
        phone: "+919876543210".to_string(),
        resume_url: None,
        ssc_percentage: 92.5,
        inter_diploma_percentage: 89.0,
        backlogs_count: 0,
        backlog_status: BacklogStatus::NotApplicable,
        year_of_passing: 2025,
        crt_fee_status: CrtFeeStatus::Paid,
        crt_fee_amount: 5000.0,
        crt_receipt_number: Some("CRT-1042".to_string()),
    }
}

pub(super) fn company_profile(name: &str) -> CompanyProfile {
    CompanyProfile {
        name: name.to_string(),
        description: "Product engineering".to_string(),
        website: Some("https://acme.example.com".to_string()),
        industry: "Software".to_string(),
        location: "Metro".to_string(),
    }
}

pub(super) fn drive_request(company: &Company, role: &str) -> DriveRequest {
    DriveRequest {
        company_id: company.id.clone(),
        role: role.to_string(),
        job_description: "Backend services".to_string(),
        ctc: 1_000_000.0,
        eligibility_criteria: "CGPA >= 7.0, no active backlogs".to_string(),
        drive_date: Utc.with_ymd_and_hms(2024, 12, 5, 9, 30, 0).unwrap(),
        location: "Metro".to_string(),
    }
}

pub(super) fn build_service() -> PlacementService {
    PlacementService::in_memory(&StoreConfig::default())
}

pub(super) fn build_service_with_limit(fetch_limit: usize) -> PlacementService {
    PlacementService::in_memory(&StoreConfig { fetch_limit })
}

pub(super) fn seed_student(service: &PlacementService, roll_no: &str, name: &str) -> Student {
    service
        .students()
        .register(student_profile(roll_no, name))
        .expect("student registers")
}

pub(super) fn seed_drive(service: &PlacementService, company: &str, role: &str) -> Drive {
    let company = service
        .companies()
        .create(company_profile(company))
        .expect("company created");
    service
        .drives()
        .schedule(drive_request(&company, role))
        .expect("drive scheduled")
}

/// Store whose backing database is permanently offline.
pub(super) struct UnavailableStore;

impl<T: Record> RecordStore<T> for UnavailableStore {
    fn insert(&self, _record: T) -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: T) -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &T::Id) -> Result<Option<T>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &T::Id) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find(&self, _filter: &dyn Fn(&T) -> bool, _limit: usize) -> Result<Vec<T>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count(&self, _filter: &dyn Fn(&T) -> bool) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn offline_stores() -> PlacementStores {
    PlacementStores {
        students: Arc::new(UnavailableStore),
        companies: Arc::new(UnavailableStore),
        drives: Arc::new(UnavailableStore),
        applications: Arc::new(UnavailableStore),
        offer_letters: Arc::new(UnavailableStore),
        categories: Arc::new(UnavailableStore),
        media: Arc::new(UnavailableStore),
    }
}

pub(super) fn router_with_service(service: PlacementService) -> axum::Router {
    placement_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
