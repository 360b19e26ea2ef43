use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Fresh opaque identifier for a newly created record.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

record_id!(
    /// Identifier wrapper for registered students.
    StudentId
);
record_id!(
    /// Identifier wrapper for hiring companies.
    CompanyId
);
record_id!(
    /// Identifier wrapper for recruitment drives.
    DriveId
);
record_id!(
    /// Identifier wrapper for student applications.
    ApplicationId
);
record_id!(
    /// Identifier wrapper for generated offer letters.
    OfferLetterId
);

/// Catalog categories keep the small integer ids used by spreadsheet imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u32);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status tracked for a student's application to a drive.
///
/// Every state is reachable from every other through an explicit update; nothing is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Lifecycle of a recruitment drive. Transitions are unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl DriveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DriveStatus::Upcoming => "upcoming",
            DriveStatus::Ongoing => "ongoing",
            DriveStatus::Completed => "completed",
            DriveStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklogStatus {
    Cleared,
    Pending,
    #[default]
    NotApplicable,
}

/// Campus recruitment training fee state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrtFeeStatus {
    Paid,
    Pending,
    Partial,
    Exempted,
}

/// Student attributes supplied on registration and on full-record updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub roll_no: String,
    pub branch: String,
    pub section: String,
    pub year: u8,
    pub cgpa: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub resume_url: Option<String>,
    pub ssc_percentage: f64,
    pub inter_diploma_percentage: f64,
    #[serde(default)]
    pub backlogs_count: u32,
    #[serde(default)]
    pub backlog_status: BacklogStatus,
    pub year_of_passing: u16,
    pub crt_fee_status: CrtFeeStatus,
    pub crt_fee_amount: f64,
    #[serde(default)]
    pub crt_receipt_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(flatten)]
    pub profile: StudentProfile,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub website: Option<String>,
    pub industry: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    #[serde(flatten)]
    pub profile: CompanyProfile,
    pub created_at: DateTime<Utc>,
}

/// Inbound request scheduling a drive for an existing company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveRequest {
    pub company_id: CompanyId,
    pub role: String,
    pub job_description: String,
    pub ctc: f64,
    pub eligibility_criteria: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub drive_date: DateTime<Utc>,
    pub location: String,
}

/// A recruitment drive. `company_name` is captured when the drive is scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub id: DriveId,
    pub company_id: CompanyId,
    pub company_name: String,
    pub role: String,
    pub job_description: String,
    pub ctc: f64,
    pub eligibility_criteria: String,
    pub drive_date: DateTime<Utc>,
    pub location: String,
    pub status: DriveStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub student_id: StudentId,
    pub drive_id: DriveId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

/// A student's application to a drive.
///
/// `student_name`, `company_name` and `role` are snapshots taken when the application is
/// created and are never refreshed from the source records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub student_id: StudentId,
    pub student_name: String,
    pub drive_id: DriveId,
    pub company_name: String,
    pub role: String,
    pub application_status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub selected_date: Option<DateTime<Utc>>,
}

impl Application {
    /// Move to `status`. Selecting stamps `selected_date`; any other status keeps the previous stamp.
    pub fn transition(&mut self, status: ApplicationStatus, at: DateTime<Utc>) {
        self.application_status = status;
        if status == ApplicationStatus::Selected {
            self.selected_date = Some(at);
        }
    }

    pub fn is_for(&self, student_id: &StudentId, drive_id: &DriveId) -> bool {
        &self.student_id == student_id && &self.drive_id == drive_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferLetterRequest {
    pub student_id: StudentId,
    pub drive_id: DriveId,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub joining_date: DateTime<Utc>,
    pub final_ctc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferLetter {
    pub id: OfferLetterId,
    pub student_id: StudentId,
    pub student_name: String,
    pub drive_id: DriveId,
    pub company_name: String,
    pub role: String,
    pub offer_date: DateTime<Utc>,
    pub joining_date: DateTime<Utc>,
    pub final_ctc: f64,
    pub letter_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Audio and video library ids share the small-integer scheme of categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(pub u32);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload for a new audio/video library entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub path: String,
    #[serde(default)]
    pub category: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: MediaId,
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub path: String,
    pub category: String,
}

impl MediaEntry {
    pub fn apply(&mut self, patch: MediaPatch) {
        let MediaPatch {
            name,
            media_type,
            path,
            category,
        } = patch;
        if let Some(name) = name {
            self.name = name.trim().to_string();
        }
        if let Some(media_type) = media_type {
            self.media_type = media_type.trim().to_string();
        }
        if let Some(path) = path {
            self.path = path.trim().to_string();
        }
        if let Some(category) = category {
            self.category = category.trim().to_string();
        }
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as an RFC 3339 timestamp or YYYY-MM-DD"))
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Query strings such as `?student_id=` mean "no filter", not "match the empty id".
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(T::from))
}
