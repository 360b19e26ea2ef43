use std::fmt;

use super::domain::{
    CategoryDraft, CompanyProfile, DriveRequest, MediaDraft, MediaPatch, OfferLetterRequest,
    StudentProfile,
};

/// A single failing field reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub problem: &'static str,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.problem)
    }
}

/// Shape check failure listing every offending field of one entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {entity}: {}", join_issues(.issues))]
pub struct ValidationError {
    pub entity: &'static str,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Per-entity shape checks run before anything is persisted.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

struct Checks {
    entity: &'static str,
    issues: Vec<FieldIssue>,
}

impl Checks {
    fn new(entity: &'static str) -> Self {
        Self {
            entity,
            issues: Vec::new(),
        }
    }

    fn flag(&mut self, field: &'static str, problem: &'static str) {
        self.issues.push(FieldIssue { field, problem });
    }

    fn text(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.flag(field, "must not be blank");
        }
        self
    }

    fn optional_text(&mut self, field: &'static str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) => self.text(field, value),
            None => self,
        }
    }

    fn amount(&mut self, field: &'static str, value: f64) -> &mut Self {
        if !value.is_finite() || value < 0.0 {
            self.flag(field, "must be a finite, non-negative number");
        }
        self
    }

    fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        if !looks_like_email(value) {
            self.flag(field, "must be a valid e-mail address");
        }
        self
    }

    fn finish(&mut self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                entity: self.entity,
                issues: std::mem::take(&mut self.issues),
            })
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

// CGPA range is deliberately unchecked; scales differ between institutions.
impl Validate for StudentProfile {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new("student")
            .text("name", &self.name)
            .text("roll_no", &self.roll_no)
            .text("branch", &self.branch)
            .text("section", &self.section)
            .text("phone", &self.phone)
            .email("email", &self.email)
            .amount("cgpa", self.cgpa)
            .amount("ssc_percentage", self.ssc_percentage)
            .amount("inter_diploma_percentage", self.inter_diploma_percentage)
            .amount("crt_fee_amount", self.crt_fee_amount)
            .finish()
    }
}

impl Validate for CompanyProfile {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new("company")
            .text("name", &self.name)
            .text("industry", &self.industry)
            .text("location", &self.location)
            .finish()
    }
}

impl Validate for DriveRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new("drive")
            .text("role", &self.role)
            .text("location", &self.location)
            .amount("ctc", self.ctc)
            .finish()
    }
}

impl Validate for OfferLetterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new("offer letter")
            .amount("final_ctc", self.final_ctc)
            .finish()
    }
}

impl Validate for CategoryDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new("category").text("name", &self.name).finish()
    }
}

impl Validate for MediaDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new("media entry")
            .text("name", &self.name)
            .text("type", &self.media_type)
            .text("path", &self.path)
            .finish()
    }
}

impl Validate for MediaPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new("media entry")
            .optional_text("name", self.name.as_deref())
            .optional_text("type", self.media_type.as_deref())
            .optional_text("path", self.path.as_deref())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::domain::CompanyId;
    use chrono::Utc;

    #[test]
    fn email_shape_checks() {
        assert!(looks_like_email("asha.rao@example.edu"));
        assert!(!looks_like_email("asha.rao@example"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("asha rao@example.com"));
        assert!(!looks_like_email("asha@@example.com"));
    }

    #[test]
    fn drive_request_reports_every_failing_field() {
        let request = DriveRequest {
            company_id: CompanyId::from("C1"),
            role: "  ".to_string(),
            job_description: String::new(),
            ctc: f64::NAN,
            eligibility_criteria: String::new(),
            drive_date: Utc::now(),
            location: String::new(),
        };

        let err = request.validate().expect_err("drive request invalid");
        assert_eq!(err.entity, "drive");
        assert!(err.has_issue("role"));
        assert!(err.has_issue("location"));
        assert!(err.has_issue("ctc"));
        assert!(!err.has_issue("job_description"));
        assert!(err.to_string().starts_with("invalid drive: role must not be blank"));
    }

    #[test]
    fn category_name_must_not_be_blank() {
        let err = CategoryDraft {
            name: "\t".to_string(),
        }
        .validate()
        .expect_err("blank name rejected");
        assert_eq!(err.to_string(), "invalid category: name must not be blank");
    }

    #[test]
    fn message_joins_every_issue_in_order() {
        let err = CompanyProfile {
            name: String::new(),
            description: String::new(),
            website: None,
            industry: " ".to_string(),
            location: "Pune".to_string(),
        }
        .validate()
        .expect_err("company invalid");
        assert_eq!(
            err.to_string(),
            "invalid company: name must not be blank; industry must not be blank"
        );
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn media_patch_only_checks_supplied_fields() {
        assert!(MediaPatch::default().validate().is_ok());

        let err = MediaPatch {
            path: Some("  ".to_string()),
            ..MediaPatch::default()
        }
        .validate()
        .expect_err("blank path rejected");
        assert!(err.has_issue("path"));
        assert!(!err.has_issue("name"));
    }
}
