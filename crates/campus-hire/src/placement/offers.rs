use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::domain::{
    empty_string_as_none, Drive, OfferLetter, OfferLetterId, OfferLetterRequest, Student,
    StudentId,
};
use super::error::PlacementError;
use super::store::{PlacementStores, RecordStore};
use super::validation::Validate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OfferLetterFilter {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<StudentId>,
}

/// Builds offer letters from a student and a drive.
///
/// Offers are independent of applications: any number may be issued for the same pair and
/// the application status is never consulted.
pub struct OfferLetterGenerator {
    students: Arc<dyn RecordStore<Student>>,
    drives: Arc<dyn RecordStore<Drive>>,
    offer_letters: Arc<dyn RecordStore<OfferLetter>>,
    fetch_limit: usize,
}

impl OfferLetterGenerator {
    pub fn new(stores: &PlacementStores, fetch_limit: usize) -> Self {
        Self {
            students: stores.students.clone(),
            drives: stores.drives.clone(),
            offer_letters: stores.offer_letters.clone(),
            fetch_limit,
        }
    }

    pub fn issue(&self, request: OfferLetterRequest) -> Result<OfferLetter, PlacementError> {
        request.validate()?;
        let student = self
            .students
            .fetch(&request.student_id)?
            .ok_or_else(|| PlacementError::not_found("Student"))?;
        let drive = self
            .drives
            .fetch(&request.drive_id)?
            .ok_or_else(|| PlacementError::not_found("Drive"))?;

        let letter_content = compose_letter(
            &student.profile.name,
            &drive,
            request.joining_date,
            request.final_ctc,
        );

        let offer = OfferLetter {
            id: OfferLetterId::generate(),
            student_id: request.student_id,
            student_name: student.profile.name,
            drive_id: request.drive_id,
            company_name: drive.company_name,
            role: drive.role,
            offer_date: Utc::now(),
            joining_date: request.joining_date,
            final_ctc: request.final_ctc,
            letter_content,
        };

        let stored = self.offer_letters.insert(offer)?;
        info!(
            offer_id = %stored.id,
            student_id = %stored.student_id,
            drive_id = %stored.drive_id,
            "offer letter issued"
        );
        Ok(stored)
    }

    pub fn list(&self, filter: &OfferLetterFilter) -> Result<Vec<OfferLetter>, PlacementError> {
        let matches = |offer: &OfferLetter| {
            filter
                .student_id
                .as_ref()
                .map_or(true, |id| &offer.student_id == id)
        };
        Ok(self.offer_letters.find(&matches, self.fetch_limit)?)
    }
}

/// Render the letter text for `recipient`.
pub fn compose_letter(
    recipient: &str,
    drive: &Drive,
    joining_date: DateTime<Utc>,
    final_ctc: f64,
) -> String {
    let role = &drive.role;
    let company = &drive.company_name;

    format!(
        "OFFER LETTER\n\
         \n\
         Dear {recipient},\n\
         \n\
         We are pleased to offer you the position of {role} at {company}.\n\
         \n\
         Position: {role}\n\
         Annual CTC: {ctc}\n\
         Joining Date: {joining}\n\
         Location: {location}\n\
         \n\
         We look forward to having you join our team.\n\
         \n\
         Best regards,\n\
         {company} HR Team\n",
        ctc = format_rupees(final_ctc),
        joining = joining_date.format("%B %d, %Y"),
        location = drive.location,
    )
}

/// `1234567.5` -> `₹1,234,567.50`
pub fn format_rupees(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (position, digit) in whole.chars().enumerate() {
        if position > 0 && (whole.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}₹{grouped}.{fraction:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::domain::{CompanyId, DriveId, DriveStatus};
    use chrono::TimeZone;

    fn drive() -> Drive {
        Drive {
            id: DriveId::from("D1"),
            company_id: CompanyId::from("C1"),
            company_name: "Acme".to_string(),
            role: "Engineer".to_string(),
            job_description: "Build things".to_string(),
            ctc: 900_000.0,
            eligibility_criteria: "CGPA >= 7".to_string(),
            drive_date: Utc.with_ymd_and_hms(2024, 11, 2, 9, 0, 0).unwrap(),
            location: "Metro".to_string(),
            status: DriveStatus::Upcoming,
            created_at: Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn rupee_formatting_groups_thousands() {
        assert_eq!(format_rupees(0.0), "₹0.00");
        assert_eq!(format_rupees(999.0), "₹999.00");
        assert_eq!(format_rupees(1000.0), "₹1,000.00");
        assert_eq!(format_rupees(1_000_000.0), "₹1,000,000.00");
        assert_eq!(format_rupees(1_234_567.5), "₹1,234,567.50");
    }

    #[test]
    fn letter_embeds_role_company_ctc_date_and_location() {
        let joining = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let letter = compose_letter("Asha Rao", &drive(), joining, 1_000_000.0);

        assert!(letter.starts_with("OFFER LETTER\n"));
        assert!(letter.contains("Dear Asha Rao,"));
        assert!(letter.contains("position of Engineer at Acme."));
        assert!(letter.contains("Annual CTC: ₹1,000,000.00"));
        assert!(letter.contains("Joining Date: January 01, 2025"));
        assert!(letter.contains("Location: Metro"));
        assert!(letter.trim_end().ends_with("Acme HR Team"));
    }

    #[test]
    fn letter_is_deterministic() {
        let joining = Utc.with_ymd_and_hms(2025, 7, 15, 0, 0, 0).unwrap();
        assert_eq!(
            compose_letter("Asha Rao", &drive(), joining, 450_000.0),
            compose_letter("Asha Rao", &drive(), joining, 450_000.0)
        );
    }
}
