use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{Student, StudentId, StudentProfile};
use super::error::PlacementError;
use super::store::{PlacementStores, RecordStore};
use super::validation::Validate;

const DUPLICATE_ROLL_NO: &str = "Student with this roll number already exists";

/// Registration, lookup, full-record update and removal of students.
pub struct StudentRegistry {
    students: Arc<dyn RecordStore<Student>>,
    fetch_limit: usize,
}

impl StudentRegistry {
    pub fn new(stores: &PlacementStores, fetch_limit: usize) -> Self {
        Self {
            students: stores.students.clone(),
            fetch_limit,
        }
    }

    pub fn register(&self, profile: StudentProfile) -> Result<Student, PlacementError> {
        profile.validate()?;
        self.ensure_roll_no_free(&profile.roll_no, None)?;

        let student = Student {
            id: StudentId::generate(),
            profile,
            created_at: Utc::now(),
        };

        let stored = self
            .students
            .insert(student)
            .map_err(|err| PlacementError::from_store(err, "Student", DUPLICATE_ROLL_NO))?;
        info!(student_id = %stored.id, roll_no = %stored.profile.roll_no, "student registered");
        Ok(stored)
    }

    pub fn list(&self) -> Result<Vec<Student>, PlacementError> {
        Ok(self.students.find(&|_: &Student| true, self.fetch_limit)?)
    }

    pub fn get(&self, id: &StudentId) -> Result<Student, PlacementError> {
        debug!(student_id = %id, "student lookup");
        self.students
            .fetch(id)?
            .ok_or_else(|| PlacementError::not_found("Student"))
    }

    /// Replace every profile field. The id and registration timestamp are kept.
    pub fn update(
        &self,
        id: &StudentId,
        profile: StudentProfile,
    ) -> Result<Student, PlacementError> {
        let mut student = self.get(id)?;
        profile.validate()?;
        self.ensure_roll_no_free(&profile.roll_no, Some(id))?;

        student.profile = profile;
        let stored = self
            .students
            .update(student)
            .map_err(|err| PlacementError::from_store(err, "Student", DUPLICATE_ROLL_NO))?;
        info!(student_id = %stored.id, "student updated");
        Ok(stored)
    }

    /// Applications and offer letters that reference the student are left in place.
    pub fn remove(&self, id: &StudentId) -> Result<(), PlacementError> {
        if !self.students.remove(id)? {
            return Err(PlacementError::not_found("Student"));
        }
        info!(student_id = %id, "student deleted");
        Ok(())
    }

    fn ensure_roll_no_free(
        &self,
        roll_no: &str,
        owner: Option<&StudentId>,
    ) -> Result<(), PlacementError> {
        let holder = self.students.find_one(&|student: &Student| {
            student.profile.roll_no == roll_no && Some(&student.id) != owner
        })?;

        match holder {
            Some(existing) => {
                warn!(roll_no, existing = %existing.id, "duplicate roll number rejected");
                Err(PlacementError::Conflict(DUPLICATE_ROLL_NO.to_string()))
            }
            None => Ok(()),
        }
    }
}
