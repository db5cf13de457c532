use std::collections::HashSet;
use std::sync::Mutex;

use chrono::Utc;

use super::domain::{
    CompanyInquiry, ContactInquiry, DoctorSignup, NewCompanyInquiry, NewContactInquiry,
    NewDoctorSignup, Submission, SubmissionId,
};

/// Storage abstraction so the intake service can be exercised against fresh instances.
///
/// `create_*` assigns the identifier and creation timestamp; callers never supply either.
pub trait InquiryRepository: Send + Sync {
    fn create_company_inquiry(
        &self,
        inquiry: NewCompanyInquiry,
    ) -> Result<CompanyInquiry, RepositoryError>;
    fn create_doctor_signup(&self, signup: NewDoctorSignup) -> Result<DoctorSignup, RepositoryError>;
    fn create_contact_inquiry(
        &self,
        inquiry: NewContactInquiry,
    ) -> Result<ContactInquiry, RepositoryError>;
    fn company_inquiries(&self) -> Result<Vec<CompanyInquiry>, RepositoryError>;
    fn doctor_signups(&self) -> Result<Vec<DoctorSignup>, RepositoryError>;
    fn contact_inquiries(&self) -> Result<Vec<ContactInquiry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-lifetime store. Each kind sits behind its own lock, so writers to one collection
/// never wait on another.
#[derive(Debug, Default)]
pub struct InMemoryInquiryRepository {
    company_inquiries: Collection<NewCompanyInquiry>,
    doctor_signups: Collection<NewDoctorSignup>,
    contact_inquiries: Collection<NewContactInquiry>,
}

impl InMemoryInquiryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InquiryRepository for InMemoryInquiryRepository {
    fn create_company_inquiry(
        &self,
        inquiry: NewCompanyInquiry,
    ) -> Result<CompanyInquiry, RepositoryError> {
        self.company_inquiries.insert(inquiry)
    }

    fn create_doctor_signup(&self, signup: NewDoctorSignup) -> Result<DoctorSignup, RepositoryError> {
        self.doctor_signups.insert(signup)
    }

    fn create_contact_inquiry(
        &self,
        inquiry: NewContactInquiry,
    ) -> Result<ContactInquiry, RepositoryError> {
        self.contact_inquiries.insert(inquiry)
    }

    fn company_inquiries(&self) -> Result<Vec<CompanyInquiry>, RepositoryError> {
        self.company_inquiries.snapshot()
    }

    fn doctor_signups(&self) -> Result<Vec<DoctorSignup>, RepositoryError> {
        self.doctor_signups.snapshot()
    }

    fn contact_inquiries(&self) -> Result<Vec<ContactInquiry>, RepositoryError> {
        self.contact_inquiries.snapshot()
    }
}

/// Insertion-ordered collection of one submission kind.
#[derive(Debug)]
struct Collection<T> {
    entries: Mutex<Entries<T>>,
}

#[derive(Debug)]
struct Entries<T> {
    records: Vec<Submission<T>>,
    ids: HashSet<SubmissionId>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Entries {
                records: Vec::new(),
                ids: HashSet::new(),
            }),
        }
    }
}

impl<T: Clone> Collection<T> {
    fn insert(&self, fields: T) -> Result<Submission<T>, RepositoryError> {
        self.insert_with_id(SubmissionId::generate(), fields)
    }

    fn insert_with_id(
        &self,
        id: SubmissionId,
        fields: T,
    ) -> Result<Submission<T>, RepositoryError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| RepositoryError::Unavailable("collection lock poisoned".to_string()))?;

        if !guard.ids.insert(id) {
            return Err(RepositoryError::Conflict);
        }

        // Clamp against the newest entry so a wall-clock step backwards cannot reorder stamps.
        let now = Utc::now();
        let created_at = match guard.records.last() {
            Some(latest) if latest.created_at > now => latest.created_at,
            _ => now,
        };

        let submission = Submission {
            id,
            fields,
            created_at,
        };
        guard.records.push(submission.clone());
        Ok(submission)
    }

    fn snapshot(&self) -> Result<Vec<Submission<T>>, RepositoryError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| RepositoryError::Unavailable("collection lock poisoned".to_string()))?;
        Ok(guard.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reused_id_is_a_conflict() {
        let collection = Collection::<String>::default();
        let id = SubmissionId::generate();

        let first = collection
            .insert_with_id(id, "first".to_string())
            .expect("first insert");
        assert_eq!(first.id, id);
        assert!(matches!(
            collection.insert_with_id(id, "second".to_string()),
            Err(RepositoryError::Conflict)
        ));

        let stored = collection.snapshot().expect("snapshot");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].fields, "first");
    }
}
