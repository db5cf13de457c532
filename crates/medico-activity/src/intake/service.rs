use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::domain::{CompanyInquiry, ContactInquiry, DoctorSignup, InquiryListing, SubmissionKind};
use super::repository::{InquiryRepository, RepositoryError};
use super::upload::{ResumeStore, ResumeUpload, UploadConfig, UploadError};
use super::validation::{
    validate_company_inquiry, validate_contact_inquiry, validate_doctor_signup, ValidationErrors,
};

/// Service composing payload validation, resume storage and the repository.
pub struct IntakeService<R> {
    repository: Arc<R>,
    resumes: ResumeStore,
}

impl<R> IntakeService<R>
where
    R: InquiryRepository + 'static,
{
    pub fn new(repository: Arc<R>, uploads: UploadConfig) -> Self {
        Self {
            repository,
            resumes: ResumeStore::new(uploads),
        }
    }

    pub fn resumes(&self) -> &ResumeStore {
        &self.resumes
    }

    pub fn submit_company_inquiry(&self, payload: &Value) -> Result<CompanyInquiry, IntakeError> {
        let inquiry = validate_company_inquiry(payload)?;
        let stored = self.repository.create_company_inquiry(inquiry)?;
        info!(
            kind = SubmissionKind::CompanyInquiry.label(),
            id = %stored.id,
            area_of_interest = ?stored.fields.area_of_interest,
            "new submission received"
        );
        Ok(stored)
    }

    pub fn submit_contact_inquiry(&self, payload: &Value) -> Result<ContactInquiry, IntakeError> {
        let inquiry = validate_contact_inquiry(payload)?;
        let stored = self.repository.create_contact_inquiry(inquiry)?;
        info!(
            kind = SubmissionKind::ContactInquiry.label(),
            id = %stored.id,
            subject = ?stored.fields.subject,
            "new submission received"
        );
        Ok(stored)
    }

    /// Text fields are validated before the resume touches the disk, and a written resume is
    /// removed again if the signup cannot be stored.
    pub async fn submit_doctor_signup(
        &self,
        form: &Value,
        resume: Option<ResumeUpload>,
    ) -> Result<DoctorSignup, IntakeError> {
        let mut signup = validate_doctor_signup(form)?;

        let stored_resume = match resume {
            Some(upload) => {
                let stored = self.resumes.persist(&upload).await?;
                info!(
                    extension = upload.extension(),
                    content_type = %upload.content_type(),
                    bytes = upload.len(),
                    "resume stored"
                );
                Some(stored)
            }
            None => None,
        };
        signup.resume_url = stored_resume.as_ref().map(|stored| stored.url());

        match self.repository.create_doctor_signup(signup) {
            Ok(stored) => {
                info!(
                    kind = SubmissionKind::DoctorSignup.label(),
                    id = %stored.id,
                    specialization = ?stored.fields.specialization,
                    has_resume = stored.fields.resume_url.is_some(),
                    "new submission received"
                );
                Ok(stored)
            }
            Err(err) => {
                if let Some(stored) = &stored_resume {
                    self.resumes.discard(stored).await;
                }
                Err(err.into())
            }
        }
    }

    pub fn inquiries(&self) -> Result<InquiryListing, IntakeError> {
        Ok(InquiryListing {
            company_inquiries: self.repository.company_inquiries()?,
            doctor_signups: self.repository.doctor_signups()?,
            contact_inquiries: self.repository.contact_inquiries()?,
        })
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntakeError {
    /// Folds client-side upload failures into a validation error on `field`; storage
    /// failures stay internal.
    pub fn upload(err: UploadError, field: &str) -> Self {
        match err.field_error(field) {
            Some(error) => {
                warn!(error = %err, "resume upload rejected");
                IntakeError::Validation(error.into())
            }
            None => IntakeError::Upload(err),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, IntakeError::Validation(_))
    }
}
