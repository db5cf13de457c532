//! Lead intake pipeline for the three public forms.
//!
//! Payloads are validated into typed records (`validation`), resumes are screened and written
//! by the upload store (`upload`), records are stamped and kept by an injectable repository
//! (`repository`), and `router` exposes the whole flow over HTTP.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod upload;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AreaOfInterest, CompanyInquiry, ContactInquiry, ContactSubject, DoctorSignup, FormChoice,
    InquiryListing, NewCompanyInquiry, NewContactInquiry, NewDoctorSignup, Specialization,
    Submission, SubmissionId, SubmissionKind,
};
pub use repository::{InMemoryInquiryRepository, InquiryRepository, RepositoryError};
pub use router::{intake_router, SubmissionReceipt};
pub use service::{IntakeError, IntakeService};
pub use upload::{ResumeStore, ResumeUpload, StoredResume, UploadConfig, UploadError};
pub use validation::{FieldError, FieldErrorCode, ValidationErrors};
