use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-assigned identifier for a stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Closed set of values offered by one of the site's select inputs.
pub trait FormChoice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|choice| choice.as_str() == raw)
    }
}

/// Engagement areas a company can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AreaOfInterest {
    ProductPromotion,
    ClinicalTrials,
    AdvisoryBoards,
    MedicalDevices,
    EducationalPrograms,
    Consulting,
    Other,
}

impl FormChoice for AreaOfInterest {
    const ALL: &'static [Self] = &[
        Self::ProductPromotion,
        Self::ClinicalTrials,
        Self::AdvisoryBoards,
        Self::MedicalDevices,
        Self::EducationalPrograms,
        Self::Consulting,
        Self::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::ProductPromotion => "product-promotion",
            Self::ClinicalTrials => "clinical-trials",
            Self::AdvisoryBoards => "advisory-boards",
            Self::MedicalDevices => "medical-devices",
            Self::EducationalPrograms => "educational-programs",
            Self::Consulting => "consulting",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Specialization {
    Cardiology,
    Neurology,
    Oncology,
    Orthopedics,
    Pediatrics,
    Psychiatry,
    Radiology,
    Surgery,
    InternalMedicine,
    EmergencyMedicine,
    FamilyMedicine,
    Dermatology,
    Anesthesiology,
    Pathology,
    Other,
}

impl FormChoice for Specialization {
    const ALL: &'static [Self] = &[
        Self::Cardiology,
        Self::Neurology,
        Self::Oncology,
        Self::Orthopedics,
        Self::Pediatrics,
        Self::Psychiatry,
        Self::Radiology,
        Self::Surgery,
        Self::InternalMedicine,
        Self::EmergencyMedicine,
        Self::FamilyMedicine,
        Self::Dermatology,
        Self::Anesthesiology,
        Self::Pathology,
        Self::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Cardiology => "cardiology",
            Self::Neurology => "neurology",
            Self::Oncology => "oncology",
            Self::Orthopedics => "orthopedics",
            Self::Pediatrics => "pediatrics",
            Self::Psychiatry => "psychiatry",
            Self::Radiology => "radiology",
            Self::Surgery => "surgery",
            Self::InternalMedicine => "internal-medicine",
            Self::EmergencyMedicine => "emergency-medicine",
            Self::FamilyMedicine => "family-medicine",
            Self::Dermatology => "dermatology",
            Self::Anesthesiology => "anesthesiology",
            Self::Pathology => "pathology",
            Self::Other => "other",
        }
    }
}

/// Topic picked on the general contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactSubject {
    GeneralInquiry,
    CompanyRegistration,
    DoctorSignup,
    Partnership,
    TechnicalSupport,
    Feedback,
}

impl FormChoice for ContactSubject {
    const ALL: &'static [Self] = &[
        Self::GeneralInquiry,
        Self::CompanyRegistration,
        Self::DoctorSignup,
        Self::Partnership,
        Self::TechnicalSupport,
        Self::Feedback,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralInquiry => "general-inquiry",
            Self::CompanyRegistration => "company-registration",
            Self::DoctorSignup => "doctor-signup",
            Self::Partnership => "partnership",
            Self::TechnicalSupport => "technical-support",
            Self::Feedback => "feedback",
        }
    }
}

/// Validated company inquiry as submitted, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompanyInquiry {
    pub name: String,
    pub organization: String,
    pub email: String,
    pub phone: String,
    pub area_of_interest: AreaOfInterest,
    pub message: Option<String>,
}

/// Validated doctor signup. `resume_url` is only ever filled in by the upload store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctorSignup {
    pub name: String,
    pub specialization: Specialization,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactInquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: ContactSubject,
    pub message: String,
}

/// Stored submission: the validated fields plus server-generated metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission<T> {
    pub id: SubmissionId,
    #[serde(flatten)]
    pub fields: T,
    pub created_at: DateTime<Utc>,
}

pub type CompanyInquiry = Submission<NewCompanyInquiry>;
pub type DoctorSignup = Submission<NewDoctorSignup>;
pub type ContactInquiry = Submission<NewContactInquiry>;

/// The three disjoint collections handled by the intake pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionKind {
    CompanyInquiry,
    DoctorSignup,
    ContactInquiry,
}

impl SubmissionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionKind::CompanyInquiry => "company_inquiry",
            SubmissionKind::DoctorSignup => "doctor_signup",
            SubmissionKind::ContactInquiry => "contact_inquiry",
        }
    }

    /// Confirmation text returned to the browser on success.
    pub fn confirmation(&self) -> &'static str {
        match self {
            SubmissionKind::CompanyInquiry => "Company inquiry submitted successfully",
            SubmissionKind::DoctorSignup => "Doctor profile created successfully",
            SubmissionKind::ContactInquiry => "Contact message sent successfully",
        }
    }
}

/// Snapshot of every collection, as served to the admin listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryListing {
    pub company_inquiries: Vec<CompanyInquiry>,
    pub doctor_signups: Vec<DoctorSignup>,
    pub contact_inquiries: Vec<ContactInquiry>,
}

impl InquiryListing {
    pub fn total(&self) -> usize {
        self.company_inquiries.len() + self.doctor_signups.len() + self.contact_inquiries.len()
    }
}
