use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::intake::domain::{
    CompanyInquiry, ContactInquiry, DoctorSignup, NewCompanyInquiry, NewContactInquiry,
    NewDoctorSignup,
};
use crate::intake::repository::{InMemoryInquiryRepository, InquiryRepository, RepositoryError};
use crate::intake::upload::UploadConfig;
use crate::intake::{intake_router, IntakeService};

pub(super) const BOUNDARY: &str = "medico-activity-boundary";
pub(super) const MIB: usize = 1024 * 1024;

pub(super) fn company_payload() -> Value {
    json!({
        "name": "Priya Raman",
        "organization": "Helix Therapeutics",
        "email": "priya.raman@helix.example",
        "phone": "+1 555 0100",
        "areaOfInterest": "clinical-trials",
        "message": "Looking for cardiology advisors for a phase II study."
    })
}

pub(super) fn doctor_form() -> Value {
    json!({
        "name": "Dr. Samuel Okafor",
        "specialization": "internal-medicine",
        "location": "Lagos, NG",
        "email": "s.okafor@clinic.example",
        "phone": "+234 800 000 0000"
    })
}

pub(super) fn contact_payload() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@x.com",
        "subject": "general-inquiry",
        "message": "Hi"
    })
}

pub(super) fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.resize(len.max(bytes.len()), b'0');
    bytes
}

pub(super) fn upload_config(root: &Path) -> UploadConfig {
    UploadConfig::new(root.join("uploads"))
}

pub(super) fn build_service() -> (
    IntakeService<InMemoryInquiryRepository>,
    Arc<InMemoryInquiryRepository>,
    TempDir,
) {
    let dir = TempDir::new().expect("temp dir");
    let repository = Arc::new(InMemoryInquiryRepository::new());
    let service = IntakeService::new(repository.clone(), upload_config(dir.path()));
    (service, repository, dir)
}

pub(super) fn build_router() -> (axum::Router, Arc<InMemoryInquiryRepository>, TempDir) {
    let (service, repository, dir) = build_service();
    (intake_router(Arc::new(service)), repository, dir)
}

pub(super) fn uploaded_files(root: &Path) -> Vec<std::path::PathBuf> {
    match std::fs::read_dir(root.join("uploads")) {
        Ok(entries) => entries
            .map(|entry| entry.expect("dir entry").path())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Multipart part attached under the `resume` field.
pub(super) struct FilePart<'a> {
    pub(super) file_name: &'a str,
    pub(super) content_type: Option<&'a str>,
    pub(super) bytes: Vec<u8>,
}

pub(super) fn multipart_body(form: &Value, files: &[FilePart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(fields) = form.as_object() {
        for (name, value) in fields {
            let text = value.as_str().expect("form values are strings");
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{text}\r\n"
                )
                .as_bytes(),
            );
        }
    }

    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{}\"\r\n",
                file.file_name
            )
            .as_bytes(),
        );
        if let Some(content_type) = file.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn signup_request(form: &Value, files: &[FilePart<'_>]) -> Request<Body> {
    Request::post("/api/doctor-signup")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(form, files)))
        .expect("request")
}

pub(super) fn json_request(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(payload).expect("serialize payload"),
        ))
        .expect("request")
}

pub(super) fn listing_request() -> Request<Body> {
    Request::get("/api/admin/inquiries")
        .body(Body::empty())
        .expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn error_fields(payload: &Value) -> Vec<String> {
    payload
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| error.get("field").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(super) struct UnavailableRepository;

impl InquiryRepository for UnavailableRepository {
    fn create_company_inquiry(
        &self,
        _inquiry: NewCompanyInquiry,
    ) -> Result<CompanyInquiry, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn create_doctor_signup(&self, _signup: NewDoctorSignup) -> Result<DoctorSignup, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn create_contact_inquiry(
        &self,
        _inquiry: NewContactInquiry,
    ) -> Result<ContactInquiry, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn company_inquiries(&self) -> Result<Vec<CompanyInquiry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn doctor_signups(&self) -> Result<Vec<DoctorSignup>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn contact_inquiries(&self) -> Result<Vec<ContactInquiry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
