use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::error;

use super::domain::{InquiryListing, SubmissionId, SubmissionKind};
use super::repository::InquiryRepository;
use super::service::{IntakeError, IntakeService};
use super::upload::UploadError;
use super::validation::{FieldErrorCode, ValidationErrors};

/// Router builder exposing the three form endpoints and the admin listing.
///
/// The admin listing has no access control.
pub fn intake_router<R>(service: Arc<IntakeService<R>>) -> Router
where
    R: InquiryRepository + 'static,
{
    let signup_body_limit = service.resumes().config().body_limit();

    Router::new()
        .route("/api/company-inquiry", post(company_inquiry_handler::<R>))
        .route(
            "/api/doctor-signup",
            post(doctor_signup_handler::<R>).layer(DefaultBodyLimit::max(signup_body_limit)),
        )
        .route("/api/contact", post(contact_handler::<R>))
        .route("/api/admin/inquiries", get(admin_inquiries_handler::<R>))
        .with_state(service)
}

/// Body returned for every accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub message: &'static str,
    pub id: SubmissionId,
}

impl SubmissionReceipt {
    fn new(kind: SubmissionKind, id: SubmissionId) -> Self {
        Self {
            message: kind.confirmation(),
            id,
        }
    }
}

pub(crate) async fn company_inquiry_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmissionReceipt>, IntakeError>
where
    R: InquiryRepository + 'static,
{
    let payload = json_payload(payload)?;
    let inquiry = service.submit_company_inquiry(&payload)?;
    Ok(Json(SubmissionReceipt::new(
        SubmissionKind::CompanyInquiry,
        inquiry.id,
    )))
}

pub(crate) async fn contact_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmissionReceipt>, IntakeError>
where
    R: InquiryRepository + 'static,
{
    let payload = json_payload(payload)?;
    let inquiry = service.submit_contact_inquiry(&payload)?;
    Ok(Json(SubmissionReceipt::new(
        SubmissionKind::ContactInquiry,
        inquiry.id,
    )))
}

/// Collects the text fields of the form and at most one resume part, then hands both to the
/// service. A rejected resume fails the request before the service runs.
pub(crate) async fn doctor_signup_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmissionReceipt>, IntakeError>
where
    R: InquiryRepository + 'static,
{
    let mut multipart = multipart.map_err(|rejection| malformed_body(rejection.body_text()))?;
    let resumes = service.resumes();
    let upload_field = resumes.config().field_name.as_str();

    let mut form = Map::new();
    let mut resume = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return Err(match resumes.read_failure(err) {
                    UploadError::Read(err) => malformed_body(err.body_text()),
                    other => IntakeError::upload(other, upload_field),
                });
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        if name == upload_field {
            let received = resumes
                .receive(field)
                .await
                .map_err(|err| IntakeError::upload(err, upload_field))?;
            if let Some(upload) = received {
                if resume.is_some() {
                    return Err(IntakeError::upload(UploadError::TooManyFiles, upload_field));
                }
                resume = Some(upload);
            }
        } else {
            let text = field
                .text()
                .await
                .map_err(|err| malformed_body(err.body_text()))?;
            form.insert(name, Value::String(text));
        }
    }

    let signup = service
        .submit_doctor_signup(&Value::Object(form), resume)
        .await?;
    Ok(Json(SubmissionReceipt::new(
        SubmissionKind::DoctorSignup,
        signup.id,
    )))
}

pub(crate) async fn admin_inquiries_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
) -> Result<Json<InquiryListing>, IntakeError>
where
    R: InquiryRepository + 'static,
{
    Ok(Json(service.inquiries()?))
}

fn json_payload(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, IntakeError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| malformed_body(rejection.body_text()))
}

fn malformed_body(detail: String) -> IntakeError {
    IntakeError::Validation(ValidationErrors::single(
        "body",
        FieldErrorCode::MalformedBody,
        detail,
    ))
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        match self {
            IntakeError::Validation(errors) => {
                let payload = json!({
                    "message": "Validation error",
                    "errors": errors.into_errors(),
                });
                (StatusCode::BAD_REQUEST, Json(payload)).into_response()
            }
            other => {
                error!(error = %other, "intake request failed");
                let payload = json!({
                    "message": "Internal server error",
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
            }
        }
    }
}
