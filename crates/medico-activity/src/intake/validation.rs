//! Explicit per-kind validation of untyped form payloads.
//!
//! Each `validate_*` function walks the payload once, records every field that fails, and only
//! builds the typed record when nothing did. Unknown keys, including any client supplied `id` or
//! `createdAt`, are ignored.

use serde::Serialize;
use serde_json::{Map, Value};

use super::domain::{
    AreaOfInterest, ContactSubject, FormChoice, NewCompanyInquiry, NewContactInquiry,
    NewDoctorSignup, Specialization,
};

/// Machine readable reason attached to a field failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    Required,
    InvalidType,
    InvalidEnumValue,
    InvalidFileType,
    FileTooLarge,
    TooManyFiles,
    MalformedBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: FieldErrorCode,
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        code: FieldErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// Every field failure found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(
        field: impl Into<String>,
        code: FieldErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            errors: vec![FieldError::new(field, code, message)],
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

pub fn validate_company_inquiry(payload: &Value) -> Result<NewCompanyInquiry, ValidationErrors> {
    let mut reader = PayloadReader::new(payload)?;
    let name = reader.required_text("name");
    let organization = reader.required_text("organization");
    let email = reader.required_text("email");
    let phone = reader.required_text("phone");
    let area_of_interest = reader.choice::<AreaOfInterest>("areaOfInterest");
    let message = reader.optional_text("message");

    let (
        Some(name),
        Some(organization),
        Some(email),
        Some(phone),
        Some(area_of_interest),
        Some(message),
    ) = (name, organization, email, phone, area_of_interest, message)
    else {
        return Err(reader.into_errors());
    };

    Ok(NewCompanyInquiry {
        name,
        organization,
        email,
        phone,
        area_of_interest,
        message,
    })
}

/// Validates the text portion of a signup. The resume reference is attached later by the
/// upload store, so the result always carries `resume_url: None`.
pub fn validate_doctor_signup(payload: &Value) -> Result<NewDoctorSignup, ValidationErrors> {
    let mut reader = PayloadReader::new(payload)?;
    let name = reader.required_text("name");
    let specialization = reader.choice::<Specialization>("specialization");
    let location = reader.required_text("location");
    let email = reader.required_text("email");
    let phone = reader.required_text("phone");

    let (Some(name), Some(specialization), Some(location), Some(email), Some(phone)) =
        (name, specialization, location, email, phone)
    else {
        return Err(reader.into_errors());
    };

    Ok(NewDoctorSignup {
        name,
        specialization,
        location,
        email,
        phone,
        resume_url: None,
    })
}

pub fn validate_contact_inquiry(payload: &Value) -> Result<NewContactInquiry, ValidationErrors> {
    let mut reader = PayloadReader::new(payload)?;
    let name = reader.required_text("name");
    let email = reader.required_text("email");
    let phone = reader.optional_text("phone");
    let subject = reader.choice::<ContactSubject>("subject");
    let message = reader.required_text("message");

    let (Some(name), Some(email), Some(phone), Some(subject), Some(message)) =
        (name, email, phone, subject, message)
    else {
        return Err(reader.into_errors());
    };

    Ok(NewContactInquiry {
        name,
        email,
        phone,
        subject,
        message,
    })
}

/// Field accessor over a JSON object. Accessors return `None` exactly when they recorded an
/// error, so a fully populated tuple means the payload was clean.
struct PayloadReader<'a> {
    object: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> PayloadReader<'a> {
    fn new(payload: &'a Value) -> Result<Self, ValidationErrors> {
        match payload {
            Value::Object(object) => Ok(Self {
                object,
                errors: ValidationErrors::default(),
            }),
            other => Err(ValidationErrors::single(
                "body",
                FieldErrorCode::MalformedBody,
                format!("Expected object, received {}", value_kind(other)),
            )),
        }
    }

    fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    fn reject(&mut self, field: &str, code: FieldErrorCode, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, code, message));
    }

    fn string(&mut self, field: &str) -> Option<Option<&'a str>> {
        let object = self.object;
        match object.get(field) {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(value)) => Some(Some(value.as_str())),
            Some(other) => {
                self.reject(
                    field,
                    FieldErrorCode::InvalidType,
                    format!("Expected string, received {}", value_kind(other)),
                );
                None
            }
        }
    }

    fn required_text(&mut self, field: &str) -> Option<String> {
        match self.string(field)? {
            None => {
                self.reject(field, FieldErrorCode::Required, "Required");
                None
            }
            Some(value) if value.trim().is_empty() => {
                self.reject(field, FieldErrorCode::Required, format!("{field} must not be empty"));
                None
            }
            Some(value) => Some(value.to_string()),
        }
    }

    fn optional_text(&mut self, field: &str) -> Option<Option<String>> {
        self.string(field).map(|value| value.map(str::to_string))
    }

    fn choice<C: FormChoice>(&mut self, field: &str) -> Option<C> {
        let value = self.required_text(field)?;
        match C::parse(&value) {
            Some(choice) => Some(choice),
            None => {
                let expected = C::ALL
                    .iter()
                    .map(|choice| format!("'{}'", choice.as_str()))
                    .collect::<Vec<_>>()
                    .join(" | ");
                self.reject(
                    field,
                    FieldErrorCode::InvalidEnumValue,
                    format!("Invalid enum value. Expected {expected}, received '{value}'"),
                );
                None
            }
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
