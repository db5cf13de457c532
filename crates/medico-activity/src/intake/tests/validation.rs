use super::common::*;
use serde_json::{json, Value};

use crate::intake::domain::{AreaOfInterest, ContactSubject, FormChoice, Specialization};
use crate::intake::validation::{
    validate_company_inquiry, validate_contact_inquiry, validate_doctor_signup, FieldErrorCode,
};

fn codes_for(errors: &crate::intake::ValidationErrors, field: &str) -> Vec<FieldErrorCode> {
    errors
        .errors()
        .iter()
        .filter(|error| error.field == field)
        .map(|error| error.code)
        .collect()
}

#[test]
fn company_payload_becomes_typed_record() {
    let inquiry = validate_company_inquiry(&company_payload()).expect("valid payload");
    assert_eq!(inquiry.name, "Priya Raman");
    assert_eq!(inquiry.area_of_interest, AreaOfInterest::ClinicalTrials);
    assert_eq!(
        inquiry.message.as_deref(),
        Some("Looking for cardiology advisors for a phase II study.")
    );
}

#[test]
fn every_missing_field_is_reported() {
    let payload = json!({ "organization": "Helix Therapeutics", "phone": "+1 555 0100" });
    let errors = validate_company_inquiry(&payload).expect_err("incomplete payload");

    assert!(errors.has_field("name"));
    assert!(errors.has_field("email"));
    assert!(errors.has_field("areaOfInterest"));
    assert!(!errors.has_field("message"), "message is optional");
    assert_eq!(errors.errors().len(), 3);
    assert!(errors
        .errors()
        .iter()
        .all(|error| error.code == FieldErrorCode::Required));
}

#[test]
fn blank_required_text_is_rejected() {
    let mut payload = contact_payload();
    payload["message"] = json!("   ");
    let errors = validate_contact_inquiry(&payload).expect_err("blank message");
    assert_eq!(codes_for(&errors, "message"), vec![FieldErrorCode::Required]);
}

#[test]
fn values_outside_closed_sets_are_rejected() {
    let mut company = company_payload();
    company["areaOfInterest"] = json!("crypto");
    let errors = validate_company_inquiry(&company).expect_err("unknown area");
    assert_eq!(
        codes_for(&errors, "areaOfInterest"),
        vec![FieldErrorCode::InvalidEnumValue]
    );
    let message = &errors.errors()[0].message;
    assert!(message.contains("'product-promotion'"));
    assert!(message.contains("received 'crypto'"));

    let mut doctor = doctor_form();
    doctor["specialization"] = json!("Cardiology");
    let errors = validate_doctor_signup(&doctor).expect_err("values are case sensitive");
    assert_eq!(
        codes_for(&errors, "specialization"),
        vec![FieldErrorCode::InvalidEnumValue]
    );

    let mut contact = contact_payload();
    contact["subject"] = json!("sales");
    let errors = validate_contact_inquiry(&contact).expect_err("unknown subject");
    assert_eq!(
        codes_for(&errors, "subject"),
        vec![FieldErrorCode::InvalidEnumValue]
    );
}

#[test]
fn non_string_values_report_their_type() {
    let mut payload = company_payload();
    payload["phone"] = json!(5550100);
    payload["message"] = json!(["not", "text"]);
    let errors = validate_company_inquiry(&payload).expect_err("wrong types");

    assert_eq!(codes_for(&errors, "phone"), vec![FieldErrorCode::InvalidType]);
    assert_eq!(
        codes_for(&errors, "message"),
        vec![FieldErrorCode::InvalidType]
    );
    assert!(errors
        .errors()
        .iter()
        .any(|error| error.message == "Expected string, received number"));
}

#[test]
fn optional_fields_accept_absent_null_and_empty() {
    let mut payload = contact_payload();
    let inquiry = validate_contact_inquiry(&payload).expect("phone absent");
    assert_eq!(inquiry.phone, None);
    assert_eq!(inquiry.subject, ContactSubject::GeneralInquiry);

    payload["phone"] = Value::Null;
    assert_eq!(
        validate_contact_inquiry(&payload).expect("phone null").phone,
        None
    );

    payload["phone"] = json!("");
    assert_eq!(
        validate_contact_inquiry(&payload)
            .expect("phone empty")
            .phone
            .as_deref(),
        Some("")
    );
}

#[test]
fn server_assigned_fields_in_payload_are_ignored() {
    let mut payload = company_payload();
    payload["id"] = json!("00000000-0000-0000-0000-000000000000");
    payload["createdAt"] = json!("1999-01-01T00:00:00Z");
    assert!(validate_company_inquiry(&payload).is_ok());

    let mut form = doctor_form();
    form["resumeUrl"] = json!("/etc/passwd");
    let signup = validate_doctor_signup(&form).expect("valid signup");
    assert_eq!(signup.resume_url, None);
    assert_eq!(signup.specialization, Specialization::InternalMedicine);
}

#[test]
fn non_object_payload_is_a_body_error() {
    let errors = validate_contact_inquiry(&json!(["Jane Doe"])).expect_err("array payload");
    assert_eq!(errors.errors().len(), 1);
    assert_eq!(errors.errors()[0].field, "body");
    assert_eq!(errors.errors()[0].code, FieldErrorCode::MalformedBody);
}

#[test]
fn email_is_plain_required_text() {
    for address in ["jane@localhost", "\"jane doe\"@x.com", "jane@x.com "] {
        let mut payload = contact_payload();
        payload["email"] = json!(address);
        let inquiry = validate_contact_inquiry(&payload).expect("any non-blank email is accepted");
        assert_eq!(inquiry.email, address);
    }

    let mut payload = doctor_form();
    payload["email"] = json!("  ");
    let errors = validate_doctor_signup(&payload).expect_err("blank email");
    assert_eq!(codes_for(&errors, "email"), vec![FieldErrorCode::Required]);
}

#[test]
fn choice_labels_parse_back_to_their_variant() {
    for area in AreaOfInterest::ALL {
        assert_eq!(AreaOfInterest::parse(area.as_str()), Some(*area));
    }
    for specialization in Specialization::ALL {
        assert_eq!(
            Specialization::parse(specialization.as_str()),
            Some(*specialization)
        );
    }
    for subject in ContactSubject::ALL {
        assert_eq!(ContactSubject::parse(subject.as_str()), Some(*subject));
    }
    assert_eq!(AreaOfInterest::ALL.len(), 7);
    assert_eq!(Specialization::ALL.len(), 15);
    assert_eq!(ContactSubject::ALL.len(), 6);
    assert_eq!(
        serde_json::to_value(Specialization::EmergencyMedicine).expect("serialize"),
        json!("emergency-medicine")
    );
}
