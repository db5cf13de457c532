use clap::Args;
use medico_activity::error::AppError;
use medico_activity::intake::{InMemoryInquiryRepository, IntakeService, UploadConfig};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory for the sample resume. Defaults to a folder under the system temp dir.
    #[arg(long)]
    pub(crate) uploads_dir: Option<PathBuf>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let uploads_dir = args
        .uploads_dir
        .unwrap_or_else(|| std::env::temp_dir().join("medico-activity-demo"));

    println!("MedicoActivity intake demo");
    println!("- resumes written to {}", uploads_dir.display());

    let repository = Arc::new(InMemoryInquiryRepository::new());
    let service = IntakeService::new(repository, UploadConfig::new(uploads_dir));

    let company = service.submit_company_inquiry(&json!({
        "name": "Priya Raman",
        "organization": "Helix Therapeutics",
        "email": "priya.raman@helix.example",
        "phone": "+1 555 0100",
        "areaOfInterest": "clinical-trials",
        "message": "Looking for cardiology advisors for a phase II study."
    }))?;
    println!("- company inquiry {} accepted", company.id);

    let resume = service.resumes().accept(
        "okafor-cv.pdf",
        Some("application/pdf"),
        b"%PDF-1.7\n% sample resume\n".to_vec(),
    );
    let resume = match resume {
        Ok(upload) => Some(upload),
        Err(err) => {
            println!("  Sample resume rejected: {}", err);
            None
        }
    };
    let signup = service
        .submit_doctor_signup(
            &json!({
                "name": "Dr. Samuel Okafor",
                "specialization": "internal-medicine",
                "location": "Lagos, NG",
                "email": "s.okafor@clinic.example",
                "phone": "+234 800 000 0000"
            }),
            resume,
        )
        .await?;
    println!(
        "- doctor signup {} accepted (resume: {})",
        signup.id,
        signup.fields.resume_url.as_deref().unwrap_or("none")
    );

    let contact = service.submit_contact_inquiry(&json!({
        "name": "Jane Doe",
        "email": "jane@x.com",
        "subject": "general-inquiry",
        "message": "Hi"
    }))?;
    println!("- contact message {} accepted", contact.id);

    match service.submit_contact_inquiry(&json!({ "name": "Incomplete" })) {
        Ok(_) => println!("- incomplete contact message unexpectedly accepted"),
        Err(err) => println!("- incomplete contact message rejected: {}", err),
    }

    let listing = service.inquiries()?;
    match serde_json::to_string_pretty(&listing) {
        Ok(json) => println!("\nAdmin listing ({} submissions):\n{}", listing.total(), json),
        Err(err) => println!("\nAdmin listing unavailable: {}", err),
    }

    Ok(())
}
