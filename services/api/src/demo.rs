use chrono::Utc;
use clap::Args;
use job_board::access::{Profile, Role, UserId};
use job_board::applications::{
    ApplicationRequest, ApplicationService, ApplicationStatus, StatusUpdate, TransitionPolicy,
};
use job_board::backend::{null_as_default, InMemoryBackend};
use job_board::companies::{
    Company, CompanyDraft, CompanyId, CompanyService, CompanyStatus, RecruiterAccess,
};
use job_board::error::AppError;
use job_board::jobs::{JobDraft, JobService};
use job_board::notifications::NotificationService;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CompanyCheckArgs {
    /// JSON file holding a company record, or `null` for a recruiter without one
    #[arg(long)]
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Enforce the forward-only status workflow instead of the permissive default.
    #[arg(long)]
    pub(crate) forward_only: bool,
    /// Have the admin reject the company instead of approving it.
    #[arg(long)]
    pub(crate) reject_company: bool,
}

/// Only the gate-relevant columns of a company row; the rest may be omitted.
#[derive(Debug, Default, Deserialize)]
struct CompanyRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    license_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    is_approved: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    status: CompanyStatus,
}

impl CompanyRecord {
    fn into_company(self) -> Company {
        let now = Utc::now();
        Company {
            id: CompanyId("cli".to_string()),
            recruiter_id: UserId("cli".to_string()),
            name: self.name,
            license_url: self.license_url,
            is_approved: self.is_approved,
            status: self.status,
            description: None,
            website: None,
            created_at: now,
            updated_at: now,
        }
    }
}

fn company_verdict(raw: &str) -> Result<RecruiterAccess, AppError> {
    let record: Option<CompanyRecord> = serde_json::from_str(raw)?;
    let company = record.map(CompanyRecord::into_company);
    Ok(RecruiterAccess::evaluate(company.as_ref()))
}

pub(crate) fn run_company_check(args: CompanyCheckArgs) -> Result<(), AppError> {
    let raw = fs::read_to_string(&args.file)?;
    let access = company_verdict(&raw)?;

    println!("Company check: {}", args.file.display());
    println!("  profile complete:    {}", yes_no(access.profile_complete));
    println!("  profile approved:    {}", yes_no(access.profile_approved));
    println!("  can access features: {}", yes_no(access.can_access_features));
    if let Some(prompt) = access.prompt {
        println!("  next step: {}", prompt.message());
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policy = if args.forward_only {
        TransitionPolicy::ForwardOnly
    } else {
        TransitionPolicy::Permissive
    };

    let backend = Arc::new(InMemoryBackend::default());
    let recruiter = UserId("demo-recruiter".to_string());
    let seeker = UserId("demo-seeker".to_string());
    for (id, role, name) in [
        (&recruiter, Role::Recruiter, "Riley Recruiter"),
        (&seeker, Role::JobSeeker, "Sam Seeker"),
    ] {
        backend.seed_profile(Profile {
            id: id.clone(),
            role,
            full_name: name.to_string(),
            email: format!("{id}@example.com"),
            created_at: Some(Utc::now()),
        })?;
    }

    let notifications = Arc::new(NotificationService::new(backend.clone()));
    let companies = CompanyService::new(backend.clone(), notifications.clone());
    let jobs = JobService::new(backend.clone(), backend.clone());
    let applications =
        ApplicationService::new(backend.clone(), backend.clone(), notifications, policy);

    println!("Job board demo (status policy: {policy:?})");
    println!("========================================");

    let company = companies
        .save_profile(
            &recruiter,
            CompanyDraft {
                name: "Acme Robotics".to_string(),
                license_url: "https://files.example.com/acme-license.pdf".to_string(),
                description: Some("Warehouse automation".to_string()),
                website: Some("https://acme.example.com".to_string()),
            },
        )
        .await?;
    print_access("Company profile saved", &company);

    if args.reject_company {
        let company = companies
            .reject(&company.id, Some("License document is unreadable".to_string()))
            .await?;
        print_access("Admin rejected the company", &company);
        print_notifications(&backend)?;
        return Ok(());
    }

    let company = companies.approve(&company.id).await?;
    print_access("Admin approved the company", &company);

    let job = jobs
        .create(
            &recruiter,
            JobDraft {
                title: "Robotics Technician".to_string(),
                description: "Maintain the picking fleet.".to_string(),
                location: Some("Des Moines, IA".to_string()),
            },
        )
        .await?;
    println!("\nJob posted: {} ({})", job.title, job.id);

    let application = applications
        .apply(
            &seeker,
            ApplicationRequest {
                job_id: job.id.clone(),
                notes: Some("Five years of field service experience.".to_string()),
                draft: false,
            },
        )
        .await?;
    println!(
        "Application {} is {}",
        application.id,
        application.status.display_label()
    );

    for status in [
        ApplicationStatus::Review,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
    ] {
        let updated = applications
            .update_status(
                &recruiter,
                &application.id,
                StatusUpdate {
                    status: Some(status),
                    notes: None,
                },
            )
            .await?;
        println!("  -> {}", updated.status.display_label());
    }

    let reopen = applications
        .update_status(
            &recruiter,
            &application.id,
            StatusUpdate {
                status: Some(ApplicationStatus::Review),
                notes: None,
            },
        )
        .await;
    match reopen {
        Ok(updated) => println!("  -> {} (reopened)", updated.status.display_label()),
        Err(err) => println!("  reopening refused: {err}"),
    }

    print_notifications(&backend)?;
    Ok(())
}

fn print_access(heading: &str, company: &Company) {
    let access = RecruiterAccess::evaluate(Some(company));
    println!("\n{heading}");
    println!("  complete: {}", yes_no(access.profile_complete));
    println!("  approved: {}", yes_no(access.profile_approved));
    println!("  can post jobs: {}", yes_no(access.can_access_features));
    if let Some(prompt) = access.prompt {
        println!("  {}", prompt.message());
    }
}

fn print_notifications(backend: &InMemoryBackend) -> Result<(), AppError> {
    let sent = backend.notifications()?;
    println!("\nNotifications ({})", sent.len());
    for (id, notification) in sent {
        println!(
            "  [{}] {} -> {}: {} ({})",
            notification.kind.label(),
            id.0,
            notification.user_id,
            notification.title,
            notification.message
        );
    }
    Ok(())
}
