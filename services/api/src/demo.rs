use crate::infra::parse_amount;
use campus_hire::config::StoreConfig;
use campus_hire::error::AppError;
use campus_hire::placement::domain::parse_timestamp;
use campus_hire::placement::{
    format_rupees, ApplicationFilter, ApplicationRequest, ApplicationStatus, BacklogStatus,
    CompanyProfile, CrtFeeStatus, DashboardStats, Drive, DriveRequest, OfferLetterRequest,
    PlacementService, Student, StudentProfile,
};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Joining date printed on the offer letter (RFC 3339 or YYYY-MM-DD). Defaults to 30 days out.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) joining_date: Option<DateTime<Utc>>,
    /// Final CTC quoted in the offer letter. Defaults to the drive's CTC.
    #[arg(long, value_parser = parse_amount)]
    pub(crate) final_ctc: Option<f64>,
    /// Category CSV (`id,name`) to import before printing the catalog.
    #[arg(long)]
    pub(crate) categories_csv: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        joining_date,
        final_ctc,
        categories_csv,
    } = args;

    let service = PlacementService::in_memory(&StoreConfig::default());
    let now = Utc::now();

    println!("Campus placement demo");
    let drive = seed_drive(&service, now + Duration::days(14))?;
    println!(
        "- Scheduled {} at {} ({}) on {}",
        drive.role,
        drive.company_name,
        format_rupees(drive.ctc),
        drive.drive_date.format("%B %d, %Y")
    );

    let cohort = seed_cohort(&service)?;
    println!("- Registered {} students", cohort.len());

    let outcomes = [
        ApplicationStatus::Selected,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Applied,
    ];
    for (student, outcome) in cohort.iter().zip(outcomes) {
        let application = service.applications().apply(ApplicationRequest {
            student_id: student.id.clone(),
            drive_id: drive.id.clone(),
        })?;
        if outcome != ApplicationStatus::Applied {
            service
                .applications()
                .update_status(&application.id, outcome)?;
        }
    }

    // a second apply for the same pair must be refused
    if let Some(first) = cohort.first() {
        if let Err(err) = service.applications().apply(ApplicationRequest {
            student_id: first.id.clone(),
            drive_id: drive.id.clone(),
        }) {
            println!("- Duplicate application refused: {err}");
        }
    }

    println!("\nApplications for drive {}", drive.id);
    for application in service
        .applications()
        .list(&ApplicationFilter::for_drive(drive.id.clone()))?
    {
        let selected = application
            .selected_date
            .map(|at| format!(" (selected {})", at.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!(
            "  - {} -> {}{}",
            application.student_name,
            application.application_status.label(),
            selected
        );
    }

    let stats = service.dashboard().stats()?;
    render_dashboard(&stats);

    if let Some(selected) = cohort.first() {
        let offer = service.offers().issue(OfferLetterRequest {
            student_id: selected.id.clone(),
            drive_id: drive.id.clone(),
            joining_date: joining_date.unwrap_or(now + Duration::days(30)),
            final_ctc: final_ctc.unwrap_or(drive.ctc),
        })?;
        println!("\nOffer letter {} for {}", offer.id, offer.student_name);
        println!("{}", offer.letter_content);
    }

    if let Some(path) = categories_csv {
        let file = File::open(&path)?;
        let imported = service.categories().import_csv(file)?;
        println!(
            "\nImported {} categories from {}",
            imported.len(),
            path.display()
        );
        print!("{}", service.categories().export_csv()?);
    }

    Ok(())
}

fn render_dashboard(stats: &DashboardStats) {
    println!("\nDashboard");
    println!(
        "- {} students | {} companies | {} drives ({} upcoming)",
        stats.total_students, stats.total_companies, stats.total_drives, stats.upcoming_drives
    );
    println!(
        "- {} applications | {} selected | placement rate {:.1}%",
        stats.total_applications, stats.selected_students, stats.placement_rate
    );
}

fn seed_drive(service: &PlacementService, drive_date: DateTime<Utc>) -> Result<Drive, AppError> {
    let company = service.companies().create(CompanyProfile {
        name: "Northwind Systems".to_string(),
        description: "Payments infrastructure and developer tooling".to_string(),
        website: Some("https://northwind.example.com".to_string()),
        industry: "Fintech".to_string(),
        location: "Bengaluru".to_string(),
    })?;

    let drive = service.drives().schedule(DriveRequest {
        company_id: company.id,
        role: "Graduate Software Engineer".to_string(),
        job_description: "Build and operate settlement services".to_string(),
        ctc: 1_200_000.0,
        eligibility_criteria: "CGPA 7.0 and above, no active backlogs".to_string(),
        drive_date,
        location: "Bengaluru".to_string(),
    })?;
    Ok(drive)
}

fn seed_cohort(service: &PlacementService) -> Result<Vec<Student>, AppError> {
    let cohort = [
        ("21CS001", "Ananya Iyer", 9.1),
        ("21CS014", "Rahul Verma", 8.4),
        ("21IT007", "Meera Pillai", 7.6),
        ("21EC022", "Karthik Reddy", 7.2),
    ];

    let mut students = Vec::with_capacity(cohort.len());
    for (roll_no, name, cgpa) in cohort {
        let student = service.students().register(StudentProfile {
            name: name.to_string(),
            roll_no: roll_no.to_string(),
            branch: branch_for(roll_no).to_string(),
            section: "A".to_string(),
            year: 4,
            cgpa,
            skills: vec!["Data Structures".to_string(), "SQL".to_string()],
            email: format!("{}@campus.example.edu", roll_no.to_ascii_lowercase()),
            phone: "+919800000000".to_string(),
            resume_url: None,
            ssc_percentage: 90.0,
            inter_diploma_percentage: 88.5,
            backlogs_count: 0,
            backlog_status: BacklogStatus::NotApplicable,
            year_of_passing: 2025,
            crt_fee_status: CrtFeeStatus::Paid,
            crt_fee_amount: 4500.0,
            crt_receipt_number: None,
        })?;
        students.push(student);
    }
    Ok(students)
}

fn branch_for(roll_no: &str) -> &'static str {
    match roll_no.get(2..4) {
        Some("CS") => "Computer Science",
        Some("IT") => "Information Technology",
        Some("EC") => "Electronics",
        _ => "General",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn demo_runs_with_defaults() {
        run_demo(DemoArgs::default()).expect("demo completes");
    }

    #[test]
    fn demo_imports_category_csv() {
        let path = std::env::temp_dir().join(format!(
            "campus-hire-demo-categories-{}.csv",
            std::process::id()
        ));
        let mut file = File::create(&path).expect("create csv");
        writeln!(file, "id,name\n1,Core Engineering\n2,Analytics").expect("write csv");
        drop(file);

        let result = run_demo(DemoArgs {
            categories_csv: Some(path.clone()),
            ..DemoArgs::default()
        });
        std::fs::remove_file(&path).ok();
        result.expect("demo completes");
    }

    #[test]
    fn demo_reports_missing_category_file() {
        let result = run_demo(DemoArgs {
            categories_csv: Some(PathBuf::from("/nonexistent/categories.csv")),
            ..DemoArgs::default()
        });
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn branches_follow_roll_number_codes() {
        assert_eq!(branch_for("21IT007"), "Information Technology");
        assert_eq!(branch_for("X"), "General");
    }
}
