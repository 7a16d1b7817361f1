use crate::infra::{build_platform_service, seed_demo_records};
use clap::Args;
use scheme_assist::error::AppError;
use scheme_assist::schemes::{ApplicationRequest, ApplicationStatus, ApplicationUpdate, Scheme};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Include the benefits granted by each scheme in the output
    #[arg(long)]
    pub(crate) list_benefits: bool,
    /// Skip the application submission portion of the demo
    #[arg(long)]
    pub(crate) skip_applications: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        list_benefits,
        skip_applications,
    } = args;

    let service = build_platform_service();
    let seeded = seed_demo_records(&service)?;

    println!("Assistance scheme walkthrough");
    println!(
        "- {} ({}, {})",
        seeded.retrenched_parent.name,
        seeded.retrenched_parent.employment_status.label(),
        seeded.retrenched_parent.marital_status.label()
    );
    println!(
        "- {} ({}, {})",
        seeded.employed_single.name,
        seeded.employed_single.employment_status.label(),
        seeded.employed_single.marital_status.label()
    );

    for applicant in [&seeded.retrenched_parent, &seeded.employed_single] {
        let eligible = service.eligible_schemes(&applicant.id)?;
        println!("\nSchemes {} can apply for:", applicant.name);
        if eligible.is_empty() {
            println!("  (none)");
        }
        for scheme in &eligible {
            print_scheme(scheme, list_benefits);
        }
    }

    if skip_applications {
        return Ok(());
    }

    println!("\nApplication submissions");
    let accepted = service.create_application(ApplicationRequest {
        applicant_id: seeded.retrenched_parent.id.clone(),
        scheme_id: seeded.family_scheme.id.clone(),
        notes: Some("Retrenched this quarter, two school-going children".to_string()),
    })?;
    println!(
        "- {} -> {}: {}",
        accepted.applicant.name,
        accepted.scheme.name,
        accepted.application.status.label()
    );

    match service.create_application(ApplicationRequest {
        applicant_id: seeded.employed_single.id.clone(),
        scheme_id: seeded.retrenchment_scheme.id.clone(),
        notes: None,
    }) {
        Ok(detail) => println!(
            "- {} -> {}: {}",
            detail.applicant.name,
            detail.scheme.name,
            detail.application.status.label()
        ),
        Err(err) => println!(
            "- {} -> {}: rejected ({err})",
            seeded.employed_single.name, seeded.retrenchment_scheme.name
        ),
    }

    let approved = service.update_application(
        &accepted.application.id,
        ApplicationUpdate {
            status: Some(ApplicationStatus::Approved),
            notes: Some("Documents verified by case officer".to_string()),
        },
    )?;
    println!(
        "\nDecision for {}: {} on {}",
        approved.applicant.name,
        approved.application.status.label(),
        approved
            .application
            .decision_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "(pending)".to_string())
    );

    match serde_json::to_string_pretty(&approved) {
        Ok(json) => println!("\nStored application record:\n{json}"),
        Err(err) => println!("\nStored application record unavailable: {err}"),
    }

    Ok(())
}

fn print_scheme(scheme: &Scheme, list_benefits: bool) {
    println!("  - {}: {}", scheme.name, scheme.description);
    if !list_benefits {
        return;
    }
    for benefit in &scheme.benefits {
        match benefit.amount {
            Some(amount) => println!("      {} (${amount:.2})", benefit.name),
            None => println!("      {}", benefit.name),
        }
    }
}
