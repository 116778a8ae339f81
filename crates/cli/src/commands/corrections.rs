//! `mosaic review-corrections ...`

use clap::{ArgGroup, Args};
use mosaic_core::choices::CorrectionStatus;
use mosaic_core::correction::{needs_implement_override, review, ReviewAction};
use mosaic_core::types::DbId;
use mosaic_db::models::correction::AircraftCorrection;
use mosaic_db::repositories::CorrectionRepo;
use mosaic_db::DbPool;

use super::confirm;

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("action")
        .args(["list", "show", "approve", "reject", "implement"])
        .multiple(false)
))]
pub struct ReviewArgs {
    /// List corrections (the default action)
    #[arg(long)]
    pub list: bool,

    /// Restrict the list to one status (default: PENDING)
    #[arg(long, value_parser = parse_status)]
    pub status: Option<CorrectionStatus>,

    /// List every correction regardless of status
    #[arg(long, conflicts_with = "status")]
    pub all: bool,

    /// Show one correction in full
    #[arg(long, value_name = "ID")]
    pub show: Option<DbId>,

    /// Approve a correction
    #[arg(long, value_name = "ID")]
    pub approve: Option<DbId>,

    /// Reject a correction
    #[arg(long, value_name = "ID")]
    pub reject: Option<DbId>,

    /// Mark a correction implemented
    #[arg(long, value_name = "ID")]
    pub implement: Option<DbId>,

    /// Admin notes recorded with the decision
    #[arg(long)]
    pub notes: Option<String>,

    /// Implement without approval and without asking
    #[arg(long)]
    pub force: bool,
}

fn parse_status(raw: &str) -> Result<CorrectionStatus, String> {
    raw.to_uppercase().parse().map_err(|e| format!("{e}"))
}

fn warn_missing(id: DbId) {
    println!("⚠ Correction #{id} does not exist");
}

fn print_summary(c: &AircraftCorrection) {
    println!(
        "#{:<5} {:<12} {:<28} {} -> {}",
        c.id,
        c.status.as_str(),
        format!("{} / {}", c.aircraft_name, c.field_name.as_str()),
        display_value(&c.current_value),
        c.suggested_value
    );
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(empty)"
    } else {
        value
    }
}

fn print_detail(c: &AircraftCorrection) {
    println!("Correction #{}", c.id);
    println!("  Aircraft:        {} (id {})", c.aircraft_name, c.aircraft_id);
    println!("  Field:           {}", c.field_name.label());
    println!("  Current value:   {}", display_value(&c.current_value));
    println!("  Suggested value: {}", c.suggested_value);
    println!("  Reason:          {}", c.reason);
    if !c.source_documentation.is_empty() {
        println!("  Source:          {}", c.source_documentation);
    }
    if let Some(name) = &c.submitter_name {
        println!("  Submitted by:    {name}");
    }
    if let Some(email) = &c.submitter_email {
        println!("  Email:           {email}");
    }
    println!("  Status:          {}", c.status.label());
    println!("  Submitted:       {}", c.created_at);
    if let Some(reviewed_at) = c.reviewed_at {
        println!("  Reviewed:        {reviewed_at}");
    }
    if !c.admin_notes.is_empty() {
        println!("  Admin notes:     {}", c.admin_notes);
    }
}

async fn apply(pool: &DbPool, id: DbId, action: ReviewAction, args: &ReviewArgs) -> anyhow::Result<()> {
    let Some(current) = CorrectionRepo::find_by_id(pool, id).await? else {
        warn_missing(id);
        return Ok(());
    };

    let mut force = args.force;
    if action == ReviewAction::Implement && needs_implement_override(current.status) && !force {
        let prompt = format!(
            "Correction #{id} is {}, not approved. Mark it implemented anyway?",
            current.status.label().to_lowercase()
        );
        if !confirm(&prompt)? {
            println!("Cancelled");
            return Ok(());
        }
        force = true;
    }

    let outcome = review(
        current.status,
        &current.admin_notes,
        action,
        args.notes.as_deref(),
        force,
    )?;

    let Some(updated) = CorrectionRepo::apply_review(pool, id, &outcome).await? else {
        warn_missing(id);
        return Ok(());
    };

    tracing::info!(
        correction_id = id,
        from = %current.status,
        to = %updated.status,
        forced = force,
        "Correction reviewed via CLI",
    );
    println!(
        "✓ Correction #{id}: {} -> {}",
        current.status.label(),
        updated.status.label()
    );
    Ok(())
}

pub async fn run(pool: &DbPool, args: ReviewArgs) -> anyhow::Result<()> {
    if let Some(id) = args.show {
        match CorrectionRepo::find_by_id(pool, id).await? {
            Some(c) => print_detail(&c),
            None => warn_missing(id),
        }
        return Ok(());
    }
    if let Some(id) = args.approve {
        return apply(pool, id, ReviewAction::Approve, &args).await;
    }
    if let Some(id) = args.reject {
        return apply(pool, id, ReviewAction::Reject, &args).await;
    }
    if let Some(id) = args.implement {
        return apply(pool, id, ReviewAction::Implement, &args).await;
    }

    let status = if args.all {
        None
    } else {
        Some(args.status.unwrap_or(CorrectionStatus::Pending))
    };
    let corrections = CorrectionRepo::list(pool, status).await?;

    match status {
        Some(s) => println!("{} correction(s) with status {}", corrections.len(), s.as_str()),
        None => println!("{} correction(s)", corrections.len()),
    }
    for c in &corrections {
        print_summary(c);
    }
    Ok(())
}
