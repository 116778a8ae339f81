//! `mosaic seed` and `mosaic update-cruise-speeds`

use clap::Args;
use mosaic_db::seed;
use mosaic_db::DbPool;

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Group to load; repeat for several. Loads every group when omitted.
    #[arg(long, value_name = "GROUP")]
    pub group: Vec<String>,

    /// Load everything in one transaction
    #[arg(long)]
    pub atomic: bool,

    /// Print the available group names and exit
    #[arg(long, conflicts_with_all = ["group", "atomic"])]
    pub list_groups: bool,
}

pub async fn run(pool: &DbPool, args: SeedArgs) -> anyhow::Result<()> {
    if args.list_groups {
        for name in seed::group_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    let report = seed::load(pool, &args.group, args.atomic).await?;

    println!("✓ Seed complete");
    println!("  Manufacturers created: {}", report.manufacturers_created);
    println!("  Engines created:       {}", report.engines_created);
    println!("  Aircraft created:      {}", report.aircraft_created);
    println!("  Aircraft existing:     {}", report.aircraft_existing);
    println!("  Engine links created:  {}", report.links_created);

    if !report.skipped.is_empty() {
        println!("⚠ Skipped {} invalid record(s):", report.skipped.len());
        for skipped in &report.skipped {
            println!(
                "  [{}] {}: {}",
                skipped.group, skipped.aircraft, skipped.reason
            );
        }
    }
    Ok(())
}

pub async fn update_cruise_speeds(pool: &DbPool) -> anyhow::Result<()> {
    let report = seed::update_cruise_speeds(pool).await?;

    println!("✓ Cruise speeds updated: {}", report.updated);
    println!("  Already set:           {}", report.skipped);
    if !report.not_found.is_empty() {
        println!("⚠ No aircraft for {} entr(ies):", report.not_found.len());
        for (manufacturer, model) in &report.not_found {
            println!("  {manufacturer} {model}");
        }
    }
    Ok(())
}
