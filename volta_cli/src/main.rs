//! # Volta CLI Application
//!
//! Replays an estimate record through the engine and prints the cost rows
//! and sizing block of every panel.
//!
//! ```text
//! volta_cli <estimate.json> [--config <file.toml>] [--json]
//! volta_cli                  # built-in demo panel
//! ```

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;
use volta_core::calculations::ModuleBucket;
use volta_core::errors::{EstimateError, EstimateResult};
use volta_core::recompute::LoggingObserver;
use volta_core::{
    Estimator, EstimatorConfig, InMemoryCatalog, LaborCategory, LaborType, Manufacturer, Panel, Project,
    ProjectRecord,
};

const USAGE: &str = "Usage: volta_cli [<estimate.json>] [--config <file.toml>] [--json]";

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct Options {
    record: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "-h" | "--help" => options.help = true,
            "--config" => {
                let path = args.next().ok_or("--config needs a file path")?;
                options.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown option '{}'", flag)),
            path => {
                if options.record.is_some() {
                    return Err(format!("Unexpected extra argument '{}'", path));
                }
                options.record = Some(PathBuf::from(path));
            }
        }
    }
    Ok(options)
}

fn main() -> ExitCode {
    logging::init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };
    if options.help {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(options: &Options) -> EstimateResult<()> {
    let config = Arc::new(match &options.config {
        Some(path) => EstimatorConfig::from_path(path)?,
        None => EstimatorConfig::builtin()?,
    });
    let catalog = Box::new(InMemoryCatalog::with_sample_products());

    let session = match &options.record {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| EstimateError::file_error("read", path.display().to_string(), e.to_string()))?;
            let record = ProjectRecord::from_json(&json)?;
            info!(path = %path.display(), panels = record.panels.len(), "loaded estimate record");
            Estimator::from_record(&record, catalog, config)?
        }
        None => demo_session(catalog, config)?,
    };

    if options.json {
        println!("{}", session.export().to_json_pretty()?);
        return Ok(());
    }

    print_project(&session);
    Ok(())
}

/// One panel with a few lines on several manufacturer tables.
fn demo_session(catalog: Box<InMemoryCatalog>, config: Arc<EstimatorConfig>) -> EstimateResult<Estimator> {
    info!("no estimate record given, running built-in demo");

    let mut session = Estimator::new(Project::new("Demo site", "Demo client", "V-DEMO"), catalog, config);
    session.subscribe(Arc::new(LoggingObserver));

    let id = session.add_panel("TD-1")?;
    let lines = [
        (Manufacturer::Schneider, "A9F74206", "2"),
        (Manufacturer::Schneider, "A9F74216", "4"),
        (Manufacturer::Hager, "HTS263E", "1"),
        (Manufacturer::Knx, "MTN6725-0001", "1"),
        (Manufacturer::Knx, "MTN6164-0004", "3"),
        (Manufacturer::Swisspro, "SP001", "6"),
    ];
    for (row, (manufacturer, reference, quantity)) in lines.into_iter().enumerate() {
        session.set_reference(id, manufacturer, row, reference)?;
        session.set_quantity(id, manufacturer, row, quantity)?;
    }

    session.set_hours(id, LaborCategory::Schematics, "6")?;
    session.set_hours(id, LaborCategory::WiringAssembly, "14,5")?;
    session.set_hours(id, LaborCategory::Installation, "8")?;
    session.set_labor_type(id, LaborType::Internal)?;
    session.set_margin_percent(id, 25.0)?;

    Ok(session)
}

fn print_project(session: &Estimator) {
    let meta = &session.project().meta;
    println!("Project: {} ({})  Client: {}", meta.name, meta.volta_number, meta.client);

    for panel in session.project().panels() {
        println!();
        print_panel(panel);
    }
}

fn print_panel(panel: &Panel) {
    let totals = panel.totals();
    let summary = &totals.summary;
    let modules = &totals.materials.modules;
    let rows = &totals.materials.rows;

    println!("═══════════════════════════════════════");
    println!("  PANEL {}", panel.name());
    println!("═══════════════════════════════════════");
    println!();
    println!("Tables:");
    for manufacturer in Manufacturer::ALL {
        let lines = panel.collection(manufacturer).active_rows().count();
        println!("  {:<10} {:>3} line(s) {}", manufacturer.code(), lines, content_icon(panel.has_content(manufacturer)));
    }
    println!();
    println!("Costs ({} labor, margin {:.1}%):", panel.labor_type(), summary.margin_percent);
    println!("  Material:        {:>12.2}", summary.material_total);
    println!("  With margin:     {:>12.2}", summary.material_with_margin);
    println!("  Time:            {:>9} min", summary.total_time_minutes);
    println!("  Labor:           {:>12.2}  ({:.1} h)", summary.labor_total, totals.labor.total_hours);
    println!("  Final total:     {:>12.2}", summary.final_total);
    println!();
    println!("Sizing:");
    println!("  KNX modules:     {:>8.1}", modules.knx_modules);
    for bucket in [
        ModuleBucket::HalfModule,
        ModuleBucket::OneTwoPole,
        ModuleBucket::ThreePole,
        ModuleBucket::FourPolePlus,
    ] {
        println!("  {:<16} {:>8.1}", format!("{}:", bucket.display_name()), modules.bucket(bucket));
    }
    println!("  Module width:    {:>8.1}", modules.total_module_width);
    println!("  Terminals:       {:>8.1}", totals.materials.terminals.total_terminal_count);
    println!("  Rows (80M):      {:>8.2}", rows.rows_standard);
    println!("  Rows (24M):      {:>8.2}", rows.rows_24_module);
    println!("  Modules/m:       {:>8.1}", rows.modules_per_meter);
    println!("  Occupancy:       {:>7.1}%", rows.occupancy_percent);

    if !totals.materials.skipped_rows.is_empty() {
        println!();
        println!("Skipped rows:");
        for skipped in &totals.materials.skipped_rows {
            println!(
                "  [WARN] {} row {}: {} '{}' is not a number",
                skipped.manufacturer,
                skipped.row + 1,
                skipped.field,
                skipped.value
            );
        }
    }
}

fn content_icon(has_content: bool) -> &'static str {
    if has_content { "[x]" } else { "[ ]" }
}
