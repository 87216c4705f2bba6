use clap::{Parser, Subcommand};
use health_core::*;
use std::path::PathBuf;

/// Width of the longest bar in the trend chart
const CHART_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "healthlog")]
#[command(about = "Daily health check and body-measurement log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log store activity to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate today's measurement and append it to the log
    Log {
        /// Body weight in kg
        #[arg(long, default_value_t = 66.0)]
        weight: f64,

        /// Waist circumference in cm
        #[arg(long, default_value_t = 83.0)]
        waist: f64,

        /// male or female
        #[arg(long)]
        gender: Gender,

        /// Running distance in km
        #[arg(long, default_value_t = 0.0, value_parser = non_negative)]
        running: f64,

        /// Cycling distance in km
        #[arg(long, default_value_t = 0.0, value_parser = non_negative)]
        cycling: f64,

        /// Swimming distance in km
        #[arg(long, default_value_t = 0.0, value_parser = non_negative)]
        swimming: f64,

        /// Dry run - show the evaluation without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the most recent records (default)
    History {
        /// Number of records to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Chart weight over the most recent records
    Trend {
        /// Number of records to chart
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Health report for the latest record
    Report {
        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Export the log as CSV
    Export {
        /// Destination file
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    health_core::logging::init(cli.verbose);

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let mut store = CsvLogStore::in_dir(&data_dir);

    match cli.command {
        Some(Commands::Log {
            weight,
            waist,
            gender,
            running,
            cycling,
            swimming,
            dry_run,
        }) => {
            let measurement = Measurement {
                height_m: config.profile.height_m,
                weight_kg: weight,
                waist_cm: waist,
                gender,
                activity: Activity {
                    running_km: running,
                    cycling_km: cycling,
                    swimming_km: swimming,
                },
            };
            cmd_log(&mut store, measurement, dry_run)
        }
        Some(Commands::History { limit }) => {
            cmd_history(&store, limit.unwrap_or(config.trend.window))
        }
        Some(Commands::Trend { limit }) => cmd_trend(&store, limit.unwrap_or(config.trend.window)),
        Some(Commands::Report { output, json }) => {
            cmd_report(&store, config.trend.window, output, json)
        }
        Some(Commands::Export { output }) => cmd_export(&store, output),
        None => {
            // Default to "history" command
            cmd_history(&store, config.trend.window)
        }
    }
}

fn cmd_log(store: &mut CsvLogStore, measurement: Measurement, dry_run: bool) -> Result<()> {
    let evaluation = evaluate(
        measurement.height_m,
        measurement.weight_kg,
        measurement.waist_cm,
        measurement.gender,
    )?;

    display_evaluation(&measurement, &evaluation);

    if dry_run {
        println!("\n[Dry run - not saving record]");
        return Ok(());
    }

    let now = chrono::Local::now().naive_local();
    let record = HealthRecord::new(now, &measurement, &evaluation);
    store.append(&record)?;

    println!("\n✓ Record saved!");
    println!("  Log: {}", store.path().display());
    Ok(())
}

fn cmd_history(store: &CsvLogStore, limit: usize) -> Result<()> {
    let log = store.load()?;
    if log.is_empty() {
        println!("No records yet.");
        return Ok(());
    }

    println!("Recent records ({} of {})", log.tail(limit).len(), log.len());
    println!();
    println!(
        "  {:<16}  {:>6}  {:>7}  {:>6}  {:>6}  {:<6}  {:>6}  {:>6}  {:>6}",
        "timestamp", "height", "weight", "waist", "bmi", "gender", "run", "bike", "swim"
    );
    for r in log.tail(limit) {
        println!(
            "  {:<16}  {:>6.2}  {:>7.1}  {:>6.1}  {:>6.2}  {:<6}  {:>6.1}  {:>6.1}  {:>6.1}",
            r.timestamp.format(timestamp_format::FORMAT),
            r.height_m,
            r.weight_kg,
            r.waist_cm,
            r.bmi,
            r.gender,
            r.running_km,
            r.cycling_km,
            r.swimming_km
        );
    }
    Ok(())
}

fn cmd_trend(store: &CsvLogStore, limit: usize) -> Result<()> {
    let log = store.load()?;
    let trend = weight_trend(&log, limit);
    if trend.is_empty() {
        println!("No records yet.");
        return Ok(());
    }

    println!("Weight trend ({})", window_label(trend.len()));
    println!();
    for line in render_chart(&trend) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_report(
    store: &CsvLogStore,
    window: usize,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let log = store.load()?;
    let now = chrono::Local::now().naive_local();
    let Some(report) = HealthReport::from_log(&log, window, truncate_to_minute(now))? else {
        println!("No records yet.");
        return Ok(());
    };

    let rendered = if json {
        serde_json::to_string_pretty(&report)?
    } else {
        report.render_text()
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)?;
            tracing::info!("Wrote report to {:?}", path);
            println!("✓ Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn cmd_export(store: &CsvLogStore, output: PathBuf) -> Result<()> {
    let count = store.export_to(&output)?;
    println!(
        "✓ Exported {} {}",
        count,
        if count == 1 { "record" } else { "records" }
    );
    println!("  CSV: {}", output.display());
    Ok(())
}

fn display_evaluation(measurement: &Measurement, evaluation: &Evaluation) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  HEALTH CHECK");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Height: {:.2} m (from profile)  Gender: {}",
        measurement.height_m, measurement.gender
    );
    println!();
    println!("  Ideal weight: {:.2} kg", evaluation.ideal_weight_kg);
    println!("  BMI: {:.2}", evaluation.bmi);
    println!("  → Weight judgment: {}", evaluation.weight_category);
    println!("  → BMI judgment: {}", evaluation.bmi_category);
    println!("  → Waist judgment: {}", evaluation.waist_category);
}

/// Horizontal bar per point, scaled between the lowest and highest weight
fn render_chart(trend: &[TrendPoint]) -> Vec<String> {
    let min = trend.iter().map(|p| p.weight_kg).fold(f64::INFINITY, f64::min);
    let max = trend
        .iter()
        .map(|p| p.weight_kg)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    trend
        .iter()
        .map(|p| {
            let bar = if span > 0.0 {
                1 + ((p.weight_kg - min) / span * (CHART_WIDTH - 1) as f64).round() as usize
            } else {
                CHART_WIDTH / 2
            };
            format!(
                "  {}  {:>6.1} kg │{}",
                p.timestamp.format(timestamp_format::FORMAT),
                p.weight_kg,
                "█".repeat(bar)
            )
        })
        .collect()
}

fn non_negative(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a non-negative number, got {}", s))
    }
}
