use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, metadata::LevelFilter, Level};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

use gpa_bro::gpa::{AggregationError, Transcript};
use gpa_bro::grading::{DataSource, GradeDefinition, GradingRegistry, GradingTable};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_INVALID: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate GPA for a transcript file
    Calc {
        /// Transcript file (YAML or JSON)
        transcript: PathBuf,

        /// Print courses as tab-separated values
        #[arg(long)]
        tsv: bool,

        /// Print only the GPA (weighted with --weighted)
        #[arg(long, conflicts_with = "tsv")]
        gpa_only: bool,
    },
    /// Check every course row and list field errors
    Validate {
        /// Transcript file (YAML or JSON)
        transcript: PathBuf,
    },
    /// Show the grading scale for a country
    Scale,
    /// List countries and their grading modes
    Countries,
    /// Write a JSON academic report
    Report {
        /// Transcript file (YAML or JSON)
        transcript: PathBuf,

        /// Output path for the report
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "gpa-bro")]
#[command(about = "International transcript to U.S. GPA converter", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/gpa-bro/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Grading systems file (JSON or YAML), overrides the configured source
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Country whose grading system applies
    #[arg(long, global = true)]
    country: Option<String>,

    /// Grading mode within the country
    #[arg(short, long, global = true)]
    mode: Option<String>,

    /// Use weighted GPA where a single figure is printed
    #[arg(short, long, global = true)]
    weighted: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let fmt = fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(fmt)
        .with(LevelFilter::from_level(level))
        .init();
}

/// Narrow the registry to the requested country and mode.
///
/// No country yields an empty scale, which the validator reports per row.
fn select_scale(
    registry: &GradingRegistry,
    country: Option<&str>,
    mode: Option<&str>,
) -> Result<Vec<GradeDefinition>, String> {
    let Some(country) = country else {
        return Ok(Vec::new());
    };

    if !registry.has_country(country) {
        return Err(format!(
            "Unknown country '{}'. Available: {}",
            country,
            registry.countries().join(", ")
        ));
    }

    if let Some(mode) = mode.filter(|m| !m.is_empty()) {
        let modes = registry.grading_modes(country);
        if !modes.contains(&mode) {
            return Err(format!(
                "Unknown grading mode '{}' for {}. Available: {}",
                mode,
                country,
                modes.join(", ")
            ));
        }
    }

    Ok(registry.select(country, mode))
}

fn load_transcript_or_exit(path: &Path) -> Transcript {
    match gpa_bro::gpa::load_transcript(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Transcript error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

/// Print validation problems to stderr. Returns true if any were found.
fn report_issues(transcript: &Transcript, scale: &[GradeDefinition]) -> bool {
    match gpa_bro::gpa::validate_courses(&transcript.courses, scale) {
        Ok(()) => false,
        Err(issues) => {
            eprintln!("Course errors:");
            for issue in &issues {
                for message in issue.messages() {
                    eprintln!("  - {}", message);
                }
            }
            true
        }
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match gpa_bro::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = gpa_bro::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let source = match cli.data {
        Some(path) => DataSource::File(path),
        None => config.data_source(),
    };
    debug!("Grading data source: {}", source.describe());

    let registry = gpa_bro::grading::load_registry(&source, GradingTable::builtin()).await;
    debug!(
        "Registry ready with {} countries in {:?}",
        registry.countries().len(),
        start_time.elapsed()
    );

    let country = cli.country.or(config.country);
    let mode = cli.mode.or(config.grading_mode);
    let weighted = cli.weighted || config.weighted.unwrap_or(false);
    let use_colors = gpa_bro::output::should_use_colors();

    let scale = match select_scale(&registry, country.as_deref(), mode.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_INVALID);
        }
    };

    match cli.command {
        Commands::Countries => {
            for name in registry.countries() {
                let modes = registry.grading_modes(name);
                println!("{} ({})", name, modes.join(", "));
            }
        }
        Commands::Scale => {
            let Some(ref country) = country else {
                eprintln!("Select a country first (--country)");
                std::process::exit(EXIT_INVALID);
            };
            println!("Country: {}", country);
            if let Some(ref mode) = mode {
                println!("Scale: {}", mode);
            }
            println!();
            println!("{}", gpa_bro::output::format_grade_scale(&scale, use_colors));
        }
        Commands::Validate { transcript } => {
            let transcript = load_transcript_or_exit(&transcript);
            if report_issues(&transcript, &scale) {
                std::process::exit(EXIT_INVALID);
            }
            println!("All {} courses look valid.", transcript.courses.len());
        }
        Commands::Calc {
            transcript,
            tsv,
            gpa_only,
        } => {
            let transcript = load_transcript_or_exit(&transcript);

            // Like the form: no GPA while any field is invalid
            if report_issues(&transcript, &scale) {
                std::process::exit(EXIT_INVALID);
            }

            let summary = gpa_bro::gpa::summarize(&transcript.courses, &scale);
            debug!(
                "Aggregated {} courses: {:?}",
                transcript.courses.len(),
                summary.unweighted
            );

            if gpa_only {
                let result = if weighted {
                    &summary.weighted
                } else {
                    &summary.unweighted
                };
                println!("{}", gpa_bro::output::format_gpa(result.gpa));
            } else if tsv {
                println!("{}", gpa_bro::output::format_tsv(&transcript.courses, &scale));
            } else {
                println!(
                    "{}",
                    gpa_bro::output::format_course_table(&transcript.courses, &scale, use_colors)
                );
                println!();
                println!("{}", gpa_bro::output::format_summary(&summary, use_colors));
            }

            if let Some(AggregationError::InvalidGrade { .. }) = summary.unweighted.error {
                std::process::exit(EXIT_INVALID);
            }
        }
        Commands::Report { transcript, out } => {
            let transcript = load_transcript_or_exit(&transcript);
            report_issues(&transcript, &scale);

            let report = gpa_bro::output::build_report(
                &transcript,
                country.as_deref().unwrap_or_default(),
                mode.as_deref(),
                &scale,
                chrono::Utc::now(),
            );

            if let Err(e) = gpa_bro::output::save_report(&out, &report) {
                eprintln!("Failed to write report: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }

            println!(
                "Report written to {} (unweighted {}, weighted {})",
                out.display(),
                gpa_bro::output::format_gpa(report.unweighted_gpa),
                gpa_bro::output::format_gpa(report.weighted_gpa)
            );
        }
    }

    debug!("Done in {:?}", start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}
