use clap::Parser;
use lab_reporting::config::export_config::ExportConfig;
use lab_reporting::utils::{logger, validation::Validate};
use lab_reporting::{ExportEngine, GuideExportPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "gids-pdf")]
#[command(about = "Print export van de Odoo 19 boekhouding gids")]
struct Args {
    /// Path to a TOML job file; without it the built-in guide job runs
    #[arg(short, long)]
    config: Option<String>,

    /// Override the input HTML path from the job file
    #[arg(long)]
    input: Option<String>,

    /// Override the output PDF path from the job file
    #[arg(long)]
    output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("🚀 Starting gids-pdf export");

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading job configuration from: {}", path);
            match ExportConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load job file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => ExportConfig::default(),
    };

    if let Some(input) = args.input {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.input.html_path = input;
    }
    if let Some(output) = args.output {
        tracing::info!("🔧 Output overridden to: {}", output);
        config.output.pdf_path = output;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Job validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_job_summary(&config);

    let storage = LocalStorage::new(".".to_string());
    let pipeline = GuideExportPipeline::new(storage, config);
    let engine = ExportEngine::new(pipeline);

    match engine.run().await {
        Ok(receipt) => {
            tracing::info!("✅ Guide export completed successfully!");
            tracing::info!("📁 Output saved to: {}", receipt.output_path);
            println!("✅ Guide export completed successfully!");
            println!(
                "📁 {} ({} pages, {} bytes)",
                receipt.output_path, receipt.pages, receipt.bytes_written
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Guide export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestie: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                lab_reporting::utils::error::ErrorSeverity::Low => 0,
                lab_reporting::utils::error::ErrorSeverity::Medium => 2,
                lab_reporting::utils::error::ErrorSeverity::High => 1,
                lab_reporting::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_job_summary(config: &ExportConfig) {
    println!("📋 Job Summary:");
    println!("  Job: {}", config.job.name);
    println!("  Input: {}", config.input.html_path);
    println!("  Output: {}", config.output.pdf_path);
    println!(
        "  Style: {} v{} (A4, footer '{}')",
        config.style.name,
        config.style.version,
        config.style.footer_line(1, 1)
    );
    println!();
}
