use clap::Parser;

use wellness_predictor::config::toml_config::AppConfig;
use wellness_predictor::core::checks::run_checks;
use wellness_predictor::utils::logger;
use wellness_predictor::utils::validation::Validate;

#[derive(Parser)]
#[command(name = "wellness-check")]
#[command(about = "Check the model artifact and reference data before serving predictions")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Model artifact (JSON)
    #[arg(long)]
    model: Option<String>,

    /// Reference scores (CSV)
    #[arg(long)]
    data: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> wellness_predictor::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(model) = &args.model {
        config.model.path = model.clone();
    }
    if let Some(data) = &args.data {
        config.reference.path = data.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(args.verbose, config.logging.format);
    tracing::info!("🔍 Checking model {} and data {}", config.model.path, config.reference.path);

    let report = run_checks(&config);
    report.render(&mut std::io::stdout().lock())?;

    if report.all_passed() {
        println!("✅ All checks passed!");
    } else {
        println!("❌ Some checks failed!");
    }
    std::process::exit(report.exit_code());
}
