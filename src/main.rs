use clap::Parser;
use std::io::{self, Write};
use std::path::Path;

use wellness_predictor::config::toml_config::AppConfig;
use wellness_predictor::core::model_store::ModelStore;
use wellness_predictor::core::reference::{CsvSource, ReferenceDistribution};
use wellness_predictor::report::{self, ModelInfo, Report};
use wellness_predictor::utils::error::{ErrorSeverity, Result, WellnessError};
use wellness_predictor::utils::logger;
use wellness_predictor::{CliConfig, FeatureCollector, FeatureVector, PredictionService};

type Service = PredictionService<ModelStore, ReferenceDistribution>;

fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    logger::init_cli_logger(cli.verbose, config.logging.format);
    tracing::info!("Starting wellness predictor");
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = run(&cli, &config) {
        tracing::error!(
            "❌ Prediction failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &WellnessError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2, // 使用者輸入或配置錯誤
        ErrorSeverity::High => 1,                        // 模型或資料檔案錯誤
        ErrorSeverity::Critical => 3,                    // 結構不符或系統錯誤
    }
}

fn run(cli: &CliConfig, config: &AppConfig) -> Result<()> {
    // 啟動時載入，之後唯讀共用
    let model = ModelStore::load(&config.model.path)?;
    let model_info = ModelInfo::from(&model);

    let source = CsvSource::new(Path::new(&config.reference.path))
        .with_score_column(&config.reference.score_column)
        .with_delimiter(config.delimiter_byte()?);
    let reference = ReferenceDistribution::load(&source)?;

    let service = PredictionService::new(model, reference)?;
    let mut collector = FeatureCollector::with_overrides(&cli.overrides)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.interactive {
        let stdin = io::stdin();
        let predictions = collector.run_session(stdin.lock(), &mut out, |features, out| {
            emit(&service, &model_info, config, features, out)
        })?;
        tracing::info!("Session ended after {} predictions", predictions);
    } else {
        emit(&service, &model_info, config, collector.current(), &mut out)?;
    }
    Ok(())
}

fn emit<W: Write>(
    service: &Service,
    model_info: &ModelInfo,
    config: &AppConfig,
    features: &FeatureVector,
    out: &mut W,
) -> Result<()> {
    let result = service.run(features)?;
    let report = Report {
        features,
        result: &result,
        reference: service.reference(),
        model: model_info.clone(),
        histogram_bins: config.report.histogram_bins,
        histogram_width: config.report.histogram_width,
    };
    report::render(&report, config.report.format, out)?;
    out.flush()?;
    Ok(())
}
