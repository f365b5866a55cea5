use clap::Parser;
use lender_enrich::app::runner::{filter_file, Runner};
use lender_enrich::config::{Command, EnrichArgs, FilterArgs};
use lender_enrich::utils::{logger, validation::Validate};
use lender_enrich::{CliConfig, EnrichError, GeminiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting lender-enrich");
    tracing::debug!("CLI config: {:?}", cli);

    let outcome = match &cli.command {
        Command::Enrich(args) => enrich(args).await,
        Command::Filter(args) => filter(args).await,
    };

    if let Err(e) = outcome {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn enrich(args: &EnrichArgs) -> Result<(), EnrichError> {
    let config = args.load_config()?;
    config.validate()?;

    let api_key = config.resolve_api_key()?;
    let extractor = GeminiClient::new(config.extraction.clone(), api_key)?;

    let runner = Runner::new(&config, extractor);
    runner.watch_ctrl_c();

    let summaries = runner.run(args.mode.sources()).await?;

    for summary in &summaries {
        println!(
            "✅ {}: {} processed, {} succeeded, {} failed",
            summary.source, summary.processed, summary.succeeded, summary.failed
        );
        if let Some(output) = &summary.output {
            println!("📁 Output saved to: {}", output);
        }
    }

    if summaries.iter().any(|s| s.interrupted) {
        return Err(EnrichError::Interrupted);
    }
    Ok(())
}

async fn filter(args: &FilterArgs) -> Result<(), EnrichError> {
    let records = filter_file(&args.file, &args.state).await?;
    for record in &records {
        let marker = if record.is_pan_india() { " (pan-India)" } else { "" };
        println!("{} [{}]{}", record.company_name, record.company_type, marker);
    }
    println!("{} lenders operate in {}", records.len(), args.state);
    Ok(())
}
