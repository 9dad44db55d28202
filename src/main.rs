use bastion::utils::{logger, validation::Validate};
use bastion::{
    Assertions, Bastion, BastionConfig, BastionFactory, Bound, CallOutcome, CliConfig,
    JsonResponseAssertions, ModelKind, OutcomeRecorder, StatusCodeAssertions,
    StringModelConverter,
};
use clap::Parser;
use std::sync::Arc;

fn main() {
    let cli = CliConfig::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if cli.json_logs || config.logging.json {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }
    tracing::debug!("CLI config: {:?}", cli);

    match run(&cli, &config) {
        Ok(outcome) => {
            match &outcome {
                CallOutcome::Passed => println!("✅ Passed"),
                CallOutcome::Failed(reason) => println!("❌ Failed: {}", reason),
                CallOutcome::Errored(reason) => println!("💥 Error: {}", reason),
            }
            std::process::exit(outcome.exit_code());
        }
        Err(e) => {
            tracing::error!("❌ Could not run the call: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(if e.is_config_error() { 1 } else { 2 });
        }
    }
}

fn load_config(cli: &CliConfig) -> bastion::Result<BastionConfig> {
    cli.validate()?;
    let config = match &cli.config {
        Some(path) => BastionConfig::from_file(path)?,
        None => BastionConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(cli: &CliConfig, config: &BastionConfig) -> bastion::Result<CallOutcome> {
    let request = cli.to_request()?;
    let recorder = Arc::new(OutcomeRecorder::new());
    let factory = BastionFactory::from_config(config)?
        .with_shared_listener(recorder.clone())
        .with_suppressed_assertions(cli.suppress_assertions || config.suppress_assertions());

    let bastion = factory.api(cli.message.as_str(), &request);
    match cli.model {
        ModelKind::Text => {
            let mut bound = bastion.bind::<String>();
            bound.register_model_converter(StringModelConverter);
            with_cli_assertions(bound, cli)?.call();
        }
        ModelKind::Json => {
            let bound = bastion.bind::<serde_json::Value>().with_default_converters();
            with_cli_assertions(bound, cli)?.call();
        }
    }

    Ok(recorder.outcome().unwrap_or(CallOutcome::Passed))
}

fn with_cli_assertions<'r, M: 'static>(
    bastion: Bastion<'r, Bound<M>>,
    cli: &CliConfig,
) -> bastion::Result<Bastion<'r, Bound<M>>> {
    let status = (!cli.expected_status.is_empty())
        .then(|| StatusCodeAssertions::expecting(cli.expected_status.iter().copied()));
    let json = match &cli.expected_json {
        Some(raw) => Some(JsonResponseAssertions::from_json_str(raw)?.with_status_code(None)),
        None => None,
    };

    Ok(match (status, json) {
        (Some(status), Some(json)) => bastion.with_assertions(Assertions::<M>::and(status, json)),
        (Some(status), None) => bastion.with_assertions(status),
        (None, Some(json)) => bastion.with_assertions(json),
        (None, None) => bastion,
    })
}
