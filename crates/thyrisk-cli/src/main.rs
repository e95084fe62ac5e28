use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use thyrisk_classifiers::pipeline::RecurrencePipeline;
use thyrisk_cli::batch::score_file;
use thyrisk_cli::config::ServerConfig;
use thyrisk_cli::web;

fn model_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .help("Path to JSON configuration file")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("model_path")
                .short('m')
                .long("model")
                .help("Path to the trained model artifact. Overrides the configuration file.")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("model_kind")
                .short('k')
                .long("model-kind")
                .help("Format of the model artifact. Overrides the configuration file.")
                .value_parser(["forest", "gbdt", "xgboost-dump"])
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .help("Positive-class probability cut-off for gbdt and xgboost-dump models.")
                .value_parser(clap::value_parser!(f32)),
        )
        .arg(
            Arg::new("n_features")
                .long("n-features")
                .help("Row width the gbdt or xgboost-dump model was trained on; other widths are rejected.")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("variant")
                .long("variant")
                .help("Encoding variant: lowercase labels or raw dataset labels.")
                .value_parser(["lowercase", "dataset"])
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("training_columns")
                .short('c')
                .long("columns")
                .help(
                    "Persisted training column list (*.json, *.csv or *.tsv) used to \
                     reindex rows for the dataset variant.",
                )
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("THYRISK_LOG", "error,thyrisk=info"))
        .init();

    let matches = Command::new("thyrisk")
        .version(clap::crate_version!())
        .about("\u{1FA7A} thyrisk - Thyroid cancer recurrence prediction front end")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            model_args(
                Command::new("serve").about("Serve the input form and prediction endpoint over HTTP"),
            )
            .arg(
                Arg::new("bind")
                    .short('b')
                    .long("bind")
                    .help("Address to listen on, e.g. 127.0.0.1:5000. Overrides the configuration file.")
                    .value_parser(clap::builder::NonEmptyStringValueParser::new())
                    .value_hint(ValueHint::Other),
            ),
        )
        .subcommand(
            model_args(
                Command::new("predict")
                    .about("Score a CSV/TSV file of form submissions")
                    .arg(
                        Arg::new("input")
                            .help("CSV/TSV file whose headers are feature names")
                            .required(true)
                            .value_parser(clap::value_parser!(PathBuf))
                            .value_hint(ValueHint::FilePath),
                    ),
            )
            .arg(
                Arg::new("output_file")
                    .short('o')
                    .long("output")
                    .help("Path to write the scored records. Defaults to stdout.")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("serve", serve_matches)) => handle_serve(serve_matches),
        Some(("predict", predict_matches)) => handle_predict(predict_matches),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn load_config(matches: &ArgMatches) -> Result<ServerConfig> {
    let config_path = matches.get_one::<PathBuf>("config");
    match config_path {
        Some(path) => log::info!("[thyrisk] Using config: {:?}", path),
        None => log::info!("[thyrisk] No config provided; using defaults."),
    }

    let config = ServerConfig::from_arguments(config_path, matches)?;
    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[thyrisk] Effective config:\n{}", default_json);
    }
    Ok(config)
}

fn handle_serve(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(web::serve(&config)) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Server failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let input: &PathBuf = matches
        .get_one("input")
        .expect("input is required by CLI configuration");
    let output: Option<&PathBuf> = matches.get_one("output_file");
    let config = load_config(matches)?;

    let result = RecurrencePipeline::from_config(&config.pipeline_config())
        .and_then(|pipeline| score_file(&pipeline, input, output.map(PathBuf::as_path)));
    match result {
        Ok(summary) => {
            eprintln!(
                "[thyrisk] Completed scoring {} record(s), {} predicted recurrence.",
                summary.rows, summary.recurrences
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Scoring failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
