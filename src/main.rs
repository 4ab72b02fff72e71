//! askdb - ask questions about a student database in plain English.

use askdb::cli::Cli;
use askdb::config::Config;
use askdb::llm::create_client;
use askdb::query::KeywordClassifier;
use askdb::{db, logging, repl, AskError, Assistant, Result};
use tokio::io::BufReader;
use tracing::{error, info};

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    if cli.is_one_shot() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Internal Error: could not start runtime: {e}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e.message());
            std::process::exit(1);
        }
    }
}

/// Runs one session. Returns false when a one-shot question failed.
async fn run(cli: Cli) -> Result<bool> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_llm_overrides(&mut config);

    let connection = cli.resolve_connection(&config)?;
    info!("Connection: {}", connection.display_string());
    let database = db::connect(&connection).await?;

    if let Some(seed) = &cli.seed {
        let script = std::fs::read_to_string(seed).map_err(|e| {
            AskError::config(format!("Failed to read seed file {}: {e}", seed.display()))
        })?;
        database.execute_script(&script).await?;
        info!("Applied seed script {}", seed.display());
    }

    let llm = create_client(&config.llm)?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "LLM client ready");

    let classifier = KeywordClassifier::from_config(&config.classifier);
    let mut assistant = Assistant::new(Box::new(classifier), llm, database, config.cache);

    let succeeded = match cli.query.as_deref() {
        Some(query) => {
            let answer = assistant.ask(query).await;
            println!("{}", repl::render_answer(&answer));
            !answer.outcome.is_error()
        }
        None => {
            println!("{}", repl::banner(assistant.database()).await?);
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            repl::run(&mut assistant, stdin, &mut stdout).await?;
            true
        }
    };

    assistant.close().await?;
    Ok(succeeded)
}
