//! `footprint` - CLI for the carbon footprint calculator
//!
//! Collects questionnaire answers from flags, prints the computed footprint
//! and manages the append-only result log.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::warn;

use footprint::cli::{
    output, CalculateCommand, Cli, Command, ConfigCommand, HistoryCommand, ShowCommand,
};
use footprint::{
    init_logging, AssessmentService, Calculator, Config, Persistence, ResultStore, Session,
    StoredId, UserIdentity,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Config subcommands load the file themselves so a broken one can be validated
    let load_config = || Config::load_from(cli.config.clone());

    match cli.command {
        Command::Calculate(cmd) => handle_calculate(&load_config()?, &cmd),
        Command::Countries(cmd) => handle_countries(cmd.json),
        Command::History(cmd) => handle_history(&load_config()?, &cmd),
        Command::Show(cmd) => handle_show(&load_config()?, &cmd),
        Command::Init => handle_init(&load_config()?),
        Command::Status(cmd) => handle_status(&load_config()?, cmd.json),
        Command::Config(cmd) => handle_config(cli.config.as_deref(), cmd),
    }
}

fn open_store(config: &Config) -> footprint::Result<ResultStore> {
    ResultStore::open_with_timeout(config.database_path(), config.busy_timeout())
}

fn handle_calculate(config: &Config, cmd: &CalculateCommand) -> anyhow::Result<()> {
    let calculator = Calculator::default();

    let country = cmd
        .country
        .clone()
        .or_else(|| config.calculator.default_country.clone())
        .or_else(|| calculator.factors().countries().next().map(str::to_string))
        .context("no country given and no emission factors available")?;

    let identity = UserIdentity::new(cmd.name.clone(), cmd.age, cmd.gender.clone())?;
    let session = Session::new()
        .submit_identity(identity)?
        .submit_lifestyle(cmd.input(&country))?;

    let mut open_failure = None;
    let mut service = if cmd.no_save || !config.storage.persist_results {
        AssessmentService::without_store(calculator)
    } else {
        match open_store(config) {
            Ok(store) => AssessmentService::new(calculator, store),
            Err(e) => {
                warn!("Result log unavailable, continuing without it: {}", e);
                open_failure = Some(e.to_string());
                AssessmentService::without_store(calculator)
            }
        }
    };

    let mut assessment = service.assess_session(&session)?;
    if let Some(reason) = open_failure {
        assessment.persistence = Persistence::Failed(reason);
    }

    if cmd.json {
        let report = serde_json::json!({
            "identity": session.identity(),
            "input": session.input(),
            "result": assessment.result,
            "persistence": assessment.persistence,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", output::assessment(&assessment));
    }
    Ok(())
}

fn handle_countries(json: bool) -> anyhow::Result<()> {
    let calculator = Calculator::default();
    if json {
        let table: serde_json::Map<String, serde_json::Value> = calculator
            .factors()
            .iter()
            .map(|(name, factors)| Ok((name.to_string(), serde_json::to_value(factors)?)))
            .collect::<serde_json::Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", output::countries(calculator.factors()));
    }
    Ok(())
}

fn handle_history(config: &Config, cmd: &HistoryCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let records = store.recent(cmd.limit)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No results logged yet.");
    } else {
        for record in &records {
            println!("{}", output::history_line(record));
        }
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let Some(record) = store.get(StoredId::new(cmd.id))? else {
        bail!("no record with id {}", cmd.id);
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", output::record(&record));
    }
    Ok(())
}

fn handle_init(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config)?;
    store.ensure_schema()?;
    println!(
        "Result log ready at {} (schema v{}, {} records)",
        store.path().display(),
        store.schema_version()?,
        store.count()?
    );
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let stats = store.stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "schema_version": stats.schema_version,
            "total_records": stats.total_records,
            "first_created": stats.first_created,
            "last_created": stats.last_created,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("footprint status");
        println!("----------------");
        println!("Database:      {}", store.path().display());
        println!("Schema:        v{}", stats.schema_version);
        println!("Records:       {}", stats.total_records);
        if let Some(first) = stats.first_created {
            println!("First record:  {}", first.to_rfc3339());
        }
        if let Some(last) = stats.last_created {
            println!("Last record:   {}", last.to_rfc3339());
        }
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config_path: Option<&Path>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path.map(Path::to_path_buf))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Busy timeout (ms):  {}", config.storage.busy_timeout_ms);
                println!("  Persist results:    {}", config.storage.persist_results);
                println!();
                println!("[Calculator]");
                println!(
                    "  Default country:    {}",
                    config
                        .calculator
                        .default_country
                        .as_deref()
                        .unwrap_or("(first in table)")
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or_else(|| config_path.map(Path::to_path_buf))
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if let Err(e) = Config::validate_file(&path) {
                bail!("configuration error: {e}");
            }
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
