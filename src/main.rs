mod cli;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use crate::cli::{AliasesArgs, Cli, Command, ConfigArg, InfoArgs, SqlArgs};
use elfquery::config::Config;
use elfquery::info::FileInfo;
use elfquery::io::MappedFile;
use elfquery::logging;
use elfquery::render::{render, OutputFormat};
use elfquery::store::{Column, ResultSet, Store, Value};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = logging::level_from_verbosity(cli.verbose);
    if cli.log_json {
        logging::init_tracing_json(level);
    } else {
        logging::init_tracing(level);
    }

    let result = run(cli.command).and_then(|out| {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(out.as_bytes())
            .and_then(|_| stdout.flush())
            .context("Failed to write output")
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<String> {
    match command {
        Command::Sql(args) => sql(args),
        Command::Info(args) => info(args),
        Command::Aliases(args) => aliases(args),
        Command::Version => Ok(version()),
    }
}

fn load_config(arg: &ConfigArg) -> Result<Config> {
    let (config, path) = Config::discover(arg.config.as_deref())?;
    if let Some(path) = path {
        info!(path = %path.display(), "Using config file");
    }
    Ok(config)
}

/// `-o` wins over the config file, which wins over plain text.
fn output_format(flag: Option<OutputFormat>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(format) => Ok(format),
        None => Ok(config.output_format()?.unwrap_or_default()),
    }
}

fn open(path: &Path, config: &Config) -> Result<MappedFile> {
    MappedFile::open(path, config.max_file_size)
        .with_context(|| format!("Failed to open {}", path.display()))
}

fn sql(args: SqlArgs) -> Result<String> {
    let config = load_config(&args.config)?;
    let format = output_format(args.output, &config)?;

    let query = match (args.query, args.alias) {
        (Some(query), _) => query,
        (None, Some(alias)) => config.resolve_alias(&alias)?,
        (None, None) => anyhow::bail!("Either a query (-q) or an alias (-a) is required"),
    };

    let file = open(&args.file, &config)?;
    let store = Store::load(file.bytes())
        .with_context(|| format!("Failed to load {}", file.path().display()))?;
    info!(
        path = %file.path().display(),
        sections = store.section_count(),
        symbols = store.symbol_count(),
        issues = store.diagnostics().len(),
        "Loaded ELF file"
    );

    let rs = store.query(&query)?;
    Ok(render(&rs, format)?)
}

fn info(args: InfoArgs) -> Result<String> {
    let config = load_config(&args.config)?;
    let format = output_format(args.output, &config)?;

    let file = open(&args.file, &config)?;
    let summary = FileInfo::load(file.bytes())
        .with_context(|| format!("Failed to load {}", file.path().display()))?;
    Ok(render(&summary.to_result_set(), format)?)
}

fn aliases(args: AliasesArgs) -> Result<String> {
    let config = load_config(&args.config)?;
    let format = output_format(args.output, &config)?;

    let rows = config
        .aliases()
        .into_iter()
        .map(|(name, query)| vec![Value::Text(name), Value::Text(query)])
        .collect();
    let rs = ResultSet::new(
        vec![
            Column::new("Alias", Some("text")),
            Column::new("Query", Some("text")),
        ],
        rows,
    );
    Ok(render(&rs, format)?)
}

fn version() -> String {
    format!(
        "elfquery {} [{}]\n",
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().format("%d %b %y %H:%M %Z")
    )
}
