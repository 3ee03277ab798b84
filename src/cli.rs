use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use elfquery::render::OutputFormat;

const SQL_ABOUT: &str = "\
Reads all symbolic information from the ELF file into an in-memory SQLite
database and runs one query against it, given either as SQL text (-q) or as
the name of an alias (-a).

Two tables are available:

  symbols

  ID            Integer  Load order of the symbol, starting at 1
  Value         Integer  Value associated with the symbol
  Size          Integer  Size in bytes
  Type          Text     Symbol type (OBJECT, FUNC, ...)
  Binding       Text     Symbol binding (LOCAL, GLOBAL, WEAK, ...)
  Visibility    Text     Symbol visibility (DEFAULT, HIDDEN, ...)
  SectionIndex  Integer  Section index as stored in the file
  Name          Text     Symbol name
  Section       Text     Section name

  sections

  ID            Integer  Position in the section header table
  Name          Text     Section name
  Type          Text     Section type
  Flags         Text     Section attribute flags
  Address       Integer  Address of the first byte of this section
  Offset        Integer  Offset from the start of file
  Size          Integer  Section size in bytes
  LinkedIndex   Integer  Linked section header table index
  Info          Integer  Extra information (usage varies)
  Alignment     Integer  Address alignment constraints
  EntrySize     Integer  Size in bytes of each fixed-size entry

The SQL function demangle(Name) turns Rust and C++ symbol names into their
readable form.

Examples:

  elfquery sql zephyr.elf -a bss10
  elfquery sql zephyr.elf -q \"SELECT Name, Size FROM symbols WHERE Type = 'FUNC' ORDER BY Size DESC\"";

/// Query ELF section and symbol tables with SQL.
#[derive(Parser, Debug)]
#[command(name = "elfquery", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write log lines as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a SQL query against the ELF file.
    #[command(long_about = SQL_ABOUT)]
    Sql(SqlArgs),

    /// ELF file details and size summary.
    Info(InfoArgs),

    /// List the query aliases available to `sql -a`.
    Aliases(AliasesArgs),

    /// Version and build details.
    Version,
}

#[derive(clap::Args, Debug)]
pub struct ConfigArg {
    /// Config file (default: ./.elfquery.toml, then ~/.elfquery.toml).
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["query", "alias"])))]
pub struct SqlArgs {
    /// ELF file to load.
    pub file: PathBuf,

    /// SQL query text.
    #[arg(short, long, value_name = "SQL")]
    pub query: Option<String>,

    /// Name of a query alias.
    #[arg(short, long, value_name = "ALIAS")]
    pub alias: Option<String>,

    /// Output format: text, pretty, unicode, color, md, html, csv or json
    /// [default: text, or `output` from the config file].
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    #[command(flatten)]
    pub config: ConfigArg,
}

#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    /// ELF file to summarise.
    pub file: PathBuf,

    /// Output format [default: text, or `output` from the config file].
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    #[command(flatten)]
    pub config: ConfigArg,
}

#[derive(clap::Args, Debug)]
pub struct AliasesArgs {
    /// Output format [default: text, or `output` from the config file].
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    #[command(flatten)]
    pub config: ConfigArg,
}
