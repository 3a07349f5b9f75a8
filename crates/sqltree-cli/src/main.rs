//! sqltree CLI
//!
//! Command-line tool for inspecting the trees the parser builds.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use sqltree_core::{
    walk_phases, CompilationPhase, ParserConfig, SqlFeature, SqlParser, TraceVisitor,
};

/// Parse SQL statements and show their syntax trees.
#[derive(Parser)]
#[command(name = "sqltree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON parser configuration file.
    #[arg(short, long, env = "SQLTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Feature toggle, e.g. `+INFIX_MOD` or `-DOLLAR_PARAMETERS`. Repeatable.
    #[arg(long = "feature", allow_hyphen_values = true)]
    features: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the syntax tree of a statement.
    Print(StatementSource),

    /// Print the parameters of a statement as JSON.
    Params(StatementSource),

    /// Walk the tree with the tracing visitor.
    Trace {
        #[command(flatten)]
        source: StatementSource,

        /// Number of walks, one per compilation phase.
        #[arg(long, default_value_t = 1)]
        phases: usize,
    },

    /// List the enabled grammar features.
    Features,
}

/// Where the statement text comes from. Reads standard input when neither
/// is given.
#[derive(Args)]
struct StatementSource {
    /// Statement text.
    sql: Option<String>,

    /// File holding the statement.
    #[arg(short, long, conflicts_with = "sql")]
    file: Option<PathBuf>,
}

impl StatementSource {
    fn read(&self) -> anyhow::Result<String> {
        if let Some(sql) = &self.sql {
            return Ok(sql.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()));
        }
        let mut sql = String::new();
        std::io::stdin()
            .read_to_string(&mut sql)
            .context("reading standard input")?;
        Ok(sql)
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ParserConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ParserConfig::from_json(&text)?
        }
        None => ParserConfig::default(),
    };
    for directive in &cli.features {
        config.features.apply(directive)?;
    }
    debug!(
        features = config
            .features
            .iter()
            .map(|feature| feature.name())
            .collect::<Vec<_>>()
            .join(","),
        max_identifier_length = config.max_identifier_length,
        max_nesting_depth = config.max_nesting_depth,
        "parser configuration"
    );
    Ok(config)
}

const PHASES: [CompilationPhase; 3] = [
    CompilationPhase::AfterParse,
    CompilationPhase::AfterBind,
    CompilationPhase::AfterOptimize,
];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;
    let mut parser = SqlParser::with_config(config);

    match &cli.command {
        Commands::Print(source) => {
            let sql = source.read()?;
            let root = parser.parse_statement(&sql)?;
            print!("{}", root.tree_print());
        }

        Commands::Params(source) => {
            let sql = source.read()?;
            parser.parse_statement(&sql)?;
            println!("{}", serde_json::to_string_pretty(parser.parameter_list())?);
        }

        Commands::Trace { source, phases } => {
            let sql = source.read()?;
            let mut root = parser.parse_statement(&sql)?;

            let mut visitor = TraceVisitor::new();
            let phases = &PHASES[..(*phases).min(PHASES.len())];
            walk_phases(&mut visitor, &sql, phases, &mut root)?;
            info!(
                nodes = visitor.nodes_visited(),
                walks = visitor.walks_completed(),
                "trace complete"
            );
        }

        Commands::Features => {
            for feature in SqlFeature::ALL {
                let state = if parser.features().contains(feature) {
                    "on"
                } else {
                    "off"
                };
                println!("{:<20} {state}", feature.name());
            }
        }
    }

    Ok(())
}
