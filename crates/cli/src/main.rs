use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use relmap_graph::{Heap, InheritanceDiscovery, RelationAnalyzer};
use relmap_protocol::HeapSnapshot;
use std::collections::BTreeSet;
use std::path::PathBuf;

mod output;
mod settings;

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "relmap")]
#[command(about = "Class relation diagrams from object graph snapshots", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a heap snapshot and print its class relations
    Analyze(AnalyzeArgs),

    /// Print the JSON schema of the snapshot format
    Schema,

    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Heap snapshot (JSON)
    snapshot: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "dot")]
    format: OutputFormat,

    /// Output file (stdout when omitted; required for images)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Config file (TOML); defaults to $RELMAP_CONFIG
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target namespace, e.g. `app.models`
    #[arg(short, long)]
    namespace: Option<String>,

    /// Qualified class name to drop from the result (repeatable)
    #[arg(short, long = "exclude")]
    exclude: Vec<String>,

    /// Ancestor discovery mode
    #[arg(long, value_enum)]
    inheritance: Option<InheritanceMode>,

    /// Abort when more objects than this are reachable
    #[arg(long)]
    max_objects: Option<usize>,
}

#[derive(Copy, Clone, ValueEnum)]
enum InheritanceMode {
    Full,
    Immediate,
}

impl InheritanceMode {
    const fn as_domain(self) -> InheritanceDiscovery {
        match self {
            InheritanceMode::Full => InheritanceDiscovery::FullChain,
            InheritanceMode::Immediate => InheritanceDiscovery::ImmediateParents,
        }
    }
}

impl ConfigArgs {
    fn resolve(&self) -> Result<relmap_graph::AnalyzerConfig> {
        let file = settings::load(self.config.as_deref())?;
        Ok(settings::apply(
            file,
            settings::Overrides {
                namespace: self.namespace.clone(),
                exclude: self.exclude.clone(),
                inheritance: self.inheritance.map(InheritanceMode::as_domain),
                max_objects: self.max_objects,
            },
        ))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Schema => {
            println!("{}", relmap_protocol::snapshot_schema()?);
            Ok(())
        }
        Commands::Config(args) => {
            print!("{}", settings::to_toml(&args.resolve()?)?);
            Ok(())
        }
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let snapshot = HeapSnapshot::from_path(&args.snapshot)?;
    let loaded = Heap::from_snapshot(&snapshot)
        .with_context(|| format!("Failed to resolve {}", args.snapshot.display()))?;

    let analyzer = RelationAnalyzer::from_config(config)?;
    let analysis = analyzer.analyze(&loaded.heap, &loaded.roots, &BTreeSet::new())?;

    if analysis.stats.objects_visited == 0 {
        log::warn!(
            "No root object belongs to namespace {}",
            analyzer
                .config()
                .target_namespace
                .as_deref()
                .unwrap_or_default()
        );
    }

    output::emit(&analysis, args.format, args.output.as_deref())
}
