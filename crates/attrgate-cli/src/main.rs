use anyhow::{Context, Result};
use attrgate_cli::logging::init_logging;
use attrgate_cli::profile::ProfileArgs;
use attrgate_cli::report::{self, Format, ResolvedExpr};
use attrgate_facts::parse_annotation;
use attrgate_resolve::{detect, generate_header, resolve, resolve_all};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "attrgate")]
#[command(about = "Resolve API annotation macros to compiler attributes for a toolchain")]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the identified toolchain and its attribute capabilities
    Detect {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Resolve annotation expressions such as 'FORMAT(2, 3)'
    Resolve {
        /// Annotation expressions
        #[arg(required = true)]
        exprs: Vec<String>,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Resolve every annotation kind
    Table {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Generate a C header defining every annotation macro
    Header {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Write the header here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Detect { profile, format } => cmd_detect(&profile, format),
        Commands::Resolve {
            exprs,
            profile,
            format,
        } => cmd_resolve(&exprs, &profile, format),
        Commands::Table { profile, format } => cmd_table(&profile, format),
        Commands::Header { profile, output } => cmd_header(&profile, output),
    }
}

fn cmd_detect(args: &ProfileArgs, format: Format) -> Result<()> {
    let facts = args.load()?;
    let caps = detect(&facts.profile);
    print!("{}", report::detect_report(&facts, &caps, format)?);
    Ok(())
}

fn cmd_resolve(exprs: &[String], args: &ProfileArgs, format: Format) -> Result<()> {
    let facts = args.load()?;
    let caps = detect(&facts.profile);

    let mut items = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let annotation =
            parse_annotation(expr).with_context(|| format!("invalid annotation '{}'", expr))?;
        let resolution = resolve(&annotation, &caps, facts.mode, facts.profile.platform);
        items.push(ResolvedExpr::new(expr, annotation, resolution));
    }

    print!("{}", report::resolve_report(&items, format)?);
    Ok(())
}

fn cmd_table(args: &ProfileArgs, format: Format) -> Result<()> {
    let facts = args.load()?;
    let table = resolve_all(&facts.profile, facts.mode);
    print!("{}", report::table_report(&table, format)?);
    Ok(())
}

fn cmd_header(args: &ProfileArgs, output: Option<PathBuf>) -> Result<()> {
    let facts = args.load()?;
    let table = resolve_all(&facts.profile, facts.mode);
    let header = generate_header(&table, &facts.scheme);

    match output {
        Some(path) => {
            std::fs::write(&path, header)
                .with_context(|| format!("failed to write header '{}'", path.display()))?;
            eprintln!("Header written to {}", path.display());
        }
        None => print!("{}", header),
    }
    Ok(())
}
