//! # Influence Line CLI
//!
//! Terminal front end over infl_core. Reads the results a calculation run
//! left on disk and prints curves, governing maxima and axis ticks as JSON on
//! stdout. Logs go to stderr (`RUST_LOG` controls verbosity).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use infl_core::axis::AxisLayout;
use infl_core::file_io::load_config;
use infl_core::{
    Category, CurveFamily, CurveResolver, InflError, MaximumPolicy, MaximumSelector, ResultStore,
    StoreConfig,
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Influence line result viewer (data side)", long_about = None)]
struct Cli {
    #[command(flatten)]
    root: RootArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RootArgs {
    /// Dataset root (`<root>/<category>/<artifact>.json`)
    #[arg(long, global = true, conflicts_with_all = ["legacy", "config"])]
    root: Option<PathBuf>,

    /// Search the legacy relative roots from the current directory
    #[arg(long, global = true, conflicts_with = "config")]
    legacy: bool,

    /// JSON store configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available artifacts and curve index ranges
    Inspect,
    /// Print one curve
    Curve {
        /// Curve family (span_moments, span_shear_forces, support_moments, ...)
        family: CurveFamily,
        span: usize,
        #[arg(default_value_t = 0)]
        section: usize,
        /// Fail on out-of-range indices instead of clamping them
        #[arg(long)]
        exact: bool,
    },
    /// Print the governing curve of a family
    Max {
        family: CurveFamily,
        /// Use the area policy instead of the point policy
        #[arg(long)]
        area: bool,
    },
    /// Print support tick positions and labels
    Ticks,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("infl_cli=info,infl_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(infl) = e.downcast_ref::<InflError>() {
                if let Ok(json) = serde_json::to_string_pretty(infl) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn store_config(args: &RootArgs) -> Result<StoreConfig> {
    if let Some(root) = &args.root {
        return Ok(StoreConfig::explicit(root));
    }
    if args.legacy {
        let cwd = std::env::current_dir().context("reading current directory")?;
        return Ok(StoreConfig::legacy(cwd));
    }
    if let Some(path) = &args.config {
        return Ok(load_config(path)?);
    }
    Ok(StoreConfig::from_env()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = store_config(&cli.root)?;
    debug!(?config, "store configuration");
    let store = ResultStore::new(config);

    match cli.command {
        Command::Inspect => inspect(&store),
        Command::Curve {
            family,
            span,
            section,
            exact,
        } => {
            let resolver = CurveResolver::new(&store);
            let curve = if exact {
                resolver.resolve_exact(family, span, section)
            } else {
                resolver.resolve(family, span, section)
            }
            .with_context(|| format!("resolving {} [{}][{}]", family, span, section))?;
            print_json(&curve)
        }
        Command::Max { family, area } => {
            let policy = if area {
                MaximumPolicy::Area
            } else {
                MaximumPolicy::Point
            };
            let (governing, curve) = MaximumSelector::new(&store)
                .governing_curve(family, policy)
                .with_context(|| format!("selecting {} maximum of {}", policy, family))?;
            info!(%family, %policy, span = governing.span, section = ?governing.section, "governing curve");
            print_json(&json!({ "governing": governing, "curve": curve }))
        }
        Command::Ticks => {
            let layout = AxisLayout::load(&store)?;
            print_json(&layout.ticks())
        }
    }
}

/// Span count and per-span section counts of one family.
///
/// Failures are reported inline, per family or per span, so one bad payload
/// does not hide the rest of the listing.
fn family_entry(resolver: &CurveResolver<'_>, family: CurveFamily) -> serde_json::Value {
    let bounds = match resolver.bounds(family, 0) {
        Ok(bounds) => bounds,
        Err(e) => return json!({ "error": e }),
    };
    let sections: Vec<serde_json::Value> = (0..bounds.spans)
        .map(|span| match resolver.bounds(family, span) {
            Ok(b) => json!(b.sections),
            Err(e) => json!({ "error": e }),
        })
        .collect();
    json!({ "spans": bounds.spans, "sections": sections })
}

fn inspect(store: &ResultStore) -> Result<()> {
    let artifacts: serde_json::Map<String, serde_json::Value> = Category::ALL
        .iter()
        .map(|category| (category.to_string(), json!(store.available(*category))))
        .collect();

    let resolver = CurveResolver::new(store);
    let families: serde_json::Map<String, serde_json::Value> = CurveFamily::ALL
        .iter()
        .map(|family| (family.to_string(), family_entry(&resolver, *family)))
        .collect();

    print_json(&json!({
        "roots": store.config().candidate_roots(),
        "artifacts": artifacts,
        "families": families,
    }))
}
