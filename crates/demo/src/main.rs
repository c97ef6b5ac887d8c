// File: crates/demo/src/main.rs
// Summary: Loads the listings CSV once, builds the dashboard views and writes each chart spec as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use listings_core::{dataset, engine, views, AggregationRecipe, ChartSpec, Dataset, Summary, Tab, ViewId};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "listings-demo", about = "Build Airbnb listings dashboard charts as JSON specs")]
struct Args {
    /// Listings CSV (a .csv/.cvs extension swap is tried when missing)
    #[arg(long, env = "LISTINGS_CSV", default_value = "cleaned_airbnb.csv")]
    data: String,

    /// Tab to build: overview, price, geo or all
    #[arg(long, default_value = "all")]
    tab: String,

    /// Build only these view ids (repeatable); overrides --tab
    #[arg(long = "view")]
    views: Vec<String>,

    /// Also build an ad-hoc recipe read from a JSON file
    #[arg(long)]
    recipe: Option<PathBuf>,

    /// Output directory for chart_<view>.json and summary.json
    #[arg(long, default_value = "target/out")]
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let (path, used_alt) = resolve_path(&args.data)?;
    tracing::info!(path = %path.display(), "using input file");
    if used_alt {
        tracing::info!("extension swapped between .csv/.cvs");
    }

    let ds = dataset::init_global(&path)
        .with_context(|| format!("failed to load listings from '{}'", path.display()))?;
    if ds.is_empty() {
        tracing::warn!("dataset has no rows; charts will be empty");
    }

    std::fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;

    let summary = Summary::from_dataset(ds);
    for card in summary.cards() {
        tracing::info!(title = card.title, value = %card.value, "stat");
    }
    write_json(&args.out.join("summary.json"), &serde_json::to_string_pretty(&summary)?)?;

    let ids = selected_views(&args)?;
    let mut unavailable = 0usize;
    for id in &ids {
        match views::build_view(id, ds) {
            Ok(spec) => write_spec(&args.out, id, &spec)?,
            Err(e) => {
                unavailable += 1;
                tracing::warn!(view = %id, error = %e, "view unavailable");
            }
        }
    }

    if let Some(file) = &args.recipe {
        build_recipe_file(file, ds, &args.out)?;
    }

    tracing::info!(built = ids.len() - unavailable, unavailable, "done");
    Ok(())
}

/// View ids from --view, else from --tab.
fn selected_views(args: &Args) -> Result<Vec<String>> {
    if !args.views.is_empty() {
        return Ok(args.views.clone());
    }
    let tabs = if args.tab.eq_ignore_ascii_case("all") {
        Tab::ALL.to_vec()
    } else {
        vec![Tab::parse(&args.tab).with_context(|| format!("unknown tab '{}' (overview, price, geo, all)", args.tab))?]
    };
    Ok(tabs
        .into_iter()
        .flat_map(|t| t.views().iter().map(|v: &ViewId| v.id().to_string()))
        .collect())
}

/// Build an ad-hoc recipe file. An unreadable, unparsable or invalid recipe is logged
/// like any unavailable view; only output errors abort.
fn build_recipe_file(file: &Path, ds: &Dataset, out: &Path) -> Result<()> {
    let recipe = match read_recipe(file) {
        Ok(recipe) => recipe,
        Err(e) => {
            tracing::warn!(recipe = %file.display(), error = format!("{e:#}"), "view unavailable");
            return Ok(());
        }
    };
    let name = file.file_stem().and_then(|s| s.to_str()).unwrap_or("recipe");
    match engine::build(&recipe, ds) {
        Ok(spec) => write_spec(out, name, &spec),
        Err(e) => {
            tracing::warn!(recipe = %file.display(), error = %e, "view unavailable");
            Ok(())
        }
    }
}

fn read_recipe(file: &Path) -> Result<AggregationRecipe> {
    let text = std::fs::read_to_string(file).with_context(|| format!("reading recipe {}", file.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing recipe {}", file.display()))
}

fn write_spec(out: &Path, name: &str, spec: &ChartSpec) -> Result<()> {
    let path = out.join(format!("chart_{name}.json"));
    write_json(&path, &spec.to_json()?)?;
    tracing::info!(kind = %spec.kind, categories = spec.len(), path = %path.display(), "wrote chart");
    Ok(())
}

fn write_json(path: &Path, body: &str) -> Result<()> {
    std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}
