mod data;
mod report;
mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use data::defaults::Defaults;
use data::error::{DataError, Stage};
use data::model::CategoricalColumn;
use data::{clean, filter, loader, writer};
use report::Report;

/// Clean a cafe sales export, report revenue and per-column statistics, and
/// write the cleaned rows back out.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Raw sales CSV, resolved against the working directory
    #[arg(short, long, default_value = "dirty_cafe_sales.csv")]
    input: PathBuf,

    /// Where to write the cleaned CSV
    #[arg(short, long, default_value = "cleaned_cafe_sales.csv")]
    output: PathBuf,

    /// Item whose Corrected Total is summed
    #[arg(long, default_value = "Coffee")]
    item: String,

    /// Decimal places shown in the console report
    #[arg(long, default_value_t = 2)]
    decimals: usize,

    /// Also write the report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Re-read the written file and check it matches the cleaned rows
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    run(&args).inspect_err(|err| {
        if let Some(data_err) = err.downcast_ref::<DataError>() {
            error!("pipeline stopped during '{}'", data_err.stage());
        }
    })
}

/// Load → defaults → clean → aggregate → summarize → write. Each stage sees
/// the complete output of the one before it.
fn run(args: &Args) -> Result<()> {
    let raw = loader::load_raw(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let defaults = Defaults::compute(&raw)?;
    info!(
        "defaults: quantity={} price={:.4} item={} payment={} location={} date={}",
        defaults.quantity,
        defaults.price_per_unit,
        defaults.item,
        defaults.payment_method,
        defaults.location,
        defaults.transaction_date
    );

    let cleaned = clean::clean_all(&raw, &defaults)?;
    drop(raw);

    if filter::matching(&cleaned, CategoricalColumn::Item, &args.item)
        .next()
        .is_none()
    {
        warn!("no rows with Item '{}'", args.item);
    }

    let report = Report::build(defaults, &cleaned, &args.item)?;
    println!("{}", report.render(args.decimals));

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&report).context("serializing report")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote report to {}", path.display());
    }

    writer::write_cleaned(&args.output, &cleaned)
        .with_context(|| format!("writing {}", args.output.display()))?;

    if args.verify {
        let written = loader::load_cleaned(&args.output)
            .with_context(|| format!("re-reading {}", args.output.display()))?;
        if written != cleaned {
            return Err(DataError::MalformedInput {
                stage: Stage::Write,
                reason: format!("{} does not read back as written", args.output.display()),
            }
            .into());
        }
        info!("verified {} rows in {}", written.len(), args.output.display());
    }

    Ok(())
}
