use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;

use statblock_features::config::AppConfig;
use statblock_features::core::logging;
use statblock_features::BestiaryFlattener;

/// Usage: `statblock-features [INPUT] [OUTPUT]`. Positional arguments
/// override `data.input` / `data.output` from the config file.
fn main() -> Result<()> {
    let mut config = AppConfig::load();
    let mut args = std::env::args_os().skip(1);
    if let Some(input) = args.next() {
        config.data.input = PathBuf::from(input);
    }
    if let Some(output) = args.next() {
        config.data.output = Some(PathBuf::from(output));
    }

    logging::init(&config.logging);
    log::info!("{} v{} starting", statblock_features::NAME, statblock_features::VERSION);

    let records = load_records(&config.data.input)?;
    let flattener = BestiaryFlattener::with_options(config.extraction.flatten_options());
    let report = flattener.flatten(&records);

    if !report.skipped.is_empty() {
        log::warn!(
            "{} of {} records skipped",
            report.skipped.len(),
            report.total()
        );
    }

    match &config.data.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output {}", path.display()))?;
            write_stats(BufWriter::new(file), &report.stats)?;
            log::info!("Wrote {} records to {}", report.stats.len(), path.display());
        }
        None => write_stats(io::stdout().lock(), &report.stats)?,
    }

    Ok(())
}

/// Read the record collection: a JSON array, or a bestiary file whose
/// `monster` key holds the array.
fn load_records(path: &Path) -> Result<Vec<Value>> {
    let file = File::open(path).with_context(|| format!("opening input {}", path.display()))?;
    let data: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing input {}", path.display()))?;

    match data {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("monster") {
            Some(Value::Array(records)) => Ok(records),
            _ => bail!("{} has no `monster` array", path.display()),
        },
        _ => bail!("{} does not hold a list of records", path.display()),
    }
}

fn write_stats<W: Write>(mut writer: W, stats: &[statblock_features::MonsterStats]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, stats).context("writing flattened records")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
