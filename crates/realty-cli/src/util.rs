use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use realty_data::{dataset::Dataset, derive::ConversionRates, raw::RawTable};
use realty_model::pipeline::PipelineConfig;
use serde::Serialize;

/// Writes `value` as pretty-printed JSON to `path`, or to stdout without one.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_pretty(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => write_pretty(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn write_pretty<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

/// Reads a JSON pipeline config. Fields it leaves out take their defaults.
pub fn read_pipeline_config(path: &Path) -> anyhow::Result<PipelineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pipeline config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid pipeline config {}", path.display()))
}

/// Reads a listings CSV file without interpreting its values.
pub fn read_listings_table(path: &Path) -> anyhow::Result<RawTable> {
    RawTable::from_path(path)
        .with_context(|| format!("Failed to read listings file {}", path.display()))
}

/// Reads, normalizes and derives a listings CSV file.
///
/// Any invalid row aborts the load.
pub fn read_listings_file(path: &Path, rates: &ConversionRates) -> anyhow::Result<Dataset> {
    Ok(Dataset::from_path(path, rates)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_round_trips_config() {
        let path = std::env::temp_dir().join(format!(
            "realty-cli-config-{}.json",
            std::process::id()
        ));
        let mut config = PipelineConfig::default();
        config.split.seed = 99;

        write_json(&config, Some(path.as_path())).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let read = read_pipeline_config(&path);
        fs::remove_file(&path).unwrap();

        assert!(text.ends_with("}\n"));
        assert_eq!(read.unwrap(), config);
    }

    #[test]
    fn test_missing_config_names_path() {
        let path = std::env::temp_dir().join("realty-cli-no-such-config.json");
        let err = read_pipeline_config(&path).unwrap_err();
        assert!(format!("{err}").contains("realty-cli-no-such-config.json"));
    }
}
