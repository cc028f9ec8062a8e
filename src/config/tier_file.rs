use crate::domain::model::{DurationUnit, Tier};
use crate::domain::ports::TierSource;
use crate::utils::error::{Result, TierError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TierFileFormat {
    Toml,
    Json,
    Csv,
}

impl TierFileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Ok(TierFileFormat::Toml),
            Some("json") => Ok(TierFileFormat::Json),
            Some("csv") => Ok(TierFileFormat::Csv),
            _ => Err(TierError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

#[derive(Deserialize)]
struct TomlTiers {
    #[serde(default)]
    tiers: Vec<Tier>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTiers {
    Wrapped { tiers: Vec<Tier> },
    Bare(Vec<Tier>),
}

#[derive(Deserialize)]
struct CsvRow {
    duration: f64,
    unit: String,
    cost: f64,
}

/// A tier sequence stored on disk.
#[derive(Debug, Clone)]
pub struct TierFile {
    path: PathBuf,
    format: TierFileFormat,
}

impl TierFile {
    /// Picks the format from the file extension.
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let format = TierFileFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn with_format<P: Into<PathBuf>>(path: P, format: TierFileFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> TierFileFormat {
        self.format
    }
}

impl TierSource for TierFile {
    fn load_tiers(&self) -> Result<Vec<Tier>> {
        let content = std::fs::read_to_string(&self.path)?;
        let tiers = parse_tiers(&content, self.format)?;
        tracing::debug!(
            "Loaded {} tier(s) from {} as {:?}",
            tiers.len(),
            self.path.display(),
            self.format
        );
        Ok(tiers)
    }
}

pub fn parse_tiers(content: &str, format: TierFileFormat) -> Result<Vec<Tier>> {
    match format {
        TierFileFormat::Toml => {
            let table: TomlTiers = toml::from_str(content)?;
            Ok(table.tiers)
        }
        TierFileFormat::Json => {
            let parsed: JsonTiers = serde_json::from_str(content)?;
            match parsed {
                JsonTiers::Wrapped { tiers } | JsonTiers::Bare(tiers) => Ok(tiers),
            }
        }
        TierFileFormat::Csv => parse_csv(content),
    }
}

fn parse_csv(content: &str) -> Result<Vec<Tier>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut tiers = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row?;
        let unit: DurationUnit = row.unit.parse()?;
        tiers.push(Tier::new(row.duration, unit, row.cost));
    }
    Ok(tiers)
}
