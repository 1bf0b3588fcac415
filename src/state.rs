use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::battery::TestKind;
use crate::error::{Error, Result};
use crate::paths;

/// One employee-year row of the dataset. Missing cells are `None`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Observation {
    pub employee_id: String,
    pub year: i32,
    pub sex: Option<Sex>,
    pub results: [Option<f64>; TestKind::COUNT],
    pub tiers: [Tier; TestKind::COUNT],
    pub bmi: Option<f64>,
    pub waist: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<f64>,
    pub grade: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
}

impl Observation {
    /// Empty row for `employee_id` in `year`; fields are filled in by the loader.
    pub fn new(employee_id: impl Into<String>, year: i32) -> Self {
        Observation {
            employee_id: employee_id.into(),
            year,
            sex: None,
            results: [None; TestKind::COUNT],
            tiers: [Tier::Untiered; TestKind::COUNT],
            bmi: None,
            waist: None,
            weight: None,
            height: None,
            age: None,
            grade: None,
            category: None,
            location: None,
        }
    }

    pub fn result(&self, kind: TestKind) -> Option<f64> {
        self.results[kind.index()]
    }

    pub fn tier(&self, kind: TestKind) -> Tier {
        self.tiers[kind.index()]
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Homme,
    Femme,
    Unknown,
}

impl Sex {
    pub fn parse(raw: &str) -> Sex {
        match raw.trim().to_lowercase().as_str() {
            "homme" | "h" | "m" | "masculin" => Sex::Homme,
            "femme" | "f" | "féminin" | "feminin" => Sex::Femme,
            _ => Sex::Unknown,
        }
    }
}

/// Performance tier of a single test result. Only drives chart coloring.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Untiered,
    Level1,
    Level2,
    Level3,
}

impl Tier {
    /// Accepts `1`, `2`, `3` and float artifacts such as `2.0`.
    pub fn parse(raw: &str) -> Tier {
        match raw.trim().parse::<f64>() {
            Ok(v) if v == 1.0 => Tier::Level1,
            Ok(v) if v == 2.0 => Tier::Level2,
            Ok(v) if v == 3.0 => Tier::Level3,
            _ => Tier::Untiered,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Tier::Level1 => "red",
            Tier::Level2 => "orange",
            Tier::Level3 => "green",
            Tier::Untiered => "gray",
        }
    }
}

/// Inclusive range of years considered by the trend and health analyses.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl YearWindow {
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        YearWindow {
            start: 2019,
            end: 2024,
        }
    }
}

/// Decline percentages and counts for the three alert rules.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DeclineThresholds {
    pub severe_pct: f64,
    pub moderate_pct: f64,
    pub moderate_count: usize,
    pub mild_pct: f64,
    pub mild_count: usize,
}

impl Default for DeclineThresholds {
    fn default() -> Self {
        DeclineThresholds {
            severe_pct: 30.0,
            moderate_pct: 20.0,
            moderate_count: 2,
            mild_pct: 10.0,
            mild_count: 3,
        }
    }
}

/// Waist circumference cutoffs in cm. `femme` also covers unknown sex.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WaistThresholds {
    pub homme: f64,
    pub femme: f64,
}

impl WaistThresholds {
    pub fn for_sex(&self, sex: Option<Sex>) -> f64 {
        match sex {
            Some(Sex::Homme) => self.homme,
            _ => self.femme,
        }
    }
}

impl Default for WaistThresholds {
    fn default() -> Self {
        WaistThresholds {
            homme: 94.0,
            femme: 80.0,
        }
    }
}

/// Configuration with dataset location and thresholds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub delimiter: char,
    pub window: YearWindow,
    pub decline: DeclineThresholds,
    pub waist: WaistThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_path: PathBuf::from("dataset_corrige.csv"),
            delimiter: ',',
            window: YearWindow::default(),
            decline: DeclineThresholds::default(),
            waist: WaistThresholds::default(),
        }
    }
}

// --- Load/save helpers ---

pub fn load_config() -> Result<Config> {
    load_config_from(&paths::config_file()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let config: Config = serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
    if !config.delimiter.is_ascii() {
        return Err(Error::Config(format!(
            "delimiter {:?} must be a single ASCII character",
            config.delimiter
        )));
    }
    Ok(config)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, format!("{json}\n")).map_err(|e| Error::io(path, e))
}
