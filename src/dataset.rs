//! Dataset loading and the in-memory observation table.
//!
//! Headers are trimmed and lowercased before lookup. Only `matricule` and
//! `année` are required; every other column may be absent, in which case the
//! corresponding fields stay `None` and the analyses depending on them yield
//! nothing.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::battery::TestKind;
use crate::error::{Error, Result};
use crate::state::{Observation, Sex, Tier};

const COL_ID: &str = "matricule";
const COL_YEAR: &str = "année";
const COL_SEX: &str = "sexe";
const COL_BMI: &str = "imc";
const COL_WAIST: &str = "périmétre abdominal";
const COL_WEIGHT: &str = "poids";
const COL_HEIGHT: &str = "taille";
const COL_AGE: &str = "age";
const COL_GRADE: &str = "grade";
const COL_CATEGORY: &str = "catégorie";
const COL_LOCATION: &str = "cis";

/// Read-only table of observations, in file order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Observation>,
}

impl Table {
    pub fn new(rows: Vec<Observation>) -> Self {
        Table { rows }
    }

    pub fn load(path: &Path, delimiter: u8) -> Result<Table> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let table = Table::from_reader(file, delimiter)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            employees = table.employee_ids().len(),
            "dataset loaded"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);
        let columns = Columns::from_headers(rdr.headers()?)?;

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            match columns.observation(&record) {
                Some(obs) => rows.push(obs),
                None => warn!(
                    line = record.position().map(|p| p.line()).unwrap_or_default(),
                    "skipping row without identifier or year"
                ),
            }
        }
        Ok(Table { rows })
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one employee, in table order. The identifier is trimmed first.
    pub fn select(&self, employee_id: &str) -> Vec<&Observation> {
        let id = employee_id.trim();
        self.rows.iter().filter(|o| o.employee_id == id).collect()
    }

    /// Distinct identifiers in order of first appearance.
    pub fn employee_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|o| o.employee_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.rows.iter().map(|o| o.year).min()?;
        let max = self.rows.iter().map(|o| o.year).max()?;
        Some((min, max))
    }
}

/// Strip whitespace and the `.0` left behind when ids went through a float column.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

/// Parse a numeric cell. Empty, non-numeric and NaN cells are missing.
/// A decimal comma is accepted.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_year(raw: &str) -> Option<i32> {
    let v = parse_number(raw)?;
    if v.fract() != 0.0 {
        return None;
    }
    i32::try_from(v as i64).ok()
}

fn parse_text(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(s.to_string())
    }
}

/// Resolved positions of the known columns in the header row.
struct Columns {
    id: usize,
    year: usize,
    sex: Option<usize>,
    results: [Option<usize>; TestKind::COUNT],
    tiers: [Option<usize>; TestKind::COUNT],
    bmi: Option<usize>,
    waist: Option<usize>,
    weight: Option<usize>,
    height: Option<usize>,
    age: Option<usize>,
    grade: Option<usize>,
    category: Option<usize>,
    location: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Columns> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        let find = |name: &str| index.get(name).copied();

        let id = find(COL_ID).ok_or(Error::MissingColumn(COL_ID))?;
        let year = find(COL_YEAR).ok_or(Error::MissingColumn(COL_YEAR))?;

        let results = TestKind::ALL.map(|k| find(k.result_column()));
        let tiers = TestKind::ALL.map(|k| find(k.tier_column()));
        for kind in TestKind::ALL {
            if results[kind.index()].is_none() {
                debug!(column = kind.result_column(), "test column absent");
            }
        }

        Ok(Columns {
            id,
            year,
            sex: find(COL_SEX),
            results,
            tiers,
            bmi: find(COL_BMI),
            waist: find(COL_WAIST),
            weight: find(COL_WEIGHT),
            height: find(COL_HEIGHT),
            age: find(COL_AGE),
            grade: find(COL_GRADE),
            category: find(COL_CATEGORY),
            location: find(COL_LOCATION),
        })
    }

    fn observation(&self, record: &StringRecord) -> Option<Observation> {
        let cell = |col: Option<usize>| col.and_then(|i| record.get(i));
        let number = |col: Option<usize>| cell(col).and_then(parse_number);
        let text = |col: Option<usize>| cell(col).and_then(parse_text);

        let employee_id = normalize_id(record.get(self.id)?);
        if employee_id.is_empty() {
            return None;
        }
        let year = parse_year(record.get(self.year)?)?;

        let mut obs = Observation::new(employee_id, year);
        obs.sex = text(self.sex).map(|s| Sex::parse(&s));
        for kind in TestKind::ALL {
            obs.results[kind.index()] = number(self.results[kind.index()]);
            obs.tiers[kind.index()] = cell(self.tiers[kind.index()])
                .map(Tier::parse)
                .unwrap_or(Tier::Untiered);
        }
        obs.bmi = number(self.bmi);
        obs.waist = number(self.waist);
        obs.weight = number(self.weight);
        obs.height = number(self.height);
        obs.age = number(self.age);
        obs.grade = text(self.grade);
        obs.category = text(self.category);
        obs.location = text(self.location);
        Some(obs)
    }
}
