//! BMI category transitions and waist circumference threshold crossings.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::state::{Observation, Sex, WaistThresholds, YearWindow};
use crate::stats;

/// Ordinal BMI classification. Declaration order is severity order.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Normal,
    Overweight,
    ModerateObesity,
    SevereObesity,
    MassiveObesity,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> BmiCategory {
        if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else if bmi < 35.0 {
            BmiCategory::ModerateObesity
        } else if bmi < 40.0 {
            BmiCategory::SevereObesity
        } else {
            BmiCategory::MassiveObesity
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Surpoids",
            BmiCategory::ModerateObesity => "Obésité modérée",
            BmiCategory::SevereObesity => "Obésité sévère",
            BmiCategory::MassiveObesity => "Obésité massive",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthIndicator {
    Bmi,
    Waist,
}

/// BMI moved to a worse category between the first and last in-window years.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BmiTransition {
    pub from_year: i32,
    pub from_value: f64,
    pub from: BmiCategory,
    pub to_year: i32,
    pub to_value: f64,
    pub to: BmiCategory,
}

impl BmiTransition {
    pub fn description(&self) -> String {
        format!(
            "IMC passé de {:.1} ({}, {}) à {:.1} ({}, {})",
            self.from_value, self.from_year, self.from, self.to_value, self.to_year, self.to
        )
    }
}

/// First in-window year where the waist exceeded the sex-specific threshold.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WaistCrossing {
    pub year: i32,
    pub value: f64,
    pub threshold: f64,
    pub sex: Option<Sex>,
}

impl WaistCrossing {
    pub fn description(&self) -> String {
        format!(
            "Tour de taille de {:.1} cm en {} (seuil {} cm)",
            self.value, self.year, self.threshold
        )
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct HealthAlert {
    pub indicator: HealthIndicator,
    pub description: String,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct HealthReport {
    pub bmi: Option<BmiTransition>,
    pub waist: Option<WaistCrossing>,
}

impl HealthReport {
    pub fn indicators(&self) -> Vec<HealthIndicator> {
        let mut tags = Vec::new();
        if self.bmi.is_some() {
            tags.push(HealthIndicator::Bmi);
        }
        if self.waist.is_some() {
            tags.push(HealthIndicator::Waist);
        }
        tags
    }

    pub fn is_triggered(&self) -> bool {
        self.bmi.is_some() || self.waist.is_some()
    }

    pub fn alerts(&self) -> Vec<HealthAlert> {
        let bmi = self.bmi.as_ref().map(|t| HealthAlert {
            indicator: HealthIndicator::Bmi,
            description: t.description(),
        });
        let waist = self.waist.as_ref().map(|c| HealthAlert {
            indicator: HealthIndicator::Waist,
            description: c.description(),
        });
        bmi.into_iter().chain(waist).collect()
    }
}

/// Run both health checks over one employee's rows.
pub fn run(rows: &[&Observation], window: YearWindow, waist: &WaistThresholds) -> HealthReport {
    HealthReport {
        bmi: bmi_transition(rows, window),
        waist: waist_crossing(rows, window, waist),
    }
}

pub fn bmi_transition(rows: &[&Observation], window: YearWindow) -> Option<BmiTransition> {
    let mut points = stats::windowed_series(rows, window, |o| o.bmi);
    if points.len() < 2 {
        return None;
    }
    stats::sort_by_year(&mut points);
    let (from_year, from_value) = *points.first()?;
    let (to_year, to_value) = *points.last()?;
    let from = BmiCategory::from_bmi(from_value);
    let to = BmiCategory::from_bmi(to_value);
    debug!(%from, %to, "bmi categories");

    (to > from).then_some(BmiTransition {
        from_year,
        from_value,
        from,
        to_year,
        to_value,
        to,
    })
}

/// Sex from the most recent row that has one. Later rows win ties.
pub fn latest_sex(rows: &[&Observation]) -> Option<Sex> {
    rows.iter()
        .filter_map(|o| o.sex.map(|s| (o.year, s)))
        .max_by_key(|&(year, _)| year)
        .map(|(_, s)| s)
}

pub fn waist_crossing(
    rows: &[&Observation],
    window: YearWindow,
    thresholds: &WaistThresholds,
) -> Option<WaistCrossing> {
    let mut points = stats::windowed_series(rows, window, |o| o.waist);
    if points.len() < 2 {
        return None;
    }
    stats::sort_by_year(&mut points);

    let sex = latest_sex(rows);
    let threshold = thresholds.for_sex(sex);
    debug!(?sex, threshold, "waist threshold");

    points
        .iter()
        .find(|&&(_, v)| v > threshold)
        .map(|&(year, value)| WaistCrossing {
            year,
            value,
            threshold,
            sex,
        })
}
