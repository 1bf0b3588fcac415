//! Severity rules over per-test decline percentages.
//!
//! Rules are evaluated in priority order and the first match wins. Detail
//! entries are produced independently of which rule fired.

use serde::Serialize;

use crate::state::DeclineThresholds;
use crate::trend::{DeclineRecord, TrendReport};

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeclineAlert {
    SingleSevere,
    DualModerate,
    MultipleMild,
}

impl DeclineAlert {
    pub fn message(self, t: &DeclineThresholds) -> String {
        match self {
            DeclineAlert::SingleSevere => format!(
                "Alerte : une baisse ≥ {}% a été détectée sur un test.",
                t.severe_pct
            ),
            DeclineAlert::DualModerate => format!(
                "Alerte : {} tests ont baissé de ≥ {}%.",
                t.moderate_count, t.moderate_pct
            ),
            DeclineAlert::MultipleMild => format!(
                "Alerte : {} tests ou plus ont baissé de ≥ {}%.",
                t.mild_count, t.mild_pct
            ),
        }
    }
}

/// One test whose decline reached the detail threshold.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DeclineDetail {
    pub test: String,
    pub percent: f64,
    pub max_value: f64,
    pub max_year: i32,
    pub recent_value: f64,
    pub recent_year: i32,
}

impl From<&DeclineRecord> for DeclineDetail {
    fn from(r: &DeclineRecord) -> Self {
        DeclineDetail {
            test: r.test.label().to_string(),
            percent: round1(r.decline_percent),
            max_value: r.max_value,
            max_year: r.max_year,
            recent_value: r.recent_value,
            recent_year: r.recent_year,
        }
    }
}

/// Classifier output for one employee.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct DeclineVerdict {
    pub alert: Option<DeclineAlert>,
    pub message: Option<String>,
    pub details: Vec<DeclineDetail>,
}

/// Map decline percentages to at most one alert.
pub fn classify(percents: &[f64], t: &DeclineThresholds) -> Option<DeclineAlert> {
    let at_least = |pct: f64| percents.iter().filter(|&&p| p >= pct).count();

    if percents.iter().any(|&p| p >= t.severe_pct) {
        Some(DeclineAlert::SingleSevere)
    } else if at_least(t.moderate_pct) >= t.moderate_count {
        Some(DeclineAlert::DualModerate)
    } else if at_least(t.mild_pct) >= t.mild_count {
        Some(DeclineAlert::MultipleMild)
    } else {
        None
    }
}

/// Classify a trend report and list every test at or above the mild threshold.
pub fn verdict(report: &TrendReport, t: &DeclineThresholds) -> DeclineVerdict {
    let alert = classify(&report.percents(), t);
    let details = report
        .records
        .iter()
        .filter(|r| r.decline_percent >= t.mild_pct)
        .map(DeclineDetail::from)
        .collect();
    DeclineVerdict {
        alert,
        message: alert.map(|a| a.message(t)),
        details,
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
