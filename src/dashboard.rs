//! Per-employee dashboard payload: demographics, chart series and alerts.
//!
//! Charts are plain data. Rendering them is left to the presentation layer.

use serde::Serialize;
use tracing::info;

use crate::analyze::{self, EmployeeAnalysis};
use crate::battery::TestKind;
use crate::dataset::Table;
use crate::error::{Error, Result};
use crate::health::HealthAlert;
use crate::state::{Config, Observation, Tier};
use crate::stats;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Demographics {
    pub grade: String,
    pub grade_badge: String,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub location: Option<String>,
    pub age: Option<f64>,
    pub category: Option<String>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ChartPoint {
    pub year: i32,
    pub value: f64,
    pub tier: Tier,
    pub color: &'static str,
}

/// Scatter data for one test, points in table order.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TestChart {
    pub test: TestKind,
    pub label: String,
    pub points: Vec<ChartPoint>,
}

impl TestChart {
    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn tiers(&self) -> Vec<Tier> {
        self.points.iter().map(|p| p.tier).collect()
    }
}

/// Per-year mean of a health indicator.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SeriesChart {
    pub label: String,
    pub unit: String,
    pub points: Vec<(i32, f64)>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Dashboard {
    pub employee_id: String,
    pub demographics: Demographics,
    pub charts: Vec<TestChart>,
    pub bmi_chart: Option<SeriesChart>,
    pub waist_chart: Option<SeriesChart>,
    pub analysis: EmployeeAnalysis,
    pub health_alerts: Vec<HealthAlert>,
}

/// Build the dashboard for one employee, or fail with the trimmed identifier.
pub fn lookup(table: &Table, employee_id: &str, config: &Config) -> Result<Dashboard> {
    let id = employee_id.trim();
    let rows = table.select(id);
    if rows.is_empty() {
        info!(employee = id, "employee not found");
        return Err(Error::EmployeeNotFound(id.to_string()));
    }
    Ok(build(id, &rows, config))
}

pub fn build(employee_id: &str, rows: &[&Observation], config: &Config) -> Dashboard {
    let analysis = analyze::run(rows, config);
    let health_alerts = analysis.health.alerts();
    Dashboard {
        employee_id: employee_id.to_string(),
        demographics: demographics(rows),
        charts: test_charts(rows),
        bmi_chart: series_chart(rows, "Évolution de l'IMC", "IMC", |o| o.bmi),
        waist_chart: series_chart(rows, "Tour de Taille", "cm", |o| o.waist),
        analysis,
        health_alerts,
    }
}

/// Grade comes from the first row, everything else from the last.
pub fn demographics(rows: &[&Observation]) -> Demographics {
    let grade = rows
        .first()
        .and_then(|o| o.grade.clone())
        .unwrap_or_else(|| "Inconnu".to_string());
    let last = rows.last();
    Demographics {
        grade_badge: grade_badge(&grade),
        grade,
        weight: last.and_then(|o| o.weight),
        height: last.and_then(|o| o.height),
        location: last.and_then(|o| o.location.clone()),
        age: last.and_then(|o| o.age),
        category: last.and_then(|o| o.category.clone()),
    }
}

pub fn grade_badge(grade: &str) -> String {
    format!("/static/grades/{}.png", grade.to_lowercase().replace(' ', "_"))
}

/// One chart per test with at least one recorded value.
pub fn test_charts(rows: &[&Observation]) -> Vec<TestChart> {
    TestKind::ALL
        .iter()
        .filter_map(|&kind| {
            let points: Vec<ChartPoint> = rows
                .iter()
                .filter_map(|o| {
                    o.result(kind).map(|value| ChartPoint {
                        year: o.year,
                        value,
                        tier: o.tier(kind),
                        color: o.tier(kind).color(),
                    })
                })
                .collect();
            (!points.is_empty()).then(|| TestChart {
                test: kind,
                label: kind.label().to_string(),
                points,
            })
        })
        .collect()
}

fn series_chart<F>(rows: &[&Observation], label: &str, unit: &str, value: F) -> Option<SeriesChart>
where
    F: Fn(&Observation) -> Option<f64>,
{
    let points = stats::yearly_mean(rows, value);
    if points.is_empty() {
        return None;
    }
    Some(SeriesChart {
        label: label.to_string(),
        unit: unit.to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DeclineAlert;
    use crate::state::Sex;

    fn table() -> Table {
        let mut a = Observation::new("100", 2019);
        a.grade = Some("Sergent Chef".into());
        a.location = Some("Nord".into());
        a.weight = Some(80.0);
        a.results[TestKind::Pompes.index()] = Some(100.0);
        a.tiers[TestKind::Pompes.index()] = Tier::Level3;
        a.bmi = Some(24.0);
        a.waist = Some(90.0);
        a.sex = Some(Sex::Homme);

        let mut b = Observation::new("100", 2021);
        b.grade = Some("Adjudant".into());
        b.location = Some("Sud".into());
        b.weight = Some(86.0);
        b.results[TestKind::Pompes.index()] = Some(60.0);
        b.tiers[TestKind::Pompes.index()] = Tier::Level1;
        b.bmi = Some(26.0);
        b.waist = Some(96.0);

        let other = Observation::new("200", 2020);
        Table::new(vec![a, other, b])
    }

    #[test]
    fn unknown_employee_is_not_found() {
        let err = lookup(&table(), " 999 ", &Config::default()).unwrap_err();
        assert!(matches!(&err, Error::EmployeeNotFound(id) if id == "999"));
        assert_eq!(err.to_string(), "Matricule 999 non trouvé.");
    }

    #[test]
    fn demographics_take_first_grade_and_last_values() {
        let d = lookup(&table(), "100", &Config::default()).unwrap();
        assert_eq!(d.demographics.grade, "Sergent Chef");
        assert_eq!(d.demographics.grade_badge, "/static/grades/sergent_chef.png");
        assert_eq!(d.demographics.location.as_deref(), Some("Sud"));
        assert_eq!(d.demographics.weight, Some(86.0));
        assert_eq!(d.demographics.category, None);
    }

    #[test]
    fn missing_grade_is_unknown() {
        let d = lookup(&table(), "200", &Config::default()).unwrap();
        assert_eq!(d.demographics.grade, "Inconnu");
        assert!(d.charts.is_empty());
        assert!(d.bmi_chart.is_none());
        assert!(d.waist_chart.is_none());
        assert!(d.health_alerts.is_empty());
    }

    #[test]
    fn charts_carry_tiers_per_point() {
        let d = lookup(&table(), "100", &Config::default()).unwrap();
        assert_eq!(d.charts.len(), 1);
        let chart = &d.charts[0];
        assert_eq!(chart.label, "Pompes");
        assert_eq!(chart.years(), vec![2019, 2021]);
        assert_eq!(chart.values(), vec![100.0, 60.0]);
        assert_eq!(chart.tiers(), vec![Tier::Level3, Tier::Level1]);
        assert_eq!(
            d.bmi_chart.as_ref().map(|c| c.points.clone()),
            Some(vec![(2019, 24.0), (2021, 26.0)])
        );
    }

    #[test]
    fn dashboard_includes_all_alerts() {
        let d = lookup(&table(), "100", &Config::default()).unwrap();
        assert_eq!(d.analysis.decline.alert, Some(DeclineAlert::SingleSevere));
        assert_eq!(d.health_alerts.len(), 2);
    }

    #[test]
    fn dashboard_serializes_to_json() {
        let d = lookup(&table(), "100", &Config::default()).unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["employee_id"], "100");
        assert_eq!(json["charts"][0]["points"][1]["tier"], "level1");
        assert_eq!(json["charts"][0]["points"][1]["color"], "red");
        assert_eq!(json["analysis"]["decline"]["alert"], "single_severe");
    }
}
