use serde::Serialize;
use tracing::info;

use crate::analyze::{self, EmployeeAnalysis};
use crate::dataset::Table;
use crate::state::Config;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Health,
    PhysicalTests,
}

impl AlertCategory {
    pub fn label(self) -> &'static str {
        match self {
            AlertCategory::Health => "Santé",
            AlertCategory::PhysicalTests => "Tests physiques",
        }
    }
}

/// One line of the cross-employee alert list.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AlertSummary {
    pub employee_id: String,
    pub category_count: usize,
    pub categories: String,
}

/// Alert categories raised by one employee's analysis, health first.
pub fn categories(analysis: &EmployeeAnalysis) -> Vec<AlertCategory> {
    let mut out = Vec::new();
    if analysis.health.is_triggered() {
        out.push(AlertCategory::Health);
    }
    if analysis.has_decline_alert() {
        out.push(AlertCategory::PhysicalTests);
    }
    out
}

/// Analyse every employee and keep those with at least one alert category.
/// Order follows first appearance in the table.
pub fn run(table: &Table, config: &Config) -> Vec<AlertSummary> {
    let ids = table.employee_ids();
    let summaries: Vec<AlertSummary> = ids
        .iter()
        .filter_map(|&id| {
            let rows = table.select(id);
            let cats = categories(&analyze::run(&rows, config));
            if cats.is_empty() {
                return None;
            }
            Some(AlertSummary {
                employee_id: id.to_string(),
                category_count: cats.len(),
                categories: cats
                    .iter()
                    .map(|c| c.label())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        })
        .collect();
    info!(
        employees = ids.len(),
        flagged = summaries.len(),
        "alert scan complete"
    );
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::TestKind;
    use crate::state::{Observation, Sex};

    fn pompes(id: &str, year: i32, v: f64) -> Observation {
        let mut o = Observation::new(id, year);
        o.results[TestKind::Pompes.index()] = Some(v);
        o
    }

    fn table() -> Table {
        let mut rows = vec![
            // steady: never flagged
            pompes("A", 2019, 40.0),
            pompes("A", 2020, 41.0),
            // severe decline only
            pompes("B", 2019, 100.0),
            pompes("B", 2022, 60.0),
        ];
        // waist crossing only
        let mut c1 = Observation::new("C", 2019);
        c1.sex = Some(Sex::Homme);
        c1.waist = Some(92.0);
        let mut c2 = Observation::new("C", 2020);
        c2.waist = Some(99.0);
        rows.push(c1);
        rows.push(c2);
        // both
        let mut d1 = pompes("D", 2019, 50.0);
        d1.bmi = Some(29.0);
        let mut d2 = pompes("D", 2023, 20.0);
        d2.bmi = Some(31.0);
        rows.push(d1);
        rows.push(d2);
        Table::new(rows)
    }

    #[test]
    fn flags_only_employees_with_alerts() {
        let summaries = run(&table(), &Config::default());
        let ids: Vec<&str> = summaries.iter().map(|s| s.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C", "D"]);
    }

    #[test]
    fn categories_are_counted_and_joined() {
        let summaries = run(&table(), &Config::default());
        assert_eq!(summaries[0].categories, "Tests physiques");
        assert_eq!(summaries[0].category_count, 1);
        assert_eq!(summaries[1].categories, "Santé");
        assert_eq!(summaries[2].categories, "Santé, Tests physiques");
        assert_eq!(summaries[2].category_count, 2);
    }

    #[test]
    fn mild_details_without_alert_do_not_flag() {
        let rows = vec![pompes("E", 2019, 100.0), pompes("E", 2020, 85.0)];
        assert!(run(&Table::new(rows), &Config::default()).is_empty());
    }

    #[test]
    fn order_follows_table_not_severity() {
        let rows = vec![
            pompes("Z", 2019, 100.0),
            pompes("Y", 2019, 100.0),
            pompes("Z", 2020, 50.0),
            pompes("Y", 2020, 10.0),
        ];
        let ids: Vec<String> = run(&Table::new(rows), &Config::default())
            .into_iter()
            .map(|s| s.employee_id)
            .collect();
        assert_eq!(ids, vec!["Z", "Y"]);
    }

    #[test]
    fn scan_is_idempotent() {
        let t = table();
        let config = Config::default();
        assert_eq!(run(&t, &config), run(&t, &config));
    }

    #[test]
    fn empty_table_yields_nothing() {
        assert!(run(&Table::default(), &Config::default()).is_empty());
    }
}
