use serde::Serialize;
use tracing::debug;

use crate::battery::TestKind;
use crate::state::{Observation, YearWindow};
use crate::stats;

/// Drop from the best in-window result to the latest one, for one test.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DeclineRecord {
    pub test: TestKind,
    pub max_value: f64,
    pub max_year: i32,
    pub recent_value: f64,
    pub recent_year: i32,
    pub decline_percent: f64,
}

/// Decline records for every test with enough in-window data, in battery order.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct TrendReport {
    pub records: Vec<DeclineRecord>,
}

impl TrendReport {
    /// Raw decline percentages, the classifier's input.
    pub fn percents(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.decline_percent).collect()
    }
}

/// Run the decline analysis over one employee's rows.
pub fn run(rows: &[&Observation], window: YearWindow) -> TrendReport {
    let records = TestKind::ALL
        .iter()
        .filter_map(|&kind| decline_record(rows, kind, window))
        .collect();
    TrendReport { records }
}

/// Decline for a single test, or `None` when the series has fewer than two
/// in-window values or a zero maximum.
pub fn decline_record(
    rows: &[&Observation],
    kind: TestKind,
    window: YearWindow,
) -> Option<DeclineRecord> {
    let mut points = stats::windowed_series(rows, window, |o| o.result(kind));
    if points.len() < 2 {
        debug!(test = kind.label(), points = points.len(), "not enough data");
        return None;
    }

    // First occurrence wins on ties.
    let (max_year, max_value) = points
        .iter()
        .copied()
        .fold(None, |best: Option<(i32, f64)>, (year, v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((year, v)),
        })?;
    if max_value == 0.0 {
        debug!(test = kind.label(), "zero maximum, skipping");
        return None;
    }

    stats::sort_by_year(&mut points);
    let (recent_year, recent_value) = *points.last()?;

    let decline_percent = (max_value - recent_value) / max_value * 100.0;
    debug!(
        test = kind.label(),
        max_value, max_year, recent_value, recent_year, decline_percent, "decline computed"
    );

    Some(DeclineRecord {
        test: kind,
        max_value,
        max_year,
        recent_value,
        recent_year,
        decline_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_for(kind: TestKind, series: &[(i32, Option<f64>)]) -> Vec<Observation> {
        series
            .iter()
            .map(|&(year, v)| {
                let mut o = Observation::new("42", year);
                o.results[kind.index()] = v;
                o
            })
            .collect()
    }

    fn record(kind: TestKind, series: &[(i32, Option<f64>)]) -> Option<DeclineRecord> {
        let rows = rows_for(kind, series);
        let refs: Vec<&Observation> = rows.iter().collect();
        decline_record(&refs, kind, YearWindow::default())
    }

    #[test]
    fn forty_percent_decline() {
        let r = record(
            TestKind::Pompes,
            &[(2019, Some(100.0)), (2020, Some(95.0)), (2021, Some(60.0))],
        )
        .unwrap();
        assert_eq!(r.max_value, 100.0);
        assert_eq!(r.max_year, 2019);
        assert_eq!(r.recent_value, 60.0);
        assert_eq!(r.recent_year, 2021);
        assert!((r.decline_percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn most_recent_is_by_year_not_row_order() {
        let r = record(
            TestKind::Killy,
            &[(2022, Some(50.0)), (2019, Some(80.0)), (2020, Some(70.0))],
        )
        .unwrap();
        assert_eq!(r.recent_year, 2022);
        assert_eq!(r.recent_value, 50.0);
        assert_eq!(r.max_year, 2019);
    }

    #[test]
    fn first_maximum_wins_ties() {
        let r = record(
            TestKind::Gainage,
            &[(2020, Some(90.0)), (2021, Some(90.0)), (2023, Some(45.0))],
        )
        .unwrap();
        assert_eq!(r.max_year, 2020);
        assert!((r.decline_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn improvement_is_zero_decline() {
        let r = record(TestKind::Souplesse, &[(2019, Some(10.0)), (2020, Some(20.0))]).unwrap();
        assert_eq!(r.decline_percent, 0.0);
    }

    #[test]
    fn fewer_than_two_in_window_points_yields_nothing() {
        assert!(record(TestKind::Pompes, &[(2020, Some(40.0))]).is_none());
        assert!(record(
            TestKind::Pompes,
            &[(2017, Some(90.0)), (2018, Some(80.0)), (2020, Some(40.0))]
        )
        .is_none());
        assert!(record(TestKind::Pompes, &[(2020, Some(40.0)), (2021, None)]).is_none());
    }

    #[test]
    fn out_of_window_years_are_ignored() {
        let r = record(
            TestKind::LucLeger,
            &[(2018, Some(200.0)), (2019, Some(10.0)), (2025, Some(1.0)), (2024, Some(8.0))],
        )
        .unwrap();
        assert_eq!(r.max_value, 10.0);
        assert_eq!(r.recent_year, 2024);
        assert!((r.decline_percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn zero_maximum_is_skipped() {
        assert!(record(TestKind::Tractions, &[(2019, Some(0.0)), (2020, Some(0.0))]).is_none());
    }

    #[test]
    fn decline_is_bounded_for_non_negative_values() {
        let series = [
            [5.0, 3.0, 0.0],
            [1.0, 1.0, 1.0],
            [0.5, 9.0, 4.5],
            [12.0, 0.0, 12.0],
        ];
        for values in series {
            let input: Vec<(i32, Option<f64>)> = values
                .iter()
                .enumerate()
                .map(|(i, &v)| (2019 + i as i32, Some(v)))
                .collect();
            let r = record(TestKind::Pompes, &input).unwrap();
            assert!((0.0..=100.0).contains(&r.decline_percent), "{values:?}");
        }
    }

    #[test]
    fn run_collects_all_tests_with_data() {
        let mut a = Observation::new("7", 2019);
        a.results[TestKind::Pompes.index()] = Some(40.0);
        a.results[TestKind::Killy.index()] = Some(100.0);
        let mut b = Observation::new("7", 2020);
        b.results[TestKind::Pompes.index()] = Some(30.0);
        b.results[TestKind::Killy.index()] = Some(90.0);
        let refs = vec![&a, &b];
        let report = run(&refs, YearWindow::default());
        let tests: Vec<TestKind> = report.records.iter().map(|r| r.test).collect();
        assert_eq!(tests, vec![TestKind::Killy, TestKind::Pompes]);
        let pct = report.percents();
        assert!((pct[0] - 10.0).abs() < 1e-9);
        assert!((pct[1] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let rows = rows_for(TestKind::Pompes, &[(2019, Some(30.0)), (2021, Some(20.0))]);
        let refs: Vec<&Observation> = rows.iter().collect();
        assert_eq!(
            run(&refs, YearWindow::default()),
            run(&refs, YearWindow::default())
        );
    }
}
