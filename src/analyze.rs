use serde::Serialize;
use tracing::debug;

use crate::classify::{self, DeclineVerdict};
use crate::health::{self, HealthReport};
use crate::state::{Config, Observation};
use crate::trend::{self, TrendReport};

/// Everything derived from one employee's rows. Recomputed on every call.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct EmployeeAnalysis {
    pub trend: TrendReport,
    pub decline: DeclineVerdict,
    pub health: HealthReport,
}

impl EmployeeAnalysis {
    pub fn has_decline_alert(&self) -> bool {
        self.decline.alert.is_some()
    }
}

/// Run trend, classification and health checks over one employee's rows.
pub fn run(rows: &[&Observation], config: &Config) -> EmployeeAnalysis {
    let trend = trend::run(rows, config.window);
    let decline = classify::verdict(&trend, &config.decline);
    let health = health::run(rows, config.window, &config.waist);
    debug!(
        tests = trend.records.len(),
        alert = ?decline.alert,
        indicators = ?health.indicators(),
        "employee analysed"
    );
    EmployeeAnalysis {
        trend,
        decline,
        health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::TestKind;
    use crate::classify::DeclineAlert;
    use crate::health::HealthIndicator;

    fn obs(year: i32, pompes: f64, bmi: f64) -> Observation {
        let mut o = Observation::new("5", year);
        o.results[TestKind::Pompes.index()] = Some(pompes);
        o.bmi = Some(bmi);
        o
    }

    #[test]
    fn combines_decline_and_health() {
        let rows = [obs(2019, 100.0, 24.0), obs(2020, 95.0, 24.5), obs(2021, 60.0, 26.0)];
        let refs: Vec<&Observation> = rows.iter().collect();
        let a = run(&refs, &Config::default());
        assert_eq!(a.decline.alert, Some(DeclineAlert::SingleSevere));
        assert!(a.has_decline_alert());
        assert_eq!(a.decline.details[0].percent, 40.0);
        assert_eq!(a.health.indicators(), vec![HealthIndicator::Bmi]);
    }

    #[test]
    fn no_rows_no_alerts() {
        let a = run(&[], &Config::default());
        assert_eq!(a, EmployeeAnalysis::default());
    }
}
