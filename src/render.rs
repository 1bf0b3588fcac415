use std::fmt::Write;

use owo_colors::{OwoColorize, Style};
use supports_color::Stream;

use crate::dashboard::{Dashboard, SeriesChart, TestChart};
use crate::scan::AlertSummary;
use crate::state::Tier;
use crate::stats;

const SPARK_WIDTH: usize = 12;

/// Terminal styles. Every style is plain when stdout has no color support.
#[derive(Clone, Copy)]
pub struct Palette {
    pub bold: Style,
    pub dim: Style,
    pub green: Style,
    pub yellow: Style,
    pub red: Style,
}

impl Palette {
    pub fn detect() -> Palette {
        if supports_color::on(Stream::Stdout).is_some() {
            Palette::colored()
        } else {
            Palette::plain()
        }
    }

    pub fn colored() -> Palette {
        Palette {
            bold: Style::new().bold(),
            dim: Style::new().dimmed(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    pub fn plain() -> Palette {
        Palette {
            bold: Style::new(),
            dim: Style::new(),
            green: Style::new(),
            yellow: Style::new(),
            red: Style::new(),
        }
    }

    fn tier(&self, tier: Tier) -> Style {
        match tier {
            Tier::Level1 => self.red,
            Tier::Level2 => self.yellow,
            Tier::Level3 => self.green,
            Tier::Untiered => self.dim,
        }
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

pub fn dashboard(d: &Dashboard, p: &Palette) -> String {
    let mut out = String::new();
    let demo = &d.demographics;

    let _ = writeln!(
        out,
        "\n{} — matricule {}\n",
        "fitwatch".style(p.bold),
        d.employee_id.style(p.bold)
    );
    let _ = writeln!(out, "  {}", "Agent".style(p.bold));
    let _ = writeln!(out, "    Grade: {} {}", demo.grade, demo.grade_badge.style(p.dim));
    let _ = writeln!(out, "    Catégorie: {}", or_na(demo.category.as_deref()));
    let _ = writeln!(out, "    Localisation: {}", or_na(demo.location.as_deref()));
    let _ = writeln!(out, "    Âge: {}", or_na(demo.age));
    let _ = writeln!(
        out,
        "    Poids: {}  Taille: {}",
        or_na(demo.weight),
        or_na(demo.height)
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", "Tests physiques".style(p.bold));
    if d.charts.is_empty() {
        let _ = writeln!(out, "    {}", "Aucun résultat de test.".style(p.dim));
    }
    for chart in &d.charts {
        out.push_str(&test_line(chart, p));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", "Santé".style(p.bold));
    for chart in [&d.bmi_chart, &d.waist_chart].into_iter().flatten() {
        out.push_str(&series_line(chart, p));
    }
    if d.bmi_chart.is_none() && d.waist_chart.is_none() {
        let _ = writeln!(out, "    {}", "Aucune mesure de santé.".style(p.dim));
    }

    let decline = &d.analysis.decline;
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", "Alertes".style(p.bold));
    if decline.message.is_none() && decline.details.is_empty() && d.health_alerts.is_empty() {
        let _ = writeln!(out, "    {} Aucune alerte", "✓".style(p.green));
    }
    if let Some(msg) = &decline.message {
        let _ = writeln!(out, "    {} {}", "⚠".style(p.red), msg);
    }
    for detail in &decline.details {
        let _ = writeln!(
            out,
            "      {:<12} -{}% (max {} en {}, récent {} en {})",
            detail.test,
            detail.percent,
            detail.max_value,
            detail.max_year,
            detail.recent_value,
            detail.recent_year
        );
    }
    for alert in &d.health_alerts {
        let _ = writeln!(out, "    {} {}", "⚡".style(p.yellow), alert.description);
    }
    let _ = writeln!(out);
    out
}

fn test_line(chart: &TestChart, p: &Palette) -> String {
    let spark = stats::sparkline(&chart.values(), SPARK_WIDTH);
    let points: Vec<String> = chart
        .years()
        .into_iter()
        .zip(chart.values())
        .zip(chart.tiers())
        .map(|((year, value), tier)| format!("{year} {}", format!("●{value}").style(p.tier(tier))))
        .collect();
    format!("    {:<12} {:<width$} {}\n", chart.label, spark, points.join("  "), width = SPARK_WIDTH)
}

fn series_line(chart: &SeriesChart, p: &Palette) -> String {
    let values: Vec<f64> = chart.points.iter().map(|&(_, v)| v).collect();
    let spark = stats::sparkline(&values, SPARK_WIDTH);
    let points: Vec<String> = chart
        .points
        .iter()
        .map(|(year, v)| format!("{year} {v:.1}"))
        .collect();
    format!(
        "    {:<20} {:<width$} {} {}\n",
        chart.label,
        spark,
        points.join("  "),
        chart.unit.style(p.dim),
        width = SPARK_WIDTH
    )
}

pub fn alert_list(summaries: &[AlertSummary], p: &Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{} — agents en alerte\n",
        "fitwatch".style(p.bold)
    );
    if summaries.is_empty() {
        let _ = writeln!(out, "  {} Aucun agent en alerte.\n", "✓".style(p.green));
        return out;
    }
    let _ = writeln!(
        out,
        "  {}",
        format!("{:<12} {:>7}  {}", "Matricule", "Alertes", "Catégories").style(p.bold)
    );
    for s in summaries {
        let count = format!("{:>7}", s.category_count);
        let styled = if s.category_count > 1 { p.red } else { p.yellow };
        let _ = writeln!(out, "  {:<12} {}  {}", s.employee_id, count.style(styled), s.categories);
    }
    let _ = writeln!(out, "\n  {} agent(s) en alerte\n", summaries.len());
    out
}
