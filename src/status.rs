use std::fmt::Write;

use owo_colors::OwoColorize;

use crate::battery::TestKind;
use crate::dataset::Table;
use crate::render::Palette;
use crate::state::Config;

/// Dataset and configuration summary.
pub fn render(table: &Table, config: &Config, p: &Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{} — dataset summary\n", "fitwatch".style(p.bold));

    let _ = writeln!(out, "  {}", "Dataset".style(p.bold));
    let _ = writeln!(out, "    Path: {}", config.dataset_path.display());
    if table.is_empty() {
        let _ = writeln!(out, "    {}", "No observations loaded.".style(p.dim));
    } else {
        let _ = writeln!(out, "    Observations: {}", table.len());
        let _ = writeln!(out, "    Employees: {}", table.employee_ids().len());
        if let Some((first, last)) = table.year_range() {
            let _ = writeln!(out, "    Years: {first}–{last}");
        }
        let _ = writeln!(out, "    Tests with data:");
        for kind in TestKind::ALL {
            let count = table
                .rows()
                .iter()
                .filter(|o| o.result(kind).is_some())
                .count();
            let _ = writeln!(out, "      {:<12} {count}", kind.label());
        }
    }

    let t = &config.decline;
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", "Config".style(p.bold));
    let _ = writeln!(
        out,
        "    Window: {}–{}",
        config.window.start, config.window.end
    );
    let _ = writeln!(
        out,
        "    Decline rules: 1 test ≥ {}%, {} tests ≥ {}%, {} tests ≥ {}%",
        t.severe_pct, t.moderate_count, t.moderate_pct, t.mild_count, t.mild_pct
    );
    let _ = writeln!(
        out,
        "    Waist thresholds: homme {} cm, femme {} cm",
        config.waist.homme, config.waist.femme
    );
    let _ = writeln!(out);
    out
}
