use std::collections::BTreeMap;

use crate::state::{Observation, YearWindow};

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Extract (year, value) pairs for rows inside `window`, skipping missing
/// values. Table order is preserved.
pub fn windowed_series<F>(rows: &[&Observation], window: YearWindow, value: F) -> Vec<(i32, f64)>
where
    F: Fn(&Observation) -> Option<f64>,
{
    rows.iter()
        .filter(|o| window.contains(o.year))
        .filter_map(|&o| value(o).map(|v| (o.year, v)))
        .collect()
}

/// Stable sort by year: rows sharing a year keep their table order.
pub fn sort_by_year(points: &mut [(i32, f64)]) {
    points.sort_by_key(|&(year, _)| year);
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean value per year, ascending by year. Years with no value are absent.
pub fn yearly_mean<F>(rows: &[&Observation], value: F) -> Vec<(i32, f64)>
where
    F: Fn(&Observation) -> Option<f64>,
{
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let Some(v) = value(*row) {
            by_year.entry(row.year).or_default().push(v);
        }
    }
    by_year
        .into_iter()
        .filter_map(|(year, values)| mean(&values).map(|m| (year, m)))
        .collect()
}

/// Generate a sparkline string from a series of values.
/// Maps values to Unicode block elements: ▁▂▃▄▅▆▇█
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let sampled: Vec<f64> = if values.len() > width && width > 1 {
        (0..width)
            .map(|i| {
                let idx = i * (values.len() - 1) / (width - 1);
                values[idx]
            })
            .collect()
    } else {
        values.to_vec()
    };

    let min = sampled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    sampled
        .iter()
        .map(|&v| {
            if range == 0.0 {
                BLOCKS[3]
            } else {
                let normalized = ((v - min) / range * 7.0).round() as usize;
                BLOCKS[normalized.min(7)]
            }
        })
        .collect()
}
