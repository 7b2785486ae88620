//! # rbm-viz
//!
//! SVG figures for a training run:
//!
//! - [`plot_log_likelihood`]: per-step log-likelihood with epoch separators
//! - [`plot_learned_distribution`]: learned `p(v)` after each epoch against
//!   the target, on a logarithmic axis
//!
//! Figures are drawn without text so no font backend is needed; series
//! colours follow [`series_color`].

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

const SIZE: (u32, u32) = (800, 600);
const MARGIN: u32 = 20;

const PALETTE: [RGBColor; 6] = [BLUE, RED, GREEN, MAGENTA, CYAN, RGBColor(255, 140, 0)];

/// Colour of the `idx`-th series (epoch `idx` in both plots).
pub fn series_color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// Padded `(min, max)` over finite values.
fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return None;
    }
    let pad = if hi > lo { 0.05 * (hi - lo) } else { 0.5 };
    Some((lo - pad, hi + pad))
}

/// Scatter of `trace[t]` against step `t`.
///
/// `epoch_starts` are the global steps where epochs begin; a vertical line is
/// drawn at each one after the first. Points are coloured by epoch.
pub fn plot_log_likelihood(path: &Path, trace: &[f64], epoch_starts: &[usize]) -> Result<()> {
    let (y_lo, y_hi) =
        padded_range(trace.iter().copied()).context("log-likelihood trace has no finite values")?;
    let x_hi = trace.len().max(1) as f64;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .build_cartesian_2d(-0.5f64..x_hi, y_lo..y_hi)?;

    let epoch_of = |t: usize| epoch_starts.iter().filter(|&&s| s <= t).count().saturating_sub(1);
    chart.draw_series(
        trace
            .iter()
            .enumerate()
            .filter(|(_, ll)| ll.is_finite())
            .map(|(t, &ll)| Circle::new((t as f64, ll), 3, series_color(epoch_of(t)).filled())),
    )?;

    for &start in epoch_starts.iter().filter(|&&s| s > 0 && s < trace.len()) {
        let x = start as f64 - 0.5;
        chart.draw_series(LineSeries::new(vec![(x, y_lo), (x, y_hi)], BLACK.stroke_width(1)))?;
    }

    chart.plotting_area().draw(&Rectangle::new(
        [(-0.5, y_lo), (x_hi, y_hi)],
        BLACK.stroke_width(1),
    ))?;
    root.present()
        .with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!(path = %path.display(), points = trace.len(), "log-likelihood plot written");
    Ok(())
}

/// One line per learned distribution plus the target (black, drawn last),
/// with configurations on the x axis in canonical order and probability on a
/// logarithmic y axis.
pub fn plot_learned_distribution(path: &Path, learned: &[Vec<f64>], target: &[f64]) -> Result<()> {
    anyhow::ensure!(!target.is_empty(), "target distribution is empty");
    anyhow::ensure!(
        learned.iter().all(|row| row.len() == target.len()),
        "learned distributions must have {} entries",
        target.len()
    );

    let all = || learned.iter().flatten().chain(target.iter()).copied();
    let y_lo = all()
        .filter(|p| *p > 0.0 && p.is_finite())
        .fold(f64::INFINITY, f64::min);
    let y_hi = all().filter(|p| p.is_finite()).fold(0.0, f64::max);
    anyhow::ensure!(y_lo.is_finite() && y_hi > 0.0, "no positive probabilities to plot");
    let (y_lo, y_hi) = (y_lo * 0.5, y_hi * 2.0);
    let clamp = |p: f64| if p > y_lo { p } else { y_lo };
    let x_hi = (target.len() - 1).max(1) as f64;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .build_cartesian_2d(0f64..x_hi, (y_lo..y_hi).log_scale())?;

    for (idx, row) in learned.iter().enumerate() {
        chart.draw_series(LineSeries::new(
            row.iter().enumerate().map(|(x, &p)| (x as f64, clamp(p))),
            series_color(idx).stroke_width(2),
        ))?;
    }
    chart.draw_series(LineSeries::new(
        target.iter().enumerate().map(|(x, &p)| (x as f64, clamp(p))),
        BLACK.stroke_width(3),
    ))?;

    chart.plotting_area().draw(&Rectangle::new(
        [(0.0, y_lo), (x_hi, y_hi)],
        BLACK.stroke_width(1),
    ))?;
    root.present()
        .with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!(path = %path.display(), curves = learned.len() + 1, "distribution plot written");
    Ok(())
}
