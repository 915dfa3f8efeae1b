//! Histogram renderings of the aggregate results.

use std::path::Path;

use plotters::prelude::*;

use crate::ephemeris::Planet;
use crate::error::{Result, SimulationError};
use crate::lambert::TrajectoryComparisonRow;
use crate::stats::AggregateStatistics;

fn plot_err(e: impl std::fmt::Display) -> SimulationError {
    SimulationError::Plot(e.to_string())
}

/// Render the hits-per-planet histogram: one group of bars per planet,
/// one bar per threshold.
pub fn plot_hits_per_planet(path: &Path, stats: &AggregateStatistics) -> Result<()> {
    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let max_count = stats
        .hit_counts
        .iter()
        .flat_map(|row| row.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Close approaches per planet ({} trials)", stats.trials),
            ("sans-serif", 24),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..8.0, 0.0..max_count * 1.1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(8)
        .x_label_formatter(&|x: &f64| {
            Planet::ALL
                .get(x.floor() as usize)
                .map(|p| p.name().to_string())
                .unwrap_or_default()
        })
        .y_desc("hitting trials")
        .draw()
        .map_err(plot_err)?;

    let n_thresholds = stats.thresholds_mkm.len();
    let bar_width = 0.8 / n_thresholds as f64;

    for (t_idx, &threshold_mkm) in stats.thresholds_mkm.iter().enumerate() {
        let color = Palette99::pick(t_idx).mix(0.9);
        chart
            .draw_series(Planet::ALL.iter().map(|planet| {
                let count = stats.hit_count(*planet, t_idx) as f64;
                let x0 = planet.index() as f64 + 0.1 + t_idx as f64 * bar_width;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, count)], color.filled())
            }))
            .map_err(plot_err)?
            .label(format!("{:.0} MKM", threshold_mkm))
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render the hits-per-trial histogram: how many distinct planets each
/// trial approached within the reference threshold.
pub fn plot_hits_per_trial(path: &Path, stats: &AggregateStatistics) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let max_count = stats.hits_per_trial.iter().copied().max().unwrap_or(0).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Planets approached per trial at {:.0} MKM",
                stats.reference_threshold_mkm
            ),
            ("sans-serif", 24),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..8.5, 0.0..max_count * 1.1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(9)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .x_desc("distinct planets hit")
        .y_desc("trials")
        .draw()
        .map_err(plot_err)?;

    let color = Palette99::pick(0).mix(0.9);
    chart
        .draw_series(stats.hits_per_trial.iter().enumerate().map(|(k, &count)| {
            let x = k as f64;
            Rectangle::new([(x - 0.35, 0.0), (x + 0.35, count as f64)], color.filled())
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render the heliocentric speed of the observed trajectory against the
/// hypothetical intercept trajectory over the transfer.
pub fn plot_speed_comparison(path: &Path, rows: &[TrajectoryComparisonRow]) -> Result<()> {
    if rows.is_empty() {
        return Err(SimulationError::Plot(
            "no trajectory samples to plot".into(),
        ));
    }

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let max_day = rows.last().map(|r| r.days_from_start).unwrap_or(0).max(1) as f64;
    let mut v_min = f64::INFINITY;
    let mut v_max = f64::NEG_INFINITY;
    for row in rows {
        v_min = v_min.min(row.observed_vel_km_s).min(row.intercept_vel_km_s);
        v_max = v_max.max(row.observed_vel_km_s).max(row.intercept_vel_km_s);
    }

    let mut chart = ChartBuilder::on(&root)
        .caption("Heliocentric speed: observed vs intercept", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_day, v_min * 0.95..v_max * 1.05)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("days from departure")
        .y_desc("speed (km/s)")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            rows.iter()
                .map(|r| (r.days_from_start as f64, r.observed_vel_km_s)),
            &BLUE,
        ))
        .map_err(plot_err)?
        .label("observed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            rows.iter()
                .map(|r| (r.days_from_start as f64, r.intercept_vel_km_s)),
            &RED,
        ))
        .map_err(plot_err)?
        .label("intercept")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
