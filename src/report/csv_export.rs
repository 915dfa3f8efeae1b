//! CSV exports of the per-trial and per-hit-event tables.

use std::path::Path;

use crate::ephemeris::Planet;
use crate::error::Result;
use crate::lambert::TrajectoryComparisonRow;
use crate::simulation::TrialResult;
use crate::stats::classify_trial;

/// Write the row-per-trial table of minimum distance per planet (AU).
pub fn write_min_distances(path: &Path, trials: &[TrialResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["trial_id".to_string()];
    header.extend(Planet::ALL.iter().map(|p| p.name().to_string()));
    writer.write_record(&header)?;

    for trial in trials {
        let mut record = vec![trial.trial_id.to_string()];
        record.extend(trial.min_distances_au.iter().map(|d| format!("{:.6}", d)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the row-per-hit-event table: one row for every
/// (trial, planet, threshold) pair that registered a hit.
pub fn write_hit_events(path: &Path, trials: &[TrialResult], thresholds_mkm: &[f64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "simulation_id",
        "planet",
        "min_distance_au",
        "hit_distance_au",
        "hit_distance_mkm",
        "hit",
    ])?;

    for trial in trials {
        for record in classify_trial(trial, thresholds_mkm) {
            if !record.hit {
                continue;
            }
            writer.write_record([
                record.trial_id.to_string(),
                record.planet.name().to_string(),
                format!("{:.6}", record.min_distance_au),
                format!("{:.6}", record.threshold_au),
                format!("{:.0}", record.threshold_mkm),
                record.hit.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write the intercept study's observed-vs-hypothetical trajectory table.
pub fn write_trajectory_comparison(path: &Path, rows: &[TrajectoryComparisonRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "date",
        "days_from_start",
        "observed_dist_au",
        "intercept_dist_au",
        "observed_vel_km_s",
        "intercept_vel_km_s",
    ])?;

    for row in rows {
        writer.write_record([
            row.date.clone(),
            row.days_from_start.to_string(),
            format!("{:.6}", row.observed_dist_au),
            format!("{:.6}", row.intercept_dist_au),
            format!("{:.4}", row.observed_vel_km_s),
            format!("{:.4}", row.intercept_vel_km_s),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::JulianDate;

    fn trials() -> Vec<TrialResult> {
        vec![
            TrialResult {
                trial_id: 0,
                perihelion_epoch: JulianDate::new(2451545.0),
                min_distances_au: [2.0, 0.10, 2.0, 0.10, 0.30, 5.0, 15.0, 25.0],
            },
            TrialResult {
                trial_id: 1,
                perihelion_epoch: JulianDate::new(2451600.0),
                min_distances_au: [2.0, 3.0, 2.0, 3.0, 3.0, 5.0, 15.0, 25.0],
            },
        ]
    }

    #[test]
    fn test_min_distances_table_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("min_distances.csv");
        write_min_distances(&path, &trials()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("trial_id,Mercury,Venus"));
        assert!(lines[1].starts_with("0,2.000000,0.100000"));
    }

    #[test]
    fn test_hit_events_only_contain_hits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hits.csv");
        write_hit_events(&path, &trials(), &[25.0, 50.0, 100.0]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        // Trial 0: Venus/Mars at 0.10 AU hit all three thresholds,
        // Jupiter at 0.30 AU hits 50 and 100 MKM. Trial 1: nothing.
        assert_eq!(lines.len(), 1 + 3 + 3 + 2);
        assert!(lines.iter().skip(1).all(|l| l.ends_with(",true")));
        assert!(lines.iter().skip(1).all(|l| l.starts_with("0,")));
    }

}
