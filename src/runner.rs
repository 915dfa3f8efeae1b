//! End-to-end pipelines behind the CLI subcommands: run, aggregate,
//! export.

use tracing::info;

use crate::config::{InterceptConfig, SimulationConfig};
use crate::ephemeris::Planet;
use crate::error::Result;
use crate::lambert::{self, InterceptSolution};
use crate::models::elements::CometaryElements;
use crate::models::observed::ObservedApproach;
use crate::report::{csv_export, plots, summary};
use crate::simulation;
use crate::stats::AggregateStatistics;

/// Run the full Monte Carlo pipeline: batch, aggregate, export CSVs,
/// histograms, and reports into `config.output_dir`.
pub fn run_montecarlo(config: &SimulationConfig) -> Result<AggregateStatistics> {
    config.validate()?;
    std::fs::create_dir_all(&config.output_dir)?;

    let elements = CometaryElements::atlas_3i();
    let observed = if config.recompute_observed {
        info!("recomputing observed minima from the orbital elements");
        ObservedApproach::from_elements(
            &elements,
            &config.joint_planets,
            config.half_width_days,
            config.step_days,
        )
    } else {
        ObservedApproach::atlas_3i()
    };

    let trials = simulation::run_batch(config, &elements)?;
    let stats = AggregateStatistics::from_trials(
        &trials,
        &observed,
        &config.joint_planets,
        &config.thresholds_mkm,
        config.reference_threshold_mkm,
    )?;

    csv_export::write_min_distances(
        &config
            .output_dir
            .join("montecarlo_simulation_min_distances.csv"),
        &trials,
    )?;
    csv_export::write_hit_events(
        &config.output_dir.join("montecarlo_orbit_simulation_hits.csv"),
        &trials,
        &config.thresholds_mkm,
    )?;
    plots::plot_hits_per_planet(&config.output_dir.join("hits_per_planet.png"), &stats)?;
    plots::plot_hits_per_trial(&config.output_dir.join("hits_per_simulation.png"), &stats)?;
    summary::write_results_markdown(&config.output_dir.join("RESULTS.md"), config, &stats)?;
    summary::write_summary_json(&config.output_dir.join("summary.json"), &stats)?;

    info!(
        joint_p = %stats.joint_p,
        output_dir = %config.output_dir.display(),
        "Monte Carlo pipeline finished"
    );
    Ok(stats)
}

/// Run the intercept study: scan for the cheapest Jupiter transfer,
/// build the trajectory comparison, and write the CSV and report.
pub fn run_intercept(config: &InterceptConfig) -> Result<InterceptSolution> {
    config.validate()?;
    std::fs::create_dir_all(&config.output_dir)?;

    let elements = CometaryElements::atlas_3i();
    let solution = lambert::scan_intercept(config, &elements, Planet::Jupiter)?;
    let rows = lambert::comparison_table(config, &elements, &solution)?;

    csv_export::write_trajectory_comparison(
        &config
            .output_dir
            .join(format!("trajectory_comparison_{}.csv", config.scenario)),
        &rows,
    )?;
    plots::plot_speed_comparison(
        &config
            .output_dir
            .join(format!("speed_difference_{}.png", config.scenario)),
        &rows,
    )?;
    summary::write_intercept_report(
        &config
            .output_dir
            .join(format!("INTERCEPT_{}.md", config.scenario)),
        config,
        &solution,
        &rows,
    )?;

    info!(
        delta_v_km_s = solution.delta_v_km_s(),
        transfer_days = solution.transfer_days,
        output_dir = %config.output_dir.display(),
        "intercept pipeline finished"
    );
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_montecarlo_pipeline_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimulationConfig {
            trials: 6,
            half_width_days: 100.0,
            step_days: 20.0,
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let stats = run_montecarlo(&config).unwrap();
        assert_eq!(stats.trials, 6);

        for name in [
            "montecarlo_simulation_min_distances.csv",
            "montecarlo_orbit_simulation_hits.csv",
            "hits_per_planet.png",
            "hits_per_simulation.png",
            "RESULTS.md",
            "summary.json",
        ] {
            assert!(dir.path().join(name).exists(), "missing artifact {}", name);
        }
    }

    #[test]
    fn test_intercept_pipeline_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = InterceptConfig::today();
        config.min_transfer_days = 100;
        config.max_transfer_days = 500;
        config.scan_step_days = 100;
        config.table_step_days = 50;
        config.output_dir = dir.path().to_path_buf();

        let solution = run_intercept(&config).unwrap();
        assert!(solution.delta_v_km_s() > 0.0);
        assert!(dir.path().join("trajectory_comparison_today.csv").exists());
        assert!(dir.path().join("speed_difference_today.png").exists());
        assert!(dir.path().join("INTERCEPT_today.md").exists());
    }
}
