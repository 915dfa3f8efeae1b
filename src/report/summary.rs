//! Human-readable result surfaces: the markdown results report, the
//! console summary table, and the machine-readable JSON summary.

use std::path::Path;

use tabled::{Table, Tabled};

use crate::config::{InterceptConfig, SimulationConfig};
use crate::error::Result;
use crate::lambert::{InterceptSolution, TrajectoryComparisonRow, STANDARD_GRAVITY_M_S2};
use crate::stats::{au_to_mkm, AggregateStatistics};

/// Reference delta-v figures the intercept burn is compared against,
/// in km/s.
const DELTA_V_PROBES: [(&str, f64); 5] = [
    ("Launch to LEO", 9.4),
    ("Earth escape (from LEO)", 3.2),
    ("Voyager 1 (total)", 17.0),
    ("New Horizons (launch C3)", 16.26),
    ("Parker Solar Probe", 15.4),
];

#[derive(Tabled)]
struct PValueRow {
    #[tabled(rename = "Planet")]
    planet: String,
    #[tabled(rename = "Observed (AU)")]
    observed_au: String,
    #[tabled(rename = "Observed (MKM)")]
    observed_mkm: String,
    #[tabled(rename = "p-value")]
    p_value: String,
}

/// Per-planet p-value table for the console, followed by the joint
/// p-value line.
pub fn console_summary(stats: &AggregateStatistics) -> String {
    let rows: Vec<PValueRow> = stats
        .observed_au
        .iter()
        .map(|(planet, &observed)| PValueRow {
            planet: planet.name().to_string(),
            observed_au: format!("{:.4}", observed),
            observed_mkm: format!("{:.1}", au_to_mkm(observed)),
            p_value: stats.individual_p[planet].to_string(),
        })
        .collect();

    let joint_names: Vec<&str> = stats.joint_planets.iter().map(|p| p.name()).collect();
    format!(
        "{}\n\nJoint p-value ({}): {}\n",
        Table::new(rows),
        joint_names.join(" + "),
        stats.joint_p
    )
}

/// Write the markdown results report: methodology, pre-hoc hit
/// statistics, post-hoc p-values, and links to the rendered histograms.
pub fn write_results_markdown(
    path: &Path,
    config: &SimulationConfig,
    stats: &AggregateStatistics,
) -> Result<()> {
    let mut out = String::new();

    out.push_str("# 3I/ATLAS Close-Approach Monte Carlo Results\n\n");
    out.push_str(&format!(
        "{} randomized trials. Each trial keeps the object's orbital \
         elements fixed and redraws only the perihelion-passage epoch, \
         uniformly over JD {:.1} to JD {:.1}. The object is propagated \
         over a window of +-{:.0} days around perihelion at a {:.0}-day \
         step, and the minimum distance to each planet is recorded.\n\n",
        stats.trials,
        config.window_start.value(),
        config.window_end.value(),
        config.half_width_days,
        config.step_days,
    ));
    out.push_str(&format!("RNG seed: {}.\n\n", config.seed));

    out.push_str("## Pre-hoc: hits per planet\n\n");
    out.push_str(&format!(
        "A hit is a minimum distance at or below the threshold. \
         Counts out of {} trials, share in parentheses.\n\n",
        stats.trials
    ));
    out.push_str("| Planet |");
    for t in &stats.thresholds_mkm {
        out.push_str(&format!(" {:.0} MKM |", t));
    }
    out.push('\n');
    out.push_str("|---|");
    for _ in &stats.thresholds_mkm {
        out.push_str("---|");
    }
    out.push('\n');
    for planet in crate::ephemeris::Planet::ALL {
        out.push_str(&format!("| {} |", planet.name()));
        for t_idx in 0..stats.thresholds_mkm.len() {
            out.push_str(&format!(
                " {} ({:.2}%) |",
                stats.hit_count(planet, t_idx),
                100.0 * stats.hit_probability(planet, t_idx)
            ));
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!(
        "## Planets approached per trial ({:.0} MKM)\n\n",
        stats.reference_threshold_mkm
    ));
    out.push_str("| Distinct planets hit | Trials | Share |\n|---|---|---|\n");
    for (k, &count) in stats.hits_per_trial.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {:.4} |\n",
            k,
            count,
            count as f64 / stats.trials as f64
        ));
    }
    out.push('\n');

    out.push_str("### Class probabilities\n\n");
    out.push_str(
        "Probability that a random trial approaches at least k planets \
         within the reference threshold. These are pre-hoc quantities: \
         they do not depend on which planets the real object happened to \
         pass.\n\n",
    );
    out.push_str("| Class | Probability |\n|---|---|\n");
    for k in [3, 4, 5] {
        out.push_str(&format!("| at least {} planets | {} |\n", k, stats.at_least_k(k)));
    }
    out.push('\n');

    out.push_str("## Post-hoc: the observed configuration\n\n");
    out.push_str(
        "One-sided empirical p-values: the fraction of trials whose \
         minimum distance to a planet was at or below the observed one.\n\n",
    );
    out.push_str("| Planet | Observed (AU) | Observed (MKM) | p-value |\n|---|---|---|---|\n");
    for (planet, &observed) in &stats.observed_au {
        out.push_str(&format!(
            "| {} | {:.4} | {:.1} | {} |\n",
            planet.name(),
            observed,
            au_to_mkm(observed),
            stats.individual_p[planet]
        ));
    }
    out.push('\n');

    let joint_names: Vec<&str> = stats.joint_planets.iter().map(|p| p.name()).collect();
    out.push_str(&format!(
        "Joint p-value for {} simultaneously at or below their observed \
         distances, taken from the joint per-trial distribution: **{}**.\n\n",
        joint_names.join(", "),
        stats.joint_p
    ));

    out.push_str("## Figures\n\n");
    out.push_str("![Hits per planet](hits_per_planet.png)\n\n");
    out.push_str("![Planets approached per trial](hits_per_simulation.png)\n");

    std::fs::write(path, out)?;
    Ok(())
}

/// Write the machine-readable aggregate summary.
pub fn write_summary_json(path: &Path, stats: &AggregateStatistics) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, stats)?;
    Ok(())
}

/// Write the intercept study report: the best transfer found, the burn
/// in context of real missions, and what the required acceleration
/// would mean for a loosely bound cometary nucleus.
pub fn write_intercept_report(
    path: &Path,
    config: &InterceptConfig,
    solution: &InterceptSolution,
    rows: &[TrajectoryComparisonRow],
) -> Result<()> {
    let dv = solution.delta_v_km_s();
    let mut out = String::new();

    out.push_str(&format!(
        "# Jupiter Intercept Feasibility ({})\n\n",
        config.scenario
    ));
    out.push_str(&format!(
        "Departure on {}, scanning arrivals {} to {} days out in \
         {}-day steps.\n\n",
        config.start_epoch.to_datetime().format("%Y-%m-%d"),
        config.min_transfer_days,
        config.max_transfer_days,
        config.scan_step_days,
    ));

    out.push_str("## Best transfer\n\n");
    out.push_str(&format!(
        "| Quantity | Value |\n|---|---|\n\
         | Target | {} |\n\
         | Transfer time | {} days |\n\
         | Arrival | {} |\n\
         | Delta-v | {:.2} km/s |\n\n",
        solution.target.name(),
        solution.transfer_days,
        solution.arrival_epoch.to_datetime().format("%Y-%m-%d"),
        dv,
    ));

    out.push_str("## The burn in context\n\n");
    out.push_str("| Maneuver | Delta-v (km/s) | Ratio to this burn |\n|---|---|---|\n");
    for (name, probe_dv) in DELTA_V_PROBES {
        out.push_str(&format!(
            "| {} | {:.2} | {:.2}x |\n",
            name,
            probe_dv,
            dv / probe_dv
        ));
    }
    out.push('\n');

    out.push_str("## Structural integrity\n\n");
    out.push_str(&format!(
        "Spread evenly over the {}-day transfer the burn is a continuous \
         acceleration of {:.3e} m/s^2 ({:.3e} g). Shorter burns scale it \
         up:\n\n",
        solution.transfer_days,
        solution.continuous_acceleration_m_s2(),
        solution.continuous_g_force(),
    ));
    out.push_str("| Burn duration | Acceleration (g) |\n|---|---|\n");
    let dv_m_s = dv * 1000.0;
    for (label, seconds) in [
        ("1 hour", 3_600.0),
        ("1 day", 86_400.0),
        ("10 days", 864_000.0),
        (
            "full transfer",
            solution.transfer_days as f64 * 86_400.0,
        ),
    ] {
        out.push_str(&format!(
            "| {} | {:.3e} |\n",
            label,
            dv_m_s / seconds / STANDARD_GRAVITY_M_S2
        ));
    }
    out.push_str(
        "\nA cometary nucleus is a loosely bound aggregate; sustained \
         accelerations approaching 1 g would exceed its self-gravity and \
         material strength by orders of magnitude, so any burn applied to \
         the whole body has to stay in the milli-g regime or below.\n\n",
    );

    out.push_str("## Trajectory comparison\n\n");
    out.push_str(&format!(
        "{} samples at a {}-day step; full table in \
         `trajectory_comparison_{}.csv`.\n\n",
        rows.len(),
        config.table_step_days,
        config.scenario,
    ));
    out.push_str(&format!(
        "![Speed comparison](speed_difference_{}.png)\n",
        config.scenario
    ));

    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::Planet;
    use crate::models::observed::ObservedApproach;
    use crate::models::time::JulianDate;
    use crate::simulation::TrialResult;

    fn stats() -> AggregateStatistics {
        let trials = vec![
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
        ];
        AggregateStatistics::from_trials(
            &trials,
            &ObservedApproach::atlas_3i(),
            &[Planet::Venus, Planet::Mars, Planet::Jupiter],
            &[25.0, 50.0, 100.0],
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn test_console_summary_lists_joint_planets() {
        let summary = console_summary(&stats());
        assert!(summary.contains("Venus"));
        assert!(summary.contains("Jupiter"));
        assert!(summary.contains("Joint p-value (Venus + Mars + Jupiter)"));
    }

    #[test]
    fn test_markdown_report_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RESULTS.md");
        write_results_markdown(&path, &SimulationConfig::default(), &stats()).unwrap();

        let report = std::fs::read_to_string(&path).unwrap();
        assert!(report.contains("## Pre-hoc: hits per planet"));
        assert!(report.contains("## Post-hoc: the observed configuration"));
        assert!(report.contains("at least 3 planets"));
        assert!(report.contains("hits_per_planet.png"));
        assert!(report.contains("Joint p-value"));
    }

    #[test]
    fn test_summary_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary_json(&path, &stats()).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["trials"], 2);
        assert!(parsed["joint_p"]["matches"].is_number());
    }

    #[test]
    fn test_intercept_report_contents() {
        let solution = InterceptSolution {
            target: Planet::Jupiter,
            departure_epoch: JulianDate::from_calendar(2025, 12, 22).unwrap(),
            arrival_epoch: JulianDate::from_calendar(2026, 10, 1).unwrap(),
            transfer_days: 283,
            r0_au: [1.0, 0.5, 0.1],
            v0_au_day: [0.01, 0.01, 0.0],
            departure_velocity_au_day: [0.02, 0.01, 0.0],
            delta_v_au_day: 0.01,
        };
        let rows = vec![TrajectoryComparisonRow {
            date: "2025-12-22".into(),
            days_from_start: 0,
            observed_dist_au: 1.12,
            intercept_dist_au: 1.12,
            observed_vel_km_s: 30.0,
            intercept_vel_km_s: 35.0,
        }];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("INTERCEPT.md");
        write_intercept_report(&path, &InterceptConfig::today(), &solution, &rows).unwrap();

        let report = std::fs::read_to_string(&path).unwrap();
        assert!(report.contains("Jupiter"));
        assert!(report.contains("283 days"));
        assert!(report.contains("Voyager 1"));
        assert!(report.contains("## Structural integrity"));
        assert!(report.contains("speed_difference_today.png"));
    }
}
