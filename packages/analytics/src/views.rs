//! Ranking helpers for the dashboard pages.

use std::cmp::Ordering;

use fire_risk_analytics_models::{CauseHumanCost, HumanCostMetric, VehicleResponse};

/// The first `n` dwelling types by mean attending vehicles.
///
/// Rows arrive ordered highest mean first, so this is a prefix.
#[must_use]
pub fn top_vehicle_response(rows: &[VehicleResponse], n: usize) -> &[VehicleResponse] {
    &rows[..n.min(rows.len())]
}

/// The `n` causes with the highest `metric`, highest first.
///
/// Ties keep their input (cause label) order.
#[must_use]
pub fn rank_human_cost(
    rows: &[CauseHumanCost],
    metric: HumanCostMetric,
    n: usize,
) -> Vec<CauseHumanCost> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| descending(metric.value(a), metric.value(b)));
    ranked.truncate(n);
    ranked
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cause(name: &str, spread: f64, pct: f64, rescues: f64) -> CauseHumanCost {
        CauseHumanCost {
            cause_of_fire: name.to_string(),
            number_of_incidents: 200,
            avg_spread_rank: spread,
            total_incidents_with_casualties: 0,
            pct_chance_of_casualty: pct,
            avg_rescues_per_incident: rescues,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn vehicles(n: usize) -> Vec<VehicleResponse> {
        (0..n)
            .map(|i| VehicleResponse {
                dwelling_type: format!("type {i}"),
                number_of_incidents: 10,
                avg_vehicles: 10.0 - i as f64,
            })
            .collect()
    }

    #[test]
    fn vehicle_prefix_is_clamped() {
        let rows = vehicles(7);
        let top = top_vehicle_response(&rows, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].dwelling_type, "type 0");

        assert_eq!(top_vehicle_response(&rows[..2], 5).len(), 2);
        assert!(top_vehicle_response(&[], 5).is_empty());
    }

    #[test]
    fn ranks_by_selected_metric() {
        let rows = vec![
            cause("A", 1.0, 30.0, 0.5),
            cause("B", 3.0, 10.0, 0.1),
            cause("C", 2.0, 20.0, 0.9),
        ];

        let names = |ranked: Vec<CauseHumanCost>| {
            ranked
                .into_iter()
                .map(|r| r.cause_of_fire)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            names(rank_human_cost(&rows, HumanCostMetric::CasualtyChance, 10)),
            ["A", "C", "B"]
        );
        assert_eq!(
            names(rank_human_cost(&rows, HumanCostMetric::Spread, 2)),
            ["B", "C"]
        );
        assert_eq!(
            names(rank_human_cost(&rows, HumanCostMetric::Rescues, 1)),
            ["C"]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![
            cause("Alpha", 2.0, 5.0, 0.0),
            cause("Beta", 2.0, 5.0, 0.0),
            cause("Gamma", 3.0, 5.0, 0.0),
        ];
        let ranked = rank_human_cost(&rows, HumanCostMetric::Spread, 3);
        assert_eq!(ranked[0].cause_of_fire, "Gamma");
        assert_eq!(ranked[1].cause_of_fire, "Alpha");
        assert_eq!(ranked[2].cause_of_fire, "Beta");
    }
}
