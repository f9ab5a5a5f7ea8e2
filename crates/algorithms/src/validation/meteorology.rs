//! Precipitation anomaly scoring

use crate::hazard::HazardKind;

/// Anomaly score in `[0, 100]` for an event rainfall sum against a baseline
/// daily mean.
///
/// Floods are corroborated by excess rain (`(ratio - 1) * 100`), wildfires by
/// a deficit (`(1 - ratio) * 100`). Roof damage has no meteorological
/// covariate and yields `None`. With a non-positive baseline any event rain
/// scores 100 for flood and everything else scores 0.
pub fn precipitation_anomaly(hazard: HazardKind, event_sum: f64, baseline_mean: f64) -> Option<f64> {
    let event_sum = if event_sum.is_finite() { event_sum } else { 0.0 };
    let baseline_mean = if baseline_mean.is_finite() { baseline_mean } else { 0.0 };

    let wet = match hazard {
        HazardKind::Flood => true,
        HazardKind::Wildfire => false,
        HazardKind::Roof => return None,
    };
    if baseline_mean <= 0.0 {
        return Some(if wet && event_sum > 0.0 { 100.0 } else { 0.0 });
    }

    let ratio = event_sum / baseline_mean;
    let score = if wet { (ratio - 1.0) * 100.0 } else { (1.0 - ratio) * 100.0 };
    Some(score.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flood_excess_rain() {
        // 9 mm over the event vs 6 mm/day baseline: ratio 1.5
        assert_relative_eq!(precipitation_anomaly(HazardKind::Flood, 9.0, 6.0).unwrap(), 50.0);
        assert_eq!(precipitation_anomaly(HazardKind::Flood, 40.0, 2.0), Some(100.0));
        assert_eq!(precipitation_anomaly(HazardKind::Flood, 1.0, 2.0), Some(0.0));
    }

    #[test]
    fn test_wildfire_deficit() {
        assert_relative_eq!(precipitation_anomaly(HazardKind::Wildfire, 0.5, 2.0).unwrap(), 75.0);
        assert_eq!(precipitation_anomaly(HazardKind::Wildfire, 5.0, 2.0), Some(0.0));
    }

    #[test]
    fn test_zero_baseline() {
        assert_eq!(precipitation_anomaly(HazardKind::Flood, 3.0, 0.0), Some(100.0));
        assert_eq!(precipitation_anomaly(HazardKind::Flood, 0.0, 0.0), Some(0.0));
        assert_eq!(precipitation_anomaly(HazardKind::Wildfire, 3.0, 0.0), Some(0.0));
    }

    #[test]
    fn test_roof_has_no_covariate() {
        assert_eq!(precipitation_anomaly(HazardKind::Roof, 10.0, 1.0), None);
    }
}
