//! Candidate ranking across hazards

use super::{ClaimDecision, RankedCandidate};

/// Candidates sorted by fused score, highest first.
///
/// The sort is stable, so equal scores keep evaluation order and sorting an
/// already ranked list changes nothing.
pub fn rank_candidates(decisions: &[ClaimDecision]) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = decisions.iter().map(RankedCandidate::from).collect();
    sort_ranked(&mut ranked);
    ranked
}

/// Stable descending sort by fused score
pub fn sort_ranked(ranked: &mut [RankedCandidate]) {
    ranked.sort_by(|a, b| b.fused_score.total_cmp(&a.fused_score));
}

/// Index of the best decision: highest fused score, first one on ties
pub fn best_index(decisions: &[ClaimDecision]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, decision) in decisions.iter().enumerate() {
        match best {
            Some(b) if decision.fused_score <= decisions[b].fused_score => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::decide_claim;
    use crate::hazard::{HazardKind, HazardResult, Severity};
    use crate::validation::ValidationResult;

    fn decision(hazard: HazardKind, damage_pct: f64, coherence: f64) -> ClaimDecision {
        let result = HazardResult {
            hazard,
            damage_pct,
            severity: Severity::for_burn_or_roof(damage_pct),
        };
        decide_claim(&result, &ValidationResult::from_signals(60.0, 50.0, coherence, None))
    }

    #[test]
    fn test_ranked_descending() {
        let decisions = vec![
            decision(HazardKind::Flood, 20.0, 80.0),
            decision(HazardKind::Wildfire, 90.0, 80.0),
            decision(HazardKind::Roof, 5.0, 0.0),
        ];
        let ranked = rank_candidates(&decisions);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].hazard, HazardKind::Wildfire);
        assert!(ranked.windows(2).all(|w| w[0].fused_score >= w[1].fused_score));
        assert_eq!(best_index(&decisions), Some(1));
    }

    #[test]
    fn test_ties_keep_evaluation_order() {
        let decisions = vec![
            decision(HazardKind::Flood, 40.0, 80.0),
            decision(HazardKind::Wildfire, 40.0, 80.0),
            decision(HazardKind::Roof, 40.0, 80.0),
        ];
        let ranked = rank_candidates(&decisions);
        let order: Vec<_> = ranked.iter().map(|c| c.hazard).collect();
        assert_eq!(order, vec![HazardKind::Flood, HazardKind::Wildfire, HazardKind::Roof]);
        assert_eq!(best_index(&decisions), Some(0));
    }

    #[test]
    fn test_resorting_is_noop() {
        let decisions = vec![
            decision(HazardKind::Roof, 10.0, 20.0),
            decision(HazardKind::Flood, 70.0, 80.0),
            decision(HazardKind::Wildfire, 70.0, 80.0),
        ];
        let ranked = rank_candidates(&decisions);
        let mut again = ranked.clone();
        sort_ranked(&mut again);
        assert_eq!(ranked, again);
    }

    #[test]
    fn test_empty_has_no_best() {
        assert_eq!(best_index(&[]), None);
        assert!(rank_candidates(&[]).is_empty());
    }
}
