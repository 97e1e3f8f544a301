use tracing::debug;

use crate::{
    config::FilterProfile,
    types::{Candidate, FilterOutcome, RejectReason, RejectedCandidate},
};

/// Size, shape and fullness gate. Checks run in that order and stop at the
/// first failure, so a rejected candidate carries exactly one reason.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    pub profile: FilterProfile,
}

impl CandidateFilter {
    pub fn new(profile: FilterProfile) -> Self {
        Self { profile }
    }

    /// Why `candidate` would be rejected, if it would be
    pub fn check(&self, candidate: &Candidate) -> Option<RejectReason> {
        let profile = &self.profile;

        if !profile.width.contains(candidate.width) || !profile.height.contains(candidate.height) {
            debug!(
                "Rejecting target due to size. H: {:.2} | W: {:.2}",
                candidate.height, candidate.width
            );
            return Some(RejectReason::Size);
        }

        let wideness = candidate.wideness();
        if !profile.wideness.contains(wideness) {
            debug!("Rejecting target due to shape: {:.2}", wideness);
            return Some(RejectReason::Shape);
        }

        if !profile.fullness.contains(candidate.fullness) {
            debug!("Rejecting target due to fullness: {:.2}", candidate.fullness);
            return Some(RejectReason::Fullness);
        }

        None
    }

    /// Partition candidates, keeping discovery order on both sides
    pub fn partition(&self, candidates: Vec<Candidate>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for candidate in candidates {
            match self.check(&candidate) {
                Some(reason) => outcome.rejected.push(RejectedCandidate { candidate, reason }),
                None => {
                    debug!(
                        "Found target at {:.2}, {:.2} {:.2}, {:.2}",
                        candidate.centroid_x, candidate.centroid_y, candidate.width, candidate.height
                    );
                    outcome.accepted.push(candidate);
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(width: f64, height: f64, fullness: f64) -> Candidate {
        Candidate {
            centroid_x: width / 2.0,
            centroid_y: height,
            width,
            height,
            points: vec![[0, 0], [width as i32, 0], [width as i32, height as i32], [0, height as i32]],
            contour_area: fullness * width * height,
            fullness,
        }
    }

    #[test]
    fn test_fullness_bounds_are_inclusive() {
        for profile in [FilterProfile::GENERAL, FilterProfile::PAIRED] {
            let filter = CandidateFilter::new(profile);
            assert_eq!(filter.check(&candidate(40.0, 20.0, 0.45)), None);
            assert_eq!(filter.check(&candidate(40.0, 20.0, 0.95)), None);
            assert_eq!(filter.check(&candidate(40.0, 20.0, 0.44)), Some(RejectReason::Fullness));
            assert_eq!(filter.check(&candidate(40.0, 20.0, 0.96)), Some(RejectReason::Fullness));
        }
    }

    #[test]
    fn test_solid_shapes_always_rejected() {
        for profile in [FilterProfile::GENERAL, FilterProfile::PAIRED] {
            let filter = CandidateFilter::new(profile);
            assert_eq!(filter.check(&candidate(40.0, 20.0, 1.0)), Some(RejectReason::Fullness));
        }
    }

    #[test]
    fn test_size_bounds() {
        let filter = CandidateFilter::new(FilterProfile::GENERAL);
        assert_eq!(filter.check(&candidate(10.0, 10.0, 0.6)), None);
        assert_eq!(filter.check(&candidate(300.0, 300.0, 0.6)), None);
        assert_eq!(filter.check(&candidate(9.0, 20.0, 0.6)), Some(RejectReason::Size));
        assert_eq!(filter.check(&candidate(20.0, 301.0, 0.6)), Some(RejectReason::Size));

        let paired = CandidateFilter::new(FilterProfile::PAIRED);
        assert_eq!(paired.check(&candidate(19.0, 10.0, 0.6)), Some(RejectReason::Size));
        assert_eq!(paired.check(&candidate(200.0, 101.0, 0.6)), Some(RejectReason::Size));
    }

    #[test]
    fn test_shape_bounds() {
        let general = CandidateFilter::new(FilterProfile::GENERAL);
        assert_eq!(general.check(&candidate(30.0, 10.0, 0.6)), None);
        assert_eq!(general.check(&candidate(40.0, 10.0, 0.6)), Some(RejectReason::Shape));
        assert_eq!(general.check(&candidate(10.0, 50.0, 0.6)), Some(RejectReason::Shape));

        let paired = CandidateFilter::new(FilterProfile::PAIRED);
        assert_eq!(paired.check(&candidate(70.0, 10.0, 0.6)), None);
        assert_eq!(paired.check(&candidate(20.0, 20.0, 0.6)), Some(RejectReason::Shape));
    }

    #[test]
    fn test_checks_short_circuit() {
        // Too small, badly shaped and solid: only the size failure is reported
        let filter = CandidateFilter::new(FilterProfile::GENERAL);
        assert_eq!(filter.check(&candidate(5.0, 50.0, 1.0)), Some(RejectReason::Size));
        assert_eq!(filter.check(&candidate(100.0, 20.0, 1.0)), Some(RejectReason::Shape));
    }

    #[test]
    fn test_partition_keeps_order() {
        let filter = CandidateFilter::new(FilterProfile::GENERAL);
        let outcome = filter.partition(vec![
            candidate(20.0, 20.0, 0.7),
            candidate(5.0, 5.0, 0.7),
            candidate(50.0, 50.0, 0.5),
            candidate(30.0, 30.0, 1.0),
        ]);

        let accepted: Vec<f64> = outcome.accepted.iter().map(|c| c.width).collect();
        assert_eq!(accepted, vec![20.0, 50.0]);

        let rejected: Vec<(f64, RejectReason)> = outcome
            .rejected
            .iter()
            .map(|r| (r.candidate.width, r.reason))
            .collect();
        assert_eq!(rejected, vec![(5.0, RejectReason::Size), (30.0, RejectReason::Fullness)]);
    }
}
