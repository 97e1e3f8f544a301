use tracing::debug;

use crate::{
    config::SelectionStrategy,
    error::Result,
    traits::TargetSelector,
    types::{Candidate, Target},
};

/// Largest candidates first, by bounding box area
#[derive(Debug, Clone)]
pub struct RankTopN {
    pub max_targets: usize,
}

impl Default for RankTopN {
    fn default() -> Self {
        Self {
            max_targets: SelectionStrategy::DEFAULT_MAX_TARGETS,
        }
    }
}

impl TargetSelector for RankTopN {
    fn select(&self, accepted: &[Candidate]) -> Result<Vec<Target>> {
        let mut ranked: Vec<&Candidate> = accepted.iter().collect();
        // Stable: equal areas keep discovery order
        ranked.sort_by(|a, b| b.area().total_cmp(&a.area()));

        debug!("Total number of targets: {}", ranked.len());

        Ok(ranked
            .into_iter()
            .take(self.max_targets)
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "rank_top_n"
    }
}

/// Finds two candidates stacked on top of each other and reports the taller
/// one.
///
/// "Top" is whichever of the two has the larger `centroid_y`. That is the
/// literal comparison the tuned thresholds were built against, whatever the
/// y-axis direction of the source image.
#[derive(Debug, Clone)]
pub struct PairMatch {
    /// Pairs must be strictly closer than this horizontally
    pub max_offset_x: f64,
}

impl Default for PairMatch {
    fn default() -> Self {
        Self {
            max_offset_x: SelectionStrategy::DEFAULT_MAX_OFFSET_X,
        }
    }
}

impl TargetSelector for PairMatch {
    fn select(&self, accepted: &[Candidate]) -> Result<Vec<Target>> {
        for (i, first) in accepted.iter().enumerate() {
            for (j, second) in accepted.iter().enumerate() {
                if i == j || (first.centroid_x - second.centroid_x).abs() >= self.max_offset_x {
                    continue;
                }

                let (top, bottom) = if first.centroid_y > second.centroid_y {
                    (first, second)
                } else {
                    (second, first)
                };

                if top.height > bottom.height {
                    debug!(
                        "Matched pair {} / {}: top at {:.2}, {:.2}",
                        i, j, top.centroid_x, top.centroid_y
                    );
                    return Ok(vec![top.clone()]);
                }
            }
        }

        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "pair_match"
    }
}

impl SelectionStrategy {
    /// Instantiate the selector this strategy describes
    pub fn selector(&self) -> Box<dyn TargetSelector> {
        match *self {
            Self::RankTopN { max_targets } => Box::new(RankTopN { max_targets }),
            Self::PairMatch { max_offset_x } => Box::new(PairMatch { max_offset_x }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(centroid_x: f64, centroid_y: f64, width: f64, height: f64) -> Candidate {
        Candidate {
            centroid_x,
            centroid_y,
            width,
            height,
            points: Vec::new(),
            contour_area: 0.6 * width * height,
            fullness: 0.6,
        }
    }

    #[test]
    fn test_rank_sorts_by_area_and_truncates() {
        let accepted: Vec<Candidate> = (1..=8)
            .map(|i| candidate(i as f64 * 20.0, 50.0, 10.0 + i as f64, 10.0))
            .collect();

        let targets = RankTopN::default().select(&accepted).unwrap();

        assert_eq!(targets.len(), 6);
        let areas: Vec<f64> = targets.iter().map(Candidate::area).collect();
        assert!(areas.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(targets[0].width, 18.0);
    }

    #[test]
    fn test_rank_keeps_everything_below_limit() {
        let accepted = vec![candidate(0.0, 0.0, 10.0, 10.0), candidate(0.0, 0.0, 30.0, 30.0)];
        let targets = RankTopN::default().select(&accepted).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].width, 30.0);
    }

    #[test]
    fn test_rank_ties_keep_discovery_order() {
        let accepted = vec![
            candidate(1.0, 0.0, 20.0, 10.0),
            candidate(2.0, 0.0, 10.0, 20.0),
            candidate(3.0, 0.0, 40.0, 40.0),
            candidate(4.0, 0.0, 25.0, 8.0),
        ];

        let targets = RankTopN::default().select(&accepted).unwrap();
        let order: Vec<f64> = targets.iter().map(|t| t.centroid_x).collect();
        assert_eq!(order, vec![3.0, 1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_pair_match_picks_taller_top() {
        let accepted = vec![
            candidate(100.0, 40.0, 60.0, 12.0),
            candidate(105.0, 80.0, 60.0, 20.0),
        ];

        let targets = PairMatch::default().select(&accepted).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].centroid_y, 80.0);
    }

    #[test]
    fn test_pair_match_requires_top_to_be_taller() {
        let accepted = vec![
            candidate(100.0, 40.0, 60.0, 20.0),
            candidate(105.0, 80.0, 60.0, 12.0),
        ];
        assert!(PairMatch::default().select(&accepted).unwrap().is_empty());
    }

    #[test]
    fn test_pair_match_horizontal_tolerance_is_exclusive() {
        let accepted = vec![
            candidate(100.0, 40.0, 60.0, 12.0),
            candidate(110.0, 80.0, 60.0, 20.0),
        ];
        assert!(PairMatch::default().select(&accepted).unwrap().is_empty());

        let far_apart = vec![
            candidate(0.0, 40.0, 60.0, 12.0),
            candidate(200.0, 80.0, 60.0, 20.0),
        ];
        assert!(PairMatch::default().select(&far_apart).unwrap().is_empty());
    }

    #[test]
    fn test_pair_match_first_pair_wins() {
        let accepted = vec![
            candidate(50.0, 30.0, 40.0, 10.0),
            candidate(52.0, 60.0, 40.0, 15.0),
            candidate(200.0, 30.0, 40.0, 10.0),
            candidate(201.0, 90.0, 40.0, 30.0),
        ];

        let targets = PairMatch::default().select(&accepted).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].centroid_x, 52.0);
    }

    #[test]
    fn test_single_candidate_never_pairs() {
        let accepted = vec![candidate(50.0, 30.0, 40.0, 10.0)];
        assert!(PairMatch::default().select(&accepted).unwrap().is_empty());
        assert!(PairMatch::default().select(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_strategy_builds_matching_selector() {
        assert_eq!(SelectionStrategy::rank_top_n().selector().name(), "rank_top_n");
        assert_eq!(SelectionStrategy::pair_match().selector().name(), "pair_match");

        let top_two = SelectionStrategy::RankTopN { max_targets: 2 }.selector();
        let accepted: Vec<Candidate> = (0..5).map(|i| candidate(0.0, 0.0, 10.0 + i as f64, 10.0)).collect();
        assert_eq!(top_two.select(&accepted).unwrap().len(), 2);
    }
}
