use crate::core::body::Body;

/// Source of candidate body pairs for the narrow phase.
///
/// Pairs are index pairs `(i, j)` with `i < j` into the ordered body slice.
pub trait PairSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fills `pairs` with every candidate pair for this step.
    fn collect_pairs(&mut self, bodies: &[Body], pairs: &mut Vec<(usize, usize)>);
}

/// Every unordered pair, in slice order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustivePairs;

impl ExhaustivePairs {
    pub fn new() -> Self {
        Self
    }
}

impl PairSource for ExhaustivePairs {
    fn name(&self) -> &str {
        "exhaustive"
    }

    fn collect_pairs(&mut self, bodies: &[Body], pairs: &mut Vec<(usize, usize)>) {
        pairs.clear();
        let n = bodies.len();
        pairs.reserve(n.saturating_sub(1) * n / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::body::BodyOptions, utils::math::Vector2};

    fn ball_at(x: f64) -> Body {
        Body::circle(Vector2::new(x, 0.0), 1.0, BodyOptions::dynamic()).unwrap()
    }

    #[test]
    fn exhaustive_yields_every_unordered_pair() {
        let bodies: Vec<_> = (0..4).map(|i| ball_at(i as f64 * 10.0)).collect();
        let mut pairs = Vec::new();
        ExhaustivePairs.collect_pairs(&bodies, &mut pairs);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], (0, 1));
        assert_eq!(pairs[5], (2, 3));
    }
}
