//! Ranking with average ranks for ties.

/// Ranks of a pooled sample and the sizes of its tie groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    /// 1-based ranks, aligned with the input order.
    pub ranks: Vec<f64>,
    /// Size of every run of equal values longer than one.
    pub ties: Vec<usize>,
}

impl Ranked {
    /// `sum(t^3 - t)` over the tie groups.
    pub fn tie_term(&self) -> f64 {
        self.ties
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }

    pub fn has_ties(&self) -> bool {
        !self.ties.is_empty()
    }
}

/// Assigns average ranks, so tied values share the mean of their positions.
pub fn average_ranks(values: &[f64]) -> Ranked {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut ties = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        if end - start > 1 {
            ties.push(end - start);
        }
        start = end;
    }
    Ranked { ranks, ties }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_values() {
        let ranked = average_ranks(&[30.0, 10.0, 20.0]);
        assert_eq!(ranked.ranks, vec![3.0, 1.0, 2.0]);
        assert!(!ranked.has_ties());
    }

    #[test]
    fn test_ties_share_average_rank() {
        let ranked = average_ranks(&[5.0, 1.0, 5.0, 5.0, 2.0]);
        assert_eq!(ranked.ranks, vec![4.0, 1.0, 4.0, 4.0, 2.0]);
        assert_eq!(ranked.ties, vec![3]);
        assert_eq!(ranked.tie_term(), 24.0);
    }
}
