//! Mann-Whitney U and Kruskal-Wallis H.

use crate::error::StatsError;

use super::rank::average_ranks;
use super::special::{chi2_sf, normal_sf};

/// The exact Mann-Whitney distribution is used when the smaller sample has
/// at most this many values and there are no ties.
pub const EXACT_LIMIT: usize = 8;

/// Statistic and two-sided p-value of a rank test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
}

fn finite(statistic: f64, p_value: f64) -> Result<TestOutcome, StatsError> {
    if statistic.is_finite() && p_value.is_finite() {
        Ok(TestOutcome {
            statistic,
            p_value: p_value.clamp(0.0, 1.0),
        })
    } else {
        Err(StatsError::NonFinite)
    }
}

/// Frequencies of U (pairs with `x > y`) over all orderings of `m` and `n`
/// distinct values.
///
/// These are the coefficients of the Gaussian binomial `[m + n choose m]`,
/// built one factor `(1 - q^(n + i)) / (1 - q^i)` at a time in a single
/// buffer of length `m * n + 1`.
fn u_frequencies(m: usize, n: usize) -> Vec<f64> {
    let (small, large) = if m <= n { (m, n) } else { (n, m) };
    let mut counts = vec![0.0; small * large + 1];
    counts[0] = 1.0;
    for i in 1..=small {
        let top = i * large;
        let shift = large + i;
        // terms above `top` cancel in the division, so they are never stored
        for k in (shift..=top).rev() {
            counts[k] -= counts[k - shift];
        }
        for k in i..=top {
            counts[k] += counts[k - i];
        }
    }
    counts
}

fn exact_p_value(u: f64, m: usize, n: usize) -> f64 {
    let frequencies = u_frequencies(m, n);
    let total: f64 = frequencies.iter().sum();
    let start = u.ceil() as usize;
    let upper: f64 = frequencies.iter().skip(start).map(|c| c.max(0.0)).sum();
    (2.0 * upper / total).min(1.0)
}

/// Two-sided Mann-Whitney U test.
///
/// The reported statistic is U for the first sample. The p-value uses the
/// larger of the two U values. Without ties, and with at most
/// [`EXACT_LIMIT`] values in the smaller sample, it comes from the exact
/// distribution; otherwise from the normal approximation with tie and
/// continuity correction.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<TestOutcome, StatsError> {
    for (name, sample) in [("first", x), ("second", y)] {
        if sample.is_empty() {
            return Err(StatsError::EmptyGroup {
                group: name.to_string(),
            });
        }
    }
    let (n1, n2) = (x.len(), y.len());
    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let ranked = average_ranks(&pooled);

    let (f1, f2) = (n1 as f64, n2 as f64);
    let r1: f64 = ranked.ranks[..n1].iter().sum();
    let u1 = r1 - f1 * (f1 + 1.0) / 2.0;
    let u2 = f1 * f2 - u1;
    let u = u1.max(u2);

    if !ranked.has_ties() && n1.min(n2) <= EXACT_LIMIT {
        return finite(u1, exact_p_value(u, n1, n2));
    }

    let n = f1 + f2;
    let variance = f1 * f2 / 12.0 * ((n + 1.0) - ranked.tie_term() / (n * (n - 1.0)));
    if variance <= 0.0 || !variance.is_finite() {
        return Err(StatsError::Degenerate);
    }
    let z = (u - f1 * f2 / 2.0 - 0.5) / variance.sqrt();
    finite(u1, 2.0 * normal_sf(z))
}

/// Kruskal-Wallis H test with tie correction.
pub fn kruskal_wallis(groups: &[&[f64]]) -> Result<TestOutcome, StatsError> {
    if let Some(idx) = groups.iter().position(|g| g.is_empty()) {
        return Err(StatsError::EmptyGroup {
            group: format!("#{}", idx + 1),
        });
    }
    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let ranked = average_ranks(&pooled);
    let n = pooled.len() as f64;

    let mut offset = 0;
    let mut weighted = 0.0;
    for group in groups {
        let rank_sum: f64 = ranked.ranks[offset..offset + group.len()].iter().sum();
        weighted += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }
    let h = 12.0 / (n * (n + 1.0)) * weighted - 3.0 * (n + 1.0);

    let correction = 1.0 - ranked.tie_term() / (n * n * n - n);
    if correction <= 0.0 || !correction.is_finite() {
        return Err(StatsError::Degenerate);
    }
    let h = h / correction;
    let df = (groups.len() - 1) as f64;
    finite(h, chi2_sf(h, df))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_u_frequencies_small() {
        assert_eq!(u_frequencies(1, 1), vec![1.0, 1.0]);
        assert_eq!(u_frequencies(2, 2), vec![1.0, 1.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_exact_complete_separation() {
        let outcome = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert!(close(outcome.p_value, 0.1, 1e-12));
    }

    #[test]
    fn test_u_frequencies_are_symmetric_in_sample_sizes() {
        let forward = u_frequencies(3, 5);
        assert_eq!(forward, u_frequencies(5, 3));
        assert_eq!(forward.len(), 16);
        // C(8, 3) orderings in total
        assert_eq!(forward.iter().sum::<f64>(), 56.0);
        let reversed: Vec<f64> = forward.iter().rev().copied().collect();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_small_group_against_large_group_is_exact() {
        // U = 60 is the maximum for sizes 3 and 20: p = 2 / C(23, 3).
        let small = [1.0, 2.0, 3.0];
        let large: Vec<f64> = (4..24).map(f64::from).collect();
        let outcome = mann_whitney_u(&small, &large).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert!(close(outcome.p_value, 2.0 / 1771.0, 1e-12));
    }

    #[test]
    fn test_exact_boundary_at_eight_values() {
        let eight: Vec<f64> = (0..8).map(f64::from).collect();
        let rest: Vec<f64> = (8..20).map(f64::from).collect();
        let outcome = mann_whitney_u(&eight, &rest).unwrap();
        // C(20, 8) = 125970 orderings, one of them fully separated.
        assert!(close(outcome.p_value, 2.0 / 125_970.0, 1e-15));
    }

    #[test]
    fn test_exact_distribution_scales_to_large_second_sample() {
        let small = [0.25, 0.5];
        let large: Vec<f64> = (1..3001).map(f64::from).collect();
        let outcome = mann_whitney_u(&small, &large).unwrap();
        // C(3002, 2) = 4504501
        assert!(close(outcome.p_value, 2.0 / 4_504_501.0, 1e-15));
    }

    #[test]
    fn test_asymptotic_with_ties() {
        // Ranks 1, 2, 3.5 | 3.5, 5, 6, 7: U1 = 0.5, U2 = 11.5, one tie pair.
        let outcome = mann_whitney_u(&[1.0, 2.0, 3.0], &[3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(outcome.statistic, 0.5);
        let variance = 8.0 - 6.0 / 42.0;
        let z = (11.5 - 6.0 - 0.5) / f64::sqrt(variance);
        assert!(close(outcome.p_value, 2.0 * normal_sf(z), 1e-12));
    }

    #[test]
    fn test_identical_values_are_degenerate() {
        assert_eq!(
            mann_whitney_u(&[5.0, 5.0], &[5.0, 5.0, 5.0]),
            Err(StatsError::Degenerate)
        );
        assert_eq!(
            kruskal_wallis(&[&[2.0, 2.0], &[2.0], &[2.0, 2.0]]),
            Err(StatsError::Degenerate)
        );
    }

    #[test]
    fn test_kruskal_wallis_without_ties() {
        // Rank sums 6, 15, 24 over n = 9: H = 7.2.
        let outcome =
            kruskal_wallis(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]).unwrap();
        assert!(close(outcome.statistic, 7.2, 1e-12));
        assert!(close(outcome.p_value, (-3.6f64).exp(), 1e-10));
    }

    #[test]
    fn test_empty_sample_is_rejected() {
        assert!(matches!(
            mann_whitney_u(&[], &[1.0]),
            Err(StatsError::EmptyGroup { .. })
        ));
    }
}
