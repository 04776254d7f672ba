use super::{validate_rate, StatsError};

/// Growth of the family-wise error rate with the number of tests.
///
/// Yields `(n, 1 - (1 - α)^n)` for `n = 0..=max_n`: the probability of at
/// least one false positive among `n` independent tests each run at level α.
/// The Bonferroni variant uses α / n per test instead, which keeps the rate
/// at or below α for every n.
#[derive(Debug, Clone)]
pub struct ErrorRateSweep {
    alpha: f64,
    next: u32,
    max_n: u32,
    bonferroni: bool,
    exhausted: bool,
}

impl ErrorRateSweep {
    /// Sweep the uncorrected family-wise error rate.
    pub fn new(alpha: f64, max_n: u32) -> Result<Self, StatsError> {
        validate_rate("alpha", alpha)?;
        Ok(Self {
            alpha,
            next: 0,
            max_n,
            bonferroni: false,
            exhausted: false,
        })
    }

    /// Sweep the family-wise error rate after Bonferroni correction.
    pub fn bonferroni(alpha: f64, max_n: u32) -> Result<Self, StatsError> {
        Ok(Self {
            bonferroni: true,
            ..Self::new(alpha, max_n)?
        })
    }

    /// Family-wise error rate for `n` tests without correction.
    pub fn family_wise_error_rate(alpha: f64, n: u32) -> f64 {
        1.0 - (1.0 - alpha).powf(f64::from(n))
    }

    fn rate_at(&self, n: u32) -> f64 {
        if !self.bonferroni {
            return Self::family_wise_error_rate(self.alpha, n);
        }
        if n == 0 {
            return 0.0;
        }
        Self::family_wise_error_rate(self.alpha / f64::from(n), n)
    }
}

impl Iterator for ErrorRateSweep {
    type Item = (u32, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let n = self.next;
        if n == self.max_n {
            self.exhausted = true;
        } else {
            self.next += 1;
        }
        Some((n, self.rate_at(n)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.exhausted {
            0
        } else {
            (self.max_n - self.next) as usize + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ErrorRateSweep {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero_then_alpha() {
        let points: Vec<_> = ErrorRateSweep::new(0.05, 3).unwrap().collect();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], (0, 0.0));
        assert_eq!(points[1].0, 1);
        assert!((points[1].1 - 0.05).abs() < 1e-15);
        assert!((points[2].1 - 0.0975).abs() < 1e-12);
    }

    #[test]
    fn test_max_n_zero_yields_single_point() {
        let mut sweep = ErrorRateSweep::new(0.05, 0).unwrap();
        assert_eq!(sweep.len(), 1);
        assert_eq!(sweep.next(), Some((0, 0.0)));
        assert_eq!(sweep.next(), None);
    }

    #[test]
    fn test_monotone_and_approaches_one() {
        let rates: Vec<f64> = ErrorRateSweep::new(0.05, 500)
            .unwrap()
            .map(|(_, rate)| rate)
            .collect();
        assert!(rates.windows(2).all(|w| w[1] > w[0]));
        assert!(rates[500] > 0.9999);
        assert!(rates.iter().all(|&r| r < 1.0 + f64::EPSILON));
    }

    #[test]
    fn test_bonferroni_stays_below_alpha() {
        let sweep = ErrorRateSweep::bonferroni(0.05, 200).unwrap();
        for (n, rate) in sweep {
            assert!(rate <= 0.05 + 1e-12, "n = {n}, rate = {rate}");
        }
    }

    #[test]
    fn test_invalid_alpha() {
        assert!(matches!(
            ErrorRateSweep::new(1.5, 10),
            Err(StatsError::InvalidParameter(_))
        ));
    }
}
