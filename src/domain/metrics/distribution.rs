use serde::Serialize;

use super::{Sanitize, clean};
use crate::domain::position::Trade;
use crate::domain::stats::{kurtosis, median, skewness, std_dev};

/// Shape of the per-trade percentage returns.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReturnDistribution {
    pub min_return: f64,
    pub max_return: f64,
    pub median_return: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

impl ReturnDistribution {
    pub fn compute(trades: &[Trade]) -> Self {
        let returns: Vec<f64> = trades.iter().map(|t| t.profit_loss_pct).collect();
        ReturnDistribution {
            min_return: returns.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max_return: returns.iter().copied().reduce(f64::max).unwrap_or(0.0),
            median_return: median(&returns),
            std_dev: std_dev(&returns),
            skewness: skewness(&returns),
            kurtosis: kurtosis(&returns),
        }
    }
}

impl Sanitize for ReturnDistribution {
    fn sanitize(&mut self) {
        for v in [
            &mut self.min_return,
            &mut self.max_return,
            &mut self.median_return,
            &mut self.std_dev,
            &mut self.skewness,
            &mut self.kurtosis,
        ] {
            clean(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn shape_of_returns() {
        // pct returns 1, 2, 3, 10
        let d = ReturnDistribution::compute(&trades(&[100.0, 200.0, 300.0, 1000.0]));
        assert!((d.min_return - 1.0).abs() < 1e-9);
        assert!((d.max_return - 10.0).abs() < 1e-9);
        assert!((d.median_return - 2.5).abs() < 1e-9);
        assert!(d.skewness > 0.0);
        assert!(d.kurtosis != 0.0);
    }

    #[test]
    fn three_trades_have_skew_but_no_kurtosis() {
        let d = ReturnDistribution::compute(&trades(&[100.0, 100.0, 700.0]));
        assert!(d.skewness > 0.0);
        assert_eq!(d.kurtosis, 0.0);
    }
}
