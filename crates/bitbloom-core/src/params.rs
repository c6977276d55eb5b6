//! Filter sizing parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A validated `(M, K)` pair.
///
/// `m` is the bit-array size and the modulus of index derivation, `k` the
/// number of offsets derived per value. Both are strictly positive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct FilterParams {
    m: u64,
    k: u64,
}

#[derive(Deserialize)]
struct RawParams {
    m: u64,
    k: u64,
}

impl TryFrom<RawParams> for FilterParams {
    type Error = CoreError;

    fn try_from(raw: RawParams) -> Result<Self> {
        Self::new(raw.m, raw.k)
    }
}

impl FilterParams {
    /// Create parameters, rejecting a zero `m` or `k`.
    pub fn new(m: u64, k: u64) -> Result<Self> {
        if m == 0 || k == 0 {
            return Err(CoreError::InvalidParameters { m, k });
        }
        Ok(Self { m, k })
    }

    /// Size a filter for `expected_items` at the target false-positive rate.
    ///
    /// Uses `m = ceil(-n ln p / ln(2)^2)` and `k = round(m / n * ln 2)`.
    pub fn optimal(expected_items: u64, false_positive_rate: f64) -> Result<Self> {
        if expected_items == 0 {
            return Err(CoreError::InvalidSizing(
                "expected item count must be greater than zero".into(),
            ));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(CoreError::InvalidSizing(format!(
                "false positive rate {false_positive_rate} is outside (0, 1)"
            )));
        }

        let n = expected_items as f64;
        let ln2 = std::f64::consts::LN_2;
        let m = (-n * false_positive_rate.ln() / (ln2 * ln2)).ceil();
        let k = (m / n * ln2).round().max(1.0);

        Self::new(m as u64, k as u64)
    }

    /// Check that every derived offset fits a store addressing at most
    /// `max_bits` bits.
    pub fn within(self, max_bits: u64) -> Result<Self> {
        if self.m > max_bits {
            return Err(CoreError::Unaddressable {
                m: self.m,
                max: max_bits,
            });
        }
        Ok(self)
    }

    /// Bit-array size.
    pub const fn m(&self) -> u64 {
        self.m
    }

    /// Offsets derived per value.
    pub const fn k(&self) -> u64 {
        self.k
    }

    /// Expected false-positive probability after `items` insertions.
    pub fn false_positive_rate(&self, items: u64) -> f64 {
        let exponent = -(self.k as f64) * items as f64 / self.m as f64;
        (1.0 - exponent.exp()).powf(self.k as f64)
    }
}

impl fmt::Debug for FilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterParams(m={}, k={})", self.m, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero() {
        assert_eq!(
            FilterParams::new(0, 3),
            Err(CoreError::InvalidParameters { m: 0, k: 3 })
        );
        assert_eq!(
            FilterParams::new(1024, 0),
            Err(CoreError::InvalidParameters { m: 1024, k: 0 })
        );
        assert!(FilterParams::new(1, 1).is_ok());
    }

    #[test]
    fn test_within_bounds_m() {
        let params = FilterParams::new(1 << 32, 7).unwrap();
        assert_eq!(params.within(1 << 32), Ok(params));
        assert_eq!(
            params.within((1 << 32) - 1),
            Err(CoreError::Unaddressable {
                m: 1 << 32,
                max: (1 << 32) - 1
            })
        );
    }

    #[test]
    fn test_optimal_sizing() {
        // 1M items at 1% is the textbook ~9.59M bits and 7 rounds.
        let params = FilterParams::optimal(1_000_000, 0.01).unwrap();
        assert_eq!(params.k(), 7);
        assert!((9_585_000..9_586_000).contains(&params.m()));

        let fpr = params.false_positive_rate(1_000_000);
        assert!((0.009..0.011).contains(&fpr));
    }

    #[test]
    fn test_optimal_rejects_bad_input() {
        assert!(FilterParams::optimal(0, 0.01).is_err());
        assert!(FilterParams::optimal(10, 0.0).is_err());
        assert!(FilterParams::optimal(10, 1.0).is_err());
        assert!(FilterParams::optimal(10, f64::NAN).is_err());
    }

    #[test]
    fn test_empty_filter_has_no_false_positives() {
        let params = FilterParams::new(1024, 4).unwrap();
        assert_eq!(params.false_positive_rate(0), 0.0);
    }

    #[test]
    fn test_serde_validates() {
        let params: FilterParams = serde_json::from_str(r#"{"m":64,"k":3}"#).unwrap();
        assert_eq!((params.m(), params.k()), (64, 3));
        assert!(serde_json::from_str::<FilterParams>(r#"{"m":0,"k":3}"#).is_err());
    }
}
