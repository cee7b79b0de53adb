use crate::utils;
use fraction::BigFraction;
use num_bigint::BigUint;
use num_traits::Zero;
use snapshot_lib::VoteAmount;
use std::fmt;

pub const UNDEFINED_PLACEHOLDER: &str = "-";

/// A delegate's percentage of the total delegated votes.
///
/// The value is kept as an exact rational so that it can be rendered at any
/// precision without ever going through a binary float.
#[derive(Clone, Debug, PartialEq)]
pub enum SharePercent {
    Defined(BigFraction),
    /// The total was zero or not available.
    Undefined,
}

impl SharePercent {
    /// `votes * 100 / total`
    pub fn of(votes: &VoteAmount, total: Option<&VoteAmount>) -> Self {
        match total {
            Some(total) if !total.is_zero() => {
                Self::Defined(BigFraction::new(votes * BigUint::from(100u8), total.clone()))
            }
            _ => Self::Undefined,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    pub fn as_fraction(&self) -> Option<&BigFraction> {
        match self {
            Self::Defined(share) => Some(share),
            Self::Undefined => None,
        }
    }

    /// Percentage rounded half up to `decimals` fractional digits, e.g. `30.000`.
    pub fn to_fixed(&self, decimals: u32) -> Option<String> {
        let share = self.as_fraction()?;
        let numer = share.numer()?;
        let denom = share.denom()?;
        Some(utils::to_fixed(numer, denom, decimals))
    }

    /// `30.000%`, or the placeholder when undefined.
    pub fn display(&self, decimals: u32) -> String {
        self.to_fixed(decimals)
            .map(|fixed| format!("{}%", fixed))
            .unwrap_or_else(|| UNDEFINED_PLACEHOLDER.to_string())
    }
}

impl fmt::Display for SharePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = f
            .precision()
            .unwrap_or(snapshot_lib::settings::DEFAULT_PERCENT_DECIMALS as usize);
        f.write_str(&self.display(decimals as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn exact_percentages() {
        let total = big(100);
        assert_eq!(
            SharePercent::of(&big(30), Some(&total)).to_fixed(3).as_deref(),
            Some("30.000")
        );
        assert_eq!(
            SharePercent::of(&big(70), Some(&total)).display(3),
            "70.000%"
        );
        assert_eq!(
            format!("{:.1}", SharePercent::of(&big(1), Some(&big(3)))),
            "33.3%"
        );
        assert_eq!(format!("{}", SharePercent::of(&big(2), Some(&big(3)))), "66.667%");
    }

    #[test]
    fn zero_or_missing_total_is_undefined() {
        assert_eq!(SharePercent::of(&big(5), Some(&big(0))), SharePercent::Undefined);
        assert_eq!(SharePercent::of(&big(0), None), SharePercent::Undefined);
        assert_eq!(SharePercent::Undefined.to_fixed(3), None);
        assert_eq!(SharePercent::Undefined.display(3), UNDEFINED_PLACEHOLDER);
    }

    #[test]
    fn precision_beyond_f64() {
        // 2^64 + 1 out of 2^66: floats would round the numerator away
        let votes: BigUint = (BigUint::from(1u8) << 64) + 1u8;
        let total: BigUint = BigUint::from(1u8) << 66;
        let share = SharePercent::of(&votes, Some(&total));
        assert_eq!(
            share.as_fraction(),
            Some(&BigFraction::new(
                votes * BigUint::from(100u8),
                total
            ))
        );
        assert_eq!(share.to_fixed(3).as_deref(), Some("25.000"));
        assert_eq!(share.to_fixed(20).as_deref(), Some("25.00000000000000000136"));
    }
}
