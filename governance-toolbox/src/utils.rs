use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use std::cmp::Ordering;

fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u8).pow(exp)
}

/// `numer / denom` rounded half away from zero.
pub fn div_round_half_up(numer: &BigUint, denom: &BigUint) -> BigUint {
    let (quotient, remainder) = numer.div_rem(denom);
    if remainder * 2u8 >= *denom {
        quotient + 1u8
    } else {
        quotient
    }
}

/// Groups thousands with `,` as in `1,234,567`.
pub fn group_thousands(value: &BigUint) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Renders `numer / denom` rounded half up to exactly `decimals` fractional digits.
pub fn to_fixed(numer: &BigUint, denom: &BigUint, decimals: u32) -> String {
    let scaled = div_round_half_up(&(numer * pow10(decimals)), denom);
    if decimals == 0 {
        return scaled.to_string();
    }
    let (int, frac) = scaled.div_rem(&pow10(decimals));
    format!("{}.{:0>width$}", int, frac.to_string(), width = decimals as usize)
}

/// Renders `raw / 10^decimals` rounded half up to `significant` digits,
/// without grouping and with trailing fractional zeros dropped.
pub fn to_significant(raw: &BigUint, decimals: u32, significant: u32) -> String {
    if raw.is_zero() || significant == 0 {
        return "0".to_string();
    }
    let denom = pow10(decimals);

    // floor(log10(raw / denom))
    let mut exponent = raw.to_string().len() as i64 - denom.to_string().len() as i64;
    if compare_scaled(raw, &denom, exponent) == Ordering::Less {
        exponent -= 1;
    }

    let shift = significant as i64 - 1 - exponent;
    let digits = if shift >= 0 {
        div_round_half_up(&(raw * pow10(shift as u32)), &denom)
    } else {
        div_round_half_up(raw, &(&denom * pow10((-shift) as u32)))
    };

    if shift <= 0 {
        return format!("{}{}", digits, "0".repeat((-shift) as usize));
    }
    let shift = shift as usize;
    let mut digits = digits.to_string();
    if digits.len() <= shift {
        digits = format!("{}{}", "0".repeat(shift + 1 - digits.len()), digits);
    }
    let (int, frac) = digits.split_at(digits.len() - shift);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{}.{}", int, frac)
    }
}

// compares raw with denom * 10^exponent
fn compare_scaled(raw: &BigUint, denom: &BigUint, exponent: i64) -> Ordering {
    if exponent >= 0 {
        raw.cmp(&(denom * pow10(exponent as u32)))
    } else {
        (raw * pow10((-exponent) as u32)).cmp(denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u128) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(&big(0)), "0");
        assert_eq!(group_thousands(&big(999)), "999");
        assert_eq!(group_thousands(&big(1_000)), "1,000");
        assert_eq!(group_thousands(&big(15_049_828)), "15,049,828");
        assert_eq!(
            group_thousands(&big(u128::MAX)),
            "340,282,366,920,938,463,463,374,607,431,768,211,455"
        );
    }

    #[test]
    fn fixed_rounds_half_up() {
        assert_eq!(to_fixed(&big(3000), &big(100), 3), "30.000");
        assert_eq!(to_fixed(&big(100), &big(3), 3), "33.333");
        assert_eq!(to_fixed(&big(200), &big(3), 3), "66.667");
        assert_eq!(to_fixed(&big(1), &big(2000), 3), "0.001");
        assert_eq!(to_fixed(&big(1), &big(2001), 3), "0.000");
        assert_eq!(to_fixed(&big(5), &big(2), 0), "3");
    }

    #[test]
    fn significant_digits() {
        let e18 = 18;
        assert_eq!(to_significant(&big(0), e18, 3), "0");
        assert_eq!(to_significant(&big(100), 0, 3), "100");
        assert_eq!(to_significant(&big(123_456), 0, 3), "123000");
        assert_eq!(to_significant(&big(1_234_567_800_000_000_000_000), e18, 3), "1230");
        assert_eq!(to_significant(&big(1_500_000_000_000_000_000), e18, 3), "1.5");
        assert_eq!(to_significant(&big(12_345_000_000_000_000), e18, 3), "0.0123");
        assert_eq!(to_significant(&big(999_600), 3, 3), "1000");
        assert_eq!(to_significant(&big(1), e18, 3), "0.000000000000000001");
    }
}
