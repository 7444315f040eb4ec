//! Small numeric helpers: integer log2, decimal rounding and a fast string hash.

use crate::AppError;

const POW10: [f64; 9] = [1.0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8];

// Above 2^52 every f64 is already a whole number.
const WHOLE_NUMBER: f64 = (1u64 << 52) as f64;

const HASH_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// Index of the highest set bit, i.e. `floor(log2(x))`.
pub fn floor_log2(x: i64) -> Result<u32, AppError> {
    if x <= 0 {
        return Err(AppError::invalid(format!("floor_log2 needs a positive argument, got {}", x)));
    }
    Ok(63 - x.leading_zeros())
}

/// Rounds `x` to `places` decimal places, midpoints away from zero.
///
/// Midpoints are judged on the decimal value as written, so `2.345` rounds to `2.35` even though
/// its nearest binary representation lies just below the midpoint. A value is a midpoint when it
/// is the f64 closest to one.
pub fn round_half_up(x: f64, places: u32) -> Result<f64, AppError> {
    match places {
        2 | 4 | 6 | 8 => Ok(round_scaled(x, POW10[places as usize])),
        _ => Err(AppError::invalid(format!("places must be one of 2, 4, 6, 8, got {}", places))),
    }
}

pub fn round2(x: f64) -> f64 {
    round_scaled(x, POW10[2])
}

pub fn round4(x: f64) -> f64 {
    round_scaled(x, POW10[4])
}

pub fn round6(x: f64) -> f64 {
    round_scaled(x, POW10[6])
}

pub fn round8(x: f64) -> f64 {
    round_scaled(x, POW10[8])
}

fn round_scaled(x: f64, factor: f64) -> f64 {
    let magnitude = x.abs();
    let scaled = magnitude * factor;
    if !scaled.is_finite() || scaled >= WHOLE_NUMBER {
        return x;
    }
    let whole = scaled.floor();
    // 2 * whole + 1 is exact below 2^53, so this is the f64 nearest to the decimal midpoint.
    let midpoint = (2.0 * whole + 1.0) / (2.0 * factor);
    let rounded = if magnitude >= midpoint { whole + 1.0 } else { whole };
    (rounded / factor).copysign(x)
}

/// Non-cryptographic 64-bit hash of the characters of `s`.
///
/// Strings differing in a single character differ in about half of the output bits.
pub fn fast_hash(s: &str) -> u64 {
    let mut h = s.len() as u64;
    for c in s.chars() {
        h = h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(c as u64);
    }
    agitate(h)
}

/// Bijective 64-bit finalizer spreading every input bit over the whole output.
#[inline]
pub fn agitate(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h = h.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    h ^= h >> 33;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_log2_of_powers_of_two() {
        for i in 0..63 {
            assert_eq!(floor_log2(1i64 << i).unwrap(), i);
        }
    }

    #[test]
    fn floor_log2_between_powers() {
        assert_eq!(floor_log2(3).unwrap(), 1);
        assert_eq!(floor_log2(1023).unwrap(), 9);
        assert_eq!(floor_log2(1025).unwrap(), 10);
        assert_eq!(floor_log2(i64::MAX).unwrap(), 62);
    }

    #[test]
    fn floor_log2_rejects_non_positive() {
        assert!(matches!(floor_log2(0), Err(AppError::InvalidArgument(_))));
        assert!(matches!(floor_log2(-8), Err(AppError::InvalidArgument(_))));
        assert!(matches!(floor_log2(i64::MIN), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn rounds_decimal_midpoints_up() {
        assert_eq!(round_half_up(2.345, 2).unwrap(), 2.35);
        assert_eq!(round_half_up(2.344, 2).unwrap(), 2.34);
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round4(1.00005), 1.0001);
        assert_eq!(round6(0.0000005), 0.000001);
        assert_eq!(round8(1.000000005), 1.00000001);
    }

    #[test]
    fn rounds_negative_midpoints_away_from_zero() {
        assert_eq!(round2(-2.345), -2.35);
        assert_eq!(round2(-2.344), -2.34);
        assert_eq!(round4(-0.00005), -0.0001);
    }

    #[test]
    fn rounding_leaves_huge_and_non_finite_values_alone() {
        assert_eq!(round8(1e12), 1e12);
        assert_eq!(round2(1e300), 1e300);
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round4(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn whole_numbers_near_the_cutoff_stay_whole() {
        assert_eq!(round2(1e13), 1e13);
        assert_eq!(round2(-1e13), -1e13);
        assert_eq!(round8(1e7), 1e7);
        assert_eq!(round8(-1e7), -1e7);
        assert_eq!(round4(-1e11), -1e11);
        assert_eq!(round6(4e9), 4e9);
    }

    #[test]
    fn large_values_round_to_nearest_unit() {
        assert_eq!(round4(1e11 + 0.00001), 1e11);
        assert_eq!(round4(-1e11 - 0.00001), -1e11);
        assert_eq!(round2(123456789012.34), 123456789012.34);
        assert_eq!(round2(12345678901.231), 12345678901.23);
        assert_eq!(round6(370525710.0695054), 370525710.069505);
        assert_eq!(round6(370525710.0695055), 370525710.069506);
    }

    #[test]
    fn round_half_up_rejects_unsupported_places() {
        for places in [0, 1, 3, 5, 7, 9, 16] {
            assert!(matches!(round_half_up(1.5, places), Err(AppError::InvalidArgument(_))));
        }
        for places in [2, 4, 6, 8] {
            assert!(round_half_up(1.5, places).is_ok());
        }
    }

    #[test]
    fn hash_is_deterministic_and_length_sensitive() {
        assert_eq!(fast_hash("Hello World"), fast_hash("Hello World"));
        assert_ne!(fast_hash(""), fast_hash("\0"));
        assert_ne!(fast_hash("ab"), fast_hash("ba"));
        assert_ne!(fast_hash("a"), fast_hash("a\0"));
    }

    #[test]
    fn agitate_flips_about_half_the_bits_for_adjacent_inputs() {
        let total: u32 = (0..4096u64).map(|i| (agitate(i) ^ agitate(i + 1)).count_ones()).sum();
        let mean = total as f64 / 4096.0;
        assert!((30.0..34.0).contains(&mean), "mean flipped bits {}", mean);
    }
}
