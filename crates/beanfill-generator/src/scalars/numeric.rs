//! Numeric value generators.

use rand::Rng;
use rust_decimal::Decimal;

/// Largest magnitude of a default random decimal, in hundredths.
const DECIMAL_SPAN: i64 = 100_000_000;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Generate a random decimal in the given range with 2 decimal places.
pub fn generate_decimal_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Decimal {
    let value = generate_float_range(rng, min, max);
    Decimal::try_from(value)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

/// Generate a random decimal with 2 decimal places in `[0, 1_000_000)`.
pub fn generate_decimal<R: Rng + ?Sized>(rng: &mut R) -> Decimal {
    Decimal::new(rng.gen_range(0..DECIMAL_SPAN), 2)
}

/// Generate a random f64 in `[0, 1000)`.
pub fn generate_f64<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1000.0)
}

/// Generate a random f32 in `[0, 1000)`.
pub fn generate_f32<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0f32..1000.0)
}
