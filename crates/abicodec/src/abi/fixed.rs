//! 128x128 fixed-point scaling
//!
//! A `real`/`ureal` value occupies one word holding `value * 2^128`,
//! truncated toward zero.

use abicodec_primitives::{U256, U512};

use super::types::I256;
use crate::AbiError;

/// Number of fractional bits
pub const FRACTION_BITS: usize = 128;

/// Fraction digits beyond this cannot change the scaled result
const MAX_FRACTION_DIGITS: usize = 77;

fn fraction_mask() -> U256 {
    (U256::one() << FRACTION_BITS) - U256::one()
}

/// Scale `integer.fraction` (decimal digits) by 2^128, truncating
pub fn scale(integer: U256, fraction: &str) -> Result<U256, AbiError> {
    if integer > fraction_mask() {
        return Err(AbiError::Encoding(format!(
            "fixed-point integer part {} exceeds 128 bits",
            integer
        )));
    }
    let mut raw = integer << FRACTION_BITS;

    let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    let digits = digits.trim_end_matches('0');
    if !digits.is_empty() {
        let numerator = U512::from_dec_str(digits)
            .map_err(|_| AbiError::Encoding(format!("invalid fraction digits: {}", fraction)))?;
        let denominator = U512::exp10(digits.len());
        let scaled = (numerator << FRACTION_BITS) / denominator;

        // scaled < 2^128, so the low half holds it entirely
        let mut buf = [0u8; 64];
        scaled.to_big_endian(&mut buf);
        raw = raw | U256::from_big_endian(&buf[32..]);
    }
    Ok(raw)
}

/// Exact decimal rendering of an unsigned scaled value
pub fn format_ufixed(raw: &U256) -> String {
    let integer = *raw >> FRACTION_BITS;
    let mut fraction = *raw & fraction_mask();
    if fraction.is_zero() {
        return integer.to_string();
    }

    // Every 2^-128 step terminates within 128 decimal digits
    let ten = U256::from(10u64);
    let mut digits = String::new();
    while !fraction.is_zero() {
        fraction = fraction * ten;
        let digit = (fraction >> FRACTION_BITS).low_u32();
        digits.push(char::from(b'0' + digit as u8));
        fraction = fraction & fraction_mask();
    }
    format!("{}.{}", integer, digits)
}

/// Exact decimal rendering of a signed scaled value
pub fn format_fixed(raw: &I256) -> String {
    if raw.negative {
        format!("-{}", format_ufixed(&raw.abs))
    } else {
        format_ufixed(&raw.abs)
    }
}
