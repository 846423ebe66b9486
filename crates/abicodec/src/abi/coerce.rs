//! JSON value to token coercion
//!
//! Values arriving from JSON are accepted leniently, the way the earliest
//! JavaScript clients accepted them:
//!
//! - integers take JSON numbers, decimal strings and `0x` hex strings;
//!   fractional parts are truncated toward zero
//! - an unsigned `0x` hex string is a raw 256-bit pattern, so
//!   `"0xff..ff"` given for `int` is `-1`
//! - negative values given for `uint` are stored as two's complement
//! - a one-element array given for a scalar number is unwrapped
//! - the `N` of `uintN`/`intN` is not enforced: any value that fits the
//!   256-bit word is written in full, so `1000` given for `int8` encodes
//!   as `0x3e8`
//!
//! Signed values (`int`, `real`) must still fit the signed 256-bit range;
//! out-of-range magnitudes would flip the sign bit and are rejected.
//!
//! Anything else that does not fit its type is an [`AbiError::Encoding`].

use abicodec_primitives::{Address, U256};
use serde_json::{Number, Value};
use tracing::debug;

use super::fixed::scale;
use super::types::{I256, ParamType, Token};
use crate::AbiError;

/// A parsed numeric literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    /// Leading minus sign
    pub negative: bool,
    /// Integer part (or the whole hex value)
    pub integer: U256,
    /// Fractional decimal digits, possibly empty
    pub fraction: String,
    /// Unsigned `0x` literal, taken as a raw 256-bit pattern
    pub raw_pattern: bool,
}

impl Decimal {
    /// Integer part with its sign, fraction dropped
    pub fn truncated(&self) -> I256 {
        I256::new(self.integer, self.negative)
    }
}

/// Convert one JSON value into a token of the given type
pub fn tokenize(param_type: &ParamType, value: &Value) -> Result<Token, AbiError> {
    match param_type {
        ParamType::Array(inner) => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| tokenize(inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Token::Array),
            other => Err(mismatch(param_type, other)),
        },
        ParamType::Uint(_) => {
            let number = parse_number(unwrap_singleton(value))?;
            if number.raw_pattern {
                return Ok(Token::Uint(number.integer));
            }
            let signed = number.truncated();
            if signed.negative {
                debug!(value = %signed, "negative value for unsigned type, using two's complement");
            }
            Ok(Token::Uint(signed.to_twos_complement()))
        }
        ParamType::Int(_) => {
            let number = parse_number(unwrap_singleton(value))?;
            if number.raw_pattern {
                return Ok(Token::Int(I256::from_twos_complement(number.integer)));
            }
            signed_in_range(param_type, number.truncated()).map(Token::Int)
        }
        ParamType::Fixed => {
            let number = parse_number(unwrap_singleton(value))?;
            let raw = scale(number.integer, &number.fraction)?;
            signed_in_range(param_type, I256::new(raw, number.negative)).map(Token::Fixed)
        }
        ParamType::UFixed => {
            let number = parse_number(unwrap_singleton(value))?;
            let raw = scale(number.integer, &number.fraction)?;
            let signed = I256::new(raw, number.negative);
            if signed.negative {
                debug!(value = %signed, "negative value for unsigned fixed point, using two's complement");
            }
            Ok(Token::UFixed(signed.to_twos_complement()))
        }
        ParamType::Bool => tokenize_bool(value),
        ParamType::Address => tokenize_address(value),
        ParamType::Bytes => tokenize_bytes(value).map(Token::Bytes),
        ParamType::FixedBytes(size) => {
            let data = tokenize_bytes(value)?;
            if data.len() > *size {
                return Err(AbiError::Encoding(format!(
                    "{} bytes do not fit in bytes{}",
                    data.len(),
                    size
                )));
            }
            Ok(Token::FixedBytes(data))
        }
        ParamType::String => match value {
            Value::String(s) => Ok(Token::String(s.clone())),
            Value::Number(n) => Ok(Token::String(n.to_string())),
            other => Err(mismatch(param_type, other)),
        },
    }
}

// Magnitude must fit 256-bit two's complement: at most 2^255 - 1, or 2^255 when negative.
fn signed_in_range(param_type: &ParamType, value: I256) -> Result<I256, AbiError> {
    let limit = U256::one() << 255;
    let fits = if value.negative {
        value.abs <= limit
    } else {
        value.abs < limit
    };
    if fits {
        Ok(value)
    } else {
        Err(AbiError::Encoding(format!(
            "{} is out of range for {}",
            value, param_type
        )))
    }
}

/// Convert a list of JSON values, one per type
pub fn tokenize_all(types: &[ParamType], values: &[Value]) -> Result<Vec<Token>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::Encoding(format!(
            "expected {} values, got {}",
            types.len(),
            values.len()
        )));
    }
    types
        .iter()
        .zip(values)
        .map(|(ty, value)| tokenize(ty, value))
        .collect()
}

/// Parse a JSON number or numeric string
pub fn parse_number(value: &Value) -> Result<Decimal, AbiError> {
    match value {
        Value::Number(n) => parse_json_number(n),
        Value::String(s) => parse_decimal(s),
        other => Err(AbiError::Encoding(format!("expected a number, got {}", other))),
    }
}

fn parse_json_number(n: &Number) -> Result<Decimal, AbiError> {
    if let Some(v) = n.as_u64() {
        return Ok(Decimal {
            negative: false,
            integer: U256::from(v),
            fraction: String::new(),
            raw_pattern: false,
        });
    }
    if let Some(v) = n.as_i64() {
        return Ok(Decimal {
            negative: v < 0,
            integer: U256::from(v.unsigned_abs()),
            fraction: String::new(),
            raw_pattern: false,
        });
    }
    match n.as_f64() {
        // f64 Display never uses exponent notation
        Some(f) if f.is_finite() => parse_decimal(&f.to_string()),
        _ => Err(AbiError::Encoding(format!("unsupported number: {}", n))),
    }
}

/// Parse a decimal (`-12.5`) or hex (`0x1f`, `-0x1f`) literal
pub fn parse_decimal(s: &str) -> Result<Decimal, AbiError> {
    let trimmed = s.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    if let Some(hex_digits) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        let integer = parse_hex_u256(s, hex_digits)?;
        return Ok(Decimal {
            negative: negative && !integer.is_zero(),
            integer,
            fraction: String::new(),
            raw_pattern: !negative,
        });
    }

    let (integer_digits, fraction) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (unsigned, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (integer_digits.is_empty() && fraction.is_empty())
        || !all_digits(integer_digits)
        || !all_digits(fraction)
    {
        return Err(AbiError::Encoding(format!("not a number: {:?}", s)));
    }

    let integer = if integer_digits.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(integer_digits)
            .map_err(|_| AbiError::Encoding(format!("{} exceeds 256 bits", s)))?
    };

    Ok(Decimal {
        negative: negative && !(integer.is_zero() && fraction.trim_end_matches('0').is_empty()),
        integer,
        fraction: fraction.to_string(),
        raw_pattern: false,
    })
}

fn parse_hex_u256(original: &str, digits: &str) -> Result<U256, AbiError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AbiError::Encoding(format!("not a hex number: {:?}", original)));
    }
    let significant = digits.trim_start_matches('0');
    if significant.len() > 64 {
        return Err(AbiError::Encoding(format!("{} exceeds 256 bits", original)));
    }
    if significant.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(significant, 16)
        .map_err(|_| AbiError::Encoding(format!("not a hex number: {:?}", original)))
}

fn unwrap_singleton(value: &Value) -> &Value {
    match value {
        Value::Array(items) if items.len() == 1 => &items[0],
        other => other,
    }
}

fn tokenize_bool(value: &Value) -> Result<Token, AbiError> {
    match value {
        Value::Bool(b) => Ok(Token::Bool(*b)),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Ok(Token::Bool(false)),
            Some(1) => Ok(Token::Bool(true)),
            _ => Err(AbiError::Encoding(format!("{} is not a bool", n))),
        },
        Value::String(s) => match s.trim() {
            "true" | "1" => Ok(Token::Bool(true)),
            "false" | "0" => Ok(Token::Bool(false)),
            other => Err(AbiError::Encoding(format!("{:?} is not a bool", other))),
        },
        other => Err(mismatch(&ParamType::Bool, other)),
    }
}

fn tokenize_address(value: &Value) -> Result<Token, AbiError> {
    match value {
        Value::String(s) => {
            let digits = s.trim();
            let digits = digits.strip_prefix("0x").unwrap_or(digits);
            if digits.len() > Address::LEN * 2 {
                return Err(AbiError::Encoding(format!("address too long: {}", s)));
            }
            let padded = format!("{:0>40}", digits);
            Address::from_hex(&padded)
                .map(Token::Address)
                .map_err(|e| AbiError::Encoding(format!("{}: {}", s, e)))
        }
        Value::Number(n) => {
            let v = n
                .as_u64()
                .ok_or_else(|| AbiError::Encoding(format!("{} is not an address", n)))?;
            let mut bytes = [0u8; Address::LEN];
            bytes[Address::LEN - 8..].copy_from_slice(&v.to_be_bytes());
            Ok(Token::Address(Address::from_bytes(bytes)))
        }
        other => Err(mismatch(&ParamType::Address, other)),
    }
}

fn tokenize_bytes(value: &Value) -> Result<Vec<u8>, AbiError> {
    match value {
        Value::String(s) => match s.strip_prefix("0x") {
            Some(digits) => hex::decode(digits)
                .map_err(|e| AbiError::Encoding(format!("invalid hex bytes {:?}: {}", s, e))),
            None => Ok(s.as_bytes().to_vec()),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| AbiError::Encoding(format!("{} is not a byte", item)))
            })
            .collect(),
        other => Err(mismatch(&ParamType::Bytes, other)),
    }
}

fn mismatch(param_type: &ParamType, value: &Value) -> AbiError {
    AbiError::Encoding(format!("cannot convert {} to {}", value, param_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{encode_word_hex, parse_type};
    use serde_json::json;

    fn word(ty: &str, value: Value) -> String {
        let param_type = parse_type(ty).unwrap();
        let token = tokenize(&param_type, &value).unwrap();
        encode_word_hex(&param_type, &token).unwrap()
    }

    fn small(n: u8) -> String {
        format!("{}{:02x}", "0".repeat(62), n)
    }

    // ==================== Integers ====================

    #[test]
    fn test_uint_inputs() {
        for ty in ["uint", "uint128", "uint256"] {
            assert_eq!(word(ty, json!(1)), small(1));
            assert_eq!(word(ty, json!(10)), small(10));
            assert_eq!(
                word(ty, json!(format!("0x{}", "f".repeat(64)))),
                "f".repeat(64)
            );
        }
    }

    #[test]
    fn test_fractions_truncate_toward_zero() {
        for ty in ["uint", "int"] {
            assert_eq!(word(ty, json!(0.1)), small(0));
            assert_eq!(word(ty, json!(3.9)), small(3));
            assert_eq!(word(ty, json!("0.1")), small(0));
            assert_eq!(word(ty, json!("3.9")), small(3));
        }
        assert_eq!(word("int", json!(-3.9)), format!("{}d", "f".repeat(63)));
    }

    #[test]
    fn test_int_hex_is_raw_pattern() {
        let all_f = format!("0x{}", "f".repeat(64));
        let token = tokenize(&ParamType::Int(256), &json!(all_f)).unwrap();
        assert_eq!(token, Token::int256_from_i128(-1));
    }

    #[test]
    fn test_negative_hex() {
        let token = tokenize(&ParamType::Int(256), &json!("-0x10")).unwrap();
        assert_eq!(token, Token::int256_from_i128(-16));
    }

    #[test]
    fn test_negative_uint_twos_complement() {
        assert_eq!(word("uint", json!(-1)), "f".repeat(64));
    }

    #[test]
    fn test_large_decimal_string() {
        let max = U256::MAX.to_string();
        assert_eq!(word("uint", json!(max)), "f".repeat(64));
    }

    #[test]
    fn test_integer_overflow_rejected() {
        let too_big = format!("{}0", U256::MAX);
        assert!(matches!(
            tokenize(&ParamType::Uint(256), &json!(too_big)),
            Err(AbiError::Encoding(_))
        ));
        let too_long = format!("0x1{}", "0".repeat(64));
        assert!(matches!(
            tokenize(&ParamType::Uint(256), &json!(too_long)),
            Err(AbiError::Encoding(_))
        ));
    }

    #[test]
    fn test_int_signed_range() {
        let two_pow_255 = (U256::one() << 255).to_string();
        assert!(matches!(
            tokenize(&ParamType::Int(256), &json!(two_pow_255.clone())),
            Err(AbiError::Encoding(_))
        ));
        let below_min = ((U256::one() << 255) + U256::one()).to_string();
        assert!(matches!(
            tokenize(&ParamType::Int(256), &json!(format!("-{}", below_min))),
            Err(AbiError::Encoding(_))
        ));
        assert!(matches!(
            tokenize(&ParamType::Int(256), &json!(format!("-0x8{}1", "0".repeat(62)))),
            Err(AbiError::Encoding(_))
        ));

        // Both ends of the range are representable
        assert_eq!(
            word("int256", json!(format!("-{}", two_pow_255))),
            format!("8{}", "0".repeat(63))
        );
        let max = ((U256::one() << 255) - U256::one()).to_string();
        assert_eq!(word("int256", json!(max)), format!("7{}", "f".repeat(63)));
    }

    #[test]
    fn test_int_width_not_enforced() {
        assert_eq!(word("int8", json!(1000)), format!("{}3e8", "0".repeat(61)));
        assert_eq!(word("uint8", json!(256)), format!("{}100", "0".repeat(61)));
    }

    #[test]
    fn test_non_numeric_rejected() {
        for value in [json!("abc"), json!(""), json!("1.2.3"), json!(true), json!(null), json!("0x")] {
            assert!(
                matches!(tokenize(&ParamType::Uint(256), &value), Err(AbiError::Encoding(_))),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_parse_decimal_parts() {
        let d = parse_decimal("-12.50").unwrap();
        assert!(d.negative);
        assert_eq!(d.integer, U256::from(12));
        assert_eq!(d.fraction, "50");
        assert!(!d.raw_pattern);

        let d = parse_decimal("-0.0").unwrap();
        assert!(!d.negative);

        let d = parse_decimal(".5").unwrap();
        assert_eq!(d.integer, U256::zero());
        assert_eq!(d.fraction, "5");
    }

    // ==================== Fixed point ====================

    #[test]
    fn test_real_inputs() {
        assert_eq!(
            word("real", json!([1])),
            "0000000000000000000000000000000100000000000000000000000000000000"
        );
        assert_eq!(
            word("real", json!([2.125])),
            "0000000000000000000000000000000220000000000000000000000000000000"
        );
        assert_eq!(
            word("real", json!([8.5])),
            "0000000000000000000000000000000880000000000000000000000000000000"
        );
        assert_eq!(
            word("real", json!([-1])),
            format!("{}{}", "f".repeat(32), "0".repeat(32))
        );
    }

    #[test]
    fn test_ureal_inputs() {
        assert_eq!(
            word("ureal", json!(1)),
            "0000000000000000000000000000000100000000000000000000000000000000"
        );
        assert_eq!(
            word("ureal", json!("2.125")),
            "0000000000000000000000000000000220000000000000000000000000000000"
        );
    }

    #[test]
    fn test_fixed_integer_part_too_large() {
        let value = json!((U256::one() << 128).to_string());
        assert!(matches!(tokenize(&ParamType::Fixed, &value), Err(AbiError::Encoding(_))));
    }

    #[test]
    fn test_real_signed_range() {
        let two_pow_127 = (U256::one() << 127).to_string();
        assert!(matches!(
            tokenize(&ParamType::Fixed, &json!(two_pow_127.clone())),
            Err(AbiError::Encoding(_))
        ));
        assert!(matches!(
            tokenize(&ParamType::Fixed, &json!(format!("-{}.5", two_pow_127))),
            Err(AbiError::Encoding(_))
        ));
        assert_eq!(
            word("real", json!(format!("-{}", two_pow_127))),
            format!("8{}", "0".repeat(63))
        );

        // Unsigned fixed point keeps the full 128-bit integer part
        assert_eq!(word("ureal", json!(two_pow_127)), format!("8{}", "0".repeat(63)));
    }

    // ==================== Bool / address ====================

    #[test]
    fn test_bool_inputs() {
        assert_eq!(word("bool", json!(true)), small(1));
        assert_eq!(word("bool", json!(false)), small(0));
        assert_eq!(word("bool", json!(1)), small(1));
        assert_eq!(word("bool", json!("false")), small(0));
        assert!(tokenize(&ParamType::Bool, &json!(2)).is_err());
        assert!(tokenize(&ParamType::Bool, &json!("yes")).is_err());
    }

    #[test]
    fn test_address_inputs() {
        assert_eq!(
            word("address", json!("0x407d73d8a49eeb85d32cf465507dd71d507100c1")),
            "000000000000000000000000407d73d8a49eeb85d32cf465507dd71d507100c1"
        );
        assert_eq!(word("address", json!("0x1")), small(1));
        assert_eq!(word("address", json!(255)), small(255));
    }

    #[test]
    fn test_address_rejects_bad_input() {
        let too_long = format!("0x{}", "1".repeat(41));
        assert!(tokenize(&ParamType::Address, &json!(too_long)).is_err());
        assert!(tokenize(&ParamType::Address, &json!("0xzz")).is_err());
        assert!(tokenize(&ParamType::Address, &json!(true)).is_err());
    }

    // ==================== Bytes / string / arrays ====================

    #[test]
    fn test_bytes_inputs() {
        assert_eq!(
            tokenize(&ParamType::Bytes, &json!("hello")).unwrap(),
            Token::Bytes(b"hello".to_vec())
        );
        assert_eq!(
            tokenize(&ParamType::Bytes, &json!("0xdead")).unwrap(),
            Token::Bytes(vec![0xde, 0xad])
        );
        assert_eq!(
            tokenize(&ParamType::Bytes, &json!([1, 2, 255])).unwrap(),
            Token::Bytes(vec![1, 2, 255])
        );
        assert!(tokenize(&ParamType::Bytes, &json!([256])).is_err());
        assert!(tokenize(&ParamType::Bytes, &json!("0xzz")).is_err());
    }

    #[test]
    fn test_fixed_bytes_length_checked() {
        assert_eq!(
            tokenize(&ParamType::FixedBytes(4), &json!("0xdeadbeef")).unwrap(),
            Token::FixedBytes(vec![0xde, 0xad, 0xbe, 0xef])
        );
        assert!(tokenize(&ParamType::FixedBytes(2), &json!("0xdeadbeef")).is_err());
    }

    #[test]
    fn test_string_input() {
        assert_eq!(
            tokenize(&ParamType::String, &json!("hi")).unwrap(),
            Token::string("hi")
        );
        assert!(tokenize(&ParamType::String, &json!({})).is_err());
    }

    #[test]
    fn test_array_input() {
        let ty = parse_type("int[]").unwrap();
        assert_eq!(
            tokenize(&ty, &json!([5, "6"])).unwrap(),
            Token::Array(vec![Token::int256_from_i128(5), Token::int256_from_i128(6)])
        );
        assert!(tokenize(&ty, &json!(5)).is_err());
    }

    #[test]
    fn test_tokenize_all_count_mismatch() {
        let types = vec![ParamType::Uint(256)];
        assert!(matches!(
            tokenize_all(&types, &[json!(1), json!(2)]),
            Err(AbiError::Encoding(_))
        ));
    }
}
