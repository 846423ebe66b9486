//! ABI encoding

use abicodec_primitives::{u256_to_word, U256, WORD_SIZE};
use serde_json::Value;
use tracing::{debug, trace};

use super::coerce::tokenize_all;
use super::types::{parse_type, ParamType, Token};
use super::word::{encode_word, pad_right};
use crate::{AbiError, Layout};

/// Encode tokens, inferring each parameter type from its token
pub fn encode(tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    let types: Vec<ParamType> = tokens.iter().map(|t| t.type_of()).collect();
    encode_params(&types, tokens)
}

/// Encode function call (selector + params)
pub fn encode_function_call(selector: [u8; 4], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    let mut result = selector.to_vec();
    result.extend(encode(tokens)?);
    Ok(result)
}

/// Encode parameters with the standard head/tail layout
pub fn encode_params(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    encode_params_with(Layout::Standard, types, tokens)
}

/// Encode parameters with an explicit layout
pub fn encode_params_with(
    layout: Layout,
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, AbiError> {
    if types.len() != tokens.len() {
        return Err(AbiError::Encoding(format!(
            "expected {} values, got {}",
            types.len(),
            tokens.len()
        )));
    }
    debug!(params = types.len(), ?layout, "Encoding parameters");

    match layout {
        Layout::Standard => encode_standard(types, tokens),
        Layout::Legacy => encode_legacy(types, tokens),
    }
}

/// Encode JSON values against type strings, returning hex without `0x`
pub fn encode_parameters(types: &[&str], values: &[Value]) -> Result<String, AbiError> {
    encode_parameters_with(Layout::Standard, types, values)
}

/// [`encode_parameters`] with an explicit layout
pub fn encode_parameters_with(
    layout: Layout,
    types: &[&str],
    values: &[Value],
) -> Result<String, AbiError> {
    let types = types
        .iter()
        .map(|t| parse_type(t))
        .collect::<Result<Vec<_>, _>>()?;
    let tokens = tokenize_all(&types, values)?;
    encode_params_with(layout, &types, &tokens).map(hex::encode)
}

// Head: one word per parameter, offsets for dynamic ones.
// Tail: dynamic contents in parameter order.
fn encode_standard(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    let head_size = types.len() * WORD_SIZE;

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (param_type, token) in types.iter().zip(tokens) {
        if param_type.is_dynamic() {
            let offset = head_size + tail.len();
            trace!(%param_type, offset, "dynamic parameter");
            head.extend(u256_to_word(&U256::from(offset)));
            tail.extend(encode_length(param_type, token)?);
            tail.extend(encode_content(param_type, token)?);
        } else {
            head.extend(encode_word(param_type, token)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

// Lengths of every dynamic parameter, then static values, then dynamic contents.
fn encode_legacy(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    let mut lengths = Vec::new();
    let mut statics = Vec::new();
    let mut contents = Vec::new();

    for (param_type, token) in types.iter().zip(tokens) {
        if param_type.is_dynamic() {
            lengths.extend(encode_length(param_type, token)?);
            contents.extend(encode_content(param_type, token)?);
        } else {
            statics.extend(encode_word(param_type, token)?);
        }
    }
    trace!(
        lengths = lengths.len() / WORD_SIZE,
        statics = statics.len() / WORD_SIZE,
        contents = contents.len() / WORD_SIZE,
        "legacy sections"
    );

    lengths.extend(statics);
    lengths.extend(contents);
    Ok(lengths)
}

/// Length word of a dynamic value: byte count or element count
fn encode_length(param_type: &ParamType, token: &Token) -> Result<[u8; WORD_SIZE], AbiError> {
    let len = match (param_type, token) {
        (ParamType::Bytes, Token::Bytes(data)) => data.len(),
        (ParamType::String, Token::String(s)) => s.len(),
        (ParamType::Array(_), Token::Array(items)) => items.len(),
        _ => return Err(dynamic_mismatch(param_type, token)),
    };
    Ok(u256_to_word(&U256::from(len)))
}

/// Content words of a dynamic value, without its length word
fn encode_content(param_type: &ParamType, token: &Token) -> Result<Vec<u8>, AbiError> {
    match (param_type, token) {
        (ParamType::Bytes, Token::Bytes(data)) => Ok(pad_right(data)),
        (ParamType::String, Token::String(s)) => Ok(pad_right(s.as_bytes())),
        (ParamType::Array(inner), Token::Array(items)) => {
            let mut result = Vec::with_capacity(items.len() * WORD_SIZE);
            for item in items {
                result.extend(encode_word(inner, item)?);
            }
            Ok(result)
        }
        _ => Err(dynamic_mismatch(param_type, token)),
    }
}

fn dynamic_mismatch(param_type: &ParamType, token: &Token) -> AbiError {
    AbiError::Encoding(format!(
        "cannot encode {} value as {}",
        token.kind(),
        param_type
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::function_selector;
    use abicodec_primitives::Address;
    use serde_json::json;

    fn words(values: &[u64]) -> String {
        values
            .iter()
            .map(|v| hex::encode(u256_to_word(&U256::from(*v))))
            .collect()
    }

    // ==================== Standard layout ====================

    #[test]
    fn test_encode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let encoded = encode(&[Token::Address(addr)]).unwrap();

        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[12..32], addr.as_bytes());
    }

    #[test]
    fn test_encode_static_params() {
        let encoded = encode(&[Token::uint256_from_u128(100), Token::Bool(true)]).unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 100);
        assert_eq!(encoded[63], 1);
    }

    #[test]
    fn test_encode_dynamic_bytes() {
        let data = vec![0x01, 0x02, 0x03];
        let encoded = encode(&[Token::Bytes(data.clone())]).unwrap();

        // offset, length, padded data
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[31], 32);
        assert_eq!(encoded[63], 3);
        assert_eq!(&encoded[64..67], &data[..]);
    }

    #[test]
    fn test_encode_single_array() {
        let hex = encode_parameters(&["int[]"], &[json!([3])]).unwrap();
        assert_eq!(hex, words(&[0x20, 1, 3]));
    }

    #[test]
    fn test_encode_mixed_offsets() {
        let hex = encode_parameters(
            &["uint256", "string", "int[]"],
            &[json!(7), json!("hello"), json!([1, 2])],
        )
        .unwrap();

        let expected = format!(
            "{}{}{}{}{}",
            words(&[7, 0x60, 0xa0]),
            words(&[5]),
            "68656c6c6f000000000000000000000000000000000000000000000000000000",
            words(&[2]),
            words(&[1, 2]),
        );
        assert_eq!(hex, expected);
    }

    #[test]
    fn test_encode_empty_dynamic_values() {
        let hex = encode_parameters(&["bytes", "uint[]"], &[json!(""), json!([])]).unwrap();
        assert_eq!(hex, words(&[0x40, 0x60, 0, 0]));
    }

    #[test]
    fn test_encode_zero_params() {
        assert!(encode_params(&[], &[]).unwrap().is_empty());
        assert_eq!(encode_parameters(&[], &[]).unwrap(), "");
    }

    #[test]
    fn test_output_is_word_aligned() {
        let hex = encode_parameters(
            &["string", "bytes"],
            &[json!("a".repeat(33)), json!("0x01")],
        )
        .unwrap();
        assert_eq!(hex.len() % 64, 0);
    }

    // ==================== Legacy layout ====================

    #[test]
    fn test_legacy_bytes_then_int() {
        let hex = encode_parameters_with(Layout::Legacy, &["bytes", "int"], &[json!("hello"), json!(9)])
            .unwrap();
        assert_eq!(
            hex,
            format!(
                "{}{}",
                words(&[5, 9]),
                "68656c6c6f000000000000000000000000000000000000000000000000000000"
            )
        );
    }

    #[test]
    fn test_legacy_arrays_and_ints() {
        let hex = encode_parameters_with(
            Layout::Legacy,
            &["int", "int[]", "int", "int[]"],
            &[json!(3), json!([5, 6, 1, 2]), json!(7), json!([8, 9])],
        )
        .unwrap();
        assert_eq!(hex, words(&[4, 2, 3, 7, 5, 6, 1, 2, 8, 9]));
    }

    // ==================== Errors ====================

    #[test]
    fn test_count_mismatch() {
        let result = encode_params(&[ParamType::Uint(256)], &[]);
        assert!(matches!(result, Err(AbiError::Encoding(_))));
    }

    #[test]
    fn test_token_type_mismatch() {
        let result = encode_params(&[ParamType::String], &[Token::Bool(true)]);
        assert!(matches!(result, Err(AbiError::Encoding(_))));

        let array = ParamType::Array(Box::new(ParamType::Bool));
        let result = encode_params(&[array], &[Token::Array(vec![Token::string("x")])]);
        assert!(matches!(result, Err(AbiError::Encoding(_))));
    }

    #[test]
    fn test_invalid_type_string() {
        let result = encode_parameters(&["uin"], &[json!(1)]);
        assert!(matches!(result, Err(AbiError::InvalidType(_))));
    }

    // ==================== Function calls ====================

    #[test]
    fn test_encode_function_call() {
        let to = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let selector = function_selector("transfer(address,uint256)");
        let encoded = encode_function_call(
            selector,
            &[Token::Address(to), Token::Uint(U256::from(1000))],
        )
        .unwrap();

        // 4 bytes selector + 32 bytes address + 32 bytes uint
        assert_eq!(encoded.len(), 68);
        assert_eq!(&encoded[..4], &selector);
    }
}
