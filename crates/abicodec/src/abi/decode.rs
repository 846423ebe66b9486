//! ABI decoding

use abicodec_primitives::{U256, WORD_SIZE};
use tracing::{debug, trace};

use super::types::{parse_type, ParamType, Token};
use super::word::{decode_word, words_for};
use crate::{AbiError, Layout};

/// Decode tokens from data in the standard head/tail layout
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_with(Layout::Standard, types, data)
}

/// Decode tokens with an explicit layout
pub fn decode_with(layout: Layout, types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    debug!(params = types.len(), bytes = data.len(), ?layout, "Decoding parameters");
    match layout {
        Layout::Standard => decode_standard(types, data),
        Layout::Legacy => decode_legacy(types, data),
    }
}

/// Decode function return data
pub fn decode_output(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode(types, data)
}

/// Decode a hex stream (with or without `0x`) against type strings
pub fn decode_parameters(types: &[&str], data: &str) -> Result<Vec<Token>, AbiError> {
    decode_parameters_with(Layout::Standard, types, data)
}

/// [`decode_parameters`] with an explicit layout
pub fn decode_parameters_with(
    layout: Layout,
    types: &[&str],
    data: &str,
) -> Result<Vec<Token>, AbiError> {
    let types = types
        .iter()
        .map(|t| parse_type(t))
        .collect::<Result<Vec<_>, _>>()?;
    let bytes = decode_hex(data)?;
    decode_with(layout, &types, &bytes)
}

/// Decode a single parameter from its hex encoding
pub fn decode_param(param_type: &str, data: &str) -> Result<Token, AbiError> {
    decode_parameters(&[param_type], data)?
        .into_iter()
        .next()
        .ok_or_else(|| AbiError::Decoding("no value decoded".to_string()))
}

/// Hex stream to bytes; malformed input is a decoding error
pub fn decode_hex(data: &str) -> Result<Vec<u8>, AbiError> {
    let digits = data.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    if digits.len() % 2 != 0 {
        return Err(AbiError::Decoding(format!(
            "hex stream has odd length {}",
            digits.len()
        )));
    }
    hex::decode(digits).map_err(|e| AbiError::Decoding(format!("invalid hex stream: {}", e)))
}

fn decode_standard(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(types.len());

    for (index, param_type) in types.iter().enumerate() {
        let head = index * WORD_SIZE;
        if param_type.is_dynamic() {
            let offset = read_usize(data, head)?;
            trace!(%param_type, offset, "seeking dynamic parameter");
            let len = read_usize(data, offset)?;
            let start = offset
                .checked_add(WORD_SIZE)
                .ok_or_else(|| out_of_range(offset))?;
            tokens.push(decode_content(param_type, data, start, len)?);
        } else {
            tokens.push(decode_word(param_type, read_word(data, head)?)?);
        }
    }

    Ok(tokens)
}

// Mirrors the legacy encoder: lengths, statics, then contents, read in sequence.
fn decode_legacy(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let dynamic_count = types.iter().filter(|t| t.is_dynamic()).count();
    let mut lengths = Vec::with_capacity(dynamic_count);
    for i in 0..dynamic_count {
        lengths.push(read_usize(data, i * WORD_SIZE)?);
    }

    let mut cursor = dynamic_count * WORD_SIZE;
    let mut statics = Vec::new();
    for param_type in types.iter().filter(|t| !t.is_dynamic()) {
        statics.push(decode_word(param_type, read_word(data, cursor)?)?);
        cursor += WORD_SIZE;
    }

    let mut statics = statics.into_iter();
    let mut lengths = lengths.into_iter();
    let mut tokens = Vec::with_capacity(types.len());
    for param_type in types {
        if param_type.is_dynamic() {
            let len = lengths
                .next()
                .ok_or_else(|| AbiError::Decoding("missing length word".to_string()))?;
            let token = decode_content(param_type, data, cursor, len)?;
            cursor = cursor
                .checked_add(content_size(param_type, len)?)
                .ok_or_else(|| out_of_range(cursor))?;
            tokens.push(token);
        } else {
            let token = statics
                .next()
                .ok_or_else(|| AbiError::Decoding("missing static value".to_string()))?;
            tokens.push(token);
        }
    }

    Ok(tokens)
}

/// Decode `len` elements or bytes of a dynamic value starting at `start`
fn decode_content(
    param_type: &ParamType,
    data: &[u8],
    start: usize,
    len: usize,
) -> Result<Token, AbiError> {
    match param_type {
        ParamType::Bytes => Ok(Token::Bytes(read_bytes(data, start, len)?.to_vec())),
        ParamType::String => {
            let bytes = read_bytes(data, start, len)?;
            String::from_utf8(bytes.to_vec())
                .map(Token::String)
                .map_err(|e| AbiError::Decoding(format!("Invalid UTF-8: {}", e)))
        }
        ParamType::Array(inner) => {
            // Element count must have a representable byte size
            content_size(param_type, len)?;
            let mut items = Vec::with_capacity(len.min(data.len() / WORD_SIZE));
            for i in 0..len {
                let pos = start
                    .checked_add(i * WORD_SIZE)
                    .ok_or_else(|| out_of_range(start))?;
                items.push(decode_word(inner, read_word(data, pos)?)?);
            }
            Ok(Token::Array(items))
        }
        other => Err(AbiError::Decoding(format!("{} is not dynamic", other))),
    }
}

/// Bytes occupied by the content words of a dynamic value
fn content_size(param_type: &ParamType, len: usize) -> Result<usize, AbiError> {
    let size = match param_type {
        ParamType::Array(_) => len.checked_mul(WORD_SIZE),
        _ => words_for(len).checked_mul(WORD_SIZE),
    };
    size.ok_or_else(|| AbiError::Decoding(format!("length {} is too large", len)))
}

fn read_word(data: &[u8], pos: usize) -> Result<&[u8], AbiError> {
    read_bytes(data, pos, WORD_SIZE)
}

fn read_bytes(data: &[u8], pos: usize, len: usize) -> Result<&[u8], AbiError> {
    let end = pos.checked_add(len).ok_or_else(|| out_of_range(pos))?;
    data.get(pos..end).ok_or_else(|| {
        AbiError::Decoding(format!(
            "Insufficient data: need {} bytes, have {}",
            end,
            data.len()
        ))
    })
}

/// Read a word holding an offset or length
fn read_usize(data: &[u8], pos: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(read_word(data, pos)?);
    if value > U256::from(usize::MAX) {
        return Err(AbiError::Decoding(format!(
            "offset or length {} does not fit in memory",
            value
        )));
    }
    Ok(value.as_usize())
}

fn out_of_range(pos: usize) -> AbiError {
    AbiError::Decoding(format!("position overflow after byte {}", pos))
}
