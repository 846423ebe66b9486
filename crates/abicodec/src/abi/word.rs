//! Single-word codec
//!
//! Every static ABI value occupies exactly one 32-byte word: numbers are
//! right aligned (zero or sign extended), fixed bytes are left aligned and
//! zero padded on the right.

use abicodec_primitives::{u256_to_word, Address, Word, U256, WORD_SIZE};

use super::types::{I256, ParamType, Token};
use crate::AbiError;

/// Encode a static token as one word
pub fn encode_word(param_type: &ParamType, token: &Token) -> Result<Word, AbiError> {
    match (param_type, token) {
        (ParamType::Address, Token::Address(addr)) => Ok(addr.to_word()),
        (ParamType::Uint(_), Token::Uint(value)) => Ok(u256_to_word(value)),
        (ParamType::Int(_), Token::Int(value)) => Ok(u256_to_word(&value.to_twos_complement())),
        (ParamType::Bool, Token::Bool(b)) => {
            let mut word = [0u8; WORD_SIZE];
            word[31] = u8::from(*b);
            Ok(word)
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() > *size {
                return Err(AbiError::Encoding(format!(
                    "{} bytes do not fit in bytes{}",
                    data.len(),
                    size
                )));
            }
            let mut word = [0u8; WORD_SIZE];
            word[..data.len()].copy_from_slice(data);
            Ok(word)
        }
        (ParamType::Fixed, Token::Fixed(raw)) => Ok(u256_to_word(&raw.to_twos_complement())),
        (ParamType::UFixed, Token::UFixed(raw)) => Ok(u256_to_word(raw)),
        (ParamType::Bytes | ParamType::String | ParamType::Array(_), _) => {
            Err(AbiError::Encoding(format!(
                "{} is dynamic and has no single-word encoding",
                param_type
            )))
        }
        _ => Err(AbiError::Encoding(format!(
            "cannot encode {} value as {}",
            token.kind(),
            param_type
        ))),
    }
}

/// Encode a static token as 64 lowercase hex characters
pub fn encode_word_hex(param_type: &ParamType, token: &Token) -> Result<String, AbiError> {
    encode_word(param_type, token).map(hex::encode)
}

/// Decode one word into a token of a static type
pub fn decode_word(param_type: &ParamType, word: &[u8]) -> Result<Token, AbiError> {
    if word.len() != WORD_SIZE {
        return Err(AbiError::Decoding(format!(
            "word must be 32 bytes, got {}",
            word.len()
        )));
    }

    match param_type {
        ParamType::Address => Address::from_word(word)
            .map(Token::Address)
            .map_err(|e| AbiError::Decoding(e.to_string())),
        ParamType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(word))),
        ParamType::Int(_) => Ok(Token::Int(I256::from_twos_complement(U256::from_big_endian(word)))),
        ParamType::Bool => Ok(Token::Bool(word.iter().any(|b| *b != 0))),
        ParamType::FixedBytes(size) => Ok(Token::FixedBytes(word[..*size].to_vec())),
        ParamType::Fixed => Ok(Token::Fixed(I256::from_twos_complement(U256::from_big_endian(word)))),
        ParamType::UFixed => Ok(Token::UFixed(U256::from_big_endian(word))),
        ParamType::Bytes | ParamType::String | ParamType::Array(_) => Err(AbiError::Decoding(
            format!("{} is dynamic and cannot be read from a single word", param_type),
        )),
    }
}

/// `data` zero padded on the right to `ceil(len/32)` words
pub fn pad_right(data: &[u8]) -> Vec<u8> {
    let padded_len = words_for(data.len()) * WORD_SIZE;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    padded
}

/// Number of words needed for `len` bytes
pub fn words_for(len: usize) -> usize {
    len.div_ceil(WORD_SIZE)
}
