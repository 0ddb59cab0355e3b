// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::NumberingScheme;
use crate::errors::FormatError;

/// One base-B limb holding `token_width` decimal digits.
pub type Token = u32;

/// Newtype wrapper for an operand or result: tokens ordered most significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BigNumber(pub Vec<Token>);

impl BigNumber {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    /// Append tokens at the least significant end
    pub fn extend_from_slice(&mut self, tokens: &[Token]) {
        self.0.extend_from_slice(tokens);
    }
}

impl From<Vec<Token>> for BigNumber {
    fn from(tokens: Vec<Token>) -> Self {
        Self(tokens)
    }
}

/// Slice a decimal string into fixed-width tokens, left to right.
///
/// # Errors
/// * `FormatError::LengthNotMultiple` - the string cannot be cut into whole tokens
/// * `FormatError::NonDigit` - a character outside `0..=9`
///
/// # Example
/// ```
/// use the_carry_chain::codec::encode;
/// use the_carry_chain::config::NumberingScheme;
///
/// let number = encode("000000001999999999", &NumberingScheme::default()).unwrap();
/// assert_eq!(number.tokens(), &[1, 999_999_999]);
/// ```
pub fn encode(digits: &str, scheme: &NumberingScheme) -> Result<BigNumber, FormatError> {
    let width = scheme.token_width();
    let bytes = digits.as_bytes();

    if let Some((position, found)) = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(FormatError::NonDigit { position, found });
    }

    if bytes.len() % width != 0 {
        return Err(FormatError::LengthNotMultiple {
            length: bytes.len(),
            width,
        });
    }

    let tokens = bytes
        .chunks(width)
        .map(|group| {
            group
                .iter()
                .fold(0 as Token, |acc, digit| acc * 10 + Token::from(digit - b'0'))
        })
        .collect();

    Ok(BigNumber(tokens))
}

/// Render tokens back into a decimal string.
///
/// Every token is zero-padded to the token width, except the first one when
/// `leading_token_unpadded` is set. That flag is used when a carry-out adds a
/// partial leading token such as a lone `1`.
///
/// # Errors
/// * `FormatError::TokenOutOfRange` - a token is not below the numbering base
pub fn decode(
    number: &BigNumber,
    scheme: &NumberingScheme,
    leading_token_unpadded: bool,
) -> Result<String, FormatError> {
    let width = scheme.token_width();
    let mut out = String::with_capacity(number.len() * width);

    for (index, &value) in number.tokens().iter().enumerate() {
        if value >= scheme.base() {
            return Err(FormatError::TokenOutOfRange { index, value });
        }
        if index == 0 && leading_token_unpadded {
            out.push_str(&value.to_string());
        } else {
            out.push_str(&format!("{:0width$}", value, width = width));
        }
    }

    Ok(out)
}
