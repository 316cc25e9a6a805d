//! The percent-decoding collaborator.
//!
//! Applied uniformly to every raw `Value` token -- key segments and pair
//! values alike -- before the text enters the tree. Decoding is strict: a
//! `%` not followed by two hex digits is an error, as is a decoded byte
//! sequence that is not UTF-8.

use std::borrow::Cow;
use std::str;

use crate::error::{Error, Result};

#[inline(always)]
fn hex_digit(b: u8) -> Option<u8> {
    char::from(b).to_digit(16).map(|d| d as u8)
}

/// Decodes `+` as space and `%XY` escapes, borrowing when the input contains
/// neither. `base` is the byte offset of `input` within the overall
/// querystring, used to position errors.
pub(crate) fn decode(input: &[u8], base: usize) -> Result<Cow<'_, str>> {
    if !input.iter().any(|&b| b == b'+' || b == b'%') {
        return Ok(Cow::Borrowed(str::from_utf8(input)?));
    }

    let mut decoded = Vec::with_capacity(input.len());
    let mut last_segment = 0;
    let mut iter = input.iter().enumerate();

    while let Some((idx, &b)) = iter.next() {
        if b == b'+' {
            decoded.extend_from_slice(&input[last_segment..idx]);
            decoded.push(b' ');
            last_segment = idx + 1;
        } else if b == b'%' {
            let high = iter.next().and_then(|(_, &b)| hex_digit(b));
            let low = iter.next().and_then(|(_, &b)| hex_digit(b));
            let (Some(high), Some(low)) = (high, low) else {
                return Err(Error::Decode {
                    position: base + idx,
                });
            };
            decoded.extend_from_slice(&input[last_segment..idx]);
            decoded.push(high * 0x10 + low);
            last_segment = idx + 3;
        }
    }
    decoded.extend_from_slice(&input[last_segment..]);

    match String::from_utf8(decoded) {
        Ok(s) => Ok(Cow::Owned(s)),
        Err(e) => Err(Error::Utf8(e.utf8_error())),
    }
}
