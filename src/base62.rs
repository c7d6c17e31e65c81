// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Base62 rendering of IDs, for short textual handles such as URL codes.

use crate::error::Error;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// `u64::MAX` is 11 digits long in base62.
const MAX_LEN: usize = 11;

/// Encode `n` in base62. Zero is `"0"`.
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = [0u8; MAX_LEN];
    let mut i = MAX_LEN;
    while n > 0 {
        i -= 1;
        buf[i] = ALPHABET[(n % 62) as usize];
        n /= 62;
    }
    buf[i..].iter().map(|&b| b as char).collect()
}

/// Decode a base62 string produced by [`encode`].
pub fn decode(s: &str) -> Result<u64, Error> {
    if s.is_empty() {
        return Err(Error::EmptyBase62);
    }
    s.chars().enumerate().try_fold(0u64, |n, (position, ch)| {
        let digit = digit(ch).ok_or(Error::InvalidBase62Char { ch, position })?;
        n.checked_mul(62)
            .and_then(|n| n.checked_add(digit))
            .ok_or(Error::Base62Overflow)
    })
}

fn digit(ch: char) -> Option<u64> {
    let v = match ch {
        '0'..='9' => ch as u8 - b'0',
        'A'..='Z' => ch as u8 - b'A' + 10,
        'a'..='z' => ch as u8 - b'a' + 36,
        _ => return None,
    };
    Some(v as u64)
}
