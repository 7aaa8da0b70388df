use crate::error::Error;

/// Truncation marker the engine appends when it cuts an offending value short.
pub const ELLIPSIS: &str = "...";

/// Decode a backslash-escaped hex byte sequence (`\xNN\xNN...`) back into
/// readable text.
///
/// A trailing [`ELLIPSIS`] is excluded from decoding and re-appended verbatim.
/// The bytes are interpreted as UTF-8; the engine dumps whole codepoints, so a
/// partial sequence means the message does not have the shape we assumed and
/// is surfaced as [`Error::HexDecode`] rather than a silently wrong string.
pub fn decode(hex_text: &str) -> Result<String, Error> {
    let (body, truncated) = match hex_text.strip_suffix(ELLIPSIS) {
        Some(rest) => (rest, true),
        None => (hex_text, false),
    };

    let mut bytes = Vec::with_capacity(body.len() / 4);
    let mut rest = body;
    while !rest.is_empty() {
        let after_escape = rest.strip_prefix("\\x").ok_or_else(|| Error::HexDecode {
            reason: format!("expected \\x escape at {rest:?}"),
        })?;
        let digits = after_escape.get(..2).ok_or_else(|| Error::HexDecode {
            reason: format!("truncated hex pair at {after_escape:?}"),
        })?;
        let byte = u8::from_str_radix(digits, 16).map_err(|_| Error::HexDecode {
            reason: format!("invalid hex digits {digits:?}"),
        })?;
        bytes.push(byte);
        rest = after_escape.get(2..).unwrap_or("");
    }

    let mut decoded = String::from_utf8(bytes).map_err(|e| Error::HexDecode {
        reason: format!("decoded bytes are not valid utf-8: {e}"),
    })?;
    if truncated {
        decoded.push_str(ELLIPSIS);
    }
    Ok(decoded)
}

/// Encode text into the `\xNN` form the MySQL-like engine emits.
pub fn encode(text: &str) -> String {
    text.bytes().map(|b| format!("\\x{b:02X}")).collect()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::{ELLIPSIS, decode, encode};

    fn lcg_next(state: &mut u64) -> u64 {
        *state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        *state
    }

    fn random_text(state: &mut u64) -> String {
        let len = lcg_next(state) % 24;
        (0..len)
            .filter_map(|_| char::from_u32((lcg_next(state) % 0x11_0000) as u32))
            .collect()
    }

    #[test]
    fn decodes_smiley_codepoint_dump() {
        assert_eq!(decode("\\xF0\\x9F\\x98\\x80").unwrap(), "😀");
    }

    #[test]
    fn trailing_ellipsis_is_preserved_and_excluded_from_decoding() {
        assert_eq!(decode("\\xF0\\x9F\\x98\\x80...").unwrap(), "😀...");
    }

    #[test]
    fn empty_input_decodes_to_empty_string() {
        assert_eq!(decode("").unwrap(), "");
        assert_eq!(decode("...").unwrap(), "...");
    }

    #[test]
    fn encode_matches_engine_shape() {
        assert_eq!(encode("ab"), "\\x61\\x62");
        assert_eq!(encode("😀"), "\\xF0\\x9F\\x98\\x80");
    }

    #[test]
    fn round_trip_property_holds_for_randomized_text() {
        let mut seed = 0x00C0_FFEE_u64;
        for _ in 0..5_000 {
            let text = random_text(&mut seed);
            assert_eq!(decode(&encode(&text)).unwrap(), text);

            let with_marker = format!("{}{ELLIPSIS}", encode(&text));
            assert_eq!(decode(&with_marker).unwrap(), format!("{text}{ELLIPSIS}"));
        }
    }

    #[test]
    fn odd_length_hex_is_rejected() {
        assert!(decode("\\xF").is_err());
    }

    #[test]
    fn missing_escape_prefix_is_rejected() {
        assert!(decode("F0 9F").is_err());
        assert!(decode("\\xF0\\9F").is_err());
    }

    #[test]
    fn non_hex_digits_are_rejected() {
        assert!(decode("\\xZZ").is_err());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        // lone continuation byte
        assert!(decode("\\x80").is_err());
    }
}
