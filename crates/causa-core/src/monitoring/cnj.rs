//! CNJ case-number normalization.
//!
//! The Brazilian National Council of Justice canonical format is 20
//! digits grouped 7-2-4-1-2-4: `NNNNNNN-DD.AAAA.J.TR.OOOO`.

/// Normalize a raw case number to the CNJ canonical format.
///
/// Strips every non-digit first. Anything other than exactly 20 digits is
/// passed through unchanged; a short or overlong number must reach the
/// API as the user entered it rather than as a malformed reformat.
pub fn normalize(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 20 {
        return raw.to_string();
    }

    format!(
        "{}-{}.{}.{}.{}.{}",
        &digits[..7],
        &digits[7..9],
        &digits[9..13],
        &digits[13..14],
        &digits[14..16],
        &digits[16..20]
    )
}
