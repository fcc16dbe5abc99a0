//! Input normalization for typed, pasted, and decoded values.
//!
//! QR stickers encode a landing URL (`https://host/qr/code/{code}`), while
//! agents often type the bare code. Both reduce to the same [`QrCandidate`].

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::CoreError;
use crate::model::QrCandidate;

/// Number of digits in an owner or login OTP.
pub const OTP_LEN: usize = 4;

/// Reduce raw input to a candidate code.
///
/// Never fails. Input that is not a `/qr/code/<segment>` URL is returned
/// trimmed and otherwise unchanged. Nested wrapping (a QR URL whose segment
/// is itself a QR URL) is unwrapped fully, which keeps the function
/// idempotent.
pub fn normalize(raw: &str) -> QrCandidate {
    let mut current = raw.trim().to_owned();
    while let Some(inner) = extract_code_segment(&current) {
        current = inner;
    }
    QrCandidate::new(current)
}

/// `Some(segment)` if `input` is an absolute URL whose path is
/// `/qr/code/<segment>` (trailing slash allowed), percent-decoded and trimmed.
fn extract_code_segment(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    let mut segments = url.path_segments()?;

    if segments.next()? != "qr" || segments.next()? != "code" {
        return None;
    }
    let segment = segments.next().filter(|s| !s.is_empty())?;
    match segments.next() {
        None | Some("") => {}
        Some(_) => return None,
    }
    if segments.next().is_some() {
        return None;
    }

    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    Some(decoded.trim().to_owned())
}

/// Normalize an Indian mobile number to E.164.
///
/// Blank stays blank, `+`-prefixed input is kept, 10 digits gain `+91`,
/// 12 digits starting with `91` gain `+`. Anything else is returned trimmed.
pub fn normalize_indian_phone(input: &str) -> String {
    let raw = input.trim();
    if raw.is_empty() || raw.starts_with('+') {
        return raw.to_owned();
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => format!("+91{digits}"),
        12 if digits.starts_with("91") => format!("+{digits}"),
        _ => raw.to_owned(),
    }
}

/// Strip non-digits from an OTP and require exactly [`OTP_LEN`] digits.
pub fn parse_otp(input: &str) -> Result<String, CoreError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == OTP_LEN {
        Ok(digits)
    } else {
        Err(CoreError::validation(format!("Enter the {OTP_LEN}-digit OTP")))
    }
}
