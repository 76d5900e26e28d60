//! Base64 engines for cursor tokens.
//!
//! Tokens are written with the URL-safe alphabet and no padding so they can
//! travel in query strings without further escaping. Decoding also accepts the
//! standard alphabet and padded input.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// URL-safe base64 without padding.
pub(super) fn base64_encode(input: &[u8]) -> String {
    URL_SAFE_LENIENT.encode(input)
}

/// Decode URL-safe or standard base64, padded or not.
pub(super) fn base64_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_LENIENT
        .decode(input)
        .or_else(|_| STANDARD_LENIENT.decode(input))
}
