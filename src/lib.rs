pub mod hotp;
pub mod resolver;
pub mod store;
pub mod totp;
pub(crate) mod uri_helper;

use core::num;
use std::fmt::Display;

use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Number of digits of every generated code
pub const DIGITS: u32 = 6;

/// Length of a TOTP time step in seconds
pub const PERIOD: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error("Secret is not valid base32: {0}")]
    SecretDecode(data_encoding::DecodeError),
    #[error("Invalid digest")]
    InvalidDigest(Vec<u8>),
    #[error("Could not build the HMAC key from the secret")]
    InvalidKey,
    #[error("The provided URI is not valid, found {0}. Expected: {1}")]
    InvalidUriType(String, String),
    #[error("Could not parse the URI")]
    UriParseError(url::ParseError),
    #[error("Could not retrieve the secret from the URI")]
    UriMissingSecret,
    #[error("Unsupported {0} in the URI, found {1}. Expected: {2}")]
    UnsupportedParameter(&'static str, String, String),
    #[error("Could not parse an integer. Failed parsing: {1}")]
    IntegerParseError(num::ParseIntError, String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OtpCode {
    code: u32,
}

impl OtpCode {
    pub fn integer(&self) -> u32 {
        self.code
    }
}

impl Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0padding$}", self.code, padding = DIGITS as usize)
    }
}

/// Strips the spaces issuers use to group a secret and uppercases it,
/// giving the form that is decoded and stored.
pub fn normalize_secret(secret: &str) -> String {
    secret
        .chars()
        .filter(|c| *c != ' ')
        .collect::<String>()
        .to_ascii_uppercase()
}

pub trait Otp {
    /// The RFC4648 base32 secret this generator was built with
    fn secret(&self) -> &str;

    /// Decodes a secret (given as an RFC4648 base32-encoded ASCII string)
    /// into a byte string. Case and grouping spaces are ignored, padding is
    /// optional but must be canonical when present.
    fn decode_secret(secret: &str) -> Result<Vec<u8>, OtpError> {
        let normalized = normalize_secret(secret);

        let decoded = if normalized.contains('=') {
            data_encoding::BASE32.decode(normalized.as_bytes())
        } else {
            data_encoding::BASE32_NOPAD.decode(normalized.as_bytes())
        };

        decoded.map_err(OtpError::SecretDecode)
    }

    /// Calculates the HMAC-SHA1 digest of the big-endian counter.
    fn calc_digest(decoded_secret: &[u8], counter: u64) -> Result<Vec<u8>, OtpError> {
        let mut mac =
            Hmac::<Sha1>::new_from_slice(decoded_secret).map_err(|_| OtpError::InvalidKey)?;
        mac.update(&counter.to_be_bytes());

        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Encodes the HMAC digest into a truncated integer.
    fn encode_digest_truncated(digest: &[u8]) -> Result<u32, OtpError> {
        // The low nibble of the last byte picks the window
        let offset = match digest.last() {
            Some(x) => *x & 0xf,
            None => return Err(OtpError::InvalidDigest(Vec::from(digest))),
        } as usize;

        // Gets the 4 bytes that will compose the code
        let code_bytes: [u8; 4] = match digest
            .get(offset..offset + 4)
            .and_then(|window| window.try_into().ok())
        {
            Some(x) => x,
            None => return Err(OtpError::InvalidDigest(Vec::from(digest))),
        };

        let code = u32::from_be_bytes(code_bytes);
        let truncation_factor = u32::pow(10, DIGITS);

        Ok((code & 0x7fffffff) % truncation_factor)
    }

    /// Runs the whole HOTP derivation for a single counter value.
    fn code_for_counter(&self, counter: u64) -> Result<OtpCode, OtpError> {
        let decoded = Self::decode_secret(self.secret())?;
        let digest = Self::calc_digest(decoded.as_slice(), counter)?;

        Ok(OtpCode {
            code: Self::encode_digest_truncated(digest.as_ref())?,
        })
    }
}
