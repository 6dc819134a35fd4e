use crate::{
    uri_helper::{otp_from_uri, otp_to_uri},
    Otp, OtpCode, OtpError, PERIOD,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Totp {
    pub(crate) secret: String,
}

impl Otp for Totp {
    fn secret(&self) -> &str {
        &self.secret
    }
}

impl Totp {
    /// Creates the config for the [Time-based One-time Password Algorithm](http://en.wikipedia.org/wiki/Time-based_One-time_Password_Algorithm)
    /// (TOTP) given an RFC4648 base32 encoded secret
    ///
    /// Obs.: codes are always HMAC-SHA1, 6 digits and a period of 30 seconds
    /// counted from the UNIX epoch
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Generates a Totp from the provided seconds since the UNIX epoch
    pub fn generate(&self, seconds_since_epoch: u64) -> Result<OtpCode, OtpError> {
        self.code_for_counter(seconds_since_epoch / PERIOD)
    }

    /// Seconds left before the code for `seconds_since_epoch` rolls over
    pub fn remaining_seconds(&self, seconds_since_epoch: u64) -> u64 {
        PERIOD - seconds_since_epoch % PERIOD
    }

    /// Renders an `otpauth://totp/` URI, the payload authenticator apps scan
    /// from QR codes
    pub fn to_uri(&self, account: &str, issuer: Option<&str>) -> Result<String, OtpError> {
        otp_to_uri(self, account, issuer)
    }

    /// Reads the secret out of an `otpauth://totp/` URI. URIs asking for a
    /// different algorithm, digit count or period are rejected.
    pub fn from_uri(uri: &str) -> Result<Self, OtpError> {
        otp_from_uri(uri)
    }
}

/// Computes the current 6-digit code of a base32 `secret` at `now`
/// (seconds since the UNIX epoch).
pub fn compute(secret: &str, now: u64) -> Result<OtpCode, OtpError> {
    Totp::new(secret.to_string()).generate(now)
}
