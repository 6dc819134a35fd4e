use crate::{Otp, OtpCode, OtpError};

#[derive(Debug, Clone, PartialEq)]
pub struct Hotp {
    pub(crate) secret: String,
}

impl Otp for Hotp {
    fn secret(&self) -> &str {
        &self.secret
    }
}

impl Hotp {
    /// Creates the config for the [HMAC-based One-time Password Algorithm](http://en.wikipedia.org/wiki/HMAC-based_One-time_Password_Algorithm)
    /// (HOTP) given an RFC4648 base32 encoded secret
    ///
    /// Obs.: codes are always HMAC-SHA1 and 6 digits long.
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Generates a HOTP from the provided counter
    pub fn generate(&self, counter: u64) -> Result<OtpCode, OtpError> {
        self.code_for_counter(counter)
    }
}
