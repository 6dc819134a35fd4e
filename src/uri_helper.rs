use std::{borrow::Cow, str::FromStr};

use crate::{normalize_secret, totp::Totp, OtpError, DIGITS, PERIOD};

const URI_SCHEME: &str = "otpauth";
const TOTP_TYPE: &str = "totp";
const SUPPORTED_ALGORITHM: &str = "SHA1";

const URI_SECRET_QUERY: &str = "secret";
const URI_ISSUER_QUERY: &str = "issuer";
const URI_HASH_QUERY: &str = "algorithm";
const URI_PERIOD_QUERY: &str = "period";
const URI_DIGITS_QUERY: &str = "digits";

pub fn otp_from_uri(uri: &str) -> Result<Totp, OtpError> {
    let uri = url::Url::parse(uri).map_err(OtpError::UriParseError)?;

    let domain = uri.domain();
    if uri.scheme() != URI_SCHEME || domain.is_none() || domain.is_some_and(|d| d != TOTP_TYPE) {
        return Err(OtpError::InvalidUriType(
            format!("{}://{}", uri.scheme(), domain.unwrap_or("None")),
            format!("{URI_SCHEME}://{TOTP_TYPE}"),
        ));
    }

    let mut secret = "".to_string();

    for params in uri.query_pairs() {
        match params.0 {
            Cow::Borrowed(URI_SECRET_QUERY) => secret = normalize_secret(params.1.as_ref()),
            Cow::Borrowed(URI_HASH_QUERY) => {
                let algorithm = params.1.to_uppercase();
                if algorithm != SUPPORTED_ALGORITHM {
                    return Err(OtpError::UnsupportedParameter(
                        URI_HASH_QUERY,
                        params.1.to_string(),
                        SUPPORTED_ALGORITHM.into(),
                    ));
                }
            }
            Cow::Borrowed(URI_PERIOD_QUERY) => {
                let period = u64::from_str(params.1.as_ref())
                    .map_err(|e| OtpError::IntegerParseError(e, URI_PERIOD_QUERY.into()))?;
                if period != PERIOD {
                    return Err(OtpError::UnsupportedParameter(
                        URI_PERIOD_QUERY,
                        period.to_string(),
                        PERIOD.to_string(),
                    ));
                }
            }
            Cow::Borrowed(URI_DIGITS_QUERY) => {
                let digits = u32::from_str(params.1.as_ref())
                    .map_err(|e| OtpError::IntegerParseError(e, URI_DIGITS_QUERY.into()))?;
                if digits != DIGITS {
                    return Err(OtpError::UnsupportedParameter(
                        URI_DIGITS_QUERY,
                        digits.to_string(),
                        DIGITS.to_string(),
                    ));
                }
            }
            _ => (),
        }
    }

    if secret.is_empty() {
        return Err(OtpError::UriMissingSecret);
    }

    Ok(Totp { secret })
}

pub fn otp_to_uri(totp: &Totp, account: &str, issuer: Option<&str>) -> Result<String, OtpError> {
    let mut uri = url::Url::parse(&format!("{URI_SCHEME}://{TOTP_TYPE}/"))
        .map_err(OtpError::UriParseError)?;

    let issuer = issuer.filter(|i| !i.is_empty());

    match issuer {
        Some(issuer) => uri.set_path(&format!("{issuer}:{account}")),
        None => uri.set_path(account),
    }

    {
        let mut query_params = uri.query_pairs_mut();

        query_params.append_pair(URI_SECRET_QUERY, &totp.secret);

        if let Some(issuer) = issuer {
            query_params.append_pair(URI_ISSUER_QUERY, issuer);
        }

        query_params
            .append_pair(URI_HASH_QUERY, SUPPORTED_ALGORITHM)
            .append_pair(URI_DIGITS_QUERY, &DIGITS.to_string())
            .append_pair(URI_PERIOD_QUERY, &PERIOD.to_string());
    }

    Ok(uri.to_string())
}
