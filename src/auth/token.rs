use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

/// Session token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,
    #[error("token is malformed")]
    Malformed,
    #[error("token is expired")]
    Expired,
}

/// Signs and parses compact `header.payload.mac` session tokens, HS256
/// only. The key is fixed at construction and read-only afterwards.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        debug!(sub = claims.sub, "token signed");
        Ok(token)
    }

    /// Issue a token for a user expiring `ttl` from now.
    pub fn issue_for(&self, user_id: i64, ttl: Duration) -> Result<String, TokenError> {
        let exp = OffsetDateTime::now_utc() + ttl;
        self.issue(&Claims {
            sub: user_id,
            exp: exp.unix_timestamp(),
        })
    }

    /// Verify a token and return its claims.
    ///
    /// The header's algorithm is checked before any signature work: a token
    /// advertising `none` or an asymmetric algorithm is refused outright.
    /// Expiry is checked with zero leeway, only after the MAC verifies.
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        check_algorithm(token)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::UnexpectedAlgorithm
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;
        debug!(sub = data.claims.sub, "token verified");
        Ok(data.claims)
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

fn check_algorithm(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed);
    }
    let header = URL_SAFE_NO_PAD
        .decode(segments[0])
        .map_err(|_| TokenError::Malformed)?;
    let raw: RawHeader = serde_json::from_slice(&header).map_err(|_| TokenError::Malformed)?;
    if raw.alg != "HS256" {
        return Err(TokenError::UnexpectedAlgorithm);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("dev-secret")
    }

    fn live_exp() -> i64 {
        (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp()
    }

    /// Hand-roll a token with an arbitrary header, bypassing the codec.
    fn forge(header: &str, payload: &str, mac: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload),
            mac
        )
    }

    #[test]
    fn issue_and_parse_roundtrip() {
        let claims = Claims {
            sub: 42,
            exp: live_exp(),
        };
        let token = codec().issue(&claims).expect("sign");
        let parsed = codec().parse(&token).expect("parse");
        assert_eq!(parsed, claims);
    }

    #[test]
    fn token_has_three_segments() {
        let token = codec()
            .issue_for(1, Duration::days(30))
            .expect("sign");
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn parse_rejects_wrong_key() {
        let token = codec()
            .issue(&Claims {
                sub: 1,
                exp: live_exp(),
            })
            .expect("sign");
        let other = TokenCodec::new("another-secret");
        assert_eq!(other.parse(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn parse_rejects_tampered_payload() {
        let token = codec()
            .issue(&Claims {
                sub: 1,
                exp: live_exp(),
            })
            .expect("sign");
        let mut segments: Vec<String> = token.split('.').map(str::to_string).collect();
        segments[1] = URL_SAFE_NO_PAD.encode(format!("{{\"sub\":999,\"exp\":{}}}", live_exp()));
        let tampered = segments.join(".");
        assert_eq!(codec().parse(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn parse_rejects_expired_token() {
        let past = (OffsetDateTime::now_utc() - Duration::hours(1)).unix_timestamp();
        let token = codec().issue(&Claims { sub: 1, exp: past }).expect("sign");
        assert_eq!(codec().parse(&token), Err(TokenError::Expired));
    }

    #[test]
    fn parse_rejects_alg_none() {
        let token = forge(
            r#"{"alg":"none","typ":"JWT"}"#,
            r#"{"sub":1,"exp":9999999999}"#,
            "",
        );
        assert_eq!(codec().parse(&token), Err(TokenError::UnexpectedAlgorithm));
    }

    #[test]
    fn parse_rejects_asymmetric_alg() {
        let token = forge(
            r#"{"alg":"RS256","typ":"JWT"}"#,
            r#"{"sub":1,"exp":9999999999}"#,
            "c2ln",
        );
        assert_eq!(codec().parse(&token), Err(TokenError::UnexpectedAlgorithm));
    }

    #[test]
    fn parse_rejects_structural_garbage() {
        assert_eq!(codec().parse("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(codec().parse("only.two"), Err(TokenError::Malformed));
        assert_eq!(codec().parse("!!.@@.##"), Err(TokenError::Malformed));
    }

    #[test]
    fn parse_rejects_missing_exp() {
        let claims = serde_json::json!({"sub": 1});
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .expect("sign");
        assert_eq!(codec().parse(&token), Err(TokenError::Malformed));
    }
}
