//! HS256 bearer tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::{TokenClaims, User, UserId};

/// Wire claims. `adm` and `shp` mirror the account flags at issue time for
/// clients; the server re-reads the account on every request.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: Uuid,
    iat: i64,
    exp: i64,
    #[serde(default)]
    adm: bool,
    #[serde(default)]
    shp: bool,
}

/// [`TokenIssuer`] signing HS256 JWTs with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenIssuer {
    /// Build an issuer from the HMAC secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }
}

impl std::fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::encoding("token expiry is out of range"))?;
        let claims = JwtClaims {
            sub: *user.id.as_uuid(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            adm: user.is_admin,
            shp: user.is_shop_owner,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::encoding(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        Ok(TokenClaims {
            user_id: UserId::from_uuid(data.claims.sub),
            issued_at: data.claims.iat,
            expires_at: data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{admin, user};
    use rstest::rstest;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn issuer(ttl: Duration) -> JwtTokenIssuer {
        JwtTokenIssuer::new(SECRET, ttl)
    }

    #[rstest]
    fn issued_tokens_verify_to_the_same_user() {
        let ada = admin("ada");
        let now = Utc::now();
        let tokens = issuer(Duration::hours(1));

        let token = tokens.issue(&ada, now).expect("token");
        let claims = tokens.verify(&token).expect("valid token");

        assert_eq!(claims.user_id, ada.id);
        assert_eq!(claims.issued_at, now.timestamp());
        assert_eq!(claims.expires_at, now.timestamp() + 3600);
    }

    #[rstest]
    fn expired_tokens_are_rejected() {
        let tokens = issuer(Duration::hours(1));
        let token = tokens
            .issue(&user("ada"), Utc::now() - Duration::hours(2))
            .expect("token");
        assert!(matches!(
            tokens.verify(&token),
            Err(TokenError::Invalid { .. })
        ));
    }

    #[rstest]
    fn tokens_from_another_secret_are_rejected() {
        let foreign = JwtTokenIssuer::new(b"another-secret-another-secret-xx", Duration::hours(1));
        let token = foreign.issue(&user("ada"), Utc::now()).expect("token");
        assert!(issuer(Duration::hours(1)).verify(&token).is_err());
    }

    #[rstest]
    fn unrepresentable_expiries_are_errors() {
        let tokens = issuer(Duration::try_seconds(9_000_000_000_000).expect("representable"));
        assert!(matches!(
            tokens.issue(&user("ada"), Utc::now()),
            Err(TokenError::Encoding { .. })
        ));
    }

    #[rstest]
    #[case("")]
    #[case("not.a.jwt")]
    fn garbage_is_rejected(#[case] token: &str) {
        assert!(issuer(Duration::hours(1)).verify(token).is_err());
    }
}
