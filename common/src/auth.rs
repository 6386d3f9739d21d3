use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{
    entities::user::{Role, User},
    error::{self, AddCode},
};

pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24;

static ENCODING_KEY: Lazy<EncodingKey> = Lazy::new(|| {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    EncodingKey::from_secret(secret.as_bytes())
});

static DECODING_KEY: Lazy<DecodingKey> = Lazy::new(|| {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    DecodingKey::from_secret(secret.as_bytes())
});

/// The identity carried by a bearer token: exactly the `{id, username, role}`
/// object the client keeps for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: ObjectId,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    username: String,
    role: Role,
    exp: i64,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }

    pub fn to_token(&self) -> error::Result<String> {
        let header = Header {
            alg: Algorithm::HS512,
            ..Default::default()
        };
        let claims = Claims {
            id: self.id.to_hex(),
            username: self.username.clone(),
            role: self.role,
            exp: Utc::now().timestamp() + SESSION_TTL_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &ENCODING_KEY)
            .map_err(|_| anyhow::anyhow!("Failed to encode session token").code(500))
    }

    pub fn from_token(token: &str) -> error::Result<Self> {
        let data = decode::<Claims>(token, &DECODING_KEY, &Validation::new(Algorithm::HS512))
            .map_err(|_| anyhow::anyhow!("Invalid or expired session token").code(401))?;

        let id = data
            .claims
            .id
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid or expired session token").code(401))?;

        Ok(Session {
            id,
            username: data.claims.username,
            role: data.claims.role,
        })
    }
}
