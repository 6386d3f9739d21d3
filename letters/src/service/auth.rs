use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use common::{
    auth::Session,
    context::GeneralContext,
    entities::user::{Role, User},
    error::{self, AddCode},
};

pub struct AuthService {
    context: GeneralContext,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            username: user.username,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    pub user: PublicUser,
}

impl AuthService {
    pub fn new(context: GeneralContext) -> Self {
        Self { context }
    }

    /// Checks the credential pair against the user collection. A mismatch
    /// issues nothing; there is no way to obtain a session without a match.
    pub async fn login(&self, login: &Login) -> error::Result<Token> {
        if login.username.trim().is_empty() || login.password.is_empty() {
            return Err(anyhow::anyhow!("Username and password are required").code(400));
        }

        let users = self.context.try_get_repository::<User>()?;

        let Some(user) = users
            .find_by("username", &Bson::String(login.username.clone()))
            .await?
        else {
            return Err(anyhow::anyhow!("Invalid username or password").code(401));
        };

        if user.password != login.password {
            return Err(anyhow::anyhow!("Invalid username or password").code(401));
        }

        let token = Session::for_user(&user).to_token()?;

        Ok(Token {
            token,
            user: user.into(),
        })
    }
}
