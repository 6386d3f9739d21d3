use mongodb::bson::{oid::ObjectId, to_bson, Document};
use serde::{Deserialize, Serialize};

use common::{
    context::GeneralContext,
    entities::user::{Role, User},
    error::{self, AddCode},
};

const MIN_CREDENTIAL_LEN: usize = 3;

pub struct UserService {
    context: GeneralContext,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Partial update. Omitted fields are left untouched; in particular an
/// omitted password keeps the stored one.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserChange {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

fn validate_credential(name: &str, value: &str) -> error::Result<()> {
    if value.trim().len() < MIN_CREDENTIAL_LEN {
        return Err(anyhow::anyhow!(
            "Field '{}' must be at least {} characters",
            name,
            MIN_CREDENTIAL_LEN
        )
        .code(400));
    }
    Ok(())
}

impl UserService {
    pub fn new(context: GeneralContext) -> Self {
        Self { context }
    }

    pub async fn list(&self) -> error::Result<Vec<User>> {
        self.context.auth_role(Role::Manager)?;

        let users = self.context.try_get_repository::<User>()?;
        users.find_all().await
    }

    pub async fn create(&self, create: CreateUser) -> error::Result<User> {
        self.context.auth_role(Role::Manager)?;

        validate_credential("username", &create.username)?;
        validate_credential("password", &create.password)?;

        let users = self.context.try_get_repository::<User>()?;

        let user = User {
            id: ObjectId::new(),
            username: create.username,
            password: create.password,
            role: create.role,
        };

        users.insert(&user).await?;

        Ok(user)
    }

    pub async fn change(&self, id: ObjectId, change: UserChange) -> error::Result<User> {
        self.context.auth_role(Role::Manager)?;

        let mut fields = Document::new();

        if let Some(username) = change.username {
            validate_credential("username", &username)?;
            fields.insert("username", username);
        }

        if let Some(password) = change.password {
            validate_credential("password", &password)?;
            fields.insert("password", password);
        }

        if let Some(role) = change.role {
            fields.insert("role", to_bson(&role)?);
        }

        if fields.is_empty() {
            return Err(anyhow::anyhow!("No fields to update").code(400));
        }

        let users = self.context.try_get_repository::<User>()?;

        let Some(user) = users.update(&id, fields).await? else {
            return Err(anyhow::anyhow!("No user found").code(404));
        };

        Ok(user)
    }

    pub async fn delete(&self, id: ObjectId) -> error::Result<Option<User>> {
        self.context.auth_role(Role::Manager)?;

        let users = self.context.try_get_repository::<User>()?;
        users.delete(&id).await
    }
}
