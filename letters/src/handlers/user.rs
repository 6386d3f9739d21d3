use actix_web::{
    delete, get, patch, post,
    web::{self, Json, Path},
};
use mongodb::bson::oid::ObjectId;

use common::{
    context::GeneralContext,
    entities::user::User,
    error::{self, AddCode},
};

use crate::service::user::{CreateUser, UserChange, UserService};

fn parse_id(id: &str) -> error::Result<ObjectId> {
    id.parse()
        .map_err(|_| anyhow::anyhow!("Invalid record id").code(400))
}

#[get("/api/users")]
pub async fn get_users(context: GeneralContext) -> error::Result<Json<Vec<User>>> {
    Ok(Json(UserService::new(context).list().await?))
}

#[post("/api/users")]
pub async fn post_user(
    context: GeneralContext,
    Json(data): web::Json<CreateUser>,
) -> error::Result<Json<User>> {
    Ok(Json(UserService::new(context).create(data).await?))
}

#[patch("/api/users/{id}")]
pub async fn patch_user(
    context: GeneralContext,
    id: Path<String>,
    Json(data): web::Json<UserChange>,
) -> error::Result<Json<User>> {
    let id = parse_id(&id)?;
    Ok(Json(UserService::new(context).change(id, data).await?))
}

#[delete("/api/users/{id}")]
pub async fn delete_user(
    context: GeneralContext,
    id: Path<String>,
) -> error::Result<Json<Option<User>>> {
    let id = parse_id(&id)?;
    Ok(Json(UserService::new(context).delete(id).await?))
}
