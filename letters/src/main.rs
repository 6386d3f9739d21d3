use std::{env, sync::Arc};

use actix_web::HttpServer;

use common::{
    context::ServiceState,
    entities::{
        letter::{IncomingLetter, OutgoingLetter},
        user::User,
    },
    repository::mongo_repository::MongoRepository,
};
use letters::{
    create_app,
    service::attachment::{AttachmentObject, CloudinaryClient},
};

const DATABASE: &str = "letters";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    env_logger::init();

    let mongo_uri = env::var("MONGOURI")?;

    let users: MongoRepository<User> = MongoRepository::new(&mongo_uri, DATABASE, "users").await?;
    let incoming: MongoRepository<IncomingLetter> =
        MongoRepository::new(&mongo_uri, DATABASE, "incomingLetters").await?;
    let outgoing: MongoRepository<OutgoingLetter> =
        MongoRepository::new(&mongo_uri, DATABASE, "outgoingLetters").await?;

    let mut state = ServiceState::new();
    let attachments = CloudinaryClient::from_env(state.client.clone())?;

    state.insert::<User>(Arc::new(users));
    state.insert::<IncomingLetter>(Arc::new(incoming));
    state.insert::<OutgoingLetter>(Arc::new(outgoing));
    state.insert_manual::<AttachmentObject>(Arc::new(attachments));

    let state = Arc::new(state);

    let port = env::var("BIND_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3001);

    HttpServer::new(move || create_app(state.clone()))
        .bind(("0.0.0.0", port))?
        .run()
        .await?;

    Ok(())
}
