use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware, web, App,
};

use common::context::ServiceState;

use handlers::{
    auth::login,
    dashboard::get_dashboard,
    letter::{
        delete_incoming_letter, delete_outgoing_letter, get_incoming_letters,
        get_outgoing_letters, patch_incoming_letter, patch_outgoing_letter, post_incoming_letter,
        post_outgoing_letter,
    },
    user::{delete_user, get_users, patch_user, post_user},
};

pub mod handlers;
pub mod service;

pub fn create_app(
    state: Arc<ServiceState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    let cors = Cors::permissive();
    App::new()
        .wrap(cors)
        .wrap(middleware::Logger::default())
        .app_data(web::Data::from(state))
        .service(login)
        .service(get_users)
        .service(post_user)
        .service(patch_user)
        .service(delete_user)
        .service(get_incoming_letters)
        .service(post_incoming_letter)
        .service(patch_incoming_letter)
        .service(delete_incoming_letter)
        .service(get_outgoing_letters)
        .service(post_outgoing_letter)
        .service(patch_outgoing_letter)
        .service(delete_outgoing_letter)
        .service(get_dashboard)
}
