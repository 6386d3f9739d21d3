use std::sync::Arc;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use type_map::concurrent::TypeMap;

use crate::{
    auth::Session,
    entities::user::Role,
    error::{self, AddCode, ServiceError},
    repository::RepositoryObject,
};

pub struct ServiceState {
    pub repositories: TypeMap,
    pub client: reqwest::Client,
}

impl ServiceState {
    pub fn new() -> Self {
        Self {
            repositories: TypeMap::new(),
            client: reqwest::Client::new(),
        }
    }

    pub fn insert<T: 'static>(&mut self, repository: RepositoryObject<T>) {
        self.repositories.insert(repository);
    }

    pub fn insert_manual<T: Send + Sync + 'static>(&mut self, item: T) {
        self.repositories.insert(item);
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct HandlerContext {
    pub session: Option<Session>,
}

#[derive(Clone)]
pub struct GeneralContext(pub Arc<ServiceState>, pub HandlerContext);

impl FromRequest for GeneralContext {
    type Error = ServiceError;

    type Future = futures_util::future::LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        fn from_request_inner(req: &HttpRequest, _payload: &mut Payload) -> error::Result<GeneralContext> {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|x| x.to_str().ok())
                .and_then(|x| x.strip_prefix("Bearer "));

            let session = match token {
                Some(token) => Some(Session::from_token(token)?),
                None => None,
            };

            let Some(state) = req.app_data::<web::Data<ServiceState>>() else {
                return Err(anyhow::anyhow!("No service state provided").code(500));
            };

            Ok(GeneralContext(
                state.clone().into_inner(),
                HandlerContext { session },
            ))
        }
        let result = from_request_inner(req, payload);

        Box::pin(async move { result })
    }
}

impl GeneralContext {
    pub fn get_repository<T: 'static>(&self) -> Option<RepositoryObject<T>> {
        self.0.repositories.get::<RepositoryObject<T>>().cloned()
    }

    pub fn try_get_repository<T: 'static>(&self) -> error::Result<RepositoryObject<T>> {
        self.0
            .repositories
            .get::<RepositoryObject<T>>()
            .cloned()
            .ok_or(
                anyhow::anyhow!(
                    "Repository for type {} not found",
                    std::any::type_name::<T>()
                )
                .code(500),
            )
    }

    pub fn get_manual<T: 'static + Clone>(&self) -> Option<T> {
        self.0.repositories.get::<T>().cloned()
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.0.client
    }

    pub fn session(&self) -> Option<&Session> {
        self.1.session.as_ref()
    }

    pub fn auth(&self) -> error::Result<&Session> {
        self.1
            .session
            .as_ref()
            .ok_or(anyhow::anyhow!("Authentication required").code(401))
    }

    pub fn auth_role(&self, role: Role) -> error::Result<&Session> {
        let session = self.auth()?;
        if session.role != role {
            return Err(anyhow::anyhow!("This action is not available for your role").code(403));
        }
        Ok(session)
    }
}
