use actix_web::{post, web::Json};

use common::{context::GeneralContext, error};

use crate::service::auth::{AuthService, Login, Token};

#[post("/api/auth/login")]
pub async fn login(context: GeneralContext, login: Json<Login>) -> error::Result<Json<Token>> {
    Ok(Json(AuthService::new(context).login(&login).await?))
}

#[cfg(test)]
mod test {
    use actix_web::test::{self, init_service};

    use common::entities::user::Role;

    use crate::{
        create_app,
        service::auth::{Login, Token},
        test_helpers::{seed_user, test_state},
    };

    #[actix_web::test]
    async fn test_login() {
        let (state, fixtures) = test_state();
        seed_user(&fixtures, "admin", "rahasia", Role::Manager).await;

        let app = init_service(create_app(state)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&Login {
                username: "admin".to_string(),
                password: "rahasia".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let token = serde_json::from_slice::<Token>(&body).unwrap();
        assert!(!token.token.is_empty());
        assert_eq!(token.user.username, "admin");
        assert_eq!(token.user.role, Role::Manager);
    }

    #[actix_web::test]
    async fn test_login_with_wrong_password() {
        let (state, fixtures) = test_state();
        seed_user(&fixtures, "admin", "rahasia", Role::Manager).await;

        let app = init_service(create_app(state)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&Login {
                username: "admin".to_string(),
                password: "salah".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    #[actix_web::test]
    async fn test_login_with_unknown_user() {
        let (state, _) = test_state();

        let app = init_service(create_app(state)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&Login {
                username: "ghost".to_string(),
                password: "whatever".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    #[actix_web::test]
    async fn test_login_with_empty_fields() {
        let (state, _) = test_state();

        let app = init_service(create_app(state)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&Login {
                username: "".to_string(),
                password: "".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }
}
