use actix_multipart::Multipart;
use actix_web::{
    delete, get, patch, post,
    web::{Json, Path},
};
use mongodb::bson::oid::ObjectId;

use common::{
    context::GeneralContext,
    entities::letter::{IncomingLetter, OutgoingLetter},
    error::{self, AddCode},
};

use crate::service::letter::LetterService;

fn parse_id(id: &str) -> error::Result<ObjectId> {
    id.parse()
        .map_err(|_| anyhow::anyhow!("Invalid record id").code(400))
}

#[get("/api/letters/incoming")]
pub async fn get_incoming_letters(
    context: GeneralContext,
) -> error::Result<Json<Vec<IncomingLetter>>> {
    Ok(Json(LetterService::new(context).list().await?))
}

#[post("/api/letters/incoming")]
pub async fn post_incoming_letter(
    context: GeneralContext,
    payload: Multipart,
) -> error::Result<Json<IncomingLetter>> {
    Ok(Json(LetterService::new(context).create(payload).await?))
}

#[patch("/api/letters/incoming/{id}")]
pub async fn patch_incoming_letter(
    context: GeneralContext,
    id: Path<String>,
    payload: Multipart,
) -> error::Result<Json<IncomingLetter>> {
    let id = parse_id(&id)?;
    Ok(Json(LetterService::new(context).change(id, payload).await?))
}

#[delete("/api/letters/incoming/{id}")]
pub async fn delete_incoming_letter(
    context: GeneralContext,
    id: Path<String>,
) -> error::Result<Json<Option<IncomingLetter>>> {
    let id = parse_id(&id)?;
    Ok(Json(LetterService::new(context).delete(id).await?))
}

#[get("/api/letters/outgoing")]
pub async fn get_outgoing_letters(
    context: GeneralContext,
) -> error::Result<Json<Vec<OutgoingLetter>>> {
    Ok(Json(LetterService::new(context).list().await?))
}

#[post("/api/letters/outgoing")]
pub async fn post_outgoing_letter(
    context: GeneralContext,
    payload: Multipart,
) -> error::Result<Json<OutgoingLetter>> {
    Ok(Json(LetterService::new(context).create(payload).await?))
}

#[patch("/api/letters/outgoing/{id}")]
pub async fn patch_outgoing_letter(
    context: GeneralContext,
    id: Path<String>,
    payload: Multipart,
) -> error::Result<Json<OutgoingLetter>> {
    let id = parse_id(&id)?;
    Ok(Json(LetterService::new(context).change(id, payload).await?))
}

#[delete("/api/letters/outgoing/{id}")]
pub async fn delete_outgoing_letter(
    context: GeneralContext,
    id: Path<String>,
) -> error::Result<Json<Option<OutgoingLetter>>> {
    let id = parse_id(&id)?;
    Ok(Json(LetterService::new(context).delete(id).await?))
}

#[cfg(test)]
mod test {
    use std::sync::atomic::Ordering;

    use actix_web::test::{self, init_service};

    use common::entities::{letter::IncomingLetter, user::Role};

    use crate::{
        create_app,
        test_helpers::{bearer, multipart_body, seed_user, test_state},
    };

    const LETTER_FIELDS: [(&str, &str); 5] = [
        ("nomor_surat", "001/X/2024"),
        ("tanggal_surat", "2024-01-10"),
        ("tanggal_terima", "2024-01-12"),
        ("asal_surat", "HR Dept"),
        ("perihal", "Leave request"),
    ];

    #[actix_web::test]
    async fn test_empty_list() {
        let (state, fixtures) = test_state();
        let user = seed_user(&fixtures, "budi", "katasandi", Role::Staff).await;

        let app = init_service(create_app(state)).await;

        let req = test::TestRequest::get()
            .uri("/api/letters/incoming")
            .insert_header(bearer(&user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let letters = serde_json::from_slice::<Vec<IncomingLetter>>(&body).unwrap();
        assert!(letters.is_empty());
    }

    #[actix_web::test]
    async fn test_create_letter_with_attachment() {
        let (state, fixtures) = test_state();
        let user = seed_user(&fixtures, "budi", "katasandi", Role::Staff).await;

        let app = init_service(create_app(state)).await;

        let (content_type, body) =
            multipart_body(&LETTER_FIELDS, Some(("sample.pdf", b"%PDF-1.4 test")));
        let req = test::TestRequest::post()
            .uri("/api/letters/incoming")
            .insert_header(bearer(&user))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let letter = serde_json::from_slice::<IncomingLetter>(&body).unwrap();
        assert_eq!(letter.nomor_surat, "001/X/2024");
        assert_eq!(letter.asal_surat, "HR Dept");
        assert!(letter.file_url.as_ref().unwrap().ends_with(".pdf"));
        assert!(!letter.file_public_id.as_ref().unwrap().is_empty());
        assert!(letter.created_at.is_some());

        // The attachment fields come from the same upload call.
        let uploads = fixtures.attachments.uploads.lock().unwrap().clone();
        assert_eq!(uploads.len(), 1);
        assert_eq!(letter.file_url.as_deref(), Some(uploads[0].url.as_str()));
        assert_eq!(
            letter.file_public_id.as_deref(),
            Some(uploads[0].public_id.as_str())
        );

        let req = test::TestRequest::get()
            .uri("/api/letters/incoming")
            .insert_header(bearer(&user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        let letters = serde_json::from_slice::<Vec<IncomingLetter>>(&body).unwrap();
        assert_eq!(letters.len(), 1);
    }

    #[actix_web::test]
    async fn test_create_letter_without_attachment() {
        let (state, fixtures) = test_state();
        let user = seed_user(&fixtures, "budi", "katasandi", Role::Staff).await;

        let app = init_service(create_app(state)).await;

        let (content_type, body) = multipart_body(&LETTER_FIELDS, None);
        let req = test::TestRequest::post()
            .uri("/api/letters/incoming")
            .insert_header(bearer(&user))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        assert!(fixtures.incoming.db.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_create_letter_with_missing_field() {
        let (state, fixtures) = test_state();
        let user = seed_user(&fixtures, "budi", "katasandi", Role::Staff).await;

        let app = init_service(create_app(state)).await;

        let (content_type, body) = multipart_body(
            &[("nomor_surat", "001/X/2024"), ("perihal", "")],
            Some(("sample.pdf", b"%PDF-1.4 test")),
        );
        let req = test::TestRequest::post()
            .uri("/api/letters/incoming")
            .insert_header(bearer(&user))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        // Nothing was uploaded and nothing was stored.
        assert!(fixtures.attachments.uploads.lock().unwrap().is_empty());
        assert!(fixtures.incoming.db.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_create_letter_with_failing_upload() {
        let (state, fixtures) = test_state();
        let user = seed_user(&fixtures, "budi", "katasandi", Role::Staff).await;
        fixtures.attachments.fail_upload.store(true, Ordering::SeqCst);

        let app = init_service(create_app(state)).await;

        let (content_type, body) =
            multipart_body(&LETTER_FIELDS, Some(("sample.pdf", b"%PDF-1.4 test")));
        let req = test::TestRequest::post()
            .uri("/api/letters/incoming")
            .insert_header(bearer(&user))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 502);

        // No record may be written when the upload failed.
        assert!(fixtures.incoming.db.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_change_letter_without_new_file() {
        let (state, fixtures) = test_state();
        let user = seed_user(&fixtures, "budi", "katasandi", Role::Staff).await;

        let app = init_service(create_app(state)).await;

        let (content_type, body) =
            multipart_body(&LETTER_FIELDS, Some(("sample.pdf", b"%PDF-1.4 test")));
        let req = test::TestRequest::post()
            .uri("/api/letters/incoming")
            .insert_header(bearer(&user))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        let created = serde_json::from_slice::<IncomingLetter>(&body).unwrap();

        let mut fields = LETTER_FIELDS;
        fields[4] = ("perihal", "Leave request - approved");
        let (content_type, body) = multipart_body(&fields, None);
        let req = test::TestRequest::patch()
            .uri(&format!("/api/letters/incoming/{}", created.id.to_hex()))
            .insert_header(bearer(&user))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let updated = serde_json::from_slice::<IncomingLetter>(&body).unwrap();
        assert_eq!(updated.perihal, "Leave request - approved");
        assert_eq!(updated.file_url, created.file_url);
        assert_eq!(updated.file_public_id, created.file_public_id);
        assert_eq!(updated.created_at, created.created_at);

        // Only the original create uploaded anything.
        assert_eq!(fixtures.attachments.uploads.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_change_missing_letter() {
        let (state, fixtures) = test_state();
        let user = seed_user(&fixtures, "budi", "katasandi", Role::Staff).await;

        let app = init_service(create_app(state)).await;

        let (content_type, body) = multipart_body(&LETTER_FIELDS, None);
        let req = test::TestRequest::patch()
            .uri(&format!(
                "/api/letters/incoming/{}",
                mongodb::bson::oid::ObjectId::new().to_hex()
            ))
            .insert_header(bearer(&user))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }

    #[actix_web::test]
    async fn test_delete_letter_revokes_attachment() {
        let (state, fixtures) = test_state();
        let user = seed_user(&fixtures, "budi", "katasandi", Role::Staff).await;

        let app = init_service(create_app(state)).await;

        let (content_type, body) =
            multipart_body(&LETTER_FIELDS, Some(("sample.pdf", b"%PDF-1.4 test")));
        let req = test::TestRequest::post()
            .uri("/api/letters/incoming")
            .insert_header(bearer(&user))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        let created = serde_json::from_slice::<IncomingLetter>(&body).unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/letters/incoming/{}", created.id.to_hex()))
            .insert_header(bearer(&user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let deleted = fixtures.attachments.deleted.lock().unwrap().clone();
        assert_eq!(deleted, vec![created.file_public_id.unwrap()]);
        assert!(fixtures.incoming.db.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_delete_letter_when_attachment_deletion_fails() {
        let (state, fixtures) = test_state();
        let user = seed_user(&fixtures, "budi", "katasandi", Role::Staff).await;

        let app = init_service(create_app(state)).await;

        let (content_type, body) =
            multipart_body(&LETTER_FIELDS, Some(("sample.pdf", b"%PDF-1.4 test")));
        let req = test::TestRequest::post()
            .uri("/api/letters/incoming")
            .insert_header(bearer(&user))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        let created = serde_json::from_slice::<IncomingLetter>(&body).unwrap();

        fixtures.attachments.fail_delete.store(true, Ordering::SeqCst);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/letters/incoming/{}", created.id.to_hex()))
            .insert_header(bearer(&user))
            .to_request();
        let resp = test::call_service(&app, req).await;

        // Record deletion proceeds even though the media host refused.
        assert!(resp.status().is_success());
        assert!(fixtures.incoming.db.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_letters_require_auth() {
        let (state, _) = test_state();

        let app = init_service(create_app(state)).await;

        let req = test::TestRequest::get()
            .uri("/api/letters/outgoing")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }
}
