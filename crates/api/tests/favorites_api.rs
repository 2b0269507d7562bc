//! Integration tests for `/api/v1/users/me/favorites`.

mod common;

use axum::http::StatusCode;
use bedwatch_core::backend::FavoritesBackend;
use bedwatch_core::types::UserId;
use common::{body_json, delete, get, post_json, token_for};
use serde_json::json;

const FAVORITES: &str = "/api/v1/users/me/favorites";

#[tokio::test]
async fn favorites_require_authentication() {
    let backend = common::seeded_backend().await;

    let app = common::build_test_app(backend.clone());
    let response = get(app, FAVORITES, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(backend);
    let response = post_json(app, FAVORITES, None, json!({ "ward_name": "Kardiologia" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn add_returns_201_with_trimmed_ward_name() {
    let backend = common::seeded_backend().await;
    let user = UserId::new_v4();
    let app = common::build_test_app(backend.clone());
    let token = token_for(user);

    let response = post_json(app, FAVORITES, Some(&token), json!({ "ward_name": "  Kardiologia " })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["wardName"], "Kardiologia");
    assert!(backend
        .favorite_ward_names(user)
        .await
        .unwrap()
        .contains("Kardiologia"));
}

#[tokio::test]
async fn duplicate_add_is_conflict() {
    let backend = common::seeded_backend().await;
    let user = UserId::new_v4();
    backend.add_favorite(user, "Kardiologia").await.unwrap();
    let app = common::build_test_app(backend);
    let token = token_for(user);

    let response = post_json(app, FAVORITES, Some(&token), json!({ "ward_name": "Kardiologia" })).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["message"], "Ward 'Kardiologia' is already in favorites");
}

#[tokio::test]
async fn invalid_bodies_are_validation_errors() {
    let backend = common::seeded_backend().await;
    let token = token_for(UserId::new_v4());

    for (body, field) in [
        (json!({ "ward_name": "   " }), "ward_name"),
        (json!({ "ward_name": "x".repeat(201) }), "ward_name"),
        (json!({ "ward_name": "Kardio\u{0007}logia" }), "ward_name"),
        (json!({ "ward": "Kardiologia" }), "body"),
    ] {
        let app = common::build_test_app(backend.clone());
        let response = post_json(app, FAVORITES, Some(&token), body.clone()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR", "{body}");
        assert_eq!(json["details"]["field"], field, "{body}");
    }
}

#[tokio::test]
async fn list_includes_current_ward_figures() {
    let backend = common::seeded_backend().await;
    let user = UserId::new_v4();
    backend.add_favorite(user, "Kardiologia").await.unwrap();
    backend.add_favorite(user, "Pulmonologia").await.unwrap();
    let app = common::build_test_app(backend);
    let token = token_for(user);

    let response = get(app, FAVORITES, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["meta"]["total"], 2);
    let items = json["data"].as_array().unwrap();
    let kardio = items.iter().find(|f| f["wardName"] == "Kardiologia").unwrap();
    assert_eq!(kardio["totalPlaces"], 43);
    assert_eq!(kardio["hospitalCount"], 3);
    let pulmo = items.iter().find(|f| f["wardName"] == "Pulmonologia").unwrap();
    assert_eq!(pulmo["totalPlaces"], 0);
    assert!(pulmo["lastScrapedAt"].is_null());
}

#[tokio::test]
async fn remove_returns_204_then_404() {
    let backend = common::seeded_backend().await;
    let user = UserId::new_v4();
    backend.add_favorite(user, "Okulistyka").await.unwrap();
    let token = token_for(user);
    let uri = format!("{FAVORITES}/by-ward/Okulistyka");

    let app = common::build_test_app(backend.clone());
    let response = delete(app, &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(backend);
    let response = delete(app, &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn add_then_remove_restores_ward_listing() {
    let backend = common::seeded_backend().await;
    let user = UserId::new_v4();
    let token = token_for(user);

    let before = body_json(get(common::build_test_app(backend.clone()), "/api/v1/wards", Some(&token)).await).await;

    let app = common::build_test_app(backend.clone());
    post_json(app, FAVORITES, Some(&token), json!({ "ward_name": "Okulistyka" })).await;
    let app = common::build_test_app(backend.clone());
    delete(app, &format!("{FAVORITES}/by-ward/Okulistyka"), Some(&token)).await;

    let after = body_json(get(common::build_test_app(backend), "/api/v1/wards", Some(&token)).await).await;
    assert_eq!(before["data"], after["data"]);
}
