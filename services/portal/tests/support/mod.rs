//! Shared fixtures for the portal integration tests

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};

use common::{
    config::ClientConfig,
    http::HttpClient,
    notify::RecordingNotifier,
    storage::{KeyValueStore, MemoryStore},
};
use portal::AppState;

pub const KEY: &str = "user";
pub const AMY_EMAIL: &str = "amy@example.com";

/// Request bodies received by the stub, in arrival order
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<Value>>>);

impl Captured {
    pub fn bodies(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, body: Value) {
        self.0.lock().unwrap().push(body);
    }
}

pub fn visa_json(id: &str, country: &str, visa_type: &str, added_by: &str) -> Value {
    json!({
        "_id": id,
        "country": country,
        "country_image": format!("https://img.example/{}.jpg", id),
        "visa_type": visa_type,
        "processing_time": "10 days",
        "required_documents": ["Valid passport"],
        "description": "Listing",
        "age_restriction": 18,
        "fee": "120",
        "validity": "90 days",
        "application_method": "Online",
        "added_by": added_by,
        "added_by_name": "Someone",
        "added_date": "2024-12-01T10:00:00.000Z"
    })
}

fn all_visas() -> Vec<Value> {
    vec![
        visa_json("v1", "Japan", "Tourist visa", AMY_EMAIL),
        visa_json("v2", "Kenya", "Student visa", "bob@example.com"),
        visa_json("v3", "Japan", "Work visa", AMY_EMAIL),
    ]
}

fn application_json(id: &str, country: &str) -> Value {
    json!({
        "_id": id,
        "visa_id": "v1",
        "email": AMY_EMAIL,
        "firstName": "Amy",
        "lastName": "Pond",
        "appliedDate": "2024-12-03",
        "fee": 120,
        "country": country,
        "visa_type": "Tourist visa",
        "userId": "u-1"
    })
}

/// Stub of the visa API; POST/PUT bodies are recorded in `captured`
///
/// `v3` fails every mutation with a 500 and only `v1` reports a modification.
pub fn visa_api(captured: Captured) -> Router {
    let post_visa = captured.clone();
    let put_visa = captured.clone();
    let post_application = captured;

    Router::new()
        .route(
            "/visas",
            get(|Query(query): Query<Vec<(String, String)>>| async move {
                let latest = query.contains(&("limit".to_string(), "6".to_string()))
                    && query.contains(&("sort".to_string(), "createdAt".to_string()));
                let visas = all_visas();
                if latest {
                    Json(Value::Array(visas.into_iter().rev().take(2).collect()))
                } else {
                    Json(Value::Array(visas))
                }
            })
            .post(|Json(body): Json<Value>| async move {
                post_visa.push(body);
                tokio::time::sleep(Duration::from_millis(100)).await;
                Json(json!({"acknowledged": true, "insertedId": "v9"}))
            }),
        )
        .route(
            "/visas/:id",
            get(|Path(id): Path<String>| async move {
                match all_visas().into_iter().find(|visa| visa["_id"] == id) {
                    Some(visa) => (StatusCode::OK, Json(visa)),
                    None => (
                        StatusCode::NOT_FOUND,
                        Json(json!({"message": "Visa not found"})),
                    ),
                }
            })
            .put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                put_visa.push(body);
                tokio::time::sleep(Duration::from_millis(100)).await;
                match id.as_str() {
                    "v1" => (StatusCode::OK, Json(json!({"modifiedCount": 1}))),
                    "v3" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
                    _ => (StatusCode::OK, Json(json!({"modifiedCount": 0}))),
                }
            })
            .delete(|Path(id): Path<String>| async move {
                if id == "v3" {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"message": "Failed to delete visa"})),
                    )
                } else {
                    (StatusCode::OK, Json(json!({"deletedCount": 1})))
                }
            }),
        )
        .route(
            "/visas/user/:email",
            get(|Path(email): Path<String>| async move {
                let visas: Vec<Value> = all_visas()
                    .into_iter()
                    .filter(|visa| visa["added_by"] == email)
                    .collect();
                Json(Value::Array(visas))
            }),
        )
        .route(
            "/applications",
            post(|Json(body): Json<Value>| async move {
                post_application.push(body);
                Json(json!({"insertedId": "a9"}))
            }),
        )
        .route(
            "/applications/:id",
            get(|Path(uid): Path<String>| async move {
                if uid == "u-1" {
                    Json(json!([
                        application_json("a1", "Japan"),
                        application_json("a2", "Kenya"),
                        application_json("a3", "JAPAN")
                    ]))
                } else {
                    Json(json!([]))
                }
            })
            .delete(|| async { Json(json!({"deletedCount": 1})) }),
        )
}

fn state_over(base_url: &str, storage: MemoryStore) -> (AppState, RecordingNotifier) {
    let notifier = RecordingNotifier::new();
    let http = HttpClient::new(
        &ClientConfig::with_base_url(base_url),
        Arc::new(notifier.clone()),
    )
    .unwrap();
    (AppState::new(http, Arc::new(storage), KEY), notifier)
}

/// State whose persisted session belongs to Amy (uid `u-1`)
pub fn signed_in_state(base_url: &str) -> (AppState, RecordingNotifier) {
    let storage = MemoryStore::new();
    storage
        .set(
            KEY,
            &json!({
                "email": AMY_EMAIL,
                "displayName": "Amy",
                "photoURL": "https://i.ibb.co/cLWY2Q9/user.png",
                "uid": "u-1"
            })
            .to_string(),
        )
        .unwrap();
    state_over(base_url, storage)
}

pub fn signed_out_state(base_url: &str) -> (AppState, RecordingNotifier) {
    state_over(base_url, MemoryStore::new())
}
