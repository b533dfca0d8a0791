//! Guarded navigation driven by the session store

mod support;

use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::{get, post}};
use serde_json::json;

use auth::SessionStore;
use common::{
    config::ClientConfig,
    http::HttpClient,
    notify::RecordingNotifier,
    storage::MemoryStore,
    testing::StubServer,
};
use portal::{
    Navigator, Route, Screen,
    guard::Redirect,
    navigation::Location,
    views::{LoginView, MyAddedVisasView},
};
use support::{KEY, signed_in_state};

fn unopened_store(base_url: &str) -> Arc<SessionStore> {
    let http = HttpClient::new(
        &ClientConfig::with_base_url(base_url),
        Arc::new(RecordingNotifier::new()),
    )
    .unwrap();
    SessionStore::new(http, Arc::new(MemoryStore::new()), KEY)
}

#[tokio::test]
async fn test_loading_shows_progress_without_redirect() {
    let server = StubServer::start(Router::new()).await;
    let store = unopened_store(server.base_url());
    let mut navigator = Navigator::new(store.clone());

    assert_eq!(navigator.navigate("/add-visa"), Screen::Progress);
    assert_eq!(navigator.current(), &Location::new("/add-visa"));

    // Public routes render while loading
    assert_eq!(navigator.navigate("/all-visas"), Screen::View(Route::AllVisas));
    assert!(store.is_loading());
}

#[tokio::test]
async fn test_unauthenticated_redirect_replaces_history_entry() {
    let server = StubServer::start(Router::new()).await;
    let store = unopened_store(server.base_url());
    let mut navigator = Navigator::new(store.clone());

    assert_eq!(navigator.navigate("/my-added-visas"), Screen::Progress);
    store.rehydrate();

    let screen = navigator.render();

    assert_eq!(
        screen,
        Screen::Redirected(Redirect {
            to: "/login".to_string(),
            from: "/my-added-visas".to_string(),
            replace: true,
        })
    );
    assert_eq!(
        navigator.history(),
        &[
            Location::new("/"),
            Location {
                path: "/login".to_string(),
                from: Some("/my-added-visas".to_string()),
            },
        ]
    );
    assert_eq!(navigator.render(), Screen::View(Route::Login));
    assert_eq!(navigator.return_path(), "/my-added-visas");
}

#[tokio::test]
async fn test_not_found_renders_in_place() {
    let server = StubServer::start(Router::new()).await;
    let store = unopened_store(server.base_url());
    store.rehydrate();
    let mut navigator = Navigator::new(store);

    assert_eq!(navigator.navigate("/nowhere"), Screen::NotFound);
    assert_eq!(navigator.current().path, "/nowhere");
    assert_eq!(navigator.back(), Some(Screen::View(Route::Home)));
    assert_eq!(navigator.back(), None);
}

#[tokio::test]
async fn test_sign_in_returns_to_captured_location() {
    let router = Router::new().route(
        "/auth/login",
        post(|| async { Json(json!({"userId": "u-1", "name": "Amy"})) }),
    );
    let server = StubServer::start(router).await;
    let store = unopened_store(server.base_url());
    store.rehydrate();
    let mut navigator = Navigator::new(store.clone());

    assert!(matches!(navigator.navigate("/add-visa"), Screen::Redirected(_)));

    let login = LoginView::new(store.clone(), navigator.current().from.clone());
    let destination = login.sign_in("amy@example.com", "Secret1").await.unwrap();

    assert_eq!(navigator.replace(&destination), Screen::View(Route::AddVisa));
    assert_eq!(navigator.history().len(), 2);
}

#[tokio::test]
async fn test_forced_termination_redirects_on_next_render() {
    let router = Router::new().route(
        "/visas/user/:email",
        get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"message": "Token expired"}))) }),
    );
    let server = StubServer::start(router).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let mut navigator = Navigator::new(state.session_store.clone());

    assert_eq!(
        navigator.navigate("/my-added-visas"),
        Screen::View(Route::MyAddedVisas)
    );

    let err = MyAddedVisasView::new(&state).load().await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(state.session_store.current_session(), None);
    assert_eq!(notifier.errors().len(), 1);
    assert!(matches!(
        navigator.render(),
        Screen::Redirected(Redirect { ref from, .. }) if from == "/my-added-visas"
    ));
}
