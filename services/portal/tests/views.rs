//! View controllers against a stub visa API

mod support;

use std::time::Duration;

use axum::{Json, Router, routing::get};
use chrono::{Local, NaiveDate};
use common::{error::ClientError, testing::StubServer};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use portal::{
    models::{ApplyForm, VisaForm, VisaType},
    views::{
        AddVisaView, AllVisasView, ConfirmPrompt, HomeView, LoginView, MutationOutcome,
        MyAddedVisasView, MyApplicationsView, VisaDetailsView, VisaTypeFilter,
    },
};
use support::{AMY_EMAIL, Captured, signed_in_state, signed_out_state, visa_api};

fn accept(_: &ConfirmPrompt) -> bool {
    true
}

fn decline(_: &ConfirmPrompt) -> bool {
    false
}

fn japan_form() -> VisaForm {
    VisaForm {
        country: "Japan".to_string(),
        country_image: "https://img.example/japan.jpg".to_string(),
        visa_type: VisaType::Tourist,
        processing_time: "5-7 business days".to_string(),
        required_documents: vec!["Valid passport".to_string()],
        description: "Short stay".to_string(),
        age_restriction: "18".to_string(),
        fee: "160".to_string(),
        validity: "90 days".to_string(),
        application_method: "Online".to_string(),
    }
}

#[tokio::test]
async fn test_home_loads_latest_listings() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, _) = signed_out_state(server.base_url());
    let view = HomeView::new(&state);

    let latest = assert_ok!(view.load().await);

    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].id, "v3");
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_all_visas_filters_locally() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, _) = signed_out_state(server.base_url());
    let view = AllVisasView::new(&state);

    view.load().await.unwrap();
    assert_eq!(view.visible().len(), 3);

    view.set_filter(VisaTypeFilter::parse("student"));
    let visible = view.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].country, "Kenya");

    view.set_filter(VisaTypeFilter::All);
    assert_eq!(view.visible().len(), 3);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_apply_snapshots_email_and_fee() {
    let captured = Captured::default();
    let server = StubServer::start(visa_api(captured.clone())).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let view = VisaDetailsView::new(&state, "v2");

    let visa = view.load().await.unwrap();
    assert_eq!(visa.fee, 120);

    let form = ApplyForm {
        first_name: "Amy".to_string(),
        last_name: "Pond".to_string(),
    };
    let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let outcome = view.apply_on(&form, date).await.unwrap();

    assert_eq!(outcome, MutationOutcome::Applied);
    let body = &captured.bodies()[0];
    assert_eq!(body["visa_id"], "v2");
    assert_eq!(body["email"], AMY_EMAIL);
    assert_eq!(body["fee"], 120);
    assert_eq!(body["appliedDate"], "2025-03-14");
    assert_eq!(body["userId"], "u-1");
    assert_eq!(
        notifier.successes(),
        vec!["Application submitted successfully!".to_string()]
    );
}

#[tokio::test]
async fn test_apply_defaults_to_today() {
    let captured = Captured::default();
    let server = StubServer::start(visa_api(captured.clone())).await;
    let (state, _) = signed_in_state(server.base_url());
    let view = VisaDetailsView::new(&state, "v1");
    view.load().await.unwrap();

    let today = Local::now().date_naive();
    view.apply(&ApplyForm {
        first_name: "Amy".to_string(),
        last_name: "Pond".to_string(),
    })
    .await
    .unwrap();

    let applied: NaiveDate = serde_json::from_value(captured.bodies()[0]["appliedDate"].clone()).unwrap();
    assert!(applied >= today);
}

#[tokio::test]
async fn test_visa_details_not_found_keeps_view_empty() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let view = VisaDetailsView::new(&state, "missing");

    let err = assert_err!(view.load().await);

    assert!(matches!(err, ClientError::Protocol { status: 404, .. }));
    assert_eq!(view.visa(), None);
    assert_eq!(notifier.errors(), vec!["Visa not found".to_string()]);
}

#[tokio::test]
async fn test_add_visa_without_documents_sends_nothing() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let view = AddVisaView::new(&state);

    let form = VisaForm {
        required_documents: Vec::new(),
        ..japan_form()
    };
    let err = view.submit(&form).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(server.hits(), 0);
    assert_eq!(
        notifier.errors(),
        vec!["Please select at least one required document".to_string()]
    );
}

#[tokio::test]
async fn test_add_visa_stamps_author() {
    let captured = Captured::default();
    let server = StubServer::start(visa_api(captured.clone())).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let view = AddVisaView::new(&state);

    let visa = view.submit(&japan_form()).await.unwrap().unwrap();

    assert_eq!(visa.id, "v9");
    assert_eq!(visa.added_by, AMY_EMAIL);
    let body = &captured.bodies()[0];
    assert_eq!(body["added_by"], AMY_EMAIL);
    assert_eq!(body["added_by_name"], "Amy");
    assert_eq!(body["fee"], 160);
    assert!(body["added_date"].is_string());
    assert_eq!(
        notifier.successes(),
        vec!["Visa added successfully!".to_string()]
    );
    assert!(!view.is_submitting());
}

#[tokio::test]
async fn test_second_submission_in_flight_is_rejected() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, _) = signed_in_state(server.base_url());
    let view = AddVisaView::new(&state);
    let form = japan_form();

    let (first, second) = tokio::join!(view.submit(&form), view.submit(&form));

    assert!(first.unwrap().is_some());
    assert!(matches!(second, Err(ClientError::Validation(_))));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_my_added_visas_update_replaces_locally() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let view = MyAddedVisasView::new(&state);

    let visas = view.load().await.unwrap();
    assert_eq!(
        visas.iter().map(|visa| visa.id.as_str()).collect::<Vec<_>>(),
        vec!["v1", "v3"]
    );

    let mut form = view.edit_form("v1").unwrap();
    form.fee = "200".to_string();
    form.toggle_document("Travel insurance", true);

    let outcome = view.update("v1", &form).await.unwrap();

    assert_eq!(outcome, MutationOutcome::Applied);
    let updated = view.visas().into_iter().find(|visa| visa.id == "v1").unwrap();
    assert_eq!(updated.fee, 200);
    assert_eq!(updated.required_documents.len(), 2);
    assert_eq!(updated.added_by, AMY_EMAIL);
    assert!(notifier.successes().contains(&"Visa updated successfully!".to_string()));
}

#[tokio::test]
async fn test_failed_update_leaves_list_unchanged() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let view = MyAddedVisasView::new(&state);
    let before = view.load().await.unwrap();

    let mut form = view.edit_form("v3").unwrap();
    form.fee = "999".to_string();
    let err = view.update("v3", &form).await.unwrap_err();

    assert!(matches!(err, ClientError::Protocol { status: 500, .. }));
    assert_eq!(view.visas(), before);
    assert_eq!(notifier.errors(), vec!["500 Internal Server Error".to_string()]);
}

#[tokio::test]
async fn test_dropped_update_is_never_applied() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, _) = signed_in_state(server.base_url());
    let view = MyAddedVisasView::new(&state);
    let before = view.load().await.unwrap();

    let mut form = view.edit_form("v1").unwrap();
    form.fee = "1".to_string();
    let result = tokio::time::timeout(Duration::from_millis(20), view.update("v1", &form)).await;

    assert!(result.is_err(), "update should still be in flight");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(view.visas(), before);
    assert!(!view.is_submitting());
}

#[tokio::test]
async fn test_dropped_load_stops_loading() {
    let router = Router::new().route(
        "/visas",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(json!([]))
        }),
    );
    let server = StubServer::start(router).await;
    let (state, notifier) = signed_out_state(server.base_url());
    let view = AllVisasView::new(&state);

    let result = tokio::time::timeout(Duration::from_millis(20), view.load()).await;

    assert!(result.is_err(), "load should still be in flight");
    assert!(!view.is_loading());
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!view.is_loading());
    assert!(view.visible().is_empty());
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_delete_confirmed_removes_locally() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, _) = signed_in_state(server.base_url());
    let view = MyAddedVisasView::new(&state);
    view.load().await.unwrap();

    let outcome = view.delete("v1", &accept).await.unwrap();

    assert_eq!(outcome, MutationOutcome::Applied);
    assert!(view.visas().iter().all(|visa| visa.id != "v1"));
    assert_eq!(view.visas().len(), 1);
}

#[tokio::test]
async fn test_delete_declined_sends_nothing() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let view = MyAddedVisasView::new(&state);
    let before = view.load().await.unwrap();
    let hits = server.hits();

    let outcome = view.delete("v1", &decline).await.unwrap();

    assert_eq!(outcome, MutationOutcome::Declined);
    assert_eq!(server.hits(), hits);
    assert_eq!(view.visas(), before);
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_delete_failure_keeps_listing() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let view = MyAddedVisasView::new(&state);
    let before = view.load().await.unwrap();

    assert!(view.delete("v3", &accept).await.is_err());
    assert_eq!(view.visas(), before);
    assert_eq!(notifier.errors(), vec!["Failed to delete visa".to_string()]);
}

#[tokio::test]
async fn test_my_applications_search_and_cancel() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, notifier) = signed_in_state(server.base_url());
    let view = MyApplicationsView::new(&state);
    view.load().await.unwrap();

    view.set_search("jap");
    let ids: Vec<_> = view.visible().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["a1", "a3"]);

    assert_eq!(
        view.cancel("a1", &decline).await.unwrap(),
        MutationOutcome::Declined
    );
    assert_eq!(view.applications().len(), 3);

    assert_eq!(
        view.cancel("a1", &accept).await.unwrap(),
        MutationOutcome::Applied
    );
    let ids: Vec<_> = view.visible().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["a3"]);

    view.clear_search();
    assert_eq!(view.visible().len(), 2);
    assert_eq!(
        notifier.successes(),
        vec!["Your application has been cancelled.".to_string()]
    );
}

#[tokio::test]
async fn test_signed_out_views_send_nothing() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, notifier) = signed_out_state(server.base_url());

    assert!(MyAddedVisasView::new(&state).load().await.is_err());
    assert!(MyApplicationsView::new(&state).load().await.is_err());
    assert!(AddVisaView::new(&state).submit(&japan_form()).await.is_err());

    assert_eq!(server.hits(), 0);
    assert_eq!(notifier.errors().len(), 3);
}

#[tokio::test]
async fn test_login_view_destination() {
    let server = StubServer::start(visa_api(Captured::default())).await;
    let (state, notifier) = signed_out_state(server.base_url());

    let view = LoginView::new(state.session_store.clone(), Some("/add-visa".to_string()));
    assert_eq!(view.destination(), "/add-visa");
    assert_eq!(
        LoginView::new(state.session_store.clone(), None).destination(),
        "/"
    );

    let err = view.sign_in("", "Secret1").await.unwrap_err();
    assert_eq!(err.to_string(), "Email is required");
    assert_eq!(server.hits(), 0);
    assert_eq!(notifier.errors().len(), 1);
}
