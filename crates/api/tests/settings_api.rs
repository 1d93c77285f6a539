//! Owner-scoped project settings endpoints, plus the settings synchronizer
//! driven against a live server.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, get, get_auth, patch_json_auth};
use luminar_core::project::{IconRadius, ProjectEdit};
use luminar_core::project_config::{ConfigEdit, PreviewStyle};
use luminar_settings::{
    CommitOutcome, HttpSettingsApi, Notification, NotificationKind, RecordKind,
    SettingsApi, SettingsSynchronizer, SyncState,
};
use serde_json::json;
use sqlx::PgPool;
use tokio::sync::mpsc;

const PNG_HEADER: [u8; 16] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R',
];

// ---------------------------------------------------------------------------
// Project record
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_reads_project(pool: PgPool) {
    let (owner, token) = common::create_user(&pool, "owner@example.com").await;
    common::create_project(&pool, &owner, "acme").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/projects/acme", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["slug"], "acme");
    assert_eq!(json["icon"], serde_json::Value::Null);
    assert_eq!(json["icon_radius"], "rounded-md");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn anonymous_and_foreign_callers_are_refused(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner@example.com").await;
    let (_, stranger) = common::create_user(&pool, "stranger@example.com").await;
    common::create_project(&pool, &owner, "acme").await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/projects/acme").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.clone(), "/api/v1/projects/acme", &stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Project 'acme' not found");

    let response =
        patch_json_auth(app, "/api/v1/projects/acme", &stranger, json!({ "icon": null })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_writes_only_named_fields(pool: PgPool) {
    let (owner, token) = common::create_user(&pool, "owner@example.com").await;
    common::create_project(&pool, &owner, "acme").await;
    let app = common::build_test_app(pool);

    let body = json!({ "icon": "https://cdn.example.com/logo.png", "og_image": "https://cdn.example.com/og.png" });
    let response = patch_json_auth(app.clone(), "/api/v1/projects/acme", &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({ "icon_radius": "rounded-full", "og_image": null });
    let response = patch_json_auth(app, "/api/v1/projects/acme", &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["icon"], "https://cdn.example.com/logo.png");
    assert_eq!(json["icon_radius"], "rounded-full");
    assert_eq!(json["og_image"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_patch_leaves_record_untouched(pool: PgPool) {
    let (owner, token) = common::create_user(&pool, "owner@example.com").await;
    let project = common::create_project(&pool, &owner, "acme").await;
    let app = common::build_test_app(pool.clone());

    let response = patch_json_auth(app, "/api/v1/projects/acme", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (updated_at,): (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("SELECT updated_at FROM projects WHERE id = $1")
            .bind(project.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(updated_at, project.updated_at);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_image_reference_is_rejected(pool: PgPool) {
    let (owner, token) = common::create_user(&pool, "owner@example.com").await;
    common::create_project(&pool, &owner, "acme").await;
    let app = common::build_test_app(pool);

    let body = json!({ "icon": "ftp://example.com/logo.png" });
    let response = patch_json_auth(app.clone(), "/api/v1/projects/acme", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let body = json!({ "icon_radius": "rounded-xl" });
    let response = patch_json_auth(app, "/api/v1/projects/acme", &token, body).await;
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Config record
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn config_never_exposes_secret(pool: PgPool) {
    let (owner, token) = common::create_user(&pool, "owner@example.com").await;
    let project = common::create_project(&pool, &owner, "acme").await;
    sqlx::query("UPDATE project_configs SET integration_sso_secret = 'shh' WHERE project_id = $1")
        .bind(project.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app, "/api/v1/projects/acme/config", &token).await).await;

    assert_eq!(json["changelog_preview_style"], "summary");
    assert_eq!(json["feedback_allow_anon_upvoting"], false);
    assert!(json.get("integration_sso_secret").is_none());
    assert!(!json.to_string().contains("shh"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn twitter_handle_is_normalized(pool: PgPool) {
    let (owner, token) = common::create_user(&pool, "owner@example.com").await;
    common::create_project(&pool, &owner, "acme").await;
    let app = common::build_test_app(pool);
    let uri = "/api/v1/projects/acme/config";

    let response =
        patch_json_auth(app.clone(), uri, &token, json!({ "changelog_twitter_handle": "@alice" }))
            .await;
    assert_eq!(body_json(response).await["changelog_twitter_handle"], "alice");

    let response =
        patch_json_auth(app.clone(), uri, &token, json!({ "changelog_twitter_handle": "" })).await;
    assert_eq!(
        body_json(response).await["changelog_twitter_handle"],
        serde_json::Value::Null
    );

    let too_long = json!({ "changelog_twitter_handle": "a_very_long_handle_indeed" });
    let response = patch_json_auth(app, uri, &token, too_long).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Synchronizer end to end
// ---------------------------------------------------------------------------

async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn open(
    base_url: &str,
    token: &str,
    slug: &str,
) -> (
    SettingsSynchronizer<HttpSettingsApi>,
    mpsc::UnboundedReceiver<Notification>,
) {
    let api = HttpSettingsApi::new(base_url).with_access_token(token);
    let project = api.fetch_project(slug).await.unwrap();
    let config = api.fetch_project_config(slug).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    (
        SettingsSynchronizer::new(slug, project, config, api, Arc::new(tx)),
        rx,
    )
}

fn kinds(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<NotificationKind> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n.kind);
    }
    out
}

#[sqlx::test(migrations = "../db/migrations")]
async fn synchronizer_commits_against_live_server(pool: PgPool) {
    let (owner, token) = common::create_user(&pool, "owner@example.com").await;
    common::create_project(&pool, &owner, "acme").await;
    let base_url = serve(common::build_test_app(pool)).await;

    let (sync, mut toasts) = open(&base_url, &token, "acme").await;
    assert_eq!(sync.state(RecordKind::Project).await, SyncState::Clean);

    sync.stage_icon_upload(&PNG_HEADER, "image/png", PNG_HEADER.len() as u64)
        .await
        .unwrap();
    sync.stage_project(ProjectEdit::IconRadius(IconRadius::Circle))
        .await;
    assert!(sync.save_enabled(RecordKind::Project).await);

    let outcome = sync.commit(RecordKind::Project).await;
    assert_eq!(outcome, CommitOutcome::Committed { requeued: false });
    assert_eq!(
        kinds(&mut toasts),
        vec![NotificationKind::Loading, NotificationKind::Success]
    );

    let baseline = sync.project_baseline().await;
    assert!(baseline
        .icon
        .as_deref()
        .is_some_and(|i| i.starts_with("data:image/png;base64,")));
    assert_eq!(baseline.icon_radius, IconRadius::Circle);
    assert_eq!(sync.state(RecordKind::Project).await, SyncState::Clean);

    // Config: set a handle, then clear it with an empty string.
    sync.stage_config(ConfigEdit::ChangelogTwitterHandle(Some("alice".into())))
        .await;
    sync.stage_config(ConfigEdit::ChangelogPreviewStyle(PreviewStyle::Content))
        .await;
    assert_matches!(
        sync.commit(RecordKind::ProjectConfig).await,
        CommitOutcome::Committed { .. }
    );
    assert_eq!(
        sync.config_baseline().await.changelog_twitter_handle.as_deref(),
        Some("alice")
    );

    sync.stage_config(ConfigEdit::ChangelogTwitterHandle(Some(String::new())))
        .await;
    assert_matches!(
        sync.commit(RecordKind::ProjectConfig).await,
        CommitOutcome::Committed { .. }
    );
    let config = sync.config_baseline().await;
    assert_eq!(config.changelog_twitter_handle, None);
    assert_eq!(config.changelog_preview_style, PreviewStyle::Content);
    assert_eq!(sync.state(RecordKind::ProjectConfig).await, SyncState::Clean);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn synchronizer_surfaces_server_rejection(pool: PgPool) {
    let (owner, token) = common::create_user(&pool, "owner@example.com").await;
    common::create_project(&pool, &owner, "acme").await;
    let base_url = serve(common::build_test_app(pool)).await;

    let (sync, mut toasts) = open(&base_url, &token, "acme").await;
    sync.stage_config(ConfigEdit::ChangelogTwitterHandle(Some(
        "not a valid handle!".into(),
    )))
    .await;

    let outcome = sync.commit(RecordKind::ProjectConfig).await;

    assert_matches!(outcome, CommitOutcome::Failed { message } if message.contains("handle"));
    assert_eq!(
        kinds(&mut toasts),
        vec![NotificationKind::Loading, NotificationKind::Error]
    );
    assert_eq!(sync.config_baseline().await.changelog_twitter_handle, None);
    assert_eq!(
        sync.config().await.changelog_twitter_handle.as_deref(),
        Some("not a valid handle!")
    );
    assert_eq!(sync.state(RecordKind::ProjectConfig).await, SyncState::Dirty);
}
