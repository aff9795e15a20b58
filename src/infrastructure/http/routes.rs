//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/auth/register     POST  注册
//! - /api/auth/login        POST  登录
//! - /api/auth/me           GET   当前用户
//! - /api/novel/create      POST  创建小说
//! - /api/novel/get         POST  获取小说详情
//! - /api/novel/update      POST  更新小说
//! - /api/novel/delete      POST  删除小说
//! - /api/novel/list        GET   当前用户的小说列表
//! - /api/novel/chapters    POST  小说章节列表
//! - /api/chapter/create    POST  新建章节
//! - /api/chapter/get       POST  获取章节
//! - /api/chapter/update    POST  更新章节
//! - /api/chapter/autosave  POST  自动保存
//! - /api/chapter/delete    POST  删除章节
//! - /api/chapter/reorder   POST  调整章节顺序

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/auth", auth_routes())
        .nest("/novel", novel_routes())
        .nest("/chapter", chapter_routes())
}

/// Auth 路由
fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/me", get(handlers::me))
}

/// Novel 路由
fn novel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_novel))
        .route("/get", post(handlers::get_novel))
        .route("/update", post(handlers::update_novel))
        .route("/delete", post(handlers::delete_novel))
        .route("/list", get(handlers::list_novels))
        .route("/chapters", post(handlers::list_chapters))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_chapter))
        .route("/get", post(handlers::get_chapter))
        .route("/update", post(handlers::update_chapter))
        .route("/autosave", post(handlers::autosave_chapter))
        .route("/delete", post(handlers::delete_chapter))
        .route("/reorder", post(handlers::reorder_chapter))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request},
        Router,
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::infrastructure::http::build_router;
    use crate::test_support::TestContext;

    async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Value {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post(app: &Router, uri: &str, token: &str, body: Value) -> Value {
        call(app, Method::POST, uri, Some(token), Some(body)).await
    }

    async fn register(app: &Router, username: &str) -> String {
        let body = json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "secret123",
        });
        let response = call(app, Method::POST, "/api/auth/register", None, Some(body)).await;
        assert_eq!(response["errno"], 0, "{}", response);
        response["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_ping_and_auth_required() {
        let ctx = TestContext::new().await;
        let app = build_router(ctx.app_state());

        let pong = call(&app, Method::GET, "/api/ping", None, None).await;
        assert_eq!(pong["status"], "ok");

        let denied = call(&app, Method::GET, "/api/novel/list", None, None).await;
        assert_eq!(denied["errno"], 401);

        let bogus = call(&app, Method::GET, "/api/auth/me", Some("not-a-token"), None).await;
        assert_eq!(bogus["errno"], 401);
    }

    #[tokio::test]
    async fn test_register_login_me() {
        let ctx = TestContext::new().await;
        let app = build_router(ctx.app_state());

        register(&app, "writer").await;

        let login = call(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "writer", "password": "secret123" })),
        )
        .await;
        assert_eq!(login["errno"], 0);
        let token = login["data"]["token"].as_str().unwrap();

        let me = call(&app, Method::GET, "/api/auth/me", Some(token), None).await;
        assert_eq!(me["data"]["username"], "writer");
        assert!(me["data"].get("password_hash").is_none());

        let duplicate = call(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "writer", "email": "x@example.com", "password": "secret123" })),
        )
        .await;
        assert_eq!(duplicate["errno"], 409);
    }

    #[tokio::test]
    async fn test_chapter_lifecycle_over_http() {
        let ctx = TestContext::new().await;
        let app = build_router(ctx.app_state());
        let token = register(&app, "writer").await;
        let stranger = register(&app, "stranger").await;

        let novel = post(&app, "/api/novel/create", &token, json!({ "title": "长夜" })).await;
        assert_eq!(novel["data"]["total_chapters"], 0);
        assert_eq!(novel["data"]["category"], "other");
        let novel_id = novel["data"]["id"].as_str().unwrap().to_string();

        let a = post(
            &app,
            "/api/chapter/create",
            &token,
            json!({ "novel_id": novel_id, "title": "A", "content": "hello" }),
        )
        .await;
        assert_eq!(a["data"]["order_index"], 1);
        let a_id = a["data"]["id"].as_str().unwrap().to_string();

        let b = post(
            &app,
            "/api/chapter/create",
            &token,
            json!({ "novel_id": novel_id, "title": "B" }),
        )
        .await;
        assert_eq!(b["data"]["order_index"], 2);
        let b_id = b["data"]["id"].as_str().unwrap().to_string();

        let novel = post(&app, "/api/novel/get", &token, json!({ "id": novel_id })).await;
        assert_eq!(novel["data"]["total_chapters"], 2);
        assert_eq!(novel["data"]["total_words"], 5);

        let forbidden = post(
            &app,
            "/api/chapter/update",
            &stranger,
            json!({ "id": a_id, "title": "篡改" }),
        )
        .await;
        assert_eq!(forbidden["errno"], 403);

        let moved = post(&app, "/api/chapter/reorder", &token, json!({ "id": b_id, "new_index": 1 })).await;
        assert_eq!(moved["data"]["status"], "moved");

        let same = post(&app, "/api/chapter/reorder", &token, json!({ "id": b_id, "new_index": 1 })).await;
        assert_eq!(same["data"]["status"], "unchanged");

        let out_of_range =
            post(&app, "/api/chapter/reorder", &token, json!({ "id": b_id, "new_index": 3 })).await;
        assert_eq!(out_of_range["errno"], 400);

        let autosave = post(
            &app,
            "/api/chapter/autosave",
            &token,
            json!({ "id": b_id, "content": "<p>新 内容</p>" }),
        )
        .await;
        assert_eq!(autosave["data"]["word_count"], 3);

        let deleted = post(&app, "/api/chapter/delete", &token, json!({ "id": a_id })).await;
        assert_eq!(deleted["errno"], 0);

        let list = post(&app, "/api/novel/chapters", &token, json!({ "id": novel_id })).await;
        assert_eq!(list["data"]["total"], 1);
        assert_eq!(list["data"]["chapters"][0]["id"], b_id.as_str());
        assert_eq!(list["data"]["chapters"][0]["order_index"], 1);

        let novel = post(&app, "/api/novel/get", &token, json!({ "id": novel_id })).await;
        assert_eq!(novel["data"]["total_chapters"], 1);
        assert_eq!(novel["data"]["total_words"], 3);

        let missing = post(&app, "/api/chapter/get", &token, json!({ "id": a_id })).await;
        assert_eq!(missing["errno"], 404);
    }
}
