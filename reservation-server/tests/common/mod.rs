//! Shared helpers: in-memory app driven through `tower::ServiceExt::oneshot`

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono_tz::Tz;
use http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use reservation_server::api::build_app;
use reservation_server::db::DbService;
use reservation_server::notify::LogNotifier;
use reservation_server::{Config, ServerState};
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_in(chrono_tz::UTC).await
    }

    pub async fn spawn_in(tz: Tz) -> Self {
        let db = DbService::memory().await.expect("in-memory database").db;
        let state = ServerState::new(Config::for_tests(tz), db, Arc::new(LogNotifier));
        let app = build_app(state.clone());
        Self { app, state }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    /// Register an account and return its token
    pub async fn register(&self, name: &str, email: &str, role: &str) -> String {
        let res = self
            .post(
                "/api/users/register",
                None,
                json!({ "name": name, "email": email, "password": "secret123", "role": role }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "register failed: {}", res.body);
        res.body["token"].as_str().expect("token").to_string()
    }

    /// Create a table as admin and return its id
    pub async fn create_table(&self, admin: &str, number: i32, capacity: i32) -> String {
        let res = self
            .post(
                "/api/tables",
                Some(admin),
                json!({ "table_number": number, "capacity": capacity, "available": true }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "create table failed: {}", res.body);
        res.body["id"].as_str().expect("table id").to_string()
    }

    pub async fn book(&self, token: &str, table_id: &str, date: &str, time: &str, guests: i32) -> TestResponse {
        self.post(
            "/api/reservations",
            Some(token),
            json!({ "table_id": table_id, "date": date, "time": time, "guests": guests }),
        )
        .await
    }

    pub async fn available_ids(&self, date: &str, time: &str, party: i32) -> Vec<String> {
        let res = self
            .get(
                &format!("/api/tables/available?date={date}&time={time}&party_size={party}"),
                None,
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "availability failed: {}", res.body);
        res.body
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|t| t["id"].as_str().map(str::to_string))
            .collect()
    }
}
