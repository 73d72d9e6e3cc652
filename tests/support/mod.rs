use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use cardfile::config::Config;
use cardfile::server::{self, AppState};
use cardfile::session;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

/// An in-process app over a temp card file, driven through the router
/// without a socket.
pub struct TestApp {
    dir: TempDir,
    state: Arc<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let mut config = Config::default();
        config.db.path = dir.path().join("db").join("todoList.csv");
        let state = AppState::new(config).expect("failed to build app state");
        Self { dir, state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("db").join("todoList.csv")
    }

    pub fn seed_cards(&self, raw: &str) {
        let path = self.db_path();
        fs::create_dir_all(path.parent().expect("db parent")).expect("create db dir");
        fs::write(path, raw).expect("seed card file");
    }

    pub fn read_db(&self) -> String {
        fs::read_to_string(self.db_path()).expect("read card file")
    }

    /// Open a session the way the login handler would and return the
    /// cookie to send back.
    pub fn sign_in(&self) -> String {
        let sid = self
            .state
            .sessions
            .create(&session::hash_user_id("uniqueID"));
        format!("{}={}", self.state.config.session.cookie, sid)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        server::router(Arc::clone(&self.state))
            .oneshot(request)
            .await
            .expect("request failed")
    }
}

fn build(method: Method, path: &str, cookie: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
}

pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    build(Method::GET, path, cookie)
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(path: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    build(Method::POST, path, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn put_json(path: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    build(Method::PUT, path, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn delete(path: &str, cookie: Option<&str>) -> Request<Body> {
    build(Method::DELETE, path, cookie)
        .body(Body::empty())
        .expect("request")
}

pub fn post_form(path: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    build(Method::POST, path, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn header_str<'a>(response: &'a Response<Body>, name: header::HeaderName) -> &'a str {
    response
        .headers()
        .get(&name)
        .unwrap_or_else(|| panic!("missing header {name}"))
        .to_str()
        .expect("non-ascii header")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}
