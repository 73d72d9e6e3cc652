mod support;

use axum::http::{header, StatusCode};
use support::{body_text, get, header_str, post_form, TestApp};

#[tokio::test]
async fn root_shows_login_page() {
    let app = TestApp::new();

    let response = app.send(get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_str(&response, header::CONTENT_TYPE).starts_with("text/html"));

    let body = body_text(response).await;
    assert!(body.contains("action=\"/login\""));
    assert!(body.contains("name=\"user\""));
}

#[tokio::test]
async fn root_redirects_to_board_when_signed_in() {
    let app = TestApp::new();
    let cookie = app.sign_in();

    let response = app.send(get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header_str(&response, header::LOCATION), "/todos");
}

#[tokio::test]
async fn login_opens_a_session_and_sets_the_cookie() {
    let app = TestApp::new();

    let response = app.send(post_form("/login", "user=alice", None)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header_str(&response, header::LOCATION), "/todos");

    let set_cookie = header_str(&response, header::SET_COOKIE).to_string();
    assert!(set_cookie.starts_with("cardfile_sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));

    // The cookie it handed out opens the board
    let cookie = set_cookie.split(';').next().expect("cookie pair").to_string();
    let board = app.send(get("/todos", Some(&cookie))).await;
    assert_eq!(board.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_stores_the_hash_not_the_name() {
    let app = TestApp::new();

    let response = app.send(post_form("/login", "user=alice", None)).await;
    let set_cookie = header_str(&response, header::SET_COOKIE);
    let sid = set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, sid)| sid.to_string())
        .expect("sid");

    let session = app.state().sessions.get(&sid).expect("session");
    assert_ne!(session.user_id, "alice");
    assert_eq!(session.user_id, cardfile::session::hash_user_id("alice"));
}

#[tokio::test]
async fn login_rejects_blank_user() {
    let app = TestApp::new();

    let response = app.send(post_form("/login", "user=", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_destroys_the_session() {
    let app = TestApp::new();
    let cookie = app.sign_in();

    let response = app.send(post_form("/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header_str(&response, header::LOCATION), "/");
    assert!(header_str(&response, header::SET_COOKIE).contains("Max-Age=0"));

    // The old cookie no longer opens the board
    let board = app.send(get("/todos", Some(&cookie))).await;
    assert_eq!(board.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn unknown_session_id_is_ignored() {
    let app = TestApp::new();

    let cookie = "cardfile_sid=no-such-session";
    let response = app.send(get("/todos", Some(cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header_str(&response, header::LOCATION), "/");
}

#[tokio::test]
async fn unrelated_cookies_do_not_open_a_session() {
    let app = TestApp::new();
    let live = app.sign_in();
    let sid = live.split_once('=').expect("pair").1;

    // Same sid under a different cookie name
    let cookie = format!("other_cookie={sid}");
    let response = app.send(get("/todos", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    // The sid under the right name, surrounded by noise, still works
    let cookie = format!("a=b; cardfile_sid={sid}; theme=dark");
    let response = app.send(get("/todos", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}
