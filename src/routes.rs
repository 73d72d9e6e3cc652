//! HTTP handlers
//!
//! Pages redirect visitors without a session; the JSON card endpoints
//! answer 401 instead so the board script surfaces the failure rather
//! than following a redirect. Store calls run on the blocking pool since
//! the store does file IO under a lock.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::page;
use crate::server::AppState;
use crate::session::{self, Session};

/// Body of `POST /todos`.
#[derive(Debug, Deserialize)]
pub struct AddCard {
    pub data: String,
    #[serde(rename = "type")]
    pub status: Option<String>,
}

/// Body of `PUT /todos/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateCard {
    #[serde(rename = "type")]
    pub status: String,
}

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub user: String,
}

/// `GET /` - login page, or straight to the board with a live session.
pub async fn login_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if current_session(&state, &headers).is_some() {
        return redirect("/todos");
    }
    Html(page::login(&state.config.board.title)).into_response()
}

/// `POST /login` - hash the submitted name, open a session, set the cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let user = form.user.trim();
    if user.is_empty() {
        return Err(Error::InvalidArgument("user cannot be empty".to_string()));
    }

    let user_id = session::hash_user_id(user);
    let sid = state.sessions.create(&user_id);
    info!(user_id = user_id.as_str(), "session created");

    Ok((
        StatusCode::FOUND,
        [
            (
                header::SET_COOKIE,
                session::session_cookie(&state.config.session.cookie, &sid),
            ),
            (header::LOCATION, "/todos".to_string()),
        ],
    )
        .into_response())
}

/// `POST /logout` - drop the session and clear the cookie.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(sid) = cookie_sid(&state, &headers) {
        if state.sessions.destroy(&sid) {
            info!("session destroyed");
        }
    }
    (
        StatusCode::FOUND,
        [
            (
                header::SET_COOKIE,
                session::clear_cookie(&state.config.session.cookie),
            ),
            (header::LOCATION, "/".to_string()),
        ],
    )
        .into_response()
}

/// `GET /todos` - the board, or a redirect home without a session.
pub async fn board_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response> {
    if current_session(&state, &headers).is_none() {
        return Ok(redirect("/"));
    }
    let store = state.store.clone();
    let cards = run_blocking(move || store.load()).await?;
    Ok(Html(page::board(&state.config.board, &cards)).into_response())
}

/// `POST /todos` - append a card, answer its id as plain text.
pub async fn add_card(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AddCard>,
) -> Result<Response> {
    require_session(&state, &headers)?;
    let store = state.store.clone();
    let card = run_blocking(move || store.add(&req.data, req.status.as_deref())).await?;
    info!(id = card.id.as_str(), status = card.status.as_str(), "card added");
    Ok((StatusCode::OK, card.id).into_response())
}

/// `PUT /todos/{id}` - move a card to another status column.
pub async fn update_card(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateCard>,
) -> Result<Response> {
    require_session(&state, &headers)?;
    let store = state.store.clone();
    let card = run_blocking(move || store.set_status(&id, &req.status)).await?;
    info!(id = card.id.as_str(), status = card.status.as_str(), "card moved");
    Ok((StatusCode::OK, "success").into_response())
}

/// `DELETE /todos/{id}` - remove a card.
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    require_session(&state, &headers)?;
    let store = state.store.clone();
    let card = run_blocking(move || store.remove(&id)).await?;
    info!(id = card.id.as_str(), "card deleted");
    Ok((StatusCode::OK, "success").into_response())
}

fn cookie_sid(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let header = headers.get(header::COOKIE)?.to_str().ok()?;
    session::cookie_value(header, &state.config.session.cookie).map(str::to_string)
}

fn current_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    state.sessions.get(&cookie_sid(state, headers)?)
}

fn require_session(state: &AppState, headers: &HeaderMap) -> Result<Session> {
    current_session(state, headers).ok_or(Error::SessionRequired)
}

fn redirect(location: &str) -> Response {
    // Redirect::to would answer 303; the page handed out here is always
    // fetched with GET, and 302 matches what callers of / expect.
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| Error::OperationFailed(format!("blocking task failed: {err}")))?
}
