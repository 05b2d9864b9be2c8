//! Request handlers. Each one resolves the caller's user ID from the session
//! cookie and makes a single [`NotesStore`](kvnotes_core::NotesStore) call.

use crate::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use kvnotes_core::{
    Category, KvBackend, Note, NoteSummary, NotesDocument, NotesError, Session, SessionCodec,
};
use serde::{Deserialize, Serialize};

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Form value of `action` that abandons an edit and deletes the entity being edited.
const CANCEL_ACTION: &str = "cancel";

fn read_session(sessions: &SessionCodec, headers: &HeaderMap) -> Session {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    sessions.read(cookie)
}

/// Returns the session's user ID, or [`NotesError::Unauthorized`] if there is none.
fn require_user(sessions: &SessionCodec, headers: &HeaderMap) -> ApiResult<String> {
    read_session(sessions, headers)
        .user_id()
        .map(str::to_string)
        .ok_or(ApiError(NotesError::Unauthorized))
}

fn required(field: Option<String>, name: &str) -> ApiResult<String> {
    field.ok_or_else(|| ApiError(NotesError::InvalidInput(format!("Missing {name}"))))
}

/// Everything the navigation sidebar shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub categories: Vec<Category>,
    pub notes: Vec<NoteSummary>,
}

impl From<NotesDocument> for HomeView {
    fn from(document: NotesDocument) -> Self {
        let notes = document.note_summaries();
        Self {
            categories: document.categories,
            notes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    pub action: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NoteForm {
    pub action: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// `GET /` — starts a session on first visit and returns the sidebar contents.
pub async fn home<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let mut session = read_session(&state.sessions, &headers);
    let user_id = session.ensure_user_id();
    let document = state.store.fetch_all(Some(&user_id)).await?;
    let view = Json(HomeView::from(document));

    if session.is_modified() {
        log::info!("started session for new user {user_id}");
        let cookie = state.sessions.commit(&session)?;
        return Ok(([(header::SET_COOKIE, cookie)], view).into_response());
    }
    Ok(view.into_response())
}

/// `GET /categories`
pub async fn list_categories<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
) -> ApiResult<Json<NotesDocument>> {
    let user_id = require_user(&state.sessions, &headers)?;
    Ok(Json(state.store.fetch_all(Some(&user_id)).await?))
}

/// `POST /categories` — creates an unnamed category for the user to fill in.
pub async fn create_category<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let user_id = require_user(&state.sessions, &headers)?;
    let category = state
        .store
        .create_empty_category(Some(&user_id))
        .await?
        .ok_or(ApiError(NotesError::Unauthorized))?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /categories/{category_id}`
pub async fn show_category<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    Path(category_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Category>> {
    let user_id = require_user(&state.sessions, &headers)?;
    let category = state
        .store
        .fetch_category(Some(&user_id), &category_id)
        .await?;
    category
        .map(Json)
        .ok_or(ApiError(NotesError::CategoryNotFound(category_id)))
}

/// `POST /categories/{category_id}` — creates an empty note in the category.
pub async fn create_note<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    Path(category_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let user_id = require_user(&state.sessions, &headers)?;
    let note = state
        .store
        .create_empty_note(Some(&user_id), &category_id)
        .await?
        .ok_or(ApiError(NotesError::Unauthorized))?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// `POST /categories/{category_id}/edit` — renames, or deletes on `action: "cancel"`.
pub async fn edit_category<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    Path(category_id): Path<String>,
    headers: HeaderMap,
    Json(form): Json<CategoryForm>,
) -> ApiResult<StatusCode> {
    let user_id = require_user(&state.sessions, &headers)?;
    if form.action.as_deref() == Some(CANCEL_ACTION) {
        state
            .store
            .delete_category(Some(&user_id), &category_id)
            .await?;
        return Ok(StatusCode::NO_CONTENT);
    }
    let name = required(form.name, "name")?;
    state
        .store
        .update_category(Some(&user_id), &category_id, &name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /categories/{category_id}/destroy`
pub async fn destroy_category<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    Path(category_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let user_id = require_user(&state.sessions, &headers)?;
    state
        .store
        .delete_category(Some(&user_id), &category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /categories/{category_id}/notes/{note_id}`
pub async fn show_note<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    Path((_category_id, note_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<Note>> {
    let user_id = require_user(&state.sessions, &headers)?;
    let note = state.store.fetch_note(Some(&user_id), &note_id).await?;
    note.map(Json)
        .ok_or(ApiError(NotesError::NoteNotFound(note_id)))
}

/// `POST /categories/{category_id}/notes/{note_id}` — creates another empty
/// note in the same category, as the "new note" button on a note page does.
pub async fn create_sibling_note<B: KvBackend + 'static>(
    state: State<AppState<B>>,
    Path((category_id, _note_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<(StatusCode, Json<Note>)> {
    create_note(state, Path(category_id), headers).await
}

/// `POST /categories/{category_id}/notes/{note_id}/edit` — updates, or deletes on cancel.
pub async fn edit_note<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    Path((category_id, note_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(form): Json<NoteForm>,
) -> ApiResult<StatusCode> {
    let user_id = require_user(&state.sessions, &headers)?;
    if form.action.as_deref() == Some(CANCEL_ACTION) {
        state.store.delete_note(Some(&user_id), &note_id).await?;
        return Ok(StatusCode::NO_CONTENT);
    }
    let title = required(form.title, "title")?;
    let body = required(form.body, "body")?;
    state
        .store
        .update_note(Some(&user_id), &category_id, &note_id, &title, &body)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /categories/{category_id}/notes/{note_id}/destroy`
pub async fn destroy_note<B: KvBackend + 'static>(
    State(state): State<AppState<B>>,
    Path((_category_id, note_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let user_id = require_user(&state.sessions, &headers)?;
    state.store.delete_note(Some(&user_id), &note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
