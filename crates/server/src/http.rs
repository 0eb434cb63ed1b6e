//! HTTP Endpoints
//!
//! REST API for the assessment chat, content lookup and bookmarks.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use career_guide_agent::{AssessmentRequest, AssessmentResponse};
use career_guide_core::{
    AssessmentStage, Bookmark, CategoryData, CategoryKey, ChatMessage, ContentCatalog,
    NewBookmark, RoadmapData,
};

use crate::metrics::{metrics_handler, record_exchange, record_fallback, record_transition};
use crate::session::Session;
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );

    Router::new()
        // Stateless engine call
        .route("/api/assessment", post(assess))
        // Session endpoints
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/messages", post(post_message))
        .route("/api/sessions/:id/reset", post(reset_session))
        // Content
        .route("/api/categories", get(list_categories))
        .route("/api/categories/:key", get(get_category))
        .route("/api/roadmaps/:name", get(get_roadmap))
        // Bookmarks
        .route(
            "/api/users/:user/bookmarks",
            get(list_bookmarks).post(toggle_bookmark),
        )
        .route(
            "/api/users/:user/bookmarks/primary",
            get(get_primary).put(set_primary),
        )
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty or all invalid, allows localhost:3000 only
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to localhost:3000");
        return layer.allow_origin(HeaderValue::from_static("http://localhost:3000"));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    layer.allow_origin(parsed_origins)
}

/// Stateless assessment turn.
///
/// Engine failures answer with the fallback message at the caller's stage.
async fn assess(
    State(state): State<AppState>,
    Json(request): Json<AssessmentRequest>,
) -> Json<AssessmentResponse> {
    let stage = AssessmentStage::from_number(request.stage);
    match state.engine.respond(&request) {
        Ok(response) => {
            record_exchange(stage);
            if let Some(transition) = &response.transition {
                record_transition(transition);
            }
            Json(response)
        }
        Err(e) => {
            tracing::error!(error = %e, stage = %stage, "Assessment failed, sending fallback");
            record_fallback("assessment");
            let fallback = &state.engine.prompts().fallback;
            Json(AssessmentResponse {
                message: fallback.message.clone(),
                options: fallback.options.clone(),
                next_stage: i64::from(stage.number()),
                category: None,
                transition: None,
            })
        }
    }
}

/// Session snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    session_id: String,
    active: bool,
    stage: u8,
    stage_name: &'static str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    derived_roadmap_category: Option<CategoryKey>,
}

impl SessionView {
    fn new(session: &Session, state: career_guide_core::ConversationState) -> Self {
        Self {
            session_id: session.id.clone(),
            active: session.is_active(),
            stage: state.current_stage.number(),
            stage_name: state.current_stage.display_name(),
            messages: state.messages,
            derived_roadmap_category: state.derived_roadmap_category,
        }
    }
}

fn lookup_session(state: &AppState, id: &str) -> Result<std::sync::Arc<Session>, ServerError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| ServerError::Session(format!("Unknown session: {}", id)))
}

/// Create session
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), ServerError> {
    let (session, conversation) = state.create_session().await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionView::new(&session, conversation)),
    ))
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Get session info with its transcript
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let session = lookup_session(&state, &id)?;
    let conversation = state
        .store
        .load(&id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Conversation for session {}", id)))?;
    Ok(Json(SessionView::new(&session, conversation)))
}

/// Delete session
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    if state.close_session(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::Session(format!("Unknown session: {}", id)))
    }
}

/// Chat message request
#[derive(Debug, Deserialize)]
struct MessageRequest {
    message: String,
}

/// Reply to one chat turn
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TurnResponse {
    message: String,
    options: Vec<String>,
    stage: u8,
    stage_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<CategoryKey>,
    /// True when the reply is the apology fallback
    fallback: bool,
}

/// Fails when the session was closed while waiting for its turn lock
fn ensure_active(session: &Session) -> Result<(), ServerError> {
    if session.is_active() {
        Ok(())
    } else {
        Err(ServerError::Session(format!("Session closed: {}", session.id)))
    }
}

/// Run one turn: load, exchange, save. Caller holds the turn lock.
async fn run_turn(
    state: &AppState,
    session: &Session,
    text: &str,
) -> Result<TurnResponse, ServerError> {
    ensure_active(session)?;

    let mut conversation = match state.store.load(&session.id).await? {
        Some(conversation) => conversation,
        None => {
            tracing::warn!(session_id = %session.id, "Conversation missing from store, starting over");
            state.conversation.start()
        }
    };

    let stage = conversation.current_stage;
    let outcome = state.conversation.exchange(&mut conversation, text)?;
    state.store.save(&session.id, &conversation).await?;
    session.set_stage(conversation.current_stage);

    record_exchange(stage);
    if let Some(transition) = &outcome.transition {
        record_transition(transition);
    }

    Ok(TurnResponse {
        message: outcome.bot_message.text,
        options: outcome.bot_message.suggested_options,
        stage: conversation.current_stage.number(),
        stage_name: conversation.current_stage.display_name(),
        category: outcome.category,
        fallback: false,
    })
}

/// Chat endpoint
///
/// Unknown or closed sessions are a 404; every other failure is answered with the
/// fallback message so the chat can continue.
async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TurnResponse>, ServerError> {
    let session = lookup_session(&state, &id)?;
    session.touch();

    let _turn = session.lock_turn().await;
    match run_turn(&state, &session, &request.message).await {
        Ok(response) => Ok(Json(response)),
        Err(e @ ServerError::Session(_)) => Err(e),
        Err(e) => {
            match &e {
                ServerError::Engine(_) => {
                    tracing::error!(session_id = %id, error = %e, "Engine failure, sending fallback")
                }
                _ => tracing::warn!(session_id = %id, error = %e, "Turn failed, sending fallback"),
            }
            record_fallback("messages");

            let fallback = &state.engine.prompts().fallback;
            let stage = session.stage();
            Ok(Json(TurnResponse {
                message: fallback.message.clone(),
                options: fallback.options.clone(),
                stage: stage.number(),
                stage_name: stage.display_name(),
                category: None,
                fallback: true,
            }))
        }
    }
}

/// Reset a session to the greeting
async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let session = lookup_session(&state, &id)?;
    session.touch();

    let _turn = session.lock_turn().await;
    ensure_active(&session)?;
    let conversation = match state.store.load(&id).await? {
        Some(mut conversation) => {
            state.conversation.reset(&mut conversation);
            conversation
        }
        None => state.conversation.start(),
    };
    state.store.save(&id, &conversation).await?;
    session.set_stage(conversation.current_stage);

    Ok(Json(SessionView::new(&session, conversation)))
}

/// Category summary for listings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategorySummary {
    key: CategoryKey,
    display_name: String,
    paths: Vec<String>,
}

/// List categories in catalog order
async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategorySummary>> {
    let content = state.content();
    let summaries = content
        .category_keys()
        .into_iter()
        .filter_map(|key| {
            content.get_category(&key).map(|data| CategorySummary {
                display_name: data.display_name.clone(),
                paths: data.path_names(usize::MAX),
                key,
            })
        })
        .collect();
    Json(summaries)
}

/// Full category record
async fn get_category(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CategoryData>, ServerError> {
    state
        .content()
        .get_category(&CategoryKey::new(key.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("Category {}", key)))
}

/// Roadmap for a career path; unknown paths get the generic roadmap
async fn get_roadmap(State(state): State<AppState>, Path(name): Path<String>) -> Json<RoadmapData> {
    Json(state.content().get_roadmap(&name))
}

/// Bookmark request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookmarkBody {
    career_name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    roadmap_key: Option<String>,
}

impl BookmarkBody {
    /// Fill in the category from the catalog and the roadmap key from the name
    fn into_request(self, state: &AppState, user_id: String) -> Result<NewBookmark, ServerError> {
        let career_name = self.career_name.trim().to_string();
        if career_name.is_empty() {
            return Err(ServerError::InvalidRequest(
                "careerName must not be empty".to_string(),
            ));
        }

        let category = match self.category {
            Some(category) => category,
            None => state
                .content()
                .catalog()
                .find_path(&career_name)
                .map(|(key, _)| key.to_string())
                .unwrap_or_default(),
        };

        Ok(NewBookmark {
            user_id,
            roadmap_key: self.roadmap_key.unwrap_or_else(|| career_name.clone()),
            career_name,
            category,
        })
    }
}

/// List a user's bookmarks
async fn list_bookmarks(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<Bookmark>>, ServerError> {
    Ok(Json(state.bookmarks.list(&user).await?))
}

/// Toggle a bookmark
async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(body): Json<BookmarkBody>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let request = body.into_request(&state, user)?;
    let bookmark = state.bookmarks.toggle(request).await?;
    Ok(Json(serde_json::json!({
        "bookmarked": bookmark.is_some(),
        "bookmark": bookmark,
    })))
}

/// Get the user's primary roadmap
async fn get_primary(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Bookmark>, ServerError> {
    state
        .bookmarks
        .primary(&user)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("Primary roadmap for {}", user)))
}

/// Set the user's primary roadmap
async fn set_primary(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(body): Json<BookmarkBody>,
) -> Result<Json<Bookmark>, ServerError> {
    let request = body.into_request(&state, user)?;
    Ok(Json(state.bookmarks.set_primary(request).await?))
}

/// Health check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": format!("{:?}", state.config.environment),
        "sessions": state.sessions.count(),
        "categories": state.content().catalog().len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    use career_guide_agent::DialogueEngine;
    use career_guide_config::{AssessmentConfig, ContentLibrary, Settings};
    use career_guide_core::{ConversationState, ConversationStore, FixedPicker};

    use crate::bookmarks::InMemoryBookmarkStore;

    fn engine() -> DialogueEngine {
        DialogueEngine::new(
            ContentLibrary::builtin(),
            &AssessmentConfig::default(),
            Arc::new(FixedPicker::first()),
        )
    }

    fn app() -> Router {
        create_router(AppState::new(Settings::default(), engine()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["categories"], 7);
    }

    #[tokio::test]
    async fn test_session_turns() {
        let app = app();
        let (status, created) = send(&app, "POST", "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["stage"], 1);
        assert_eq!(created["messages"].as_array().unwrap().len(), 1);
        let id = created["sessionId"].as_str().unwrap().to_string();

        let uri = format!("/api/sessions/{}/messages", id);
        let (status, reply) = send(
            &app,
            "POST",
            &uri,
            Some(serde_json::json!({ "message": "I love science" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["stage"], 2);
        assert_eq!(reply["category"], "science");
        assert_eq!(reply["fallback"], false);
        assert_eq!(reply["options"].as_array().unwrap().len(), 4);

        let (_, view) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(view["messages"].as_array().unwrap().len(), 3);
        assert_eq!(view["derivedRoadmapCategory"], "science");

        let (_, view) = send(&app, "POST", &format!("/api/sessions/{}/reset", id), None).await;
        assert_eq!(view["stage"], 1);
        assert_eq!(view["messages"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/sessions/nope/messages",
            Some(serde_json::json!({ "message": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn test_stateless_assessment() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/assessment",
            Some(serde_json::json!({
                "message": "let's skip ahead",
                "stage": 2,
                "conversationHistory": []
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nextStage"], 4);
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_content_endpoints() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 7);

        let (status, body) = send(&app, "GET", "/api/categories/healthcare", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["canonicalPaths"].as_array().unwrap().is_empty());
        assert_eq!(body["displayName"], "Healthcare");

        let (status, _) = send(&app, "GET", "/api/categories/astrology", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "GET", "/api/roadmaps/Software%20Developer", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Software Developer");

        let (status, body) = send(&app, "GET", "/api/roadmaps/Astronaut", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["phases"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bookmarks() {
        let app = app();
        let uri = "/api/users/u1/bookmarks";
        let (_, body) = send(
            &app,
            "POST",
            uri,
            Some(serde_json::json!({ "careerName": "Registered Nurse" })),
        )
        .await;
        assert_eq!(body["bookmarked"], true);
        assert_eq!(body["bookmark"]["category"], "healthcare");
        assert_eq!(body["bookmark"]["roadmapKey"], "Registered Nurse");
        assert_eq!(body["bookmark"]["careerName"], "Registered Nurse");

        let (status, _) = send(&app, "GET", "/api/users/u1/bookmarks/primary", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/users/u1/bookmarks/primary",
            Some(serde_json::json!({ "careerName": "Data Scientist" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isPrimary"], true);
        assert_eq!(body["userId"], "u1");

        let (_, list) = send(&app, "GET", uri, None).await;
        assert_eq!(list.as_array().unwrap().len(), 2);

        let (status, _) = send(
            &app,
            "POST",
            uri,
            Some(serde_json::json!({ "careerName": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    struct BrokenStore;

    #[async_trait]
    impl ConversationStore for BrokenStore {
        async fn load(&self, _: &str) -> career_guide_core::Result<Option<ConversationState>> {
            Err(career_guide_core::Error::Storage("unavailable".into()))
        }
        async fn save(&self, _: &str, _: &ConversationState) -> career_guide_core::Result<()> {
            Ok(())
        }
        async fn delete(&self, _: &str) -> career_guide_core::Result<()> {
            Ok(())
        }
        async fn list_ids(&self) -> career_guide_core::Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_store_failure_sends_fallback() {
        let state = AppState::with_stores(
            Settings::default(),
            engine(),
            Arc::new(BrokenStore),
            Arc::new(InMemoryBookmarkStore::new()),
        );
        let fallback = state.engine.prompts().fallback.clone();
        let app = create_router(state);

        let (_, created) = send(&app, "POST", "/api/sessions", None).await;
        let id = created["sessionId"].as_str().unwrap().to_string();
        let (status, reply) = send(
            &app,
            "POST",
            &format!("/api/sessions/{}/messages", id),
            Some(serde_json::json!({ "message": "technology" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["fallback"], true);
        assert_eq!(reply["message"], fallback.message.as_str());
        assert_eq!(reply["stage"], 1);
    }

    #[tokio::test]
    async fn test_metrics_disabled_without_recorder() {
        let (status, _) = send(&app(), "GET", "/metrics", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_waits_for_pending_turn() {
        let state = AppState::new(Settings::default(), engine());
        let app = create_router(state.clone());

        let (_, created) = send(&app, "POST", "/api/sessions", None).await;
        let id = created["sessionId"].as_str().unwrap().to_string();
        let session = state.sessions.get(&id).unwrap();

        // Queue a message and a delete behind a held turn lock
        let turn = session.lock_turn().await;
        let message = {
            let app = app.clone();
            let uri = format!("/api/sessions/{}/messages", id);
            tokio::spawn(async move {
                send(&app, "POST", &uri, Some(serde_json::json!({ "message": "technology" }))).await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let delete = {
            let app = app.clone();
            let uri = format!("/api/sessions/{}", id);
            tokio::spawn(async move { send(&app, "DELETE", &uri, None).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        drop(turn);

        let (message_status, _) = message.await.unwrap();
        let (delete_status, _) = delete.await.unwrap();

        assert!(message_status == StatusCode::OK || message_status == StatusCode::NOT_FOUND);
        assert_eq!(delete_status, StatusCode::NO_CONTENT);
        assert!(state.sessions.get(&id).is_none());
        assert!(state.store.load(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_session_turn_is_not_found() {
        let state = AppState::new(Settings::default(), engine());
        let app = create_router(state.clone());

        let (_, created) = send(&app, "POST", "/api/sessions", None).await;
        let id = created["sessionId"].as_str().unwrap().to_string();
        let session = state.sessions.get(&id).unwrap();
        session.close();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/sessions/{}/messages", id),
            Some(serde_json::json!({ "message": "technology" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(state.store.load(&id).await.unwrap().unwrap().messages.len(), 1);
    }
}
