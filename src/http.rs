//! HTTP surface for the dashboard.
//!
//! JSON endpoints for each dashboard page. Every route except `/health` sits
//! behind the entry-token gate, and the token doubles as the session key.

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::advice::AdviceRequest;
use crate::clients::NewsSource;
use crate::config::Config;
use crate::dashboard::{ChartData, slogan_for};
use crate::error::{GaiaError, Result};
use crate::footprint::{Questionnaire, QuestionnaireForm, estimate};
use crate::gating::{AccessToken, require_token};
use crate::mate::ClimateMate;
use crate::news::{Article, build_page};
use crate::session::SessionStore;

/// Upper bound of the advice form's footprint field, kg CO2e per month
const MAX_ADVICE_FOOTPRINT: f64 = 10_000.0;

/// Shared state for HTTP server
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub mate: ClimateMate,
    pub news: Arc<dyn NewsSource>,
}

impl AppState {
    pub fn new(config: Arc<Config>, mate: ClimateMate, news: Arc<dyn NewsSource>) -> Self {
        let sessions = SessionStore::new(
            config.server.session_cache_max,
            config.news.initial_visible,
        );
        Self {
            config,
            sessions,
            mate,
            news,
        }
    }
}

#[derive(Deserialize)]
pub struct NewsParams {
    #[serde(default)]
    refresh: bool,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    message: String,
}

/// Report an unreadable JSON body in the same error shape as every other 422.
fn body_rejection(field: &'static str, rejection: JsonRejection) -> GaiaError {
    GaiaError::InvalidInput {
        field,
        value: rejection.body_text(),
        domain: "a well-formed JSON body",
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

pub async fn home_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
) -> Json<Value> {
    let session = state.sessions.snapshot(&token).await;
    let today = chrono::Local::now().date_naive();
    Json(json!({
        "slogan": slogan_for(today),
        "chart": ChartData::for_session(session.breakdown.as_ref()),
    }))
}

pub async fn estimate_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    form: std::result::Result<Json<QuestionnaireForm>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(form) = form.map_err(|e| body_rejection("questionnaire", e))?;
    let questionnaire = Questionnaire::try_from(form)?;
    let breakdown = estimate(&questionnaire)?;
    let chart = ChartData::from_breakdown(&breakdown);
    let message = format!(
        "Your estimated carbon footprint is {:.2} kg CO\u{2082} per week.",
        breakdown.total()
    );
    let body = json!({
        "message": message,
        "footprint": &breakdown,
        "chart": chart,
    });
    state
        .sessions
        .update(&token, |ctx| ctx.breakdown = Some(breakdown))
        .await;
    Ok(Json(body))
}

pub async fn chart_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
) -> Json<ChartData> {
    let session = state.sessions.snapshot(&token).await;
    Json(ChartData::for_session(session.breakdown.as_ref()))
}

/// The session's article list, fetched from the backend when absent or when a refresh is asked for.
async fn session_articles(state: &AppState, token: &AccessToken, refresh: bool) -> Vec<Article> {
    if !refresh
        && let Some(articles) = state.sessions.snapshot(token).await.articles
    {
        return articles;
    }
    let articles = state.news.fetch().await;
    info!("Fetched {} articles", articles.len());
    let stored = articles.clone();
    state
        .sessions
        .update(token, |ctx| ctx.replace_articles(stored))
        .await;
    articles
}

async fn news_page(state: &AppState, token: &AccessToken, refresh: bool) -> Json<Value> {
    let articles = session_articles(state, token, refresh).await;
    let session = state.sessions.snapshot(token).await;
    let page = build_page(&articles, session.news_visible, &session.summaries);
    Json(json!({
        "caption": format!("Showing {} of {} articles", page.showing, page.total),
        "page": page,
    }))
}

pub async fn news_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Query(params): Query<NewsParams>,
) -> Json<Value> {
    news_page(&state, &token, params.refresh).await
}

pub async fn more_news_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
) -> Json<Value> {
    let step = state.config.news.page_step;
    state
        .sessions
        .update(&token, |ctx| ctx.show_more_news(step))
        .await;
    news_page(&state, &token, false).await
}

pub async fn summary_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(idx): Path<usize>,
) -> Result<Json<Value>> {
    let articles = session_articles(&state, &token, false).await;
    let article = articles.get(idx).ok_or_else(|| GaiaError::NotFound {
        message: format!("no article at position {idx}"),
    })?;
    let summary = state.mate.summarize(article).await;
    let cached = summary.clone();
    state
        .sessions
        .update(&token, |ctx| {
            // A refresh may have replaced the list while the summary was generated.
            let unchanged = ctx
                .articles
                .as_ref()
                .and_then(|current| current.get(idx))
                .is_some_and(|current| current.url == article.url && current.title == article.title);
            if unchanged {
                ctx.summaries.insert(idx, cached);
            }
        })
        .await;
    Ok(Json(json!({ "index": idx, "summary": summary })))
}

pub async fn advice_handler(
    State(state): State<AppState>,
    req: std::result::Result<Json<AdviceRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = req.map_err(|e| body_rejection("advice request", e))?;
    if !req.footprint.is_finite() || !(0.0..=MAX_ADVICE_FOOTPRINT).contains(&req.footprint) {
        return Err(GaiaError::InvalidInput {
            field: "footprint",
            value: req.footprint.to_string(),
            domain: "0..=10000",
        });
    }
    let advice = state
        .mate
        .advise(req.footprint, &req.previous_goal, &req.goal_status)
        .await;
    Ok(Json(json!({ "advice": advice })))
}

pub async fn generate_quiz_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
) -> Json<Value> {
    let quiz = state.mate.generate_quiz().await;
    let body = quiz_body(&quiz);
    state.sessions.update(&token, |ctx| ctx.quiz = quiz).await;
    Json(body)
}

pub async fn quiz_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
) -> Json<Value> {
    let session = state.sessions.snapshot(&token).await;
    Json(quiz_body(&session.quiz))
}

fn quiz_body(quiz: &[crate::quiz::QuizQuestion]) -> Value {
    let questions: Vec<_> = quiz
        .iter()
        .enumerate()
        .map(|(i, q)| q.as_prompt(i + 1))
        .collect();
    json!({ "questions": questions })
}

pub async fn quiz_answer_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(idx): Path<usize>,
) -> Result<Json<Value>> {
    let session = state.sessions.snapshot(&token).await;
    let question = session.quiz.get(idx).ok_or_else(|| GaiaError::NotFound {
        message: format!("no quiz question at position {idx}"),
    })?;
    let correct = question.correct_option()?;
    Ok(Json(json!({
        "index": idx,
        "answer": question.answer,
        "correct_option": correct,
    })))
}

pub async fn chat_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    req: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = req.map_err(|e| body_rejection("chat request", e))?;
    let message = req.message.trim();
    if message.is_empty() {
        return Err(GaiaError::InvalidInput {
            field: "message",
            value: String::new(),
            domain: "non-empty text",
        });
    }
    let history = state.sessions.snapshot(&token).await.chat;
    let outcome = state.mate.chat(&history, message).await;
    let exchanges = state
        .sessions
        .update(&token, |ctx| {
            ctx.chat.extend(outcome.turns);
            ctx.recent_exchanges()
        })
        .await;
    Ok(Json(json!({ "reply": outcome.reply, "exchanges": exchanges })))
}

pub async fn chat_history_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
) -> Json<Value> {
    let session = state.sessions.snapshot(&token).await;
    Json(json!({ "exchanges": session.recent_exchanges() }))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
) -> Redirect {
    if state.sessions.end(&token).await {
        info!("Session ended, {} still active", state.sessions.len().await);
    }
    Redirect::to(&state.config.server.logout_url)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/home", get(home_handler))
        .route("/api/footprint", get(chart_handler).post(estimate_handler))
        .route("/api/news", get(news_handler))
        .route("/api/news/more", post(more_news_handler))
        .route("/api/news/:idx/summary", post(summary_handler))
        .route("/api/mate/advice", post(advice_handler))
        .route("/api/mate/quiz", get(quiz_handler).post(generate_quiz_handler))
        .route("/api/mate/quiz/:idx/answer", get(quiz_answer_handler))
        .route("/api/chat", get(chat_history_handler).post(chat_handler))
        .route("/logout", get(logout_handler))
        .layer(middleware::from_fn(require_token))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(state: AppState) -> anyhow::Result<()> {
    let bind = state.config.server.bind;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    info!("Starting HTTP server on {}", bind);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
