//! Per-visit state.
//!
//! A session lives as long as its entry token is in use. Nothing here is
//! shared between sessions and nothing survives a restart.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::clients::{ChatTurn, Role};
use crate::footprint::FootprintBreakdown;
use crate::gating::AccessToken;
use crate::news::Article;
use crate::quiz::QuizQuestion;

const CHAT_EXCHANGES_SHOWN: usize = 5;

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub breakdown: Option<FootprintBreakdown>,
    pub chat: Vec<ChatTurn>,
    pub quiz: Vec<QuizQuestion>,
    /// Articles as last fetched; summaries are keyed by position in this list.
    pub articles: Option<Vec<Article>>,
    pub summaries: HashMap<usize, String>,
    pub news_visible: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatExchange {
    pub user: String,
    pub reply: String,
}

impl SessionContext {
    pub fn new(initial_visible: usize) -> Self {
        Self {
            breakdown: None,
            chat: Vec::new(),
            quiz: Vec::new(),
            articles: None,
            summaries: HashMap::new(),
            news_visible: initial_visible,
        }
    }

    /// Reveal another `step` articles.
    pub fn show_more_news(&mut self, step: usize) {
        self.news_visible = self.news_visible.saturating_add(step);
    }

    /// Replace the article list. Cached summaries belong to the old positions and are dropped.
    pub fn replace_articles(&mut self, articles: Vec<Article>) {
        self.articles = Some(articles);
        self.summaries.clear();
    }

    /// The most recent chat exchanges, newest first.
    pub fn recent_exchanges(&self) -> Vec<ChatExchange> {
        let exchanges: Vec<ChatExchange> = self
            .chat
            .chunks_exact(2)
            .filter_map(|pair| match (&pair[0], &pair[1]) {
                (u, m) if u.role == Role::User && m.role == Role::Model => Some(ChatExchange {
                    user: u.text.clone(),
                    reply: m.text.clone(),
                }),
                _ => None,
            })
            .collect();
        exchanges
            .into_iter()
            .rev()
            .take(CHAT_EXCHANGES_SHOWN)
            .collect()
    }
}

/// Bounded store of session contexts keyed by entry token.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<LruCache<AccessToken, SessionContext>>>,
    initial_visible: usize,
}

impl SessionStore {
    pub fn new(cache_max: usize, initial_visible: usize) -> Self {
        let cap = NonZeroUsize::new(cache_max).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(cap))),
            initial_visible,
        }
    }

    /// A copy of the session's state, creating it on first use.
    pub async fn snapshot(&self, token: &AccessToken) -> SessionContext {
        let mut sessions = self.inner.lock().await;
        sessions
            .get_or_insert_mut(token.clone(), || SessionContext::new(self.initial_visible))
            .clone()
    }

    /// Run `f` against the session's state while holding the store lock.
    /// Keep `f` short: it must not wait on any backend.
    pub async fn update<R>(&self, token: &AccessToken, f: impl FnOnce(&mut SessionContext) -> R) -> R {
        let mut sessions = self.inner.lock().await;
        let ctx = sessions.get_or_insert_mut(token.clone(), || SessionContext::new(self.initial_visible));
        f(ctx)
    }

    pub async fn end(&self, token: &AccessToken) -> bool {
        self.inner.lock().await.pop(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
