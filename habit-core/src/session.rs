//! Navigation guard: protected routes need a session, public ones never do.

use crate::storage::{KeyValueStore, USER_ID_KEY};

pub const LOGIN_PATH: &str = "/login";

/// Answers whether a user session currently exists.
pub trait SessionProvider {
    fn has_session(&self) -> bool;
}

/// Session backed by a stored user id. Blank values count as logged out.
#[derive(Debug, Clone)]
pub struct StoredSession<S> {
    store: S,
}

impl<S: KeyValueStore> StoredSession<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn user_id(&self) -> Option<String> {
        self.store
            .get(USER_ID_KEY)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    }
}

impl<S: KeyValueStore> SessionProvider for StoredSession<S> {
    fn has_session(&self) -> bool {
        self.user_id().is_some()
    }
}

/// Fixed answer, for dev runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticSession(pub bool);

impl SessionProvider for StaticSession {
    fn has_session(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Habits,
    Heatmap,
    Stats,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Login, Route::Habits, Route::Heatmap, Route::Stats];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => LOGIN_PATH,
            Route::Habits => "/",
            Route::Heatmap => "/heatmap",
            Route::Stats => "/stats",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = normalize_path(path);
        Route::ALL.into_iter().find(|route| route.path() == path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct SessionGate {
    login_path: String,
    public_paths: Vec<String>,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new(LOGIN_PATH)
    }
}

impl SessionGate {
    /// Gate whose only public path is `login_path`.
    pub fn new(login_path: &str) -> Self {
        let login_path = normalize_path(login_path);
        Self {
            public_paths: vec![login_path.clone()],
            login_path,
        }
    }

    pub fn with_public_path(mut self, path: &str) -> Self {
        let path = normalize_path(path);
        if !self.public_paths.contains(&path) {
            self.public_paths.push(path);
        }
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.public_paths.iter().any(|public| *public == path)
    }

    pub fn decide(&self, path: &str, session: &dyn SessionProvider) -> NavigationDecision {
        if self.is_public(path) || session.has_session() {
            NavigationDecision::Allow
        } else {
            tracing::debug!(path, "no session, redirecting to {}", self.login_path);
            NavigationDecision::Redirect(self.login_path.clone())
        }
    }
}

/// `""` becomes `/`, trailing slashes are dropped (`/stats/` is `/stats`).
/// Query and fragment are not part of the route.
fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
