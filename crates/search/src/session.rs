use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use melody_catalog::{CatalogApi, Error, Track};

use crate::cache::{ResponseCache, query_fingerprint};
use crate::debounce::{Debouncer, Settled};

/// Quiet window a query must survive before a suggestion fetch fires.
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settled queries shorter than this clear the suggestion state instead
/// of fetching.
const MIN_QUERY_CHARS: usize = 2;

/// Complete snapshot of search state at a point in time: everything a
/// UI layer needs to draw one frame, and everything the tests assert
/// against. Produced by [`SearchSession::frame`].
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SearchFrame {
    pub query: String,
    pub suggestions: Vec<Track>,
    pub suggestions_visible: bool,
    pub selection: Option<Track>,
    pub loading: bool,
}

#[derive(Default)]
struct SessionState {
    query: String,
    suggestions: Vec<Track>,
    suggestions_visible: bool,
    selection: Option<Track>,
    loading: bool,
}

struct SessionInner<C> {
    client: Arc<C>,
    cache: ResponseCache<Vec<Track>>,
    state: Mutex<SessionState>,
}

impl<C> SessionInner<C> {
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state lock poisoned")
    }
}

/// Owns the query / suggestion / selection state for one user session.
///
/// Keystrokes go through [`set_query`](Self::set_query); only values
/// that survive the quiet window trigger suggestion fetches, and every
/// fetch checks the injected [`ResponseCache`] before touching the
/// network. Suggestion responses land in arrival order, so a slow older
/// response can overwrite a newer one until the next settle corrects it;
/// the selection is written only by [`submit`](Self::submit) and
/// [`pick`](Self::pick) and is never touched by that path.
///
/// Handles are cheap clones over shared state. Dropping the last handle
/// tears down the debounce worker and the pump; in-flight fetches run to
/// completion and their writes go unobserved.
pub struct SearchSession<C> {
    inner: Arc<SessionInner<C>>,
    debouncer: Debouncer<String>,
}

impl<C> Clone for SearchSession<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            debouncer: self.debouncer.clone(),
        }
    }
}

impl<C: CatalogApi + 'static> SearchSession<C> {
    pub fn new(client: Arc<C>, cache: ResponseCache<Vec<Track>>, window: Duration) -> Self {
        let inner = Arc::new(SessionInner {
            client,
            cache,
            state: Mutex::new(SessionState::default()),
        });
        let (debouncer, settled) = Debouncer::channel(window);
        tokio::spawn(pump(Arc::clone(&inner), settled));

        Self { inner, debouncer }
    }

    /// Records a keystroke's worth of query text and restarts the quiet
    /// window.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.lock_state().query = text.clone();
        self.debouncer.observe(text);
    }

    /// Explicit search over the full query text. Hides the dropdown
    /// immediately, then promotes the first result to the current
    /// selection (or clears it when the result set is empty) and resets
    /// the query. A failed fetch is logged and leaves the selection and
    /// query as they were.
    pub async fn submit(&self) {
        let query = {
            let mut state = self.inner.lock_state();
            if state.query.is_empty() {
                return;
            }
            state.suggestions_visible = false;
            state.loading = true;
            state.query.clone()
        };

        match cached_search(self.inner.client.as_ref(), &self.inner.cache, &query).await {
            Ok(tracks) => {
                {
                    let mut state = self.inner.lock_state();
                    state.selection = tracks.into_iter().next();
                    state.suggestions.clear();
                    state.query.clear();
                    state.loading = false;
                }
                self.debouncer.observe(String::new());
            }
            Err(error) => {
                tracing::warn!(%query, %error, "search failed");
                self.inner.lock_state().loading = false;
            }
        }
    }

    /// Promotes one suggestion to the current selection. The track is
    /// already materialized, so neither the network nor the cache is
    /// consulted.
    pub fn pick(&self, track: Track) {
        {
            let mut state = self.inner.lock_state();
            state.selection = Some(track);
            state.suggestions.clear();
            state.suggestions_visible = false;
            state.query.clear();
        }
        self.debouncer.observe(String::new());
    }

    /// Re-opens the dropdown (input refocus) when there is something to
    /// show.
    pub fn show_suggestions(&self) {
        let mut state = self.inner.lock_state();
        if !state.suggestions.is_empty() {
            state.suggestions_visible = true;
        }
    }

    pub fn frame(&self) -> SearchFrame {
        let state = self.inner.lock_state();
        SearchFrame {
            query: state.query.clone(),
            suggestions: state.suggestions.clone(),
            suggestions_visible: state.suggestions_visible,
            selection: state.selection.clone(),
            loading: state.loading,
        }
    }
}

async fn pump<C: CatalogApi + 'static>(inner: Arc<SessionInner<C>>, mut settled: Settled<String>) {
    while let Some(query) = settled.recv().await {
        if query.chars().count() < MIN_QUERY_CHARS {
            let mut state = inner.lock_state();
            state.suggestions.clear();
            state.suggestions_visible = false;
            continue;
        }
        // One task per settled query; fetches are never cancelled when
        // a newer query settles behind them.
        tokio::spawn(fetch_suggestions(Arc::clone(&inner), query));
    }
}

async fn fetch_suggestions<C: CatalogApi>(inner: Arc<SessionInner<C>>, query: String) {
    match cached_search(inner.client.as_ref(), &inner.cache, &query).await {
        Ok(tracks) => {
            let mut state = inner.lock_state();
            state.suggestions = tracks;
            state.suggestions_visible = !state.suggestions.is_empty();
        }
        Err(error) => {
            tracing::warn!(%query, %error, "suggestion fetch failed");
        }
    }
}

async fn cached_search<C: CatalogApi>(
    client: &C,
    cache: &ResponseCache<Vec<Track>>,
    query: &str,
) -> Result<Vec<Track>, Error> {
    let fingerprint = query_fingerprint(query);
    if let Some(tracks) = cache.get(&fingerprint) {
        tracing::debug!(%query, "search cache hit");
        return Ok(tracks);
    }

    let tracks = client.search(query).await?;
    cache.put(fingerprint, tracks.clone());
    Ok(tracks)
}
