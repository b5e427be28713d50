use std::sync::{Arc, Mutex, MutexGuard};

use melody_catalog::CatalogApi;

use crate::cache::ResponseCache;

/// Snapshot of the genre lookup for rendering: the labels fetched so
/// far and whether a fetch is in flight (callers disable the triggering
/// control while it is).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct GenreFrame {
    pub genres: Vec<String>,
    pub loading: bool,
}

#[derive(Default)]
struct GenreState {
    genres: Vec<String>,
    loading: bool,
}

struct GenreInner<C> {
    client: Arc<C>,
    cache: ResponseCache<Vec<String>>,
    state: Mutex<GenreState>,
}

impl<C> GenreInner<C> {
    fn lock_state(&self) -> MutexGuard<'_, GenreState> {
        self.state.lock().expect("genre state lock poisoned")
    }
}

/// On-demand genre enrichment for the current selection, keyed by track
/// id. Cache-first; a successful fetch replaces the genre list
/// wholesale, a failed one is logged and leaves it untouched.
pub struct GenreLookup<C> {
    inner: Arc<GenreInner<C>>,
}

impl<C> Clone for GenreLookup<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: CatalogApi> GenreLookup<C> {
    pub fn new(client: Arc<C>, cache: ResponseCache<Vec<String>>) -> Self {
        Self {
            inner: Arc::new(GenreInner {
                client,
                cache,
                state: Mutex::new(GenreState::default()),
            }),
        }
    }

    pub async fn fetch(&self, track_id: &str) {
        self.inner.lock_state().loading = true;

        // The fingerprint for enrichment is the track id itself.
        let result = match self.inner.cache.get(track_id) {
            Some(genres) => {
                tracing::debug!(%track_id, "genre cache hit");
                Ok(genres)
            }
            None => self
                .inner
                .client
                .track_genres(track_id)
                .await
                .inspect(|genres| self.inner.cache.put(track_id, genres.clone())),
        };

        match result {
            Ok(genres) => {
                let mut state = self.inner.lock_state();
                state.genres = genres;
                state.loading = false;
            }
            Err(error) => {
                tracing::warn!(%track_id, %error, "genre fetch failed");
                self.inner.lock_state().loading = false;
            }
        }
    }

    pub fn frame(&self) -> GenreFrame {
        let state = self.inner.lock_state();
        GenreFrame {
            genres: state.genres.clone(),
            loading: state.loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    use melody_catalog::{CatalogApi, Error, StatusCode, Track};

    use super::*;

    #[derive(Default)]
    struct ScriptedGenres {
        responses: HashMap<String, Vec<String>>,
        delays: HashMap<String, Duration>,
        failures: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGenres {
        fn with_response(mut self, id: &str, genres: &[&str]) -> Self {
            self.responses
                .insert(id.into(), genres.iter().map(|g| g.to_string()).collect());
            self
        }

        fn with_delay(mut self, id: &str, delay: Duration) -> Self {
            self.delays.insert(id.into(), delay);
            self
        }

        fn with_failure(mut self, id: &str) -> Self {
            self.failures.insert(id.into());
            self
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CatalogApi for ScriptedGenres {
        async fn search(&self, _query: &str) -> Result<Vec<Track>, Error> {
            unreachable!("genre lookups never search")
        }

        async fn track_genres(&self, track_id: &str) -> Result<Vec<String>, Error> {
            self.calls.lock().unwrap().push(track_id.to_string());

            if let Some(delay) = self.delays.get(track_id) {
                tokio::time::sleep(*delay).await;
            }
            if self.failures.contains(track_id) {
                return Err(Error::RemoteRejected {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: "scripted failure".into(),
                });
            }
            Ok(self.responses.get(track_id).cloned().unwrap_or_default())
        }
    }

    fn lookup_with(catalog: ScriptedGenres) -> (GenreLookup<ScriptedGenres>, Arc<ScriptedGenres>) {
        let client = Arc::new(catalog);
        (
            GenreLookup::new(Arc::clone(&client), ResponseCache::new()),
            client,
        )
    }

    #[tokio::test]
    async fn fetch_replaces_genres_wholesale() {
        let (lookup, _) =
            lookup_with(ScriptedGenres::default().with_response("t1", &["rock", "glam rock"]));

        lookup.fetch("t1").await;

        let frame = lookup.frame();
        assert_eq!(frame.genres, vec!["rock", "glam rock"]);
        assert!(!frame.loading);
    }

    #[tokio::test]
    async fn repeated_fetch_is_served_from_cache() {
        let (lookup, catalog) =
            lookup_with(ScriptedGenres::default().with_response("t1", &["rock"]));

        lookup.fetch("t1").await;
        lookup.fetch("t1").await;

        assert_eq!(catalog.call_count(), 1);
        assert_eq!(lookup.frame().genres, vec!["rock"]);
    }

    #[tokio::test]
    async fn failure_leaves_genres_and_clears_loading() {
        let (lookup, catalog) = lookup_with(
            ScriptedGenres::default()
                .with_response("t1", &["rock"])
                .with_failure("t2"),
        );

        lookup.fetch("t1").await;
        lookup.fetch("t2").await;

        let frame = lookup.frame();
        assert_eq!(frame.genres, vec!["rock"]);
        assert!(!frame.loading);

        // A failed lookup must not poison the cache: the retry goes back
        // to the network.
        lookup.fetch("t2").await;
        assert_eq!(catalog.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_is_observable_while_in_flight() {
        let (lookup, _) = lookup_with(
            ScriptedGenres::default()
                .with_response("t1", &["rock"])
                .with_delay("t1", Duration::from_millis(200)),
        );

        let worker = lookup.clone();
        let handle = tokio::spawn(async move { worker.fetch("t1").await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(lookup.frame().loading);

        handle.await.unwrap();
        assert!(!lookup.frame().loading);
    }
}
