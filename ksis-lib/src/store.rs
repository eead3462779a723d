//! Result set store: the page a view shows and how it got there.

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use crate::api::PageFetcher;
use crate::api::query::QueryDescriptor;
use crate::api::query::ResultPage;
use crate::error::Error;

/// Load status of a list view.
///
/// While loading, and after a failure, the last good page is kept in
/// `previous` so the view can leave it on screen. It is never merged with
/// a new page.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Nothing requested yet.
    Idle,
    /// A fetch is outstanding.
    Loading { previous: Option<ResultPage<T>> },
    /// The latest fetch succeeded.
    Ready(ResultPage<T>),
    /// The latest fetch failed.
    Failed {
        message: String,
        previous: Option<ResultPage<T>>,
    },
}

impl<T> LoadState<T> {
    /// Returns `true` while a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The page of a successful fetch.
    pub fn page(&self) -> Option<&ResultPage<T>> {
        match self {
            Self::Ready(page) => Some(page),
            _ => None,
        }
    }

    /// The page to keep on screen: the current one, or the last good one.
    pub fn visible_page(&self) -> Option<&ResultPage<T>> {
        match self {
            Self::Idle => None,
            Self::Ready(page) => Some(page),
            Self::Loading { previous } | Self::Failed { previous, .. } => previous.as_ref(),
        }
    }

    /// The failure message, if the latest fetch failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    fn into_visible_page(self) -> Option<ResultPage<T>> {
        match self {
            Self::Idle => None,
            Self::Ready(page) => Some(page),
            Self::Loading { previous } | Self::Failed { previous, .. } => previous,
        }
    }
}

/// What became of one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched page is now displayed.
    Applied,
    /// A newer request was issued meanwhile; this result was dropped.
    Discarded,
    /// The descriptor equals the one already loading or loaded.
    Skipped,
}

struct StoreInner<T> {
    state: LoadState<T>,
    /// Bumped for every issued fetch; only the latest may land.
    generation: u64,
    current: Option<QueryDescriptor>,
}

/// Fetches pages for a view and keeps the latest outcome.
///
/// Cheap to clone; clones share state. The lock is never held across a
/// fetch, so several refreshes may be in flight; the most recently issued
/// one decides what is displayed.
pub struct ResultSetStore<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    inner: Arc<RwLock<StoreInner<T>>>,
}

impl<T> Clone for ResultSetStore<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> ResultSetStore<T> {
    /// Creates an idle store over `fetcher`.
    pub fn new(fetcher: Arc<dyn PageFetcher<T>>) -> Self {
        Self {
            fetcher,
            inner: Arc::new(RwLock::new(StoreInner {
                state: LoadState::Idle,
                generation: 0,
                current: None,
            })),
        }
    }

    /// A snapshot of the load state.
    pub fn state(&self) -> LoadState<T> {
        self.read().state.clone()
    }

    /// The descriptor of the latest issued request.
    pub fn current_descriptor(&self) -> Option<QueryDescriptor> {
        self.read().current.clone()
    }

    /// The page to keep on screen, if any.
    pub fn visible_page(&self) -> Option<ResultPage<T>> {
        self.read().state.visible_page().cloned()
    }

    /// Fetches `descriptor` unless the same descriptor is already loading
    /// or loaded.
    ///
    /// Returns the fetch error when this request is still the latest one;
    /// the store is then `Failed` as well.
    pub async fn refresh(&self, descriptor: &QueryDescriptor) -> Result<RefreshOutcome, Error> {
        self.load(descriptor, false).await
    }

    /// Fetches `descriptor` even if it is already loaded. Backs the retry
    /// action.
    pub async fn force_refresh(&self, descriptor: &QueryDescriptor) -> Result<RefreshOutcome, Error> {
        self.load(descriptor, true).await
    }

    /// Re-issues the latest descriptor, if any.
    pub async fn retry(&self) -> Result<RefreshOutcome, Error> {
        match self.current_descriptor() {
            Some(descriptor) => self.force_refresh(&descriptor).await,
            None => Ok(RefreshOutcome::Skipped),
        }
    }

    /// Shows a page derived from the current one (e.g. after a delete).
    ///
    /// Fetches still in flight are dropped when they land.
    pub fn replace_page(&self, page: ResultPage<T>) {
        let mut inner = self.write();
        inner.generation += 1;
        inner.state = LoadState::Ready(page);
    }

    async fn load(&self, descriptor: &QueryDescriptor, force: bool) -> Result<RefreshOutcome, Error> {
        let generation = {
            let mut inner = self.write();
            if !force
                && inner.current.as_ref() == Some(descriptor)
                && !matches!(inner.state, LoadState::Idle)
            {
                return Ok(RefreshOutcome::Skipped);
            }

            inner.generation += 1;
            inner.current = Some(descriptor.clone());
            let previous = std::mem::replace(&mut inner.state, LoadState::Idle).into_visible_page();
            inner.state = LoadState::Loading { previous };
            inner.generation
        };

        log::debug!(
            "fetch #{} page {} category '{}' term '{}'",
            generation,
            descriptor.page_number(),
            descriptor.search_category(),
            descriptor.search_term()
        );

        let result = self.fetcher.fetch(descriptor).await;

        let mut inner = self.write();
        if inner.generation != generation {
            log::debug!(
                "fetch #{} discarded, #{} is newer",
                generation,
                inner.generation
            );
            return Ok(RefreshOutcome::Discarded);
        }

        match result {
            Ok(page) => {
                inner.state = LoadState::Ready(page);
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                log::warn!("fetch #{} failed: {}", generation, e);
                let previous = std::mem::replace(&mut inner.state, LoadState::Idle).into_visible_page();
                inner.state = LoadState::Failed {
                    message: e.to_string(),
                    previous,
                };
                Err(e)
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use super::*;
    use crate::error::ApiError;

    /// Answers each page number through a channel the test resolves by hand.
    #[derive(Default)]
    struct GatedFetcher {
        gates: Mutex<HashMap<u32, oneshot::Receiver<Result<ResultPage<u32>, Error>>>>,
        calls: AtomicUsize,
    }

    impl GatedFetcher {
        fn gate(&self, page: u32) -> oneshot::Sender<Result<ResultPage<u32>, Error>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(page, rx);
            tx
        }
    }

    #[async_trait]
    impl PageFetcher<u32> for GatedFetcher {
        async fn fetch(&self, descriptor: &QueryDescriptor) -> Result<ResultPage<u32>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rx = self
                .gates
                .lock()
                .unwrap()
                .remove(&descriptor.page_number())
                .expect("no gate for page");
            rx.await.expect("gate dropped")
        }
    }

    fn descriptor(page: u32) -> QueryDescriptor {
        let mut d = QueryDescriptor::new(5, "title");
        d.page_number = page;
        d
    }

    fn page(items: &[u32]) -> ResultPage<u32> {
        ResultPage::new(items.to_vec(), 3)
    }

    #[tokio::test]
    async fn test_ready_after_success() {
        let fetcher = Arc::new(GatedFetcher::default());
        let store = ResultSetStore::new(fetcher.clone() as Arc<dyn PageFetcher<u32>>);
        assert_eq!(store.state(), LoadState::Idle);

        let tx = fetcher.gate(1);
        tx.send(Ok(page(&[1, 2, 3]))).unwrap();

        let outcome = store.refresh(&descriptor(1)).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Applied);
        assert_eq!(store.state(), LoadState::Ready(page(&[1, 2, 3])));
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let fetcher = Arc::new(GatedFetcher::default());
        let store = ResultSetStore::new(fetcher.clone() as Arc<dyn PageFetcher<u32>>);

        let tx1 = fetcher.gate(1);
        let tx2 = fetcher.gate(2);

        let d1 = descriptor(1);
        let d2 = descriptor(2);
        let first = store.refresh(&d1);
        let second = store.refresh(&d2);

        let resolve = async {
            tokio::task::yield_now().await;
            tx2.send(Ok(page(&[6, 7, 8]))).unwrap();
            tokio::task::yield_now().await;
            tx1.send(Ok(page(&[1, 2, 3]))).unwrap();
        };

        let (r1, r2, ()) = tokio::join!(first, second, resolve);

        assert_eq!(r1.unwrap(), RefreshOutcome::Discarded);
        assert_eq!(r2.unwrap(), RefreshOutcome::Applied);
        assert_eq!(store.state(), LoadState::Ready(page(&[6, 7, 8])));
        assert_eq!(store.current_descriptor(), Some(d2));
    }

    #[tokio::test]
    async fn test_stale_failure_is_discarded() {
        let fetcher = Arc::new(GatedFetcher::default());
        let store = ResultSetStore::new(fetcher.clone() as Arc<dyn PageFetcher<u32>>);

        let tx1 = fetcher.gate(1);
        let tx2 = fetcher.gate(2);
        let d1 = descriptor(1);
        let d2 = descriptor(2);

        let resolve = async {
            tokio::task::yield_now().await;
            tx2.send(Ok(page(&[6]))).unwrap();
            tokio::task::yield_now().await;
            tx1.send(Err(ApiError::http(500, "boom").into())).unwrap();
        };
        let (r1, r2, ()) = tokio::join!(store.refresh(&d1), store.refresh(&d2), resolve);

        assert_eq!(r1.unwrap(), RefreshOutcome::Discarded);
        assert_eq!(r2.unwrap(), RefreshOutcome::Applied);
        assert_eq!(store.state().error_message(), None);
    }

    #[tokio::test]
    async fn test_equal_descriptor_is_not_refetched() {
        let fetcher = Arc::new(GatedFetcher::default());
        let store = ResultSetStore::new(fetcher.clone() as Arc<dyn PageFetcher<u32>>);

        fetcher.gate(1).send(Ok(page(&[1]))).unwrap();
        store.refresh(&descriptor(1)).await.unwrap();

        let again = store.refresh(&descriptor(1)).await.unwrap();
        assert_eq!(again, RefreshOutcome::Skipped);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_page() {
        let fetcher = Arc::new(GatedFetcher::default());
        let store = ResultSetStore::new(fetcher.clone() as Arc<dyn PageFetcher<u32>>);

        fetcher.gate(1).send(Ok(page(&[1, 2]))).unwrap();
        store.refresh(&descriptor(1)).await.unwrap();

        fetcher
            .gate(2)
            .send(Err(ApiError::http(503, "unavailable").into()))
            .unwrap();
        let err = store.refresh(&descriptor(2)).await.unwrap_err();
        assert_eq!(err.status_code(), Some(503));

        let state = store.state();
        assert_eq!(state.error_message(), Some("HTTP 503: unavailable"));
        assert_eq!(state.page(), None);
        assert_eq!(state.visible_page(), Some(&page(&[1, 2])));
    }

    #[tokio::test]
    async fn test_retry_refetches_after_failure() {
        let fetcher = Arc::new(GatedFetcher::default());
        let store = ResultSetStore::new(fetcher.clone() as Arc<dyn PageFetcher<u32>>);

        fetcher
            .gate(1)
            .send(Err(ApiError::http(500, "down").into()))
            .unwrap();
        assert!(store.refresh(&descriptor(1)).await.is_err());

        fetcher.gate(1).send(Ok(page(&[4]))).unwrap();
        assert_eq!(store.retry().await.unwrap(), RefreshOutcome::Applied);
        assert_eq!(store.state(), LoadState::Ready(page(&[4])));
    }

    #[tokio::test]
    async fn test_replace_page_drops_in_flight_fetch() {
        let fetcher = Arc::new(GatedFetcher::default());
        let store = ResultSetStore::new(fetcher.clone() as Arc<dyn PageFetcher<u32>>);

        let tx = fetcher.gate(1);
        let d1 = descriptor(1);
        let replace = async {
            tokio::task::yield_now().await;
            store.replace_page(page(&[9]));
            tx.send(Ok(page(&[1, 2]))).unwrap();
        };
        let (outcome, ()) = tokio::join!(store.refresh(&d1), replace);

        assert_eq!(outcome.unwrap(), RefreshOutcome::Discarded);
        assert_eq!(store.state(), LoadState::Ready(page(&[9])));
    }
}
