//! A list board: query, results and selection for one page view.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::KsisClient;
use crate::api::BulkExecutor;
use crate::api::BulkKind;
use crate::api::HttpBulkExecutor;
use crate::api::HttpPageFetcher;
use crate::api::PageFetcher;
use crate::api::query::ListQueryController;
use crate::api::query::Pagination;
use crate::api::query::QueryDescriptor;
use crate::api::query::ResultPage;
use crate::auth::UserContext;
use crate::boards::BoardSpec;
use crate::error::Error;
use crate::error::ValidationError;
use crate::model::Keyed;
use crate::selection::SelectionTracker;
use crate::store::LoadState;
use crate::store::RefreshOutcome;
use crate::store::ResultSetStore;

/// One list view: a [`ListQueryController`], a [`ResultSetStore`] and a
/// [`SelectionTracker`] wired together for a [`BoardSpec`].
///
/// Every filter or page change validates the query, then refreshes the
/// store. Validation failures come back as [`Error::Validation`] and no
/// request is sent.
///
/// # Example
///
/// ```ignore
/// let mut notices: Board<Notice> = Board::http(boards::NOTICES, client, &user);
/// notices.mount().await?;
///
/// notices.search("maintenance").await?;
/// notices.toggle(notice_id);
/// notices.bulk(BulkKind::Delete).await?;
/// ```
pub struct Board<T: Keyed> {
    spec: BoardSpec,
    controller: ListQueryController,
    store: ResultSetStore<T>,
    selection: SelectionTracker<T::Id>,
    executor: Option<Arc<dyn BulkExecutor>>,
}

impl<T> Board<T>
where
    T: Keyed + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// A board backed by the KSIS REST backend.
    pub fn http(spec: BoardSpec, client: KsisClient, user: &UserContext) -> Self {
        let fetcher = HttpPageFetcher::new(client.clone(), spec.endpoint).with_params(spec.params);
        let board = Self::new(spec, user, Arc::new(fetcher));
        if spec.actions.is_empty() {
            board
        } else {
            board.with_executor(Arc::new(HttpBulkExecutor::new(client)))
        }
    }
}

impl<T> Board<T>
where
    T: Keyed + Clone + Send + Sync + 'static,
{
    /// A board over any fetcher. Categories the user may not use are left
    /// out.
    pub fn new(spec: BoardSpec, user: &UserContext, fetcher: Arc<dyn PageFetcher<T>>) -> Self {
        Self {
            controller: spec.controller(user),
            spec,
            store: ResultSetStore::new(fetcher),
            selection: SelectionTracker::new(),
            executor: None,
        }
    }

    /// Sets the executor for the board's bulk actions.
    pub fn with_executor(mut self, executor: Arc<dyn BulkExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn spec(&self) -> &BoardSpec {
        &self.spec
    }

    pub fn controller(&self) -> &ListQueryController {
        &self.controller
    }

    /// Edits the query without fetching; follow with [`Board::refresh`].
    pub fn controller_mut(&mut self) -> &mut ListQueryController {
        &mut self.controller
    }

    pub fn descriptor(&self) -> &QueryDescriptor {
        self.controller.descriptor()
    }

    /// The underlying store. Clones share state with the board.
    pub fn store(&self) -> &ResultSetStore<T> {
        &self.store
    }

    pub fn state(&self) -> LoadState<T> {
        self.store.state()
    }

    /// The page on screen, which may be the last good one while loading.
    pub fn visible_page(&self) -> Option<ResultPage<T>> {
        self.store.visible_page()
    }

    pub fn selection(&self) -> &SelectionTracker<T::Id> {
        &self.selection
    }

    /// Pagination control for the current page and the last known page
    /// count.
    pub fn pagination(&self) -> Pagination {
        let total_pages = self
            .store
            .visible_page()
            .map(|page| page.total_pages())
            .unwrap_or_default();
        Pagination::new(self.descriptor().page_number(), total_pages)
    }

    /// Initial load.
    pub async fn mount(&mut self) -> Result<RefreshOutcome, Error> {
        self.refresh().await
    }

    /// Validates the current query and fetches it unless it is already
    /// loaded.
    pub async fn refresh(&self) -> Result<RefreshOutcome, Error> {
        self.controller.validate()?;
        self.store.refresh(self.controller.descriptor()).await
    }

    /// Fetches the current query again, e.g. after a failure.
    pub async fn reload(&self) -> Result<RefreshOutcome, Error> {
        self.controller.validate()?;
        self.store.force_refresh(self.controller.descriptor()).await
    }

    pub async fn search(&mut self, term: impl Into<String>) -> Result<RefreshOutcome, Error> {
        self.controller.set_search_term(term);
        self.refresh().await
    }

    /// Switches category. Date categories fail validation until a range is
    /// set, so pair them with [`Board::set_date_range`].
    pub async fn set_search_category(
        &mut self,
        category: impl Into<String>,
    ) -> Result<RefreshOutcome, Error> {
        self.controller.set_search_category(category);
        self.refresh().await
    }

    pub async fn set_date_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<RefreshOutcome, Error> {
        self.controller.set_date_range(start, end);
        self.refresh().await
    }

    /// Moves to page `n`, clamped to the known page count.
    pub async fn go_to_page(&mut self, n: u32) -> Result<RefreshOutcome, Error> {
        let page = match self.store.visible_page() {
            Some(visible) => Pagination::new(1, visible.total_pages()).clamp(n),
            None => n,
        };
        self.controller.set_page_number(page);
        self.refresh().await
    }

    /// Clears every filter and returns to page 1.
    pub async fn reset(&mut self) -> Result<RefreshOutcome, Error> {
        self.controller.reset();
        self.refresh().await
    }

    pub fn toggle(&mut self, id: T::Id) {
        self.selection.toggle(id);
    }

    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.selection.is_selected(id)
    }

    /// Selects exactly the rows on screen.
    pub fn select_all_visible(&mut self) {
        let ids = self
            .store
            .visible_page()
            .map(|page| page.ids())
            .unwrap_or_default();
        self.selection.select_all_visible(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Whether the "select all" checkbox is checked.
    pub fn all_visible_selected(&self) -> bool {
        let ids = self
            .store
            .visible_page()
            .map(|page| page.ids())
            .unwrap_or_default();
        self.selection.all_visible_selected(&ids)
    }

    /// Applies a bulk action to the selection.
    ///
    /// On success the selection is cleared and, for deletes, the confirmed
    /// rows are dropped from the displayed page, or the latest query is
    /// fetched again when that page is not current. Activation changes stay
    /// invisible until [`Board::reload`]. On any failure the page and the
    /// selection are left as they were so the user can retry.
    pub async fn bulk(&mut self, kind: BulkKind) -> Result<Vec<T::Id>, Error> {
        if self.selection.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }
        let unsupported = || ValidationError::UnsupportedAction {
            action: kind.label().to_string(),
        };
        let action = self.spec.action(kind).ok_or_else(unsupported)?;
        let executor = self.executor.clone().ok_or_else(unsupported)?;

        let ids = self.ordered_selection();
        let wire: Vec<String> = ids.iter().map(ToString::to_string).collect();

        let confirmed: HashSet<String> = executor.execute(action, &wire).await?.into_iter().collect();
        let confirmed: Vec<T::Id> = ids
            .into_iter()
            .filter(|id| confirmed.contains(&id.to_string()))
            .collect();

        if kind == BulkKind::Delete {
            self.drop_deleted(&confirmed).await;
        }
        self.selection.clear();

        Ok(confirmed)
    }

    /// Removes deleted rows from the screen.
    ///
    /// Only a page loaded for the latest query is trimmed in place. While
    /// loading or after a failure the screen holds an older page, so the
    /// latest query is fetched again instead.
    async fn drop_deleted(&self, deleted: &[T::Id]) {
        if let Some(page) = self.store.state().page() {
            let removed: HashSet<T::Id> = deleted.iter().cloned().collect();
            self.store.replace_page(page.without_ids(&removed));
        } else if let Err(err) = self.store.retry().await {
            log::warn!("reload after {} delete(s) failed: {}", deleted.len(), err);
        }
    }

    /// Selected ids in display order; ids from other pages follow, sorted.
    fn ordered_selection(&self) -> Vec<T::Id> {
        let selected = self.selection.selected_ids();
        let mut ordered: Vec<T::Id> = self
            .store
            .visible_page()
            .map(|page| page.ids())
            .unwrap_or_default()
            .into_iter()
            .filter(|id| selected.contains(id))
            .collect();

        let mut off_page: Vec<T::Id> = selected
            .iter()
            .filter(|id| !ordered.contains(id))
            .cloned()
            .collect();
        off_page.sort_by_key(ToString::to_string);

        ordered.extend(off_page);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::BulkAction;
    use crate::boards;
    use crate::error::ApiError;
    use crate::error::BulkActionError;
    use crate::model::Notice;

    /// Serves notices 1..=`total` from memory and records each descriptor.
    /// Pages listed in `failing` answer 500.
    struct MemoryFetcher {
        total: i64,
        seen: Mutex<Vec<QueryDescriptor>>,
        failing: Mutex<HashSet<u32>>,
    }

    impl MemoryFetcher {
        fn new(total: i64) -> Arc<Self> {
            Arc::new(Self {
                total,
                seen: Mutex::new(Vec::new()),
                failing: Mutex::new(HashSet::new()),
            })
        }

        fn set_failing(&self, page: u32, failing: bool) {
            let mut pages = self.failing.lock().unwrap();
            if failing {
                pages.insert(page);
            } else {
                pages.remove(&page);
            }
        }
    }

    #[async_trait]
    impl PageFetcher<Notice> for MemoryFetcher {
        async fn fetch(&self, descriptor: &QueryDescriptor) -> Result<ResultPage<Notice>, Error> {
            self.seen.lock().unwrap().push(descriptor.clone());
            if self.failing.lock().unwrap().contains(&descriptor.page_number()) {
                return Err(ApiError::http(500, "down").into());
            }
            let size = i64::from(descriptor.page_size());
            let first = i64::from(descriptor.zero_based_page()) * size + 1;
            let items = (first..first + size)
                .filter(|id| *id <= self.total)
                .map(|id| Notice {
                    notice_id: id,
                    title: format!("notice {id}"),
                    account_id: None,
                    reg_date: None,
                })
                .collect();
            let total_pages = u32::try_from((self.total + size - 1) / size).unwrap();
            Ok(ResultPage::new(items, total_pages))
        }
    }

    /// Confirms everything except `reject`.
    struct ScriptedExecutor {
        reject: Vec<String>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl BulkExecutor for ScriptedExecutor {
        async fn execute(&self, action: &BulkAction, ids: &[String]) -> Result<Vec<String>, Error> {
            self.calls.lock().unwrap().push(ids.to_vec());
            let failed: Vec<String> = ids
                .iter()
                .filter(|id| self.reject.contains(id))
                .cloned()
                .collect();
            if failed.is_empty() {
                Ok(ids.to_vec())
            } else {
                Err(BulkActionError::Partial {
                    action: action.kind.label().to_string(),
                    attempted: ids.len(),
                    failed,
                }
                .into())
            }
        }
    }

    fn spec_with_page_size(page_size: u32) -> BoardSpec {
        BoardSpec {
            page_size,
            ..boards::NOTICES
        }
    }

    fn board(total: i64, page_size: u32) -> (Board<Notice>, Arc<MemoryFetcher>) {
        let fetcher = MemoryFetcher::new(total);
        let user = UserContext::new("kim", ["ROLE_USER"]);
        let board: Board<Notice> = Board::new(spec_with_page_size(page_size), &user, fetcher.clone());
        (board, fetcher)
    }

    fn executor(reject: &[&str]) -> Arc<ScriptedExecutor> {
        Arc::new(ScriptedExecutor {
            reject: reject.iter().map(ToString::to_string).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_paging_keeps_selection() {
        let (mut board, fetcher) = board(12, 5);

        board.mount().await.unwrap();
        let page = board.visible_page().unwrap();
        assert_eq!(page.ids(), vec![1, 2, 3, 4, 5]);
        assert_eq!(page.total_pages(), 3);

        board.toggle(3);
        board.go_to_page(2).await.unwrap();

        let seen = fetcher.seen.lock().unwrap().clone();
        assert_eq!(seen.last().unwrap().zero_based_page(), 1);
        assert_eq!(board.visible_page().unwrap().ids(), vec![6, 7, 8, 9, 10]);
        assert!(board.is_selected(&3));
        assert_eq!(board.selection().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_page_keeps_selection() {
        let (mut board, fetcher) = board(30, 10);
        board.mount().await.unwrap();
        board.toggle(3);

        fetcher.set_failing(2, true);
        let err = board.go_to_page(2).await.unwrap_err();

        assert_eq!(err.status_code(), Some(500));
        assert!(board.state().error_message().is_some());
        assert_eq!(board.visible_page().unwrap().ids(), (1..=10).collect::<Vec<_>>());
        assert!(board.is_selected(&3));
        assert_eq!(board.selection().len(), 1);
    }

    #[tokio::test]
    async fn test_go_to_page_clamps() {
        let (mut board, _) = board(12, 5);
        board.mount().await.unwrap();

        board.go_to_page(9).await.unwrap();
        assert_eq!(board.descriptor().page_number(), 3);
        assert_eq!(board.visible_page().unwrap().ids(), vec![11, 12]);
        assert!(!board.pagination().has_next());
    }

    #[tokio::test]
    async fn test_category_without_dates_sends_nothing() {
        let (mut board, fetcher) = board(12, 5);
        board.mount().await.unwrap();

        let err = board.set_search_category("regDate").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(fetcher.seen.lock().unwrap().len(), 1);

        let start = NaiveDate::from_ymd_opt(2024, 1, 1);
        let end = NaiveDate::from_ymd_opt(2024, 1, 31);
        board.set_date_range(start, end).await.unwrap();
        assert_eq!(fetcher.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_delete_removes_confirmed_rows() {
        let (board, _) = board(12, 10);
        let executor = executor(&[]);
        let mut board = board.with_executor(executor.clone());
        board.mount().await.unwrap();

        board.toggle(7);
        board.toggle(5);
        let removed = board.bulk(BulkKind::Delete).await.unwrap();

        assert_eq!(removed, vec![5, 7]);
        assert_eq!(executor.calls.lock().unwrap()[0], vec!["5", "7"]);
        let ids = board.visible_page().unwrap().ids();
        assert!(!ids.contains(&5) && !ids.contains(&7));
        assert_eq!(ids.len(), 8);
        assert!(board.selection().is_empty());
    }

    #[tokio::test]
    async fn test_delete_after_failed_load_fetches_latest_query() {
        let (board, fetcher) = board(30, 10);
        let mut board = board.with_executor(executor(&[]));
        board.mount().await.unwrap();

        fetcher.set_failing(2, true);
        board.go_to_page(2).await.unwrap_err();
        board.toggle(1);

        fetcher.set_failing(2, false);
        assert_eq!(board.bulk(BulkKind::Delete).await.unwrap(), vec![1]);

        assert_eq!(board.descriptor().page_number(), 2);
        let state = board.state();
        assert!(state.error_message().is_none());
        assert_eq!(state.page().unwrap().ids(), (11..=20).collect::<Vec<_>>());
        assert_eq!(fetcher.seen.lock().unwrap().len(), 3);
        assert!(board.selection().is_empty());
        assert_eq!(board.refresh().await.unwrap(), RefreshOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_delete_after_failed_load_keeps_failure_when_refetch_fails() {
        let (board, fetcher) = board(30, 10);
        let mut board = board.with_executor(executor(&[]));
        board.mount().await.unwrap();

        fetcher.set_failing(2, true);
        board.go_to_page(2).await.unwrap_err();
        board.toggle(1);
        board.bulk(BulkKind::Delete).await.unwrap();

        assert!(board.state().page().is_none());
        assert!(board.state().error_message().is_some());
        assert_eq!(board.visible_page().unwrap().ids(), (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_bulk_partial_failure_changes_nothing() {
        let (board, _) = board(12, 10);
        let mut board = board.with_executor(executor(&["7"]));
        board.mount().await.unwrap();

        board.toggle(5);
        board.toggle(7);
        let err = board.bulk(BulkKind::Delete).await.unwrap_err();

        match err {
            Error::BulkAction(e) => assert_eq!(e.failed_ids(), Some(&["7".to_string()][..])),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(board.visible_page().unwrap().len(), 10);
        assert!(board.is_selected(&5) && board.is_selected(&7));
    }

    #[tokio::test]
    async fn test_bulk_needs_selection_and_action() {
        let (board, _) = board(3, 10);
        let mut board = board.with_executor(executor(&[]));
        board.mount().await.unwrap();

        let err = board.bulk(BulkKind::Delete).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::EmptySelection)));

        board.toggle(1);
        let err = board.bulk(BulkKind::Activate).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnsupportedAction { .. })
        ));
        assert!(board.is_selected(&1));
    }

    #[tokio::test]
    async fn test_select_all_visible() {
        let (mut board, _) = board(12, 5);
        board.mount().await.unwrap();
        board.toggle(11);

        board.select_all_visible();
        assert!(board.all_visible_selected());
        assert!(!board.is_selected(&11));
        assert_eq!(board.selection().len(), 5);
    }

    struct FailingFetcher;

    #[async_trait]
    impl PageFetcher<Notice> for FailingFetcher {
        async fn fetch(&self, _: &QueryDescriptor) -> Result<ResultPage<Notice>, Error> {
            Err(ApiError::http(500, "down").into())
        }
    }

    #[tokio::test]
    async fn test_failed_mount() {
        let user = UserContext::new("kim", ["ROLE_USER"]);
        let mut board: Board<Notice> = Board::new(boards::NOTICES, &user, Arc::new(FailingFetcher));

        assert_eq!(board.mount().await.unwrap_err().status_code(), Some(500));
        assert!(board.state().error_message().is_some());
        assert_eq!(board.pagination().total_pages(), 0);
    }
}
