//! List screen state and derivation.
//!
//! State ([`ListState`]) changes only through [`reduce_list_state`]; the
//! visible page ([`ListView`]) is always recomputed from the fetched
//! collection by [`derive_view`]. Both are pure, so a screen is fully
//! testable without a backend.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use crate::entity::Entity;
use crate::types::{EntityId, TabFilter};

pub mod filter;
pub mod page;

pub use filter::{filter_by_search, filter_by_tab, matches_search};
pub use page::{clamp_page, page_bounds, paginate, total_pages};

/// Rows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Table rows or a grid of cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Table => ViewMode::Cards,
            ViewMode::Cards => ViewMode::Table,
        }
    }
}

/// Inputs of the list derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub tab: TabFilter,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            tab: TabFilter::All,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The visible slice of a collection
#[derive(Debug, Clone)]
pub struct ListView<'a, E> {
    pub rows: Vec<&'a E>,
    /// Records left after tab and search filtering
    pub filtered_count: usize,
    /// Records in the fetched collection
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<E> ListView<'_, E> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// "Showing 6-10 of 12"
    pub fn range_label(&self) -> String {
        if self.rows.is_empty() {
            return format!("Showing 0 of {}", self.filtered_count);
        }
        let start = (self.page - 1) * self.page_size + 1;
        let end = start + self.rows.len() - 1;
        format!("Showing {start}-{end} of {}", self.filtered_count)
    }
}

// ============================================================================
// Pure Functions
// ============================================================================

/// Filter by tab, then search, then cut out the requested page.
///
/// The page is used as given; a page past the end yields no rows.
pub fn derive_view<'a, E: Entity>(records: &'a [E], query: &ListQuery) -> ListView<'a, E> {
    let filtered = filter_by_search(filter_by_tab(records, &query.tab), &query.search);
    let filtered_count = filtered.len();
    let bounds = page_bounds(query.page, query.page_size, filtered_count);

    ListView {
        rows: filtered[bounds].to_vec(),
        filtered_count,
        total_count: records.len(),
        page: query.page.max(1),
        page_size: query.page_size,
        total_pages: total_pages(filtered_count, query.page_size),
    }
}

/// Raw per-screen state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub query: ListQuery,
    pub selected: BTreeSet<EntityId>,
    pub view_mode: ViewMode,
}

/// All possible changes to a list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    SetSearch(String),
    SetTab(TabFilter),
    SetPage(usize),
    NextPage,
    PrevPage,
    SetPageSize(usize),
    ToggleSelect(EntityId),
    /// Select every id given (the rows currently visible)
    SelectAll(Vec<EntityId>),
    ClearSelection,
    SetViewMode(ViewMode),
    ToggleViewMode,
}

/// Pure function: apply an action to the state.
///
/// `total_pages` is the page count of the current filtered set; page moves
/// are clamped to it. Search, tab, and page-size changes reset to page 1.
pub fn reduce_list_state(mut state: ListState, action: ListAction, total_pages: usize) -> ListState {
    match action {
        ListAction::SetSearch(search) => {
            state.query.search = search;
            state.query.page = 1;
        }
        ListAction::SetTab(tab) => {
            state.query.tab = tab;
            state.query.page = 1;
        }
        ListAction::SetPage(page) => {
            state.query.page = clamp_page(page, total_pages);
        }
        ListAction::NextPage => {
            state.query.page = clamp_page(state.query.page + 1, total_pages);
        }
        ListAction::PrevPage => {
            state.query.page = clamp_page(state.query.page.saturating_sub(1), total_pages);
        }
        ListAction::SetPageSize(size) => {
            state.query.page_size = size.max(1);
            state.query.page = 1;
        }
        ListAction::ToggleSelect(id) => {
            if !state.selected.remove(&id) {
                state.selected.insert(id);
            }
        }
        ListAction::SelectAll(ids) => {
            state.selected.extend(ids);
        }
        ListAction::ClearSelection => {
            state.selected.clear();
        }
        ListAction::SetViewMode(mode) => {
            state.view_mode = mode;
        }
        ListAction::ToggleViewMode => {
            state.view_mode = state.view_mode.toggled();
        }
    }
    state
}

// ============================================================================
// Controller
// ============================================================================

/// Owned state of one entity list screen
#[derive(Debug, Clone)]
pub struct ListController<E> {
    state: ListState,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for ListController<E> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<E: Entity> ListController<E> {
    pub fn new(page_size: usize) -> Self {
        let mut state = ListState::default();
        state.query.page_size = page_size.max(1);
        Self {
            state,
            _entity: PhantomData,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn query(&self) -> &ListQuery {
        &self.state.query
    }

    pub fn page(&self) -> usize {
        self.state.query.page
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state.view_mode
    }

    pub fn selected(&self) -> &BTreeSet<EntityId> {
        &self.state.selected
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.state.selected.contains(&id)
    }

    /// Apply an action against the given collection
    pub fn apply(&mut self, action: ListAction, records: &[E]) {
        let pages = self.filtered_pages(records);
        self.state = reduce_list_state(std::mem::take(&mut self.state), action, pages);
    }

    fn filtered_pages(&self, records: &[E]) -> usize {
        let query = &self.state.query;
        let filtered = filter_by_search(filter_by_tab(records, &query.tab), &query.search);
        total_pages(filtered.len(), query.page_size)
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.query.search = search.into();
        self.state.query.page = 1;
    }

    pub fn set_tab(&mut self, tab: TabFilter) {
        self.state.query.tab = tab;
        self.state.query.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.apply(ListAction::SetPageSize(page_size), &[]);
    }

    pub fn set_page(&mut self, page: usize, records: &[E]) {
        self.apply(ListAction::SetPage(page), records);
    }

    pub fn next_page(&mut self, records: &[E]) {
        self.apply(ListAction::NextPage, records);
    }

    pub fn prev_page(&mut self, records: &[E]) {
        self.apply(ListAction::PrevPage, records);
    }

    pub fn toggle_select(&mut self, id: EntityId) {
        if !self.state.selected.remove(&id) {
            self.state.selected.insert(id);
        }
    }

    /// Select every row on the current page
    pub fn select_all_visible(&mut self, records: &[E]) {
        let ids: Vec<EntityId> = self.view(records).rows.iter().map(|r| r.id()).collect();
        self.state.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.state.selected.clear();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.view_mode = mode;
    }

    pub fn toggle_view_mode(&mut self) {
        self.state.view_mode = self.state.view_mode.toggled();
    }

    /// The visible page, with the page clamped into range
    pub fn view<'a>(&self, records: &'a [E]) -> ListView<'a, E> {
        let mut query = self.state.query.clone();
        query.page = clamp_page(query.page, self.filtered_pages(records));
        derive_view(records, &query)
    }

    /// Re-anchor after a re-fetch: clamp the page and drop selected ids
    /// that no longer exist.
    pub fn on_collection_changed(&mut self, records: &[E]) {
        let pages = self.filtered_pages(records);
        self.state.query.page = clamp_page(self.state.query.page, pages);
        self.state
            .selected
            .retain(|id| records.iter().any(|r| r.id() == *id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Program, ProgramLevel};
    use crate::types::Vocabulary;

    fn programs(n: u64) -> Vec<Program> {
        (1..=n)
            .map(|i| Program {
                id: EntityId::new(i),
                name: format!("Program {i:02}"),
                level: if i % 3 == 0 {
                    ProgramLevel::Master
                } else {
                    ProgramLevel::Bachelor
                },
                field: Some(if i % 2 == 0 { "Engineering" } else { "Business" }.to_string()),
                university_id: None,
                duration_months: None,
                tuition: None,
            })
            .collect()
    }

    fn page_ids(view: &ListView<'_, Program>) -> Vec<u64> {
        view.rows.iter().map(|p| p.id.get()).collect()
    }

    fn query(page: usize, page_size: usize) -> ListQuery {
        ListQuery {
            page,
            page_size,
            ..ListQuery::default()
        }
    }

    #[test]
    fn test_derive_view_twelve_by_five() {
        let records = programs(12);
        let first = derive_view(&records, &query(1, 5));
        assert_eq!(first.total_pages, 3);
        assert_eq!(page_ids(&first), vec![1, 2, 3, 4, 5]);
        assert_eq!(first.range_label(), "Showing 1-5 of 12");

        let last = derive_view(&records, &query(3, 5));
        assert_eq!(page_ids(&last), vec![11, 12]);
        assert_eq!(last.range_label(), "Showing 11-12 of 12");
    }

    #[test]
    fn test_derive_view_empty_collection() {
        let records: Vec<Program> = Vec::new();
        let view = derive_view(&records, &ListQuery::default());
        assert!(view.is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.range_label(), "Showing 0 of 0");
    }

    #[test]
    fn test_derive_view_is_idempotent() {
        let records = programs(17);
        let q = ListQuery {
            search: "engin".to_string(),
            tab: TabFilter::Value("bachelor".to_string()),
            page: 2,
            page_size: 3,
        };
        let a = derive_view(&records, &q);
        let b = derive_view(&records, &q);
        assert_eq!(page_ids(&a), page_ids(&b));
        assert_eq!(a.filtered_count, b.filtered_count);
    }

    #[test]
    fn test_derive_view_applies_tab_then_search() {
        let records = programs(12);
        let q = ListQuery {
            search: "engineering".to_string(),
            tab: TabFilter::Value(ProgramLevel::Master.as_str().to_string()),
            ..ListQuery::default()
        };
        let view = derive_view(&records, &q);
        assert_eq!(page_ids(&view), vec![6, 12]);
        assert_eq!(view.total_count, 12);
    }

    #[test]
    fn test_reduce_search_and_tab_reset_page() {
        let mut state = ListState::default();
        state.query.page = 3;
        let state = reduce_list_state(state, ListAction::SetSearch("x".into()), 5);
        assert_eq!(state.query.page, 1);

        let mut state = state;
        state.query.page = 2;
        let state = reduce_list_state(state, ListAction::SetTab(TabFilter::All), 5);
        assert_eq!(state.query.page, 1);
    }

    #[test]
    fn test_reduce_page_moves_are_clamped() {
        let state = ListState::default();
        let state = reduce_list_state(state, ListAction::PrevPage, 3);
        assert_eq!(state.query.page, 1);
        let state = reduce_list_state(state, ListAction::SetPage(9), 3);
        assert_eq!(state.query.page, 3);
        let state = reduce_list_state(state, ListAction::NextPage, 3);
        assert_eq!(state.query.page, 3);
    }

    #[test]
    fn test_reduce_selection_and_view_mode() {
        let state = ListState::default();
        let state = reduce_list_state(state, ListAction::ToggleSelect(EntityId::new(4)), 1);
        assert!(state.selected.contains(&EntityId::new(4)));
        let state = reduce_list_state(state, ListAction::ToggleSelect(EntityId::new(4)), 1);
        assert!(state.selected.is_empty());

        let state = reduce_list_state(state, ListAction::ToggleViewMode, 1);
        assert_eq!(state.view_mode, ViewMode::Cards);
    }

    #[test]
    fn test_controller_clamps_after_last_record_deleted() {
        let mut records = programs(11);
        let mut controller = ListController::<Program>::new(5);
        controller.set_page(3, &records);
        assert_eq!(controller.page(), 3);
        assert_eq!(page_ids(&controller.view(&records)), vec![11]);

        records.pop();
        controller.on_collection_changed(&records);
        assert_eq!(controller.page(), 2);
        assert_eq!(page_ids(&controller.view(&records)), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_controller_view_clamps_stale_page() {
        let records = programs(12);
        let mut controller = ListController::<Program>::new(5);
        controller.set_page(3, &records);
        controller.set_tab(TabFilter::Value("master".to_string()));
        assert_eq!(controller.page(), 1);

        controller.set_page(2, &records);
        assert_eq!(controller.page(), 1, "4 masters fit on one page");
    }

    #[test]
    fn test_controller_prunes_selection() {
        let mut records = programs(6);
        let mut controller = ListController::<Program>::new(5);
        controller.select_all_visible(&records);
        assert_eq!(controller.selected().len(), 5);

        records.retain(|p| p.id != EntityId::new(2));
        controller.on_collection_changed(&records);
        assert_eq!(controller.selected().len(), 4);
        assert!(!controller.is_selected(EntityId::new(2)));
    }

    #[test]
    fn test_controller_page_size_resets_page() {
        let records = programs(30);
        let mut controller = ListController::<Program>::default();
        controller.next_page(&records);
        assert_eq!(controller.page(), 2);
        controller.set_page_size(25);
        assert_eq!(controller.page(), 1);
        assert_eq!(controller.view(&records).rows.len(), 25);
    }
}
