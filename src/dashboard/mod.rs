//! Refresh-cycle orchestration.
//!
//! The [`DashboardController`] owns the filter store, the screen model and
//! the chart arena. A cycle is `Loading → Rendered | Failed`: one fetch,
//! then every view is redrawn from the new response (or cleared to the
//! error state). Cycles run to completion on the caller's thread, so a
//! filter event can only start a new cycle once the previous one is done.

pub mod input;

use std::time::Instant;

use crate::analytics::logger::{RefreshJournal, RefreshLogEntry};
use crate::client::{StatsFetchError, StatsSource};
use crate::filters::{FilterEvent, FilterStore, query};
use crate::stats::StatsResponse;
use crate::view::chart::{ChartArena, ChartBackend, ChartSlot, ChartTarget};
use crate::view::{Screen, badges, kpi, table};

/// Where the dashboard is in its refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshState {
    Idle,
    Loading,
    Rendered,
    Failed(StatsFetchError),
}

impl RefreshState {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

pub struct DashboardController<S, B> {
    source: S,
    filters: FilterStore,
    screen: Screen,
    charts: ChartArena<B>,
    state: RefreshState,
    latest: Option<StatsResponse>,
    journal: RefreshJournal,
    on_loading: Option<Box<dyn FnMut(bool)>>,
}

impl<S: StatsSource, B: ChartBackend> DashboardController<S, B> {
    pub fn new(source: S, charts: ChartArena<B>) -> Self {
        Self {
            source,
            filters: FilterStore::new(),
            screen: Screen::full(),
            charts,
            state: RefreshState::Idle,
            latest: None,
            journal: RefreshJournal::disabled(),
            on_loading: None,
        }
    }

    /// Render into a screen with a custom set of mount points.
    pub fn with_screen(mut self, screen: Screen) -> Self {
        self.screen = screen;
        self
    }

    /// Start from an already populated filter store.
    pub fn with_filters(mut self, filters: FilterStore) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_journal(mut self, journal: RefreshJournal) -> Self {
        self.journal = journal;
        self
    }

    /// Called with `true` when a cycle starts loading and `false` when it ends.
    pub fn with_loading_hook(mut self, hook: impl FnMut(bool) + 'static) -> Self {
        self.on_loading = Some(Box::new(hook));
        self
    }

    // -- Refresh cycle --

    /// Run one fetch-and-render cycle with the current filters.
    pub fn refresh(&mut self) -> &RefreshState {
        self.state = RefreshState::Loading;
        self.set_loading(true);

        let qs = query::encode(&self.filters);
        let started = Instant::now();
        let result = self.source.fetch_stats(&self.filters);
        let latency_ms = started.elapsed().as_millis() as u64;

        // Charts never outlive the response they were drawn from.
        self.charts.dispose_all();

        match result {
            Ok(stats) => {
                kpi::render(&mut self.screen, &stats);
                self.charts.render(&stats);
                table::render(&mut self.screen, &stats.top10);
                badges::render(&mut self.screen, &self.filters);
                self.journal
                    .record(&RefreshLogEntry::rendered(&qs, latency_ms, stats.top10.len()));
                self.latest = Some(stats);
                self.state = RefreshState::Rendered;
            }
            Err(error) => {
                eprintln!("[loandash] refresh failed: {error}");
                kpi::render_error(&mut self.screen, &error);
                table::render_unavailable(&mut self.screen);
                self.journal
                    .record(&RefreshLogEntry::failed(&qs, latency_ms, &error));
                self.latest = None;
                self.state = RefreshState::Failed(error);
            }
        }

        self.set_loading(false);
        &self.state
    }

    /// Apply a filter event and refresh.
    pub fn apply(&mut self, event: &FilterEvent) -> &RefreshState {
        self.filters.apply(event);
        self.refresh()
    }

    /// Click a category of a rendered chart.
    ///
    /// Returns `None`, without refreshing, when the click maps to no filter.
    pub fn click(&mut self, slot: ChartSlot, target: &ChartTarget) -> Option<&RefreshState> {
        let event = self.charts.click(slot, target)?;
        Some(self.apply(&event))
    }

    /// Dismiss the badge of `dimension`. `None` if no such badge is shown.
    pub fn dismiss(&mut self, dimension: &str) -> Option<&RefreshState> {
        let event = self.screen.badges()?.find(dimension)?.dismiss();
        Some(self.apply(&event))
    }

    /// Use the reset control. `None` while it is hidden.
    pub fn reset(&mut self) -> Option<&RefreshState> {
        let event = self.screen.badges()?.reset()?;
        Some(self.apply(&event))
    }

    // -- Accessors --

    pub fn state(&self) -> &RefreshState {
        &self.state
    }

    /// Response of the last cycle, if it rendered.
    pub fn latest(&self) -> Option<&StatsResponse> {
        self.latest.as_ref()
    }

    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn charts(&self) -> &ChartArena<B> {
        &self.charts
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn set_loading(&mut self, on: bool) {
        self.screen.set_loading(on);
        if let Some(hook) = self.on_loading.as_mut() {
            hook(on);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::stats::Breakdown;
    use crate::view::chart::{ChartConfig, HandleId};
    use crate::view::kpi::KpiArea;
    use crate::view::table::TableRow;
    use crate::view::Mount;

    /// Source that answers from a queue and records the filters it saw.
    struct Canned {
        replies: RefCell<Vec<Result<StatsResponse, StatsFetchError>>>,
        seen: RefCell<Vec<String>>,
    }

    impl Canned {
        fn new(replies: Vec<Result<StatsResponse, StatsFetchError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into_iter().rev().collect()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl StatsSource for Canned {
        fn fetch_stats(&self, filters: &FilterStore) -> Result<StatsResponse, StatsFetchError> {
            self.seen.borrow_mut().push(query::encode(filters));
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(StatsFetchError::NetworkFailure("no reply".into())))
        }
    }

    #[derive(Default)]
    struct Counter {
        next: u64,
        live: usize,
    }

    impl ChartBackend for Counter {
        fn create(&mut self, _config: &ChartConfig) -> HandleId {
            self.next += 1;
            self.live += 1;
            HandleId(self.next)
        }

        fn dispose(&mut self, _id: HandleId) {
            self.live -= 1;
        }
    }

    fn stats() -> StatsResponse {
        StatsResponse {
            total_requests: 2,
            total_amount: 30_000.0,
            approval_pct: 50.0,
            average_amount: 15_000.0,
            count_by_sex: [("M", 1.0), ("F", 1.0)].into_iter().collect(),
            amount_by_property: Breakdown::default(),
            amount_by_education: [("Laureato", 30_000.0)].into_iter().collect(),
            count_by_purpose: Breakdown::default(),
            avg_requested_by_sex: Breakdown::default(),
            avg_approved_by_sex: Breakdown::default(),
            avg_requested_by_education: Breakdown::default(),
            avg_approved_by_education: Breakdown::default(),
            top10: Vec::new(),
        }
    }

    fn controller(
        replies: Vec<Result<StatsResponse, StatsFetchError>>,
    ) -> DashboardController<Canned, Counter> {
        DashboardController::new(Canned::new(replies), ChartArena::new(Counter::default()))
    }

    #[test]
    fn starts_idle() {
        let dash = controller(vec![]);
        assert_eq!(dash.state(), &RefreshState::Idle);
    }

    #[test]
    fn successful_cycle_renders_everything() {
        let mut dash = controller(vec![Ok(stats())]);
        assert!(dash.refresh().is_rendered());
        assert!(matches!(dash.screen().kpis(), Some(KpiArea::Cards(cards)) if cards.len() == 4));
        assert_eq!(dash.charts().live_count(), 6);
        assert!(matches!(
            dash.screen().table().unwrap()[0],
            TableRow::Placeholder { is_error: false, .. }
        ));
        assert!(!dash.screen().badges().unwrap().is_visible());
        assert!(!dash.screen().is_loading());
        assert_eq!(dash.latest().map(|s| s.total_requests), Some(2));
    }

    #[test]
    fn failure_clears_charts_and_keeps_badges() {
        let mut dash = controller(vec![
            Ok(stats()),
            Err(StatsFetchError::HttpError {
                status: 500,
                message: "boom".into(),
            }),
        ]);
        dash.refresh();
        let state = dash.click(ChartSlot::Sex, &ChartTarget::parse("M")).cloned();
        assert!(matches!(state, Some(RefreshState::Failed(_))));

        assert_eq!(dash.charts().live_count(), 0);
        assert_eq!(dash.charts().backend().live, 0);
        match dash.screen().kpis() {
            Some(KpiArea::Error(text)) => assert!(text.contains("boom")),
            other => panic!("expected error banner, got {other:?}"),
        }
        assert!(matches!(
            dash.screen().table().unwrap()[0],
            TableRow::Placeholder { is_error: true, .. }
        ));
        // Badges were rendered for the previous (empty) store and stay as-is.
        assert!(!dash.screen().badges().unwrap().is_visible());
        assert_eq!(dash.filters().get("Sesso"), Some("M"));
        assert!(dash.latest().is_none());
    }

    #[test]
    fn repeated_refreshes_do_not_leak_charts() {
        let mut dash = controller(vec![Ok(stats()), Ok(stats()), Ok(stats())]);
        for _ in 0..3 {
            dash.refresh();
            assert_eq!(dash.charts().backend().live, 6);
        }
    }

    #[test]
    fn click_toggles_filter_and_refetches() {
        let mut dash = controller(vec![Ok(stats()), Ok(stats()), Ok(stats())]);
        dash.refresh();
        assert!(
            dash.click(ChartSlot::Education, &ChartTarget::parse("Laureato"))
                .is_some_and(RefreshState::is_rendered)
        );
        assert_eq!(dash.filters().get("TitoloStudio"), Some("Laureato"));
        let badges = dash.screen().badges().unwrap();
        let labels: Vec<_> = badges.badges.iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["TitoloStudio: Laureato"]);

        // Clicking the same category again deselects it.
        dash.click(ChartSlot::Education, &ChartTarget::parse("#1"));
        assert!(dash.filters().is_empty());
        assert_eq!(
            *dash.source().seen.borrow(),
            vec!["", "TitoloStudio=Laureato", ""]
        );
    }

    #[test]
    fn read_only_click_does_not_refresh() {
        let mut dash = controller(vec![Ok(stats())]);
        dash.refresh();
        assert!(dash.click(ChartSlot::AvgBySex, &ChartTarget::Index(0)).is_none());
        assert_eq!(dash.source().seen.borrow().len(), 1);
    }

    #[test]
    fn dismiss_and_reset_follow_badges() {
        let mut dash = controller(vec![Ok(stats()); 5]);
        assert!(dash.reset().is_none());
        dash.refresh();
        assert!(dash.reset().is_none());

        dash.apply(&FilterEvent::Toggled {
            dimension: "Sesso".into(),
            value: "F".into(),
        });
        dash.apply(&FilterEvent::Toggled {
            dimension: "TitoloStudio".into(),
            value: "Laureato".into(),
        });
        assert!(dash.dismiss("ScopoFinanziamento").is_none());
        assert!(dash.dismiss("Sesso").is_some());
        assert_eq!(
            dash.filters().entries().collect::<Vec<_>>(),
            vec![("TitoloStudio", "Laureato")]
        );

        assert!(dash.reset().is_some());
        assert!(dash.filters().is_empty());
        assert!(!dash.screen().badges().unwrap().is_visible());
    }

    #[test]
    fn loading_hook_brackets_the_cycle() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let mut dash =
            controller(vec![Ok(stats())]).with_loading_hook(move |on| sink.borrow_mut().push(on));
        dash.refresh();
        assert_eq!(*calls.borrow(), vec![true, false]);
    }

    #[test]
    fn missing_mount_points_are_skipped() {
        let screen = Screen::full().without(Mount::KpiRow).without(Mount::TableBody);
        let mut dash = controller(vec![Ok(stats())]).with_screen(screen);
        assert!(dash.refresh().is_rendered());
        assert!(dash.screen().kpis().is_none());
        assert!(dash.screen().table().is_none());
        assert_eq!(dash.charts().live_count(), 6);
    }
}
