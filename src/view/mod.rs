//! Presentation layer of the dashboard.
//!
//! Views are stateless functions that write the fetched data into a
//! [`Screen`]: a retained model of the mount points the dashboard owns
//! (loading overlay, KPI row, top-10 table body, filter badges). Charts
//! live in a separate [`chart::ChartArena`] because their handles must be
//! disposed explicitly. [`paint`] turns both into terminal text.
//!
//! A mount point that is absent is tolerated: the view for it is skipped.

pub mod badges;
pub mod chart;
pub mod kpi;
pub mod paint;
pub mod table;

use badges::BadgeArea;
use kpi::KpiArea;
use table::TableRow;

/// The non-chart mount points a render cycle writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    LoadingOverlay,
    KpiRow,
    TableBody,
    FilterBadges,
}

/// Retained model of everything currently shown outside the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    loading: Option<bool>,
    kpis: Option<KpiArea>,
    table: Option<Vec<TableRow>>,
    badges: Option<BadgeArea>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::full()
    }
}

impl Screen {
    /// A screen with every mount point present and nothing rendered yet.
    pub fn full() -> Self {
        Self {
            loading: Some(false),
            kpis: Some(KpiArea::Empty),
            table: Some(Vec::new()),
            badges: Some(BadgeArea::hidden()),
        }
    }

    /// Drop one mount point; renders targeting it become no-ops.
    pub fn without(mut self, mount: Mount) -> Self {
        match mount {
            Mount::LoadingOverlay => self.loading = None,
            Mount::KpiRow => self.kpis = None,
            Mount::TableBody => self.table = None,
            Mount::FilterBadges => self.badges = None,
        }
        self
    }

    pub fn has(&self, mount: Mount) -> bool {
        match mount {
            Mount::LoadingOverlay => self.loading.is_some(),
            Mount::KpiRow => self.kpis.is_some(),
            Mount::TableBody => self.table.is_some(),
            Mount::FilterBadges => self.badges.is_some(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.unwrap_or(false)
    }

    pub fn set_loading(&mut self, on: bool) {
        if let Some(loading) = self.loading.as_mut() {
            *loading = on;
        }
    }

    pub fn kpis(&self) -> Option<&KpiArea> {
        self.kpis.as_ref()
    }

    pub fn table(&self) -> Option<&[TableRow]> {
        self.table.as_deref()
    }

    pub fn badges(&self) -> Option<&BadgeArea> {
        self.badges.as_ref()
    }

    pub(crate) fn kpis_mut(&mut self) -> Option<&mut KpiArea> {
        self.kpis.as_mut()
    }

    pub(crate) fn table_mut(&mut self) -> Option<&mut Vec<TableRow>> {
        self.table.as_mut()
    }

    pub(crate) fn badges_mut(&mut self) -> Option<&mut BadgeArea> {
        self.badges.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_has_every_mount() {
        let screen = Screen::full();
        assert!(screen.has(Mount::LoadingOverlay));
        assert!(screen.has(Mount::KpiRow));
        assert!(screen.has(Mount::TableBody));
        assert!(screen.has(Mount::FilterBadges));
        assert!(!screen.is_loading());
    }

    #[test]
    fn missing_overlay_ignores_loading() {
        let mut screen = Screen::full().without(Mount::LoadingOverlay);
        screen.set_loading(true);
        assert!(!screen.is_loading());
        assert!(!screen.has(Mount::LoadingOverlay));
    }
}
