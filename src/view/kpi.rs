//! KPI row: four summary cards, or the error banner of a failed cycle.

use crate::client::StatsFetchError;
use crate::format;
use crate::stats::StatsResponse;

use super::Screen;

/// Card accent, mapped to a terminal color by the painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Primary,
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
    pub accent: Accent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KpiArea {
    Empty,
    Cards(Vec<KpiCard>),
    /// Inline banner shown in place of the cards.
    Error(String),
}

/// Build the four KPI cards from the response totals.
pub fn cards(stats: &StatsResponse) -> Vec<KpiCard> {
    vec![
        KpiCard {
            title: "Total requests",
            value: format::integer(stats.total_requests),
            accent: Accent::Primary,
        },
        KpiCard {
            title: "Total amount requested",
            value: format::currency(stats.total_amount),
            accent: Accent::Success,
        },
        KpiCard {
            title: "Approval rate",
            value: format::percent(stats.approval_pct),
            accent: Accent::Info,
        },
        KpiCard {
            title: "Average amount requested",
            value: format::currency(stats.average_amount),
            accent: Accent::Warning,
        },
    ]
}

pub fn render(screen: &mut Screen, stats: &StatsResponse) {
    if let Some(area) = screen.kpis_mut() {
        *area = KpiArea::Cards(cards(stats));
    }
}

/// Replace the KPI row with the error banner. All error kinds read the same.
pub fn render_error(screen: &mut Screen, error: &StatsFetchError) {
    if let Some(area) = screen.kpis_mut() {
        *area = KpiArea::Error(format!("Failed to load statistics: {error}"));
    }
}
