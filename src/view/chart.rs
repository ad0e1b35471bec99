//! Chart slots, chart handles and the arena that owns them.
//!
//! Six fixed slots are rendered on every successful cycle. Four of them are
//! bound to a filter dimension: clicking one of their categories yields a
//! [`FilterEvent::Toggled`] for that dimension. The two grouped comparison
//! charts are read-only.
//!
//! A [`ChartHandle`] is the live object a [`ChartBackend`] creates for one
//! slot. The [`ChartArena`] keeps at most one handle per slot and disposes
//! every handle before a new cycle renders, so click bindings from a
//! previous cycle can never fire.

use std::collections::{BTreeMap, BTreeSet};

use crate::filters::FilterEvent;
use crate::stats::{Breakdown, StatsResponse};

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartSlot {
    Sex,
    Property,
    Education,
    Purpose,
    AvgBySex,
    AvgByEducation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    VerticalBar,
    HorizontalBar,
    /// Requested vs approved averages side by side.
    GroupedBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Count,
    Currency,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 6] = [
        Self::Sex,
        Self::Property,
        Self::Education,
        Self::Purpose,
        Self::AvgBySex,
        Self::AvgByEducation,
    ];

    /// Short name used on the command line (`click education #2`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Sex => "sex",
            Self::Property => "property",
            Self::Education => "education",
            Self::Purpose => "purpose",
            Self::AvgBySex => "avg-sex",
            Self::AvgByEducation => "avg-education",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.name().eq_ignore_ascii_case(name))
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Sex => "Requests by sex",
            Self::Property => "Amount requested by property",
            Self::Education => "Amount requested by education",
            Self::Purpose => "Requests by financing purpose",
            Self::AvgBySex => "Average requested vs approved by sex",
            Self::AvgByEducation => "Average requested vs approved by education",
        }
    }

    /// Filter dimension a click on this chart toggles.
    pub fn dimension(self) -> Option<&'static str> {
        match self {
            Self::Sex => Some("Sesso"),
            Self::Property => Some("InformazioniImmobile"),
            Self::Education => Some("TitoloStudio"),
            Self::Purpose => Some("ScopoFinanziamento"),
            Self::AvgBySex | Self::AvgByEducation => None,
        }
    }

    pub fn kind(self) -> ChartKind {
        match self {
            Self::Sex => ChartKind::Pie,
            Self::Property | Self::Purpose => ChartKind::VerticalBar,
            Self::Education => ChartKind::HorizontalBar,
            Self::AvgBySex | Self::AvgByEducation => ChartKind::GroupedBar,
        }
    }

    pub fn value_format(self) -> ValueFormat {
        match self {
            Self::Sex | Self::Purpose => ValueFormat::Count,
            _ => ValueFormat::Currency,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub values: Vec<f64>,
}

/// Everything a backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub slot: ChartSlot,
    pub labels: Vec<String>,
    /// One series per dataset, each parallel to `labels`.
    pub series: Vec<Series>,
}

impl ChartConfig {
    fn single(slot: ChartSlot, label: &'static str, data: &Breakdown) -> Self {
        Self {
            slot,
            labels: data.labels(),
            series: vec![Series {
                label,
                values: data.values(),
            }],
        }
    }

    /// Labels come from `requested`; labels missing from `approved` plot 0.
    fn grouped(slot: ChartSlot, requested: &Breakdown, approved: &Breakdown) -> Self {
        let labels = requested.labels();
        let approved_values = labels
            .iter()
            .map(|label| approved.get(label).unwrap_or(0.0))
            .collect();
        Self {
            slot,
            labels,
            series: vec![
                Series {
                    label: "Average requested (€)",
                    values: requested.values(),
                },
                Series {
                    label: "Average approved (€)",
                    values: approved_values,
                },
            ],
        }
    }
}

/// Chart configurations for every slot, in [`ChartSlot::ALL`] order.
pub fn build_configs(stats: &StatsResponse) -> Vec<ChartConfig> {
    vec![
        ChartConfig::single(ChartSlot::Sex, "Requests", &stats.count_by_sex),
        ChartConfig::single(
            ChartSlot::Property,
            "Total requested (€)",
            &stats.amount_by_property,
        ),
        ChartConfig::single(
            ChartSlot::Education,
            "Total requested (€)",
            &stats.amount_by_education,
        ),
        ChartConfig::single(ChartSlot::Purpose, "Requests", &stats.count_by_purpose),
        ChartConfig::grouped(
            ChartSlot::AvgBySex,
            &stats.avg_requested_by_sex,
            &stats.avg_approved_by_sex,
        ),
        ChartConfig::grouped(
            ChartSlot::AvgByEducation,
            &stats.avg_requested_by_education,
            &stats.avg_approved_by_education,
        ),
    ]
}

// ---------------------------------------------------------------------------
// Handles and backend
// ---------------------------------------------------------------------------

/// Identity of a live chart inside its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(pub u64);

/// What a click landed on: a category label or a 0-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartTarget {
    Index(usize),
    Label(String),
}

impl ChartTarget {
    /// Parse `#n` (1-based) as a position, anything else as a label.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n > 0 => Self::Index(n - 1),
            _ => Self::Label(raw.to_string()),
        }
    }
}

/// A live chart bound to one slot and one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    pub id: HandleId,
    pub slot: ChartSlot,
    labels: Vec<String>,
}

impl ChartHandle {
    /// Label of the rendered category the target designates.
    pub fn resolve(&self, target: &ChartTarget) -> Option<&str> {
        match target {
            ChartTarget::Index(idx) => self.labels.get(*idx).map(String::as_str),
            ChartTarget::Label(label) => self
                .labels
                .iter()
                .find(|l| *l == label)
                .map(String::as_str),
        }
    }
}

/// Rendering backend: creates and disposes live charts.
pub trait ChartBackend {
    fn create(&mut self, config: &ChartConfig) -> HandleId;
    fn dispose(&mut self, id: HandleId);
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Owns every live chart handle, at most one per mounted slot.
pub struct ChartArena<B> {
    backend: B,
    mounted: BTreeSet<ChartSlot>,
    live: BTreeMap<ChartSlot, ChartHandle>,
}

impl<B: ChartBackend> ChartArena<B> {
    /// An arena with every slot mounted.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mounted: ChartSlot::ALL.into_iter().collect(),
            live: BTreeMap::new(),
        }
    }

    /// Unmount a slot; configs for it are skipped silently.
    pub fn without_slot(mut self, slot: ChartSlot) -> Self {
        self.mounted.remove(&slot);
        self
    }

    /// Dispose every live handle.
    pub fn dispose_all(&mut self) {
        for (_, handle) in std::mem::take(&mut self.live) {
            self.backend.dispose(handle.id);
        }
    }

    /// Create the chart for `config.slot`, replacing any live handle there.
    ///
    /// Returns `None` when the slot is not mounted.
    pub fn mount(&mut self, config: &ChartConfig) -> Option<HandleId> {
        if !self.mounted.contains(&config.slot) {
            return None;
        }
        if let Some(previous) = self.live.remove(&config.slot) {
            self.backend.dispose(previous.id);
        }
        let id = self.backend.create(config);
        self.live.insert(
            config.slot,
            ChartHandle {
                id,
                slot: config.slot,
                labels: config.labels.clone(),
            },
        );
        Some(id)
    }

    /// Dispose everything, then render all charts for `stats`.
    pub fn render(&mut self, stats: &StatsResponse) {
        self.dispose_all();
        for config in build_configs(stats) {
            self.mount(&config);
        }
    }

    /// Map a click on `slot` to a filter event.
    ///
    /// `None` for read-only charts, unknown categories and slots without a
    /// live chart.
    pub fn click(&self, slot: ChartSlot, target: &ChartTarget) -> Option<FilterEvent> {
        let dimension = slot.dimension()?;
        let label = self.live.get(&slot)?.resolve(target)?;
        Some(FilterEvent::Toggled {
            dimension: dimension.to_string(),
            value: label.to_string(),
        })
    }

    pub fn handle(&self, slot: ChartSlot) -> Option<&ChartHandle> {
        self.live.get(&slot)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
