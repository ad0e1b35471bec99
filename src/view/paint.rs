//! Terminal rendering: the text chart backend and the screen painter.

use std::collections::BTreeMap;
use std::fmt::Write;

use colored::{Color, Colorize};

use crate::format;

use super::Screen;
use super::badges::BadgeArea;
use super::chart::{ChartBackend, ChartConfig, ChartKind, ChartSlot, HandleId, ValueFormat};
use super::kpi::{Accent, KpiArea};
use super::table::{COLUMNS, Outcome, TableRow};

const SERIES_COLORS: [Color; 2] = [Color::Blue, Color::Green];
const SLICE_COLORS: [Color; 4] = [Color::Blue, Color::Red, Color::Yellow, Color::Green];

// ---------------------------------------------------------------------------
// Text chart backend
// ---------------------------------------------------------------------------

/// Draws charts as horizontal `█` bars scaled to the largest value.
///
/// Each created chart is kept as pre-rendered text until disposed.
#[derive(Debug)]
pub struct TextCharts {
    bar_width: usize,
    next_id: u64,
    live: BTreeMap<HandleId, (ChartSlot, String)>,
}

impl TextCharts {
    pub fn new(bar_width: usize) -> Self {
        Self {
            bar_width: bar_width.max(1),
            next_id: 0,
            live: BTreeMap::new(),
        }
    }

    /// Rendered text of the live chart in `slot`.
    pub fn rendered(&self, slot: ChartSlot) -> Option<&str> {
        self.live
            .values()
            .find(|(s, _)| *s == slot)
            .map(|(_, text)| text.as_str())
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn draw(&self, config: &ChartConfig) -> String {
        let slot = config.slot;
        let mut out = String::new();

        let hint = if slot.dimension().is_some() {
            format!("[click {} <label|#n>]", slot.name())
        } else {
            String::new()
        };
        let _ = writeln!(out, "{} {}", slot.title().bold().cyan(), hint.dimmed());

        if config.labels.is_empty() {
            let _ = writeln!(out, "  {}", "No data".dimmed());
            return out;
        }

        let as_currency = slot.value_format() == ValueFormat::Currency;
        let max = config
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let total: f64 = config
            .series
            .first()
            .map(|s| s.values.iter().sum())
            .unwrap_or(0.0);
        let label_width = config
            .labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
            .min(28);

        for (i, label) in config.labels.iter().enumerate() {
            let name = format::truncate(label, label_width);
            match slot.kind() {
                ChartKind::GroupedBar => {
                    for (s, series) in config.series.iter().enumerate() {
                        let value = series.values.get(i).copied().unwrap_or(0.0);
                        let prefix = if s == 0 {
                            format!("{:>2} {name:<label_width$}", i + 1)
                        } else {
                            format!("   {:<label_width$}", "")
                        };
                        let _ = writeln!(
                            out,
                            "  {prefix} {} {} {}",
                            self.bar(value, max).color(SERIES_COLORS[s % SERIES_COLORS.len()]),
                            format::count_or_currency(value, as_currency),
                            series.label.dimmed(),
                        );
                    }
                }
                kind => {
                    let value = config.series[0].values.get(i).copied().unwrap_or(0.0);
                    let color = if kind == ChartKind::Pie {
                        SLICE_COLORS[i % SLICE_COLORS.len()]
                    } else {
                        SERIES_COLORS[0]
                    };
                    let share = if kind == ChartKind::Pie && total > 0.0 {
                        format!(" ({})", format::percent(value / total * 100.0))
                    } else {
                        String::new()
                    };
                    let _ = writeln!(
                        out,
                        "  {:>2} {name:<label_width$} {} {}{share}",
                        i + 1,
                        self.bar(value, max).color(color),
                        format::count_or_currency(value, as_currency),
                    );
                }
            }
        }

        out
    }

    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 || !value.is_finite() || value <= 0.0 {
            return " ".repeat(self.bar_width);
        }
        let cells = ((value / max) * self.bar_width as f64).round().max(1.0) as usize;
        let cells = cells.min(self.bar_width);
        format!("{}{}", "█".repeat(cells), " ".repeat(self.bar_width - cells))
    }
}

impl ChartBackend for TextCharts {
    fn create(&mut self, config: &ChartConfig) -> HandleId {
        self.next_id += 1;
        let id = HandleId(self.next_id);
        let text = self.draw(config);
        self.live.insert(id, (config.slot, text));
        id
    }

    fn dispose(&mut self, id: HandleId) {
        self.live.remove(&id);
    }
}

// ---------------------------------------------------------------------------
// Screen painter
// ---------------------------------------------------------------------------

/// Paint the whole dashboard as terminal text.
pub fn paint(screen: &Screen, charts: &TextCharts) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Loan Request Statistics".bold().cyan());
    let _ = writeln!(out, "{}", "=".repeat(60));

    if screen.is_loading() {
        let _ = writeln!(out, "{}", "Loading statistics…".yellow());
    }

    if let Some(kpis) = screen.kpis() {
        paint_kpis(&mut out, kpis);
    }

    if let Some(badges) = screen.badges() {
        paint_badges(&mut out, badges);
    }

    for slot in ChartSlot::ALL {
        if let Some(text) = charts.rendered(slot) {
            let _ = writeln!(out);
            out.push_str(text);
        }
    }

    if let Some(rows) = screen.table() {
        let _ = writeln!(out);
        paint_table(&mut out, rows);
    }

    out
}

fn paint_kpis(out: &mut String, kpis: &KpiArea) {
    match kpis {
        KpiArea::Empty => {}
        KpiArea::Cards(cards) => {
            let _ = writeln!(out);
            for card in cards {
                let color = match card.accent {
                    Accent::Primary => Color::Blue,
                    Accent::Success => Color::Green,
                    Accent::Info => Color::Cyan,
                    Accent::Warning => Color::Yellow,
                };
                let _ = writeln!(
                    out,
                    "  {} {:<26} {}",
                    "▌".color(color),
                    card.title,
                    card.value.bold()
                );
            }
        }
        KpiArea::Error(message) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "  {} {}", "✗".red().bold(), message.red());
        }
    }
}

fn paint_badges(out: &mut String, area: &BadgeArea) {
    if !area.is_visible() {
        return;
    }
    let _ = writeln!(out);
    let badges: Vec<String> = area
        .badges
        .iter()
        .map(|b| format!("[{} ×]", b.label()).on_blue().white().to_string())
        .collect();
    let _ = writeln!(out, "  {} {}", "Filters:".bold(), badges.join(" "));
    let _ = writeln!(
        out,
        "  {}",
        "rm <Dimension> to dismiss one, reset to clear all".dimmed()
    );
}

fn paint_table(out: &mut String, rows: &[TableRow]) {
    let _ = writeln!(out, "{}", "Top 10 requested amounts".bold().cyan());
    let _ = writeln!(
        out,
        "  {:>6} {:>12} {:^5} {:<22} {:>8} {}",
        COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4], COLUMNS[5]
    );
    let _ = writeln!(out, "  {}", "-".repeat(68));

    for (i, row) in rows.iter().enumerate() {
        match row {
            TableRow::Record {
                id,
                amount,
                sex,
                education,
                probability,
                outcome,
            } => {
                let verdict = match outcome {
                    Outcome::Approved => outcome.to_string().green(),
                    Outcome::Rejected => outcome.to_string().red(),
                };
                let line = format!(
                    "  {id:>6} {amount:>12} {sex:^5} {:<22} {probability:>8}",
                    format::truncate(education, 22)
                );
                if i % 2 == 0 {
                    let _ = writeln!(out, "{line} {verdict}");
                } else {
                    let _ = writeln!(out, "{} {verdict}", line.dimmed());
                }
            }
            TableRow::Placeholder { text, is_error } => {
                let text = if *is_error { text.red() } else { text.dimmed() };
                let _ = writeln!(out, "  {:^68}", text.to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::chart::Series;

    fn config(slot: ChartSlot, labels: &[&str], values: &[f64]) -> ChartConfig {
        ChartConfig {
            slot,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            series: vec![Series {
                label: "Requests",
                values: values.to_vec(),
            }],
        }
    }

    #[test]
    fn bars_scale_to_largest_value() {
        let charts = TextCharts::new(10);
        assert_eq!(charts.bar(50.0, 100.0).trim_end().chars().count(), 5);
        assert_eq!(charts.bar(100.0, 100.0).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(charts.bar(0.4, 100.0).chars().filter(|c| *c == '█').count(), 1);
        assert_eq!(charts.bar(0.0, 100.0).trim(), "");
    }

    #[test]
    fn dispose_removes_rendered_text() {
        let mut charts = TextCharts::new(10);
        let id = charts.create(&config(ChartSlot::Sex, &["M", "F"], &[3.0, 1.0]));
        let text = charts.rendered(ChartSlot::Sex).unwrap();
        assert!(text.contains("Requests by sex"));
        assert!(text.contains("75.0%"));
        charts.dispose(id);
        assert!(charts.rendered(ChartSlot::Sex).is_none());
        assert_eq!(charts.live_count(), 0);
    }

    #[test]
    fn empty_chart_says_no_data() {
        let mut charts = TextCharts::new(10);
        charts.create(&config(ChartSlot::Purpose, &[], &[]));
        assert!(charts.rendered(ChartSlot::Purpose).unwrap().contains("No data"));
    }
}
