//! Active-filter badges and the reset control.

use crate::filters::{FilterEvent, FilterStore};

use super::Screen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub dimension: String,
    pub value: String,
}

impl Badge {
    pub fn label(&self) -> String {
        format!("{}: {}", self.dimension, self.value)
    }

    /// Event produced by the badge's close button.
    pub fn dismiss(&self) -> FilterEvent {
        FilterEvent::Removed {
            dimension: self.dimension.clone(),
        }
    }
}

/// Badge container. Hidden as a whole when no filter is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeArea {
    pub badges: Vec<Badge>,
}

impl BadgeArea {
    pub fn hidden() -> Self {
        Self { badges: Vec::new() }
    }

    pub fn is_visible(&self) -> bool {
        !self.badges.is_empty()
    }

    /// The reset control is shown together with the badges.
    pub fn reset(&self) -> Option<FilterEvent> {
        self.is_visible().then_some(FilterEvent::Cleared)
    }

    pub fn find(&self, dimension: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.dimension == dimension)
    }
}

/// One badge per active filter, in store order.
pub fn render(screen: &mut Screen, filters: &FilterStore) {
    if let Some(area) = screen.badges_mut() {
        area.badges = filters
            .entries()
            .map(|(dimension, value)| Badge {
                dimension: dimension.to_string(),
                value: value.to_string(),
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_hides_area() {
        let mut screen = Screen::full();
        render(&mut screen, &FilterStore::new());
        let area = screen.badges().unwrap();
        assert!(!area.is_visible());
        assert_eq!(area.reset(), None);
    }

    #[test]
    fn badges_follow_store_order() {
        let mut filters = FilterStore::new();
        filters.toggle("TitoloStudio", "Laureato");
        filters.toggle("Sesso", "F");
        let mut screen = Screen::full();
        render(&mut screen, &filters);

        let area = screen.badges().unwrap();
        let labels: Vec<_> = area.badges.iter().map(Badge::label).collect();
        assert_eq!(labels, vec!["TitoloStudio: Laureato", "Sesso: F"]);
        assert_eq!(area.reset(), Some(FilterEvent::Cleared));
        assert_eq!(
            area.find("Sesso").map(Badge::dismiss),
            Some(FilterEvent::Removed {
                dimension: "Sesso".to_string()
            })
        );
    }
}
