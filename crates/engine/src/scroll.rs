//! Keeps the selected category and the scroll position of the section list
//! in agreement.
//!
//! Two inputs drive the selection:
//!
//! - an explicit choice ([`ScrollSync::select`]), which scrolls the chosen
//!   section to the middle of the viewport (or to the top for
//!   [`Selection::All`]) and then ignores scroll events for a settle window;
//! - scrolling ([`ScrollSync::on_scroll`]), which selects the visible section
//!   whose center is nearest to the viewport center.
//!
//! Time is passed in by the caller, which keeps the controller free of clocks.

use std::time::{Duration, Instant};

pub const DEFAULT_SETTLE: Duration = Duration::from_millis(450);
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// Which category the sidebar highlights.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Category(String),
}

impl Selection {
    pub fn category_id(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Category(id) => Some(id),
        }
    }
}

/// Vertical extent of one rendered category section, in list units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionGeometry {
    pub category_id: String,
    pub top: u32,
    pub height: u32,
}

impl SectionGeometry {
    pub fn new(category_id: impl Into<String>, top: u32, height: u32) -> Self {
        Self {
            category_id: category_id.into(),
            top,
            height,
        }
    }

    fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// Twice the center, to stay in integers.
    fn center2(&self) -> u64 {
        2 * u64::from(self.top) + u64::from(self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_top: u32,
    pub height: u32,
}

impl Viewport {
    fn bottom(&self) -> u32 {
        self.scroll_top.saturating_add(self.height)
    }

    fn center2(&self) -> u64 {
        2 * u64::from(self.scroll_top) + u64::from(self.height)
    }

    fn shows(&self, section: &SectionGeometry) -> bool {
        section.top < self.bottom() && section.bottom() > self.scroll_top
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    Idle,
    ProgrammaticScroll { until: Instant },
}

#[derive(Clone, Debug)]
pub struct ScrollSync {
    selection: Selection,
    mode: SyncMode,
    settle: Duration,
    frame: Duration,
    last_evaluated: Option<Instant>,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE, DEFAULT_FRAME)
    }
}

impl ScrollSync {
    pub fn new(settle: Duration, frame: Duration) -> Self {
        Self {
            selection: Selection::All,
            mode: SyncMode::Idle,
            settle,
            frame,
            last_evaluated: None,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current mode, after expiring a finished settle window.
    pub fn mode(&mut self, now: Instant) -> SyncMode {
        if let SyncMode::ProgrammaticScroll { until } = self.mode
            && now >= until
        {
            self.mode = SyncMode::Idle;
        }
        self.mode
    }

    /// Explicit selection. Returns the scroll offset to apply, if the target
    /// section is rendered (always `Some(0)` for [`Selection::All`]).
    pub fn select(
        &mut self,
        selection: Selection,
        sections: &[SectionGeometry],
        viewport: Viewport,
        now: Instant,
    ) -> Option<u32> {
        let target = match &selection {
            Selection::All => Some(0),
            Selection::Category(id) => sections
                .iter()
                .find(|section| &section.category_id == id)
                .map(|section| centered_offset(section, sections, viewport)),
        };

        self.selection = selection;
        self.mode = SyncMode::ProgrammaticScroll {
            until: now + self.settle,
        };
        target
    }

    /// Scroll-driven reselection. Returns the new selection when it changed.
    pub fn on_scroll(
        &mut self,
        viewport: Viewport,
        sections: &[SectionGeometry],
        now: Instant,
    ) -> Option<Selection> {
        if let SyncMode::ProgrammaticScroll { .. } = self.mode(now) {
            return None;
        }
        if let Some(last) = self.last_evaluated
            && now.saturating_duration_since(last) < self.frame
        {
            return None;
        }
        self.last_evaluated = Some(now);

        let center = viewport.center2();
        let nearest = sections
            .iter()
            .filter(|section| viewport.shows(section))
            .fold(None::<(&SectionGeometry, u64)>, |best, section| {
                let distance = section.center2().abs_diff(center);
                match best {
                    Some((_, best_distance)) if best_distance <= distance => best,
                    _ => Some((section, distance)),
                }
            })?;

        let selection = Selection::Category(nearest.0.category_id.clone());
        if selection == self.selection {
            return None;
        }
        self.selection = selection.clone();
        Some(selection)
    }

    /// Forget a selection that no longer exists (e.g. a deleted category).
    pub fn reset(&mut self) {
        self.selection = Selection::All;
        self.mode = SyncMode::Idle;
    }
}

fn centered_offset(
    section: &SectionGeometry,
    sections: &[SectionGeometry],
    viewport: Viewport,
) -> u32 {
    let wanted = (section.center2().saturating_sub(u64::from(viewport.height)) / 2) as u32;
    let content_bottom = sections.iter().map(SectionGeometry::bottom).max().unwrap_or(0);
    let max_offset = content_bottom.saturating_sub(viewport.height);
    wanted.min(max_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionGeometry> {
        vec![
            SectionGeometry::new("a", 0, 10),
            SectionGeometry::new("b", 10, 10),
            SectionGeometry::new("c", 20, 10),
            SectionGeometry::new("d", 30, 10),
        ]
    }

    fn viewport(scroll_top: u32) -> Viewport {
        Viewport {
            scroll_top,
            height: 10,
        }
    }

    #[test]
    fn selecting_a_category_centers_its_section() {
        let mut sync = ScrollSync::default();
        let now = Instant::now();
        let offset = sync.select(
            Selection::Category("c".to_string()),
            &sections(),
            viewport(0),
            now,
        );
        assert_eq!(offset, Some(20));
        assert_eq!(sync.selection(), &Selection::Category("c".to_string()));
    }

    #[test]
    fn selecting_all_scrolls_to_top() {
        let mut sync = ScrollSync::default();
        let offset = sync.select(Selection::All, &sections(), viewport(25), Instant::now());
        assert_eq!(offset, Some(0));
    }

    #[test]
    fn centered_offset_is_clamped_to_content() {
        let mut sync = ScrollSync::default();
        let tall = Viewport {
            scroll_top: 0,
            height: 30,
        };
        let offset = sync.select(
            Selection::Category("d".to_string()),
            &sections(),
            tall,
            Instant::now(),
        );
        assert_eq!(offset, Some(10));

        let offset = sync.select(
            Selection::Category("a".to_string()),
            &sections(),
            tall,
            Instant::now(),
        );
        assert_eq!(offset, Some(0));
    }

    #[test]
    fn scroll_events_are_ignored_while_settling() {
        let mut sync = ScrollSync::default();
        let t0 = Instant::now();
        sync.select(
            Selection::Category("a".to_string()),
            &sections(),
            viewport(0),
            t0,
        );
        assert!(matches!(
            sync.mode(t0),
            SyncMode::ProgrammaticScroll { .. }
        ));

        let during = t0 + Duration::from_millis(200);
        assert_eq!(sync.on_scroll(viewport(30), &sections(), during), None);
        assert_eq!(sync.selection(), &Selection::Category("a".to_string()));

        let after = t0 + DEFAULT_SETTLE;
        assert_eq!(
            sync.on_scroll(viewport(30), &sections(), after),
            Some(Selection::Category("d".to_string()))
        );
        assert_eq!(sync.mode(after), SyncMode::Idle);
    }

    #[test]
    fn scrolling_picks_section_nearest_viewport_center() {
        let mut sync = ScrollSync::default();
        let t0 = Instant::now();
        assert_eq!(
            sync.on_scroll(viewport(12), &sections(), t0),
            Some(Selection::Category("b".to_string()))
        );
        let t1 = t0 + Duration::from_millis(100);
        assert_eq!(sync.on_scroll(viewport(13), &sections(), t1), None);
    }

    #[test]
    fn ties_go_to_the_first_section() {
        let mut sync = ScrollSync::default();
        assert_eq!(
            sync.on_scroll(viewport(5), &sections(), Instant::now()),
            Some(Selection::Category("a".to_string()))
        );
    }

    #[test]
    fn scroll_evaluation_is_throttled_per_frame() {
        let mut sync = ScrollSync::default();
        let t0 = Instant::now();
        sync.on_scroll(viewport(0), &sections(), t0);
        let soon = t0 + Duration::from_millis(5);
        assert_eq!(sync.on_scroll(viewport(30), &sections(), soon), None);
        let later = t0 + DEFAULT_FRAME;
        assert_eq!(
            sync.on_scroll(viewport(30), &sections(), later),
            Some(Selection::Category("d".to_string()))
        );
    }

    #[test]
    fn hidden_sections_are_never_selected() {
        let mut sync = ScrollSync::default();
        let empty = Viewport {
            scroll_top: 100,
            height: 10,
        };
        assert_eq!(sync.on_scroll(empty, &sections(), Instant::now()), None);
    }
}
