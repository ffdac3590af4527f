//! Row layout of the link list.
//!
//! Every category with at least one match renders as a header row, one row
//! per link and a blank spacer. Section geometry for scroll sync is derived
//! from the same walk so both always agree.

use engine::{Link, SearchResults, SectionGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    Header {
        id: &'a str,
        name: &'a str,
        count: usize,
    },
    /// `index` is the position in the flat navigation order.
    Link { link: &'a Link, index: usize },
    Spacer,
}

pub fn rows<'a>(results: &SearchResults<'a>) -> Vec<Row<'a>> {
    let mut rows = Vec::new();
    let mut index = 0;
    for group in results.visible() {
        rows.push(Row::Header {
            id: group.category.id.as_str(),
            name: group.category.name.as_str(),
            count: group.links.len(),
        });
        for &link in &group.links {
            rows.push(Row::Link { link, index });
            index += 1;
        }
        rows.push(Row::Spacer);
    }
    rows
}

pub fn sections(results: &SearchResults<'_>) -> Vec<SectionGeometry> {
    let mut top = 0u32;
    results
        .visible()
        .map(|group| {
            let height = u32::try_from(group.links.len())
                .unwrap_or(u32::MAX)
                .saturating_add(2);
            let section = SectionGeometry::new(group.category.id.clone(), top, height);
            top = top.saturating_add(height);
            section
        })
        .collect()
}

/// Row holding the link at `cursor` in navigation order.
pub fn cursor_row(rows: &[Row<'_>], cursor: usize) -> Option<u32> {
    rows.iter()
        .position(|row| matches!(row, Row::Link { index, .. } if *index == cursor))
        .and_then(|row| u32::try_from(row).ok())
}

/// Largest scroll offset that still fills the viewport.
pub fn max_scroll(total_rows: usize, height: u32) -> u32 {
    u32::try_from(total_rows)
        .unwrap_or(u32::MAX)
        .saturating_sub(height)
}
