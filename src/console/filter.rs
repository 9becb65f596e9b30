//! Client-side list filtering.
//!
//! Operates on already-reconciled rows only: matching recomputes each row's
//! `visible` flag in place, never re-fetches and never drops rows, so
//! clearing the term restores the full list for free.

use super::reconcile::{KeysView, MissUrlsView};

/// Case-insensitive substring match against a row's first column.
fn matches(first_column: &str, lowered_term: &str) -> bool {
    lowered_term.is_empty() || first_column.to_lowercase().contains(lowered_term)
}

pub fn apply_key_filter(view: &mut KeysView, term: &str) {
    let lowered = term.to_lowercase();
    for row in &mut view.rows {
        row.visible = matches(&row.key, &lowered);
    }
}

pub fn apply_miss_url_filter(view: &mut MissUrlsView, term: &str) {
    let lowered = term.to_lowercase();
    for row in &mut view.rows {
        row.visible = matches(&row.url, &lowered);
    }
}
