//! Explicit view state owned by the console orchestrator.
//!
//! Everything the original page kept in ambient globals lives here: the
//! active section, the latest reconciled views, the selected key, filter
//! terms and the status banner. Mutated only by the single event loop.

use super::reconcile::{DashboardView, KeysView, MissUrlsView};

/// The navigable sections of the console. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Keys,
    MissUrls,
}

impl Section {
    /// The resource a section loads on entry and on manual refresh.
    pub fn resource(self) -> Resource {
        match self {
            Section::Dashboard => Resource::Stats,
            Section::Keys => Resource::Keys,
            Section::MissUrls => Resource::MissUrls,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Keys => "keys",
            Section::MissUrls => "miss urls",
        }
    }
}

/// The fetchable resources behind the sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resource {
    Stats,
    Keys,
    MissUrls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Warning,
    Error,
}

/// User-facing status line for mutating operations and startup warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            text: text.into(),
        }
    }
}

/// The console's whole mutable state.
#[derive(Debug)]
pub struct ConsoleState {
    pub section: Section,
    pub dashboard: Option<DashboardView>,
    pub keys: Option<KeysView>,
    pub miss_urls: Option<MissUrlsView>,
    /// Key shown in the detail view; `None` while the detail view is closed.
    pub selected_key: Option<String>,
    pub key_filter: String,
    pub miss_url_filter: String,
    pub banner: Option<Banner>,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self {
            section: Section::Dashboard,
            dashboard: None,
            keys: None,
            miss_urls: None,
            selected_key: None,
            key_filter: String::new(),
            miss_url_filter: String::new(),
            banner: None,
        }
    }
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new()
    }
}
