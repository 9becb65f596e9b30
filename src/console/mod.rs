//! Console orchestration: the state machine deciding what to fetch, when,
//! and how to reconcile results into view state.
//!
//! The console handles one [`Event`] at a time and awaits every network call
//! inline, so snapshot application is serialized: whichever snapshot is
//! applied last wins, and no locking or cancellation exists anywhere.

pub mod controls;
pub mod events;
pub mod filter;
pub mod reconcile;
pub mod scheduler;
pub mod state;

use tracing::{error, info, warn};

use crate::client::{ApiClient, error::ApiError};
use crate::surface::Surface;

use controls::{ControlId, ControlPanel};
use events::{Event, HELP_TEXT};
use reconcile::{DashboardView, KeysView};
use scheduler::RefreshScheduler;
use state::{Banner, ConsoleState, Resource, Section};

const REDIS_WARNING: &str =
    "redis tier unreachable; remote-tier stats and keys may be incomplete";

/// The operator console: owns all view state and drives the cache service
/// client in response to events.
pub struct Console<S: Surface> {
    api: ApiClient,
    state: ConsoleState,
    scheduler: RefreshScheduler,
    controls: ControlPanel,
    surface: S,
}

impl<S: Surface> Console<S> {
    pub fn new(api: ApiClient, surface: S) -> Self {
        Self {
            api,
            state: ConsoleState::new(),
            scheduler: RefreshScheduler::new(),
            controls: ControlPanel::new(),
            surface,
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// One-time startup: check Redis connectivity, then load the dashboard.
    pub async fn startup(&mut self) {
        match self.api.fetch_status().await {
            Ok(status) if status.redis_connected => {
                info!("Cache service reachable, redis tier connected");
            }
            Ok(_) => {
                self.show_banner(Banner::warning(REDIS_WARNING));
            }
            Err(err) => {
                warn!(error = %err, "Startup status check failed");
                self.show_banner(Banner::warning(REDIS_WARNING));
            }
        }

        self.load_stats().await;
    }

    /// Dispatch one event. `Quit` is handled by the caller's loop.
    pub async fn handle(&mut self, event: Event) {
        match event {
            Event::Navigate(section) => {
                self.state.section = section;
                self.surface.section_changed(section);
                self.refresh_resource(section.resource()).await;
            }
            Event::RefreshTick => {
                self.scheduler.on_tick();
                self.run_pending_refreshes().await;
            }
            Event::ManualRefresh => {
                self.scheduler.on_manual_refresh(self.state.section);
                self.run_pending_refreshes().await;
            }
            Event::FilterChanged { term } => self.apply_filter(term),
            Event::ViewDetail { key } => self.open_detail(key).await,
            Event::CloseDetail => {
                self.state.selected_key = None;
                self.surface.close_detail();
            }
            Event::FlushRequested { prefix } => self.flush(prefix).await,
            Event::DeleteRequested { key } => self.delete(key, false).await,
            Event::DeleteSelected => match self.state.selected_key.clone() {
                Some(key) => self.delete(key, true).await,
                None => self.surface.show_notice("no entry is open in the detail view"),
            },
            Event::Help => self.surface.show_notice(HELP_TEXT),
            Event::Quit => {}
        }
    }

    fn apply_filter(&mut self, term: String) {
        match self.state.section {
            Section::Keys => {
                self.state.key_filter = term;
                if let Some(view) = self.state.keys.as_mut() {
                    filter::apply_key_filter(view, &self.state.key_filter);
                    self.surface.render_keys(view);
                }
            }
            Section::MissUrls => {
                self.state.miss_url_filter = term;
                if let Some(view) = self.state.miss_urls.as_mut() {
                    filter::apply_miss_url_filter(view, &self.state.miss_url_filter);
                    self.surface.render_miss_urls(view);
                }
            }
            Section::Dashboard => {
                self.surface.show_notice("no filterable list on the dashboard");
            }
        }
    }

    async fn run_pending_refreshes(&mut self) {
        for resource in self.scheduler.drain() {
            self.refresh_resource(resource).await;
        }
    }

    async fn refresh_resource(&mut self, resource: Resource) {
        match resource {
            Resource::Stats => self.load_stats().await,
            Resource::Keys => self.load_keys().await,
            Resource::MissUrls => self.load_miss_urls().await,
        }
    }

    /// Read-path failures stay out of the operator's way: log and keep the
    /// previously rendered view.
    async fn load_stats(&mut self) {
        match self.api.fetch_stats().await {
            Ok(snapshot) => {
                let dashboard = reconcile::dashboard_view(&snapshot);
                // The stats snapshot carries the recent key list; while the
                // operator is on the keys section it doubles as a key refresh.
                let keys = (self.state.section == Section::Keys)
                    .then(|| reconcile::keys_view(&snapshot.recent_keys, &self.state.key_filter));
                self.apply_stats(dashboard, keys);
            }
            Err(err) => error!(error = %err, "Failed to load cache stats"),
        }
    }

    fn apply_stats(&mut self, dashboard: DashboardView, keys: Option<KeysView>) {
        self.surface.render_dashboard(&dashboard);
        self.state.dashboard = Some(dashboard);
        if let Some(keys) = keys {
            self.surface.render_keys(&keys);
            self.state.keys = Some(keys);
        }
    }

    async fn load_keys(&mut self) {
        match self.api.fetch_keys().await {
            Ok(entries) => {
                let view = reconcile::keys_view(&entries, &self.state.key_filter);
                self.surface.render_keys(&view);
                self.state.keys = Some(view);
            }
            Err(err) => error!(error = %err, "Failed to load cache keys"),
        }
    }

    async fn load_miss_urls(&mut self) {
        match self.api.fetch_miss_urls().await {
            Ok(entries) => {
                let view = reconcile::miss_urls_view(&entries, &self.state.miss_url_filter);
                self.surface.render_miss_urls(&view);
                self.state.miss_urls = Some(view);
            }
            Err(err) => error!(error = %err, "Failed to load missed urls"),
        }
    }

    async fn open_detail(&mut self, key: String) {
        match self.api.fetch_item(&key).await {
            Ok(detail) => {
                let view = reconcile::detail_view(&key, &detail);
                self.state.selected_key = Some(key);
                self.surface.show_detail(&view);
            }
            Err(ApiError::NotFound) => {
                // The key vanished between listing and inspection; this is a
                // user-visible outcome, not a log line.
                self.surface
                    .show_notice(&format!("cache key `{key}` no longer exists"));
            }
            Err(err) => {
                error!(error = %err, key = %key, "Failed to fetch cache item detail");
                self.surface.show_notice("failed to fetch cache item detail");
            }
        }
    }

    async fn flush(&mut self, prefix: String) {
        let control = if prefix.is_empty() {
            ControlId::FlushAll
        } else {
            ControlId::FlushPrefix
        };
        if self.controls.is_busy(control) {
            return;
        }

        self.set_busy(control, true);
        let progress = if prefix.is_empty() {
            "flushing the entire cache...".to_string()
        } else {
            format!("flushing entries under `{prefix}`...")
        };
        self.show_banner(Banner::info(progress));

        let result = self.api.flush(&prefix).await;
        self.set_busy(control, false);

        match result {
            Ok(outcome) => {
                self.show_banner(Banner::success(format!(
                    "flushed {} cache entries",
                    outcome.count
                )));
                self.scheduler.after_mutation(self.state.section);
                self.run_pending_refreshes().await;
            }
            Err(err) => {
                error!(error = %err, prefix = %prefix, "Flush failed");
                self.show_banner(Banner::error(format!("flush failed: {err}")));
            }
        }
    }

    async fn delete(&mut self, key: String, from_detail: bool) {
        if from_detail {
            if self.controls.is_busy(ControlId::DeleteSelected) {
                return;
            }
            self.set_busy(ControlId::DeleteSelected, true);
        }

        let result = self.api.delete_item(&key).await;

        if from_detail {
            self.set_busy(ControlId::DeleteSelected, false);
        }

        match result {
            Ok(()) => {
                self.show_banner(Banner::success(format!("deleted `{key}` from the cache")));
                if self.state.selected_key.as_deref() == Some(key.as_str()) {
                    self.state.selected_key = None;
                    self.surface.close_detail();
                }
                self.scheduler.after_mutation(self.state.section);
                self.run_pending_refreshes().await;
            }
            Err(err) => {
                error!(error = %err, key = %key, "Delete failed");
                self.show_banner(Banner::error(format!("delete failed: {err}")));
            }
        }
    }

    fn set_busy(&mut self, id: ControlId, busy: bool) {
        self.controls.set_busy(id, busy);
        self.surface.control_changed(id, self.controls.label(id), busy);
    }

    fn show_banner(&mut self, banner: Banner) {
        self.surface.show_banner(&banner);
        self.state.banner = Some(banner);
    }
}
