//! Refresh scheduling: collects per-resource refresh requests from the
//! periodic timer, manual refreshes and completed mutations, deduplicated so
//! one loop turn fetches each resource at most once.

use std::collections::BTreeSet;

use super::state::{Resource, Section};

#[derive(Debug, Default)]
pub struct RefreshScheduler {
    pending: BTreeSet<Resource>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one resource for refresh. Requesting an already-pending
    /// resource is a no-op.
    pub fn request(&mut self, resource: Resource) {
        self.pending.insert(resource);
    }

    /// The periodic timer refreshes the stats regardless of the active
    /// section, so the headline numbers stay current for a later switch back.
    pub fn on_tick(&mut self) {
        self.request(Resource::Stats);
    }

    /// A manual refresh targets the active section's resource.
    pub fn on_manual_refresh(&mut self, active: Section) {
        self.request(active.resource());
    }

    /// After a successful mutation: stats always, the key list only when the
    /// operator is looking at it.
    pub fn after_mutation(&mut self, active: Section) {
        self.request(Resource::Stats);
        if active == Section::Keys {
            self.request(Resource::Keys);
        }
    }

    /// Take everything pending, in a stable order.
    pub fn drain(&mut self) -> Vec<Resource> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_requests_coalesce() {
        let mut scheduler = RefreshScheduler::new();
        scheduler.on_tick();
        scheduler.on_manual_refresh(Section::Dashboard);
        scheduler.request(Resource::Stats);

        assert_eq!(scheduler.drain(), vec![Resource::Stats]);
        assert!(scheduler.drain().is_empty());
    }

    #[test]
    fn mutation_refreshes_stats_and_visible_keys() {
        let mut scheduler = RefreshScheduler::new();
        scheduler.after_mutation(Section::Keys);
        assert_eq!(scheduler.drain(), vec![Resource::Stats, Resource::Keys]);

        scheduler.after_mutation(Section::Dashboard);
        assert_eq!(scheduler.drain(), vec![Resource::Stats]);

        scheduler.after_mutation(Section::MissUrls);
        assert_eq!(scheduler.drain(), vec![Resource::Stats]);
    }

    #[test]
    fn manual_refresh_targets_the_active_section() {
        let mut scheduler = RefreshScheduler::new();
        scheduler.on_manual_refresh(Section::MissUrls);
        assert_eq!(scheduler.drain(), vec![Resource::MissUrls]);
    }
}
