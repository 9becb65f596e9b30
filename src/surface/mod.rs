//! The render contract between the orchestration layer and whatever draws
//! the console.
//!
//! Reconcilers produce complete view structs; a [`Surface`] only projects
//! them. Keeping this boundary a trait lets tests drive the console against
//! a recording fake instead of a terminal.

use crate::console::controls::ControlId;
use crate::console::reconcile::{DashboardView, DetailView, KeysView, MissUrlsView};
use crate::console::state::{Banner, BannerKind, Section};

pub trait Surface {
    fn section_changed(&mut self, section: Section);
    fn render_dashboard(&mut self, view: &DashboardView);
    fn render_keys(&mut self, view: &KeysView);
    fn render_miss_urls(&mut self, view: &MissUrlsView);
    fn show_detail(&mut self, view: &DetailView);
    fn close_detail(&mut self);
    fn show_banner(&mut self, banner: &Banner);
    fn show_notice(&mut self, text: &str);
    fn control_changed(&mut self, id: ControlId, label: &str, busy: bool);
}

/// Plain-text projection onto stdout.
#[derive(Debug, Default)]
pub struct TermSurface;

impl TermSurface {
    pub fn new() -> Self {
        Self
    }
}

fn banner_tag(kind: BannerKind) -> &'static str {
    match kind {
        BannerKind::Info => "info",
        BannerKind::Success => "ok",
        BannerKind::Warning => "warn",
        BannerKind::Error => "error",
    }
}

impl Surface for TermSurface {
    fn section_changed(&mut self, section: Section) {
        println!("-- {} --", section.title());
    }

    fn render_dashboard(&mut self, view: &DashboardView) {
        println!("== cache dashboard ==");
        println!("{:<22} {}", "total requests", view.total_requests);
        println!("{:<22} {}", "memory hits", view.memory_hits);
        println!("{:<22} {}", "redis hits", view.redis_hits);
        println!("{:<22} {}", "misses", view.misses);
        println!("{:<22} {}%", "hit ratio", view.hit_ratio);
        println!(
            "{:<22} {} MB / {} MB",
            "memory usage", view.memory_usage_mb, view.memory_capacity_mb
        );
        println!(
            "{:<22} {}",
            "redis memory",
            view.redis_used_memory_mb
                .as_deref()
                .map(|mb| format!("{mb} MB"))
                .unwrap_or_else(|| "N/A".to_string())
        );
        println!(
            "hit share: memory {} | redis {} | miss {}",
            view.hit_share.memory_hits, view.hit_share.redis_hits, view.hit_share.misses
        );
        println!(
            "usage: memory {:.2} MB | redis {:.2} MB",
            view.usage_bars.memory_mb, view.usage_bars.redis_mb
        );
    }

    fn render_keys(&mut self, view: &KeysView) {
        println!("== cached keys ==");
        if let Some(placeholder) = view.placeholder {
            println!("  ({placeholder})");
            return;
        }
        for row in view.rows.iter().filter(|row| row.visible) {
            println!("  {:<48} {}", row.key, row.stored_at);
        }
    }

    fn render_miss_urls(&mut self, view: &MissUrlsView) {
        println!("== missed urls ==");
        if let Some(placeholder) = view.placeholder {
            println!("  ({placeholder})");
            return;
        }
        for row in view.rows.iter().filter(|row| row.visible) {
            println!(
                "  {:<48} {:>6}  first {}  last {}",
                row.url, row.count, row.first_seen, row.last_seen
            );
        }
    }

    fn show_detail(&mut self, view: &DetailView) {
        println!("== entry `{}` ==", view.key);
        println!("metadata:\n{}", view.metadata);
        println!("value:\n{}", view.value);
    }

    fn close_detail(&mut self) {
        println!("(detail closed)");
    }

    fn show_banner(&mut self, banner: &Banner) {
        println!("[{}] {}", banner_tag(banner.kind), banner.text);
    }

    fn show_notice(&mut self, text: &str) {
        println!("{text}");
    }

    fn control_changed(&mut self, _id: ControlId, label: &str, busy: bool) {
        if busy {
            println!("[busy] {label}");
        }
    }
}
