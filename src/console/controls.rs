//! Busy state for the console's action controls.
//!
//! Each control's label is captured once at construction; while an action is
//! in flight the control is disabled and shows a busy label, and completion
//! restores the original. A busy control also blocks re-invocation.

use std::collections::HashMap;

const BUSY_LABEL: &str = "working...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    FlushPrefix,
    FlushAll,
    DeleteSelected,
}

#[derive(Debug)]
struct Control {
    label: &'static str,
    busy: bool,
}

#[derive(Debug)]
pub struct ControlPanel {
    controls: HashMap<ControlId, Control>,
}

impl ControlPanel {
    pub fn new() -> Self {
        let mut controls = HashMap::new();
        controls.insert(
            ControlId::FlushPrefix,
            Control {
                label: "flush prefix",
                busy: false,
            },
        );
        controls.insert(
            ControlId::FlushAll,
            Control {
                label: "flush all",
                busy: false,
            },
        );
        controls.insert(
            ControlId::DeleteSelected,
            Control {
                label: "delete",
                busy: false,
            },
        );
        Self { controls }
    }

    pub fn set_busy(&mut self, id: ControlId, busy: bool) {
        if let Some(control) = self.controls.get_mut(&id) {
            control.busy = busy;
        }
    }

    pub fn is_busy(&self, id: ControlId) -> bool {
        self.controls.get(&id).is_some_and(|control| control.busy)
    }

    /// The label to display: the busy indicator while in flight, otherwise
    /// the label captured at construction.
    pub fn label(&self, id: ControlId) -> &'static str {
        match self.controls.get(&id) {
            Some(control) if control.busy => BUSY_LABEL,
            Some(control) => control.label,
            None => "",
        }
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_swaps_the_label_and_back() {
        let mut panel = ControlPanel::new();
        assert_eq!(panel.label(ControlId::FlushPrefix), "flush prefix");

        panel.set_busy(ControlId::FlushPrefix, true);
        assert!(panel.is_busy(ControlId::FlushPrefix));
        assert_eq!(panel.label(ControlId::FlushPrefix), BUSY_LABEL);

        panel.set_busy(ControlId::FlushPrefix, false);
        assert!(!panel.is_busy(ControlId::FlushPrefix));
        assert_eq!(panel.label(ControlId::FlushPrefix), "flush prefix");
    }

    #[test]
    fn controls_are_independent() {
        let mut panel = ControlPanel::new();
        panel.set_busy(ControlId::FlushAll, true);

        assert!(panel.is_busy(ControlId::FlushAll));
        assert!(!panel.is_busy(ControlId::FlushPrefix));
        assert!(!panel.is_busy(ControlId::DeleteSelected));
    }
}
