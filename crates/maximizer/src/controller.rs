//! Toggle controller.
//!
//! Decides, for the focused window, between maximizing it onto the target
//! monitor and restoring it to the geometry saved before the last maximize.
//!
//! Decision order (first match wins):
//! 1. Maximized on another monitor: restore, re-read geometry, then maximize
//!    onto the target. Geometry read while maximized elsewhere is unreliable.
//! 2. Not maximized, or not on the target: save geometry, move to the target
//!    work area origin and maximize.
//! 3. Maximized on the target with a saved record: restore to the saved bounds
//!    and delete the record.
//! 4. Maximized on the target without a record: plain OS restore.
//!
//! OS setter failures are logged and never change the decision.

use crate::store::StateStore;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use winmax_core::{
    classify, owning_monitor, parse_monitor_index, GeometryProvider, Monitor, PlacementState,
    Rect, TargetError, WindowId, WindowSnapshot, WindowState,
};

/// Errors that end a toggle before any window is changed.
#[derive(Debug, Error)]
pub enum ToggleError {
    #[error("Failed to read window {window:#x}: {reason}")]
    Snapshot { window: WindowId, reason: String },
}

/// Why a restore did not use saved geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlainRestoreReason {
    /// No record exists for the process.
    NoSavedState,
    /// The record belongs to another process; it is left in place.
    ProcessMismatch,
    /// The record names a monitor that is no longer attached; it is deleted.
    MonitorDetached,
}

/// The action a toggle performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Geometry was saved and the window maximized onto the target.
    /// `relocated` is set when it was first restored off another monitor.
    Maximized { saved: WindowState, relocated: bool },
    /// The window was restored to its saved bounds and the record deleted.
    RestoredFromState { state: WindowState },
    /// The window was restored without explicit geometry.
    PlainRestore { reason: PlainRestoreReason },
}

/// Result of one invocation, including the silent no-op paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The monitor selector did not name an attached monitor.
    InvalidMonitor(TargetError),
    /// No window has input focus.
    NoForegroundWindow,
    /// The focused window could not be read.
    WindowUnavailable,
    Toggled(ToggleOutcome),
}

/// Drives the maximize/restore toggle against a geometry provider.
pub struct ToggleController<P> {
    provider: P,
    store: StateStore,
}

impl<P: GeometryProvider> ToggleController<P> {
    pub fn new(provider: P, store: StateStore) -> Self {
        Self { provider, store }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Run one invocation: resolve the target, wait for the window to settle,
    /// then toggle the foreground window.
    ///
    /// Only a monitor enumeration failure is returned as an error. An invalid
    /// selector returns before any window is queried.
    pub fn run(&self, monitor_arg: Option<&str>, settle_delay: Duration) -> Result<RunOutcome, P::Error> {
        let monitors = self.provider.list_monitors()?;

        let target = match parse_monitor_index(monitor_arg, &monitors) {
            Ok(index) => &monitors[index],
            Err(e) => {
                debug!("Nothing to do: {}", e);
                return Ok(RunOutcome::InvalidMonitor(e));
            }
        };

        if !settle_delay.is_zero() {
            std::thread::sleep(settle_delay);
        }

        let Some(window) = self.provider.foreground_window() else {
            debug!("Nothing to do: no foreground window");
            return Ok(RunOutcome::NoForegroundWindow);
        };

        match self.toggle(window, target, &monitors) {
            Ok(outcome) => Ok(RunOutcome::Toggled(outcome)),
            Err(e) => {
                warn!("{}", e);
                Ok(RunOutcome::WindowUnavailable)
            }
        }
    }

    /// Toggle `window` with respect to `target`.
    pub fn toggle(
        &self,
        window: WindowId,
        target: &Monitor,
        monitors: &[Monitor],
    ) -> Result<ToggleOutcome, ToggleError> {
        let snapshot = self.snapshot(window)?;
        let placement = classify(&snapshot, monitors, target);

        info!(
            "Toggling window {:#x} (pid {}, {}): {:?} {} on {}, target {}",
            window,
            snapshot.process_id,
            self.provider
                .process_name(snapshot.process_id)
                .unwrap_or_else(|| "unknown".to_string()),
            snapshot.placement,
            snapshot.rect,
            placement.owning_monitor.map_or("no monitor", |m| m.id.as_str()),
            target.id
        );

        let snapshot = if snapshot.placement == PlacementState::Minimized {
            // A minimized window reports its off-screen icon position. Restoring
            // may bring it back maximized, so the fresh snapshot is classified again.
            self.apply_placement(window, PlacementState::Normal);
            self.snapshot(window)?
        } else {
            snapshot
        };

        self.decide(&snapshot, target, monitors)
    }

    fn decide(
        &self,
        snapshot: &WindowSnapshot,
        target: &Monitor,
        monitors: &[Monitor],
    ) -> Result<ToggleOutcome, ToggleError> {
        let window = snapshot.window_id;
        let placement = classify(snapshot, monitors, target);

        if placement.is_maximized && !placement.is_on_target_monitor {
            info!("Maximized on another monitor; restoring before moving to {}", target.id);
            self.apply_placement(window, PlacementState::Normal);
            let restored = self.snapshot(window)?;
            return Ok(self.maximize(&restored, target, monitors, true));
        }

        if !placement.is_maximized || !placement.is_on_target_monitor {
            return Ok(self.maximize(snapshot, target, monitors, false));
        }

        Ok(self.restore(snapshot, monitors))
    }

    fn snapshot(&self, window: WindowId) -> Result<WindowSnapshot, ToggleError> {
        self.provider
            .window_snapshot(window)
            .map_err(|e| ToggleError::Snapshot {
                window,
                reason: e.to_string(),
            })
    }

    fn maximize(
        &self,
        snapshot: &WindowSnapshot,
        target: &Monitor,
        monitors: &[Monitor],
        relocated: bool,
    ) -> ToggleOutcome {
        let window = snapshot.window_id;
        let owner = owning_monitor(&snapshot.rect, monitors).map(|m| m.id.clone());
        let saved = WindowState::capture(snapshot, owner);

        // Without a record the next toggle falls back to a plain restore.
        if let Err(e) = self.store.save(snapshot.process_id, &saved) {
            warn!("Failed to save window state for pid {}: {}", snapshot.process_id, e);
        }

        let origin = target.work_area;
        if let Err(e) = self.provider.move_window(window, origin.x, origin.y) {
            warn!("Failed to move window {:#x} to {}: {}", window, target.id, e);
        }
        self.apply_placement(window, PlacementState::Maximized);

        info!("Maximized window {:#x} onto {} (saved {})", window, target.id, saved.rect());
        ToggleOutcome::Maximized { saved, relocated }
    }

    fn restore(&self, snapshot: &WindowSnapshot, monitors: &[Monitor]) -> ToggleOutcome {
        let window = snapshot.window_id;
        let process_id = snapshot.process_id;

        let Some(state) = self.store.load(process_id) else {
            return self.plain_restore(window, PlainRestoreReason::NoSavedState);
        };

        if state.process_id != process_id {
            warn!(
                "Saved state for pid {} names pid {}; leaving it in place",
                process_id, state.process_id
            );
            return self.plain_restore(window, PlainRestoreReason::ProcessMismatch);
        }

        if let Some(monitor_id) = &state.monitor_id {
            if !monitors.iter().any(|m| &m.id == monitor_id) {
                warn!("Saved monitor {} is no longer attached; discarding saved bounds", monitor_id);
                self.store.delete(process_id);
                return self.plain_restore(window, PlainRestoreReason::MonitorDetached);
            }
        }

        self.apply_placement(window, PlacementState::Normal);
        self.apply_bounds(window, state.rect());
        self.store.delete(process_id);

        info!("Restored window {:#x} to {}", window, state.rect());
        ToggleOutcome::RestoredFromState { state }
    }

    fn plain_restore(&self, window: WindowId, reason: PlainRestoreReason) -> ToggleOutcome {
        self.apply_placement(window, PlacementState::Normal);
        info!("Restored window {:#x} ({:?})", window, reason);
        ToggleOutcome::PlainRestore { reason }
    }

    fn apply_placement(&self, window: WindowId, state: PlacementState) {
        if let Err(e) = self.provider.set_placement_state(window, state) {
            warn!("Failed to set window {:#x} to {:?}: {}", window, state, e);
        }
    }

    fn apply_bounds(&self, window: WindowId, rect: Rect) {
        if let Err(e) = self.provider.set_window_bounds(window, rect) {
            warn!("Failed to set window {:#x} bounds to {}: {}", window, rect, e);
        }
    }
}
