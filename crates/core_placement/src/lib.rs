//! winmax Core
//!
//! Platform-agnostic pieces of the maximize/restore toggle.
//!
//! This crate holds:
//! - Geometry types shared with the platform layer (`Rect`, `Monitor`)
//! - The per-invocation window snapshot and its placement state
//! - The persisted `WindowState` record
//! - The placement classifier (maximized? which monitor owns the window?)
//! - The `GeometryProvider` trait the platform layer implements

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a window.
/// On Windows, this is the HWND cast to u64.
pub type WindowId = u64;

/// Errors that can occur while resolving the target monitor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("No monitors attached")]
    NoMonitors,

    #[error("Monitor index {0} is out of bounds (count: {1})")]
    IndexOutOfBounds(usize, usize),
}

/// A rectangle in virtual-desktop coordinates (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from left/top/right/bottom edges.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Center point of the rectangle, rounded towards the top-left.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Half-open containment test: left/top edges are inside, right/bottom are not.
    ///
    /// Adjacent monitors share an edge, so the half-open form keeps a point on
    /// the seam owned by exactly one of them.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at {},{}", self.width, self.height, self.x, self.y)
    }
}

/// A display attached to the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    /// Device name (e.g. `\\.\DISPLAY1`). Stable identity for persisted references.
    pub id: String,
    /// Full monitor rectangle.
    pub bounds: Rect,
    /// Usable rectangle excluding the taskbar and other reserved regions.
    pub work_area: Rect,
    /// Whether this is the primary monitor.
    pub is_primary: bool,
}

/// OS-tracked display mode of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// Live view of a window taken at the start of an invocation.
///
/// `placement` and `rect` come from separate OS queries and may disagree
/// transiently (a maximized window can still report a stale rectangle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub window_id: WindowId,
    pub rect: Rect,
    pub placement: PlacementState,
    pub process_id: u32,
}

/// Pre-maximize geometry saved for one window, keyed by process id.
///
/// Keys are camelCase on disk. The PascalCase aliases accept records written
/// by the earlier WindowMaximizer tool, which had no `monitorId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    #[serde(alias = "X")]
    pub x: i32,
    #[serde(alias = "Y")]
    pub y: i32,
    #[serde(alias = "Width")]
    pub width: i32,
    #[serde(alias = "Height")]
    pub height: i32,
    #[serde(alias = "ProcessId")]
    pub process_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "MonitorId")]
    pub monitor_id: Option<String>,
}

impl WindowState {
    /// Capture the restorable geometry of a snapshot.
    pub fn capture(snapshot: &WindowSnapshot, monitor_id: Option<String>) -> Self {
        Self {
            x: snapshot.rect.x,
            y: snapshot.rect.y,
            width: snapshot.rect.width,
            height: snapshot.rect.height,
            process_id: snapshot.process_id,
            monitor_id,
        }
    }

    /// The saved bounds as a rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Result of classifying a window against the monitor layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub is_maximized: bool,
    /// `None` only when the monitor list is empty.
    pub owning_monitor: Option<&'a Monitor>,
    pub is_on_target_monitor: bool,
}

/// Find the monitor that owns a window rectangle.
///
/// The owner is the first monitor (in list order) whose bounds contain the
/// rectangle's center. If none does, the primary monitor is used, and if no
/// monitor is flagged primary, the first one.
pub fn owning_monitor<'a>(rect: &Rect, monitors: &'a [Monitor]) -> Option<&'a Monitor> {
    let (cx, cy) = rect.center();
    monitors
        .iter()
        .find(|m| m.bounds.contains_point(cx, cy))
        .or_else(|| primary_monitor(monitors))
}

/// The primary monitor, or the first monitor when none is flagged primary.
pub fn primary_monitor(monitors: &[Monitor]) -> Option<&Monitor> {
    monitors.iter().find(|m| m.is_primary).or_else(|| monitors.first())
}

/// Classify a window snapshot against the monitor list and the target monitor.
///
/// Pure: no OS calls, no side effects.
pub fn classify<'a>(
    snapshot: &WindowSnapshot,
    monitors: &'a [Monitor],
    target: &Monitor,
) -> Classification<'a> {
    let owning = owning_monitor(&snapshot.rect, monitors);
    Classification {
        is_maximized: snapshot.placement == PlacementState::Maximized,
        owning_monitor: owning,
        is_on_target_monitor: owning.is_some_and(|m| m.id == target.id),
    }
}

/// Parse the monitor selector given on the command line.
///
/// Anything that is not a non-negative integer selects the primary monitor.
pub fn parse_monitor_index(arg: Option<&str>, monitors: &[Monitor]) -> Result<usize, TargetError> {
    if monitors.is_empty() {
        return Err(TargetError::NoMonitors);
    }

    let index = arg
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or_else(|| monitors.iter().position(|m| m.is_primary).unwrap_or(0));

    if index >= monitors.len() {
        return Err(TargetError::IndexOutOfBounds(index, monitors.len()));
    }
    Ok(index)
}

/// Contract between the toggle logic and the OS windowing API.
///
/// Setters are best-effort: callers log their failures and carry on.
pub trait GeometryProvider {
    type Error: std::error::Error;

    /// The window holding input focus, if any.
    fn foreground_window(&self) -> Option<WindowId>;

    /// Current placement, rectangle and owning process of a window.
    fn window_snapshot(&self, window: WindowId) -> Result<WindowSnapshot, Self::Error>;

    /// Attached monitors, in a stable order for the life of the process.
    fn list_monitors(&self) -> Result<Vec<Monitor>, Self::Error>;

    /// Move and resize a window.
    fn set_window_bounds(&self, window: WindowId, rect: Rect) -> Result<(), Self::Error>;

    /// Move a window's origin, keeping its size.
    fn move_window(&self, window: WindowId, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Switch the window between normal, minimized and maximized.
    fn set_placement_state(
        &self,
        window: WindowId,
        state: PlacementState,
    ) -> Result<(), Self::Error>;

    /// Executable name of a process, for diagnostics.
    fn process_name(&self, _process_id: u32) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(id: &str, bounds: Rect, primary: bool) -> Monitor {
        Monitor {
            id: id.to_string(),
            bounds,
            work_area: Rect::new(bounds.x, bounds.y, bounds.width, bounds.height - 40),
            is_primary: primary,
        }
    }

    fn two_monitors() -> Vec<Monitor> {
        vec![
            monitor(r"\\.\DISPLAY1", Rect::new(0, 0, 1920, 1080), true),
            monitor(r"\\.\DISPLAY2", Rect::new(1920, 0, 2560, 1440), false),
        ]
    }

    fn snapshot(rect: Rect, placement: PlacementState) -> WindowSnapshot {
        WindowSnapshot {
            window_id: 0x1234,
            rect,
            placement,
            process_id: 42,
        }
    }

    #[test]
    fn test_rect_center() {
        assert_eq!(Rect::new(100, 100, 800, 600).center(), (500, 400));
        assert_eq!(Rect::new(-10, -10, 5, 5).center(), (-8, -8));
    }

    #[test]
    fn test_rect_from_edges() {
        let rect = Rect::from_edges(10, 20, 110, 220);
        assert_eq!(rect, Rect::new(10, 20, 100, 200));
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
    }

    #[test]
    fn test_contains_point_is_half_open() {
        let rect = Rect::new(0, 0, 1920, 1080);
        assert!(rect.contains_point(0, 0));
        assert!(rect.contains_point(1919, 1079));
        assert!(!rect.contains_point(1920, 500));
        assert!(!rect.contains_point(500, 1080));
        assert!(!rect.contains_point(-1, 0));
    }

    #[test]
    fn test_owning_monitor_by_center() {
        let monitors = two_monitors();
        let on_second = Rect::new(2000, 100, 800, 600);
        assert_eq!(owning_monitor(&on_second, &monitors).unwrap().id, r"\\.\DISPLAY2");

        // Straddles the seam but the center is still on the first monitor
        let straddling = Rect::new(1500, 100, 800, 600);
        assert_eq!(owning_monitor(&straddling, &monitors).unwrap().id, r"\\.\DISPLAY1");
    }

    #[test]
    fn test_owning_monitor_on_seam_is_unique() {
        let monitors = two_monitors();
        // Center lands exactly on x = 1920, owned by the right-hand monitor only
        let rect = Rect::new(1820, 100, 200, 200);
        assert_eq!(owning_monitor(&rect, &monitors).unwrap().id, r"\\.\DISPLAY2");
    }

    #[test]
    fn test_owning_monitor_falls_back_to_primary() {
        let mut monitors = two_monitors();
        monitors.swap(0, 1);
        // Minimized windows report a far off-screen rectangle
        let offscreen = Rect::new(-32000, -32000, 160, 28);
        assert_eq!(owning_monitor(&offscreen, &monitors).unwrap().id, r"\\.\DISPLAY1");
    }

    #[test]
    fn test_owning_monitor_without_primary_uses_first() {
        let monitors = vec![
            monitor("A", Rect::new(0, 0, 100, 100), false),
            monitor("B", Rect::new(100, 0, 100, 100), false),
        ];
        let offscreen = Rect::new(5000, 5000, 10, 10);
        assert_eq!(owning_monitor(&offscreen, &monitors).unwrap().id, "A");
        assert!(owning_monitor(&offscreen, &[]).is_none());
    }

    #[test]
    fn test_owning_monitor_overlap_prefers_list_order() {
        // Mirrored displays report identical bounds
        let monitors = vec![
            monitor("A", Rect::new(0, 0, 1920, 1080), false),
            monitor("B", Rect::new(0, 0, 1920, 1080), true),
        ];
        let rect = Rect::new(100, 100, 800, 600);
        for _ in 0..3 {
            assert_eq!(owning_monitor(&rect, &monitors).unwrap().id, "A");
        }
    }

    #[test]
    fn test_classify_maximized_on_target() {
        let monitors = two_monitors();
        let snap = snapshot(Rect::new(-8, -8, 1936, 1056), PlacementState::Maximized);
        let c = classify(&snap, &monitors, &monitors[0]);
        assert!(c.is_maximized);
        assert!(c.is_on_target_monitor);
        assert_eq!(c.owning_monitor.unwrap().id, r"\\.\DISPLAY1");
    }

    #[test]
    fn test_classify_maximized_on_other_monitor() {
        let monitors = two_monitors();
        let snap = snapshot(Rect::new(1912, -8, 2576, 1416), PlacementState::Maximized);
        let c = classify(&snap, &monitors, &monitors[0]);
        assert!(c.is_maximized);
        assert!(!c.is_on_target_monitor);
    }

    #[test]
    fn test_classify_minimized_is_not_maximized() {
        let monitors = two_monitors();
        let snap = snapshot(Rect::new(-32000, -32000, 160, 28), PlacementState::Minimized);
        let c = classify(&snap, &monitors, &monitors[0]);
        assert!(!c.is_maximized);
        assert!(c.is_on_target_monitor);
    }

    #[test]
    fn test_classify_empty_monitor_list() {
        let target = monitor("A", Rect::new(0, 0, 100, 100), true);
        let snap = snapshot(Rect::new(0, 0, 10, 10), PlacementState::Normal);
        let c = classify(&snap, &[], &target);
        assert!(c.owning_monitor.is_none());
        assert!(!c.is_on_target_monitor);
    }

    #[test]
    fn test_parse_monitor_index() {
        let monitors = two_monitors();
        assert_eq!(parse_monitor_index(Some("1"), &monitors), Ok(1));
        assert_eq!(parse_monitor_index(Some(" 0 "), &monitors), Ok(0));
        assert_eq!(parse_monitor_index(None, &monitors), Ok(0));
        assert_eq!(parse_monitor_index(Some("abc"), &monitors), Ok(0));
        assert_eq!(parse_monitor_index(Some("-1"), &monitors), Ok(0));
        assert_eq!(
            parse_monitor_index(Some("2"), &monitors),
            Err(TargetError::IndexOutOfBounds(2, 2))
        );
        assert_eq!(parse_monitor_index(None, &[]), Err(TargetError::NoMonitors));
    }

    #[test]
    fn test_parse_monitor_index_defaults_to_primary_position() {
        let mut monitors = two_monitors();
        monitors.swap(0, 1);
        assert_eq!(parse_monitor_index(None, &monitors), Ok(1));
    }

    #[test]
    fn test_window_state_json_keys() {
        let state = WindowState {
            x: 100,
            y: 100,
            width: 800,
            height: 600,
            process_id: 42,
            monitor_id: None,
        };
        let json = serde_json::to_string(&state).expect("serialize");
        assert_eq!(json, r#"{"x":100,"y":100,"width":800,"height":600,"processId":42}"#);
    }

    #[test]
    fn test_window_state_accepts_legacy_record() {
        let json = r#"{"X":10,"Y":20,"Width":300,"Height":400,"ProcessId":7}"#;
        let state: WindowState = serde_json::from_str(json).expect("deserialize");
        assert_eq!(state.rect(), Rect::new(10, 20, 300, 400));
        assert_eq!(state.process_id, 7);
        assert!(state.monitor_id.is_none());
    }

    #[test]
    fn test_window_state_capture() {
        let snap = snapshot(Rect::new(100, 100, 800, 600), PlacementState::Normal);
        let state = WindowState::capture(&snap, Some("M".to_string()));
        assert_eq!(state.rect(), snap.rect);
        assert_eq!(state.process_id, 42);
        assert_eq!(state.monitor_id.as_deref(), Some("M"));
    }
}
