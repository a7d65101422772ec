//! Win32 implementation of the geometry provider.

use crate::{executable_name, wide_to_string, Win32Error};
use std::ffi::c_void;
use windows::core::PWSTR;
use windows::Win32::Foundation::{CloseHandle, BOOL, HWND, LPARAM, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOEXW,
};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowPlacement, GetWindowRect, GetWindowThreadProcessId,
    SetWindowPos, ShowWindow, SWP_NOSIZE, SWP_NOZORDER, SWP_SHOWWINDOW, SW_MAXIMIZE,
    SW_MINIMIZE, SW_RESTORE, SW_SHOWMAXIMIZED, SW_SHOWMINIMIZED, WINDOWPLACEMENT,
};
use winmax_core::{GeometryProvider, Monitor, PlacementState, Rect, WindowId, WindowSnapshot};

/// `dwFlags` bit marking the primary monitor in MONITORINFO.
const MONITORINFOF_PRIMARY: u32 = 1;

fn to_hwnd(window: WindowId) -> HWND {
    HWND(window as usize as *mut c_void)
}

fn from_hwnd(hwnd: HWND) -> WindowId {
    hwnd.0 as usize as u64
}

fn rect_from_win32(rect: &RECT) -> Rect {
    Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom)
}

/// Request per-monitor (v2) DPI awareness for this process.
///
/// Must run before any geometry query so rectangles on every monitor are
/// reported in physical pixels. Returns `false` if the context was already
/// set (e.g. by a manifest).
pub fn set_dpi_awareness() -> bool {
    unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2).is_ok() }
}

/// Geometry provider backed by user32/gdi32.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Geometry;

impl Win32Geometry {
    pub fn new() -> Self {
        Self
    }

    fn placement_state(hwnd: HWND) -> Result<PlacementState, Win32Error> {
        let mut placement = WINDOWPLACEMENT {
            length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
            ..Default::default()
        };
        unsafe { GetWindowPlacement(hwnd, &mut placement) }
            .map_err(|e| Win32Error::call("GetWindowPlacement", e))?;

        Ok(match placement.showCmd {
            cmd if cmd == SW_SHOWMAXIMIZED.0 as u32 => PlacementState::Maximized,
            cmd if cmd == SW_SHOWMINIMIZED.0 as u32 => PlacementState::Minimized,
            _ => PlacementState::Normal,
        })
    }
}

impl GeometryProvider for Win32Geometry {
    type Error = Win32Error;

    fn foreground_window(&self) -> Option<WindowId> {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.0.is_null() {
            None
        } else {
            Some(from_hwnd(hwnd))
        }
    }

    fn window_snapshot(&self, window: WindowId) -> Result<WindowSnapshot, Win32Error> {
        let hwnd = to_hwnd(window);

        let mut process_id = 0u32;
        let thread_id = unsafe { GetWindowThreadProcessId(hwnd, Some(&mut process_id as *mut u32)) };
        if thread_id == 0 {
            return Err(Win32Error::WindowNotFound(window));
        }

        let placement = Self::placement_state(hwnd)?;

        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd, &mut rect) }
            .map_err(|e| Win32Error::call("GetWindowRect", e))?;

        Ok(WindowSnapshot {
            window_id: window,
            rect: rect_from_win32(&rect),
            placement,
            process_id,
        })
    }

    fn list_monitors(&self) -> Result<Vec<Monitor>, Win32Error> {
        let mut monitors: Vec<Monitor> = Vec::new();
        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(enum_monitor_proc),
                LPARAM(&mut monitors as *mut Vec<Monitor> as isize),
            )
        };
        if !ok.as_bool() {
            return Err(Win32Error::EnumerationFailed(
                windows::core::Error::from_win32().to_string(),
            ));
        }
        Ok(monitors)
    }

    fn set_window_bounds(&self, window: WindowId, rect: Rect) -> Result<(), Win32Error> {
        unsafe {
            SetWindowPos(
                to_hwnd(window),
                None,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOZORDER | SWP_SHOWWINDOW,
            )
        }
        .map_err(|e| Win32Error::call("SetWindowPos", e))
    }

    fn move_window(&self, window: WindowId, x: i32, y: i32) -> Result<(), Win32Error> {
        unsafe { SetWindowPos(to_hwnd(window), None, x, y, 0, 0, SWP_NOSIZE | SWP_NOZORDER) }
            .map_err(|e| Win32Error::call("SetWindowPos", e))
    }

    fn set_placement_state(&self, window: WindowId, state: PlacementState) -> Result<(), Win32Error> {
        let cmd = match state {
            PlacementState::Normal => SW_RESTORE,
            PlacementState::Minimized => SW_MINIMIZE,
            PlacementState::Maximized => SW_MAXIMIZE,
        };
        // The return value is the previous visibility, not a success flag.
        let _ = unsafe { ShowWindow(to_hwnd(window), cmd) };
        Ok(())
    }

    fn process_name(&self, process_id: u32) -> Option<String> {
        let handle =
            unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id) }.ok()?;

        let mut buf = [0u16; 1024];
        let mut len = buf.len() as u32;
        let result = unsafe {
            QueryFullProcessImageNameW(handle, PROCESS_NAME_WIN32, PWSTR(buf.as_mut_ptr()), &mut len)
        };
        let _ = unsafe { CloseHandle(handle) };

        if let Err(e) = result {
            tracing::debug!("QueryFullProcessImageNameW failed for pid {}: {}", process_id, e);
            return None;
        }
        let path = wide_to_string(&buf[..len as usize]);
        Some(executable_name(&path).to_string())
    }
}

/// EnumDisplayMonitors callback collecting into the `Vec<Monitor>` behind `lparam`.
///
/// A monitor whose info cannot be read is skipped; enumeration continues.
unsafe extern "system" fn enum_monitor_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let monitors = unsafe { &mut *(lparam.0 as *mut Vec<Monitor>) };

    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;
    let ok = unsafe { GetMonitorInfoW(hmonitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO) };
    if !ok.as_bool() {
        tracing::warn!("GetMonitorInfoW failed for monitor {:?}; skipping", hmonitor);
        return TRUE;
    }

    monitors.push(Monitor {
        id: wide_to_string(&info.szDevice),
        bounds: rect_from_win32(&info.monitorInfo.rcMonitor),
        work_area: rect_from_win32(&info.monitorInfo.rcWork),
        is_primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
    });

    TRUE
}
