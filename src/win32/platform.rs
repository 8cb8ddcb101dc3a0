//! [`DisplayPlatform`] implementation backed by Win32.
//!
//! Uses `EnumDisplayMonitors`, `MonitorFromPoint`, `GetMonitorInfoW`,
//! `GetCursorPos` and `SetCursorPos`.  All calls are made on demand; the
//! platform holds no state.

use crate::display::{DisplayHandle, DisplayMetadata};
use crate::geometry::{Point, Rect};
use crate::traits::DisplayPlatform;
use windows::core::BOOL;
use windows::Win32::Foundation::{LPARAM, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, MonitorFromPoint, HDC, HMONITOR, MONITORINFO,
    MONITOR_DEFAULTTONULL,
};
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

/// `MONITORINFO::dwFlags` bit for the primary display.
const MONITORINFOF_PRIMARY: u32 = 1;

/// Win32-backed display platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Platform;

/// Errors that can occur when calling into Win32.
#[derive(Debug, thiserror::Error)]
#[error("win32 error: {0}")]
pub struct Win32Error(String);

impl Win32Platform {
    pub fn new() -> Self {
        Self
    }
}

type DisplayCallback<'a> = &'a mut dyn FnMut(DisplayHandle, &Rect) -> bool;

impl From<RECT> for Rect {
    fn from(rc: RECT) -> Self {
        Rect::new(rc.left, rc.top, rc.right, rc.bottom)
    }
}

impl From<Point> for POINT {
    fn from(p: Point) -> Self {
        POINT { x: p.x, y: p.y }
    }
}

fn to_hmonitor(handle: DisplayHandle) -> HMONITOR {
    HMONITOR(handle.as_raw() as *mut core::ffi::c_void)
}

fn from_hmonitor(hmonitor: HMONITOR) -> DisplayHandle {
    DisplayHandle::from_raw(hmonitor.0 as isize)
}

/// `MONITORENUMPROC` trampoline.
///
/// `lparam` carries a pointer to the caller's [`DisplayCallback`].  The
/// `RECT` behind `rect` belongs to the OS and is converted to an owned
/// [`Rect`] before the callback sees it.
unsafe extern "system" fn enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    unsafe {
        let on_display = &mut *(lparam.0 as *mut DisplayCallback<'_>);
        let Some(rc) = rect.as_ref() else {
            return BOOL::from(true);
        };
        let bounds = Rect::from(*rc);
        BOOL::from(on_display(from_hmonitor(hmonitor), &bounds))
    }
}

impl DisplayPlatform for Win32Platform {
    type Error = Win32Error;

    fn enumerate_displays(
        &self,
        on_display: &mut dyn FnMut(DisplayHandle, &Rect) -> bool,
    ) -> Result<(), Self::Error> {
        let mut callback: DisplayCallback<'_> = on_display;
        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(enum_proc),
                LPARAM(&mut callback as *mut DisplayCallback<'_> as isize),
            )
        };
        if ok.as_bool() {
            Ok(())
        } else {
            Err(Win32Error("EnumDisplayMonitors failed".into()))
        }
    }

    fn cursor_position(&self) -> Result<Point, Self::Error> {
        let mut pt = POINT::default();
        unsafe { GetCursorPos(&mut pt) }.map_err(|e| Win32Error(format!("GetCursorPos: {}", e)))?;
        Ok(Point::new(pt.x, pt.y))
    }

    fn set_cursor_position(&self, point: Point) -> Result<(), Self::Error> {
        unsafe { SetCursorPos(point.x, point.y) }
            .map_err(|e| Win32Error(format!("SetCursorPos: {}", e)))
    }

    fn display_from_point(&self, point: Point) -> DisplayHandle {
        let hmonitor = unsafe { MonitorFromPoint(POINT::from(point), MONITOR_DEFAULTTONULL) };
        if hmonitor.is_invalid() {
            return DisplayHandle::NULL;
        }
        from_hmonitor(hmonitor)
    }

    fn display_metadata(&self, display: DisplayHandle) -> Result<DisplayMetadata, Self::Error> {
        if display.is_null() {
            return Err(Win32Error("no display".into()));
        }
        let mut mi = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        let ok = unsafe { GetMonitorInfoW(to_hmonitor(display), &mut mi) };
        if !ok.as_bool() {
            return Err(Win32Error(format!("GetMonitorInfoW failed for {}", display)));
        }
        Ok(DisplayMetadata {
            bounds: Rect::from(mi.rcMonitor),
            work_area: Rect::from(mi.rcWork),
            primary: mi.dwFlags & MONITORINFOF_PRIMARY != 0,
        })
    }
}
