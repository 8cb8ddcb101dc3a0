//! **monswitch**: jump the mouse cursor to the center of the next display.
//!
//! "Next" is decided in one of two ways (see [`command::Strategy`]):
//!
//! * **enumeration order**: whatever order the OS reports displays in, which
//!   can change when a monitor is powered off;
//! * **clockwise order**: displays sorted by angle around the centroid of
//!   all display centers, which follows the physical layout.
//!
//! # Architecture
//!
//! The crate is organised around one core trait:
//!
//! * [`traits::DisplayPlatform`] abstracts display enumeration and cursor
//!   access so the switching logic is not coupled to any specific OS.
//!
//! On top of it, [`enumerator`] gathers a fresh [`display::Snapshot`] per
//! request, [`topology`] orders it clockwise, and [`switcher`] picks the
//! target and moves the cursor.  The Win32 backend lives in `win32`.

pub mod command;
pub mod config;
pub mod display;
pub mod enumerator;
pub mod geometry;
pub mod switcher;
pub mod topology;
pub mod traits;
#[cfg(windows)]
pub mod win32;
