//! The capability surface monswitch needs from the operating system.
//!
//! The switching logic only depends on [`DisplayPlatform`].  The Win32
//! backend lives in the `win32` module; tests substitute in-memory
//! doubles.

use crate::display::{DisplayHandle, DisplayMetadata};
use crate::geometry::{Point, Rect};

/// Abstraction over the OS display and cursor APIs.
///
/// The cursor position is process-wide state shared with the user's own
/// mouse movements.  Implementations do not lock it; whoever writes last
/// wins.
///
/// Implementations must be [`Send`] + [`Sync`] because enumeration runs on
/// a dedicated producer thread (see [`Enumerator`](crate::enumerator::Enumerator)).
pub trait DisplayPlatform: Send + Sync + 'static {
    /// The error type produced by this platform.
    type Error: std::error::Error + Send + 'static;

    /// Walk every display, calling `on_display` once per display.
    ///
    /// The rectangle passed to the callback is only valid for the duration
    /// of that call.  Returning `false` from the callback asks the platform
    /// to stop early.
    ///
    /// Returns an error if the enumeration itself failed.
    fn enumerate_displays(
        &self,
        on_display: &mut dyn FnMut(DisplayHandle, &Rect) -> bool,
    ) -> Result<(), Self::Error>;

    /// Current cursor position in screen coordinates.
    fn cursor_position(&self) -> Result<Point, Self::Error>;

    /// Warp the cursor to `point`.
    fn set_cursor_position(&self, point: Point) -> Result<(), Self::Error>;

    /// The display containing `point`, or [`DisplayHandle::NULL`] if the
    /// point is outside every display.
    fn display_from_point(&self, point: Point) -> DisplayHandle;

    /// Bounds, work area and primary flag for `display`.
    fn display_metadata(&self, display: DisplayHandle) -> Result<DisplayMetadata, Self::Error>;
}
