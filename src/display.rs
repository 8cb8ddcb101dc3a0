//! Display identity and snapshot types.
//!
//! A [`Snapshot`] is the result of a single enumeration pass.  Handles inside
//! it are only meaningful for that pass: when a monitor is powered off or on,
//! the OS may hand out different handles and a different order on the next
//! pass, even though the display settings still list the same layout.

use crate::geometry::{Point, Rect};
use std::fmt;

/// Opaque, enumeration-scoped display identifier.
///
/// Wraps the raw OS handle value.  The zero handle means "no display".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DisplayHandle(isize);

impl DisplayHandle {
    /// The "no display" handle.
    pub const NULL: DisplayHandle = DisplayHandle(0);

    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> isize {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// One display as seen by a single enumeration pass.
///
/// The center is derived from the bounds when the block is built and cannot
/// be set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorInfoBlock {
    handle: DisplayHandle,
    bounds: Rect,
    center: Point,
}

impl MonitorInfoBlock {
    pub fn new(handle: DisplayHandle, bounds: Rect) -> Self {
        Self {
            handle,
            bounds,
            center: bounds.center(),
        }
    }

    pub fn handle(&self) -> DisplayHandle {
        self.handle
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn center(&self) -> Point {
        self.center
    }
}

/// Every display reported by one enumeration pass, in OS order.
///
/// The OS order is a platform detail and does not follow the physical
/// left-to-right layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    blocks: Vec<MonitorInfoBlock>,
}

impl Snapshot {
    pub fn new(blocks: Vec<MonitorInfoBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[MonitorInfoBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Handles in snapshot order.
    pub fn handles(&self) -> Vec<DisplayHandle> {
        self.blocks.iter().map(|b| b.handle).collect()
    }

    pub fn find(&self, handle: DisplayHandle) -> Option<&MonitorInfoBlock> {
        self.blocks.iter().find(|b| b.handle == handle)
    }

    pub fn into_blocks(self) -> Vec<MonitorInfoBlock> {
        self.blocks
    }
}

impl FromIterator<MonitorInfoBlock> for Snapshot {
    fn from_iter<I: IntoIterator<Item = MonitorInfoBlock>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

/// Per-display details fetched on demand for a single handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetadata {
    /// Full display area.
    pub bounds: Rect,
    /// Display area minus taskbars and docked app bars.
    pub work_area: Rect,
    /// Whether this is the primary display.
    pub primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_center_is_derived_from_bounds() {
        let b = MonitorInfoBlock::new(DisplayHandle::from_raw(7), Rect::new(1920, 0, 3840, 1080));
        assert_eq!(b.center(), Point::new(2880, 540));
        assert_eq!(b.handle().as_raw(), 7);
    }

    #[test]
    fn null_handle() {
        assert!(DisplayHandle::NULL.is_null());
        assert!(DisplayHandle::default().is_null());
        assert!(!DisplayHandle::from_raw(0x10001).is_null());
    }

    #[test]
    fn handle_displays_as_hex() {
        assert_eq!(DisplayHandle::from_raw(0x10001).to_string(), "0x10001");
    }

    #[test]
    fn snapshot_keeps_enumeration_order() {
        let snap: Snapshot = [3, 1, 2]
            .into_iter()
            .map(|h| MonitorInfoBlock::new(DisplayHandle::from_raw(h), Rect::default()))
            .collect();
        assert_eq!(
            snap.handles(),
            vec![
                DisplayHandle::from_raw(3),
                DisplayHandle::from_raw(1),
                DisplayHandle::from_raw(2)
            ]
        );
        assert!(snap.find(DisplayHandle::from_raw(1)).is_some());
        assert!(snap.find(DisplayHandle::from_raw(9)).is_none());
    }
}
