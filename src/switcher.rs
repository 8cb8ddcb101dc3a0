//! The orchestrator that finds the current display and moves the cursor to
//! the next one.
//!
//! [`MonitorSwitcher`] owns the [`Enumerator`] and talks to the OS only
//! through the [`DisplayPlatform`] trait.
//!
//! # One switch, step by step
//!
//! 1. **Locate** the display under the cursor.  This happens *before*
//!    enumerating: the cursor lookup does not depend on enumeration order.
//! 2. **Enumerate** a fresh [`Snapshot`].
//! 3. **Order** it: as reported ([`Strategy::Enumeration`]) or clockwise
//!    around the cluster ([`Strategy::Clockwise`]).
//! 4. **Select** the block after the current one, wrapping to the first when
//!    the current display is last or missing.
//! 5. **Move** the cursor to the selected block's center, taken from the same
//!    snapshot that was used for selection.

use crate::command::Strategy;
use crate::display::{DisplayHandle, DisplayMetadata, MonitorInfoBlock, Snapshot};
use crate::enumerator::{EnumerateError, EnumerationConfig, Enumerator};
use crate::geometry::{GeometryError, Point};
use crate::topology::Topology;
use crate::traits::DisplayPlatform;
use log::{debug, info, warn};
use std::sync::Arc;

/// Possible errors from a switch.  In every case the cursor has not moved.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    /// The cursor position could not be read.
    #[error("failed to read cursor position: {0}")]
    CursorQuery(String),

    /// The cursor position could not be set.
    #[error("failed to move cursor: {0}")]
    CursorMove(String),

    /// Per-display details could not be fetched.
    #[error("failed to query display {display}: {reason}")]
    Metadata {
        display: DisplayHandle,
        reason: String,
    },

    /// An internal geometry contract was violated.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl SwitchError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SwitchError::CursorQuery(_) => 2,
            SwitchError::CursorMove(_) => 3,
            SwitchError::Geometry(_) => 4,
            SwitchError::Metadata { .. } => 6,
        }
    }
}

/// What a successful [`MonitorSwitcher::switch`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The cursor was moved to the center of `to`.
    Moved {
        /// Display the cursor was on, [`DisplayHandle::NULL`] if none.
        from: DisplayHandle,
        to: DisplayHandle,
        position: Point,
    },
    /// No displays were known, so the cursor was left alone.
    NoDisplays {
        /// Whether the platform reported an enumeration failure (as opposed
        /// to genuinely reporting zero displays).
        enumeration_failed: bool,
    },
}

/// Return the block after the one whose handle is `current`.
///
/// Wraps to the first block when `current` is the last one or does not
/// appear at all.  Returns `None` only for an empty slice.
pub fn select_successor(
    blocks: &[MonitorInfoBlock],
    current: DisplayHandle,
) -> Option<&MonitorInfoBlock> {
    let first = blocks.first()?;
    let next = blocks
        .iter()
        .position(|b| b.handle() == current)
        .and_then(|i| blocks.get(i + 1));
    Some(next.unwrap_or(first))
}

/// Moves the cursor between displays.
///
/// The switcher is generic over any [`DisplayPlatform`], and keeps no display
/// state between calls: every switch works on its own fresh snapshot.
pub struct MonitorSwitcher<P: DisplayPlatform> {
    platform: Arc<P>,
    enumerator: Enumerator<P>,
}

impl<P: DisplayPlatform> MonitorSwitcher<P> {
    /// Create a switcher with the given enumeration settings.
    pub fn new(platform: P, config: EnumerationConfig) -> Self {
        let platform = Arc::new(platform);
        let enumerator = Enumerator::new(Arc::clone(&platform), config);
        Self {
            platform,
            enumerator,
        }
    }

    /// Return a shared reference to the underlying platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Enumerate all displays in OS order.
    pub fn snapshot(&self) -> Result<Snapshot, EnumerateError> {
        self.enumerator.enumerate()
    }

    /// The display containing `point`.
    ///
    /// Returns [`DisplayHandle::NULL`] and logs a warning when `point` is
    /// outside every display.
    pub fn locate(&self, point: Point) -> DisplayHandle {
        let handle = self.platform.display_from_point(point);
        if handle.is_null() {
            warn!("cursor at {} is not on any display", point);
        }
        handle
    }

    /// The display currently under the cursor.
    pub fn current_display(&self) -> Result<DisplayHandle, SwitchError> {
        let cursor = self
            .platform
            .cursor_position()
            .map_err(|e| SwitchError::CursorQuery(e.to_string()))?;
        Ok(self.locate(cursor))
    }

    /// Cursor position, display handle and metadata for the display under
    /// the cursor.
    pub fn current_display_info(
        &self,
    ) -> Result<(Point, DisplayHandle, DisplayMetadata), SwitchError> {
        let cursor = self
            .platform
            .cursor_position()
            .map_err(|e| SwitchError::CursorQuery(e.to_string()))?;
        let display = self.locate(cursor);
        let metadata = self
            .platform
            .display_metadata(display)
            .map_err(|e| SwitchError::Metadata {
                display,
                reason: e.to_string(),
            })?;
        Ok((cursor, display, metadata))
    }

    /// Move the cursor to the center of the next display in OS
    /// enumeration order.
    pub fn switch_to_next(&self) -> Result<SwitchOutcome, SwitchError> {
        self.switch(Strategy::Enumeration)
    }

    /// Move the cursor to the center of the next display clockwise.
    pub fn switch_clockwise(&self) -> Result<SwitchOutcome, SwitchError> {
        self.switch(Strategy::Clockwise)
    }

    /// Move the cursor to the center of the display following the current
    /// one, in the order defined by `strategy`.
    ///
    /// An enumeration failure is not an error here: it is treated as "no
    /// displays known" and reported as [`SwitchOutcome::NoDisplays`].
    pub fn switch(&self, strategy: Strategy) -> Result<SwitchOutcome, SwitchError> {
        let current = self.current_display()?;
        debug!("current display {} ({} order)", current, strategy);

        let snapshot = match self.enumerator.enumerate() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("{}, treating as no displays", e);
                return Ok(SwitchOutcome::NoDisplays {
                    enumeration_failed: true,
                });
            }
        };
        if snapshot.is_empty() {
            warn!("no displays reported");
            return Ok(SwitchOutcome::NoDisplays {
                enumeration_failed: false,
            });
        }

        let ordered = match strategy {
            Strategy::Enumeration => snapshot.into_blocks(),
            Strategy::Clockwise => Topology::build(&snapshot)?.into_clockwise(),
        };
        let target = match select_successor(&ordered, current) {
            Some(target) => *target,
            None => {
                return Ok(SwitchOutcome::NoDisplays {
                    enumeration_failed: false,
                })
            }
        };

        let position = target.center();
        info!(
            "switching {} -> {} ({}), cursor to {}",
            current,
            target.handle(),
            strategy,
            position
        );
        self.platform
            .set_cursor_position(position)
            .map_err(|e| SwitchError::CursorMove(e.to_string()))?;

        Ok(SwitchOutcome::Moved {
            from: current,
            to: target.handle(),
            position,
        })
    }
}

//  Tests
