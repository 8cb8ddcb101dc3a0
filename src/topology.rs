//! Display topology: centers, the centroid of the cluster, and clockwise
//! ordering around it.
//!
//! # Angle convention
//!
//! Angles are measured with `atan2(dy, dx)` directly on screen coordinates,
//! where Y grows downward, and folded into `[0, 2π)`.  Starting from the
//! rightward direction, increasing angle therefore sweeps through the
//! bottom, then the left, then the top of the cluster:
//!
//! ```text
//!              top (3π/2)
//!                  |
//!   left (π) ----- c ----- right (0)
//!                  |
//!             bottom (π/2)
//! ```

use crate::display::{MonitorInfoBlock, Snapshot};
use crate::geometry::{centroid, GeometryError, Point};
use std::f64::consts::TAU;

/// A snapshot together with the centroid of its display centers.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    blocks: Vec<MonitorInfoBlock>,
    centroid: (f64, f64),
}

impl Topology {
    /// Derive the topology of `snapshot`.
    ///
    /// The snapshot is left untouched.  Fails with
    /// [`GeometryError::InvalidInput`] if it holds no displays.
    pub fn build(snapshot: &Snapshot) -> Result<Self, GeometryError> {
        let blocks = snapshot.blocks().to_vec();
        let centers: Vec<Point> = blocks.iter().map(MonitorInfoBlock::center).collect();
        let centroid = centroid(&centers)?;
        Ok(Self { blocks, centroid })
    }

    pub fn blocks(&self) -> &[MonitorInfoBlock] {
        &self.blocks
    }

    pub fn centroid(&self) -> (f64, f64) {
        self.centroid
    }

    /// Angle of `block`'s center around the centroid, in `[0, 2π)`.
    pub fn angle_of(&self, block: &MonitorInfoBlock) -> f64 {
        angle_from(self.centroid, block.center())
    }

    /// Consume the topology and return its blocks in clockwise order.
    pub fn into_clockwise(self) -> Vec<MonitorInfoBlock> {
        let mut blocks = self.blocks.clone();
        // `sort_by` is stable, which is what keeps ties in input order.
        blocks.sort_by(|a, b| {
            self.angle_of(a)
                .partial_cmp(&self.angle_of(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        blocks
    }
}

/// Order `blocks` by angle around the centroid of their centers.
///
/// Displays with equal angles (for example two displays sharing a center)
/// keep their relative input order.
pub fn sort_clockwise(blocks: &[MonitorInfoBlock]) -> Result<Vec<MonitorInfoBlock>, GeometryError> {
    Ok(Topology::build(&Snapshot::new(blocks.to_vec()))?.into_clockwise())
}

fn angle_from(origin: (f64, f64), p: Point) -> f64 {
    let angle = (p.y as f64 - origin.1).atan2(p.x as f64 - origin.0);
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}
