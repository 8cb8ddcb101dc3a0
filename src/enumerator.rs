//! Collects a [`Snapshot`] of every display from the platform.
//!
//! # How a snapshot is gathered
//!
//! The platform reports displays through a callback whose rectangle argument
//! is only valid during that call.  The enumerator therefore runs the
//! platform call on a short-lived producer thread and hands each display to
//! the calling thread over a bounded [`mpsc::sync_channel`]:
//!
//! 1. **Producer** → the callback copies `(handle, rect)` into an owned
//!    [`MonitorInfoBlock`] and sends it.
//! 2. **Settle** → once the platform call returns, the producer waits
//!    [`EnumerationConfig::settle_delay_ms`] and then drops its sender.
//! 3. **Drain** → the consumer receives until the channel disconnects, which
//!    is the barrier that says every display has arrived.
//!
//! The whole drain is bounded by `timeout_ms + settle_delay_ms`.  A platform
//! that never returns yields [`EnumerateError::TimedOut`] instead of a hang.

use crate::display::{DisplayHandle, MonitorInfoBlock, Snapshot};
use crate::geometry::Rect;
use crate::traits::DisplayPlatform;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Tuning knobs for display enumeration.
///
/// `settle_delay_ms` is a workaround for platforms that have been observed
/// to return from enumeration before every display was reported.  It is not
/// a guarantee; `confirm_stable` is the stricter alternative and enumerates
/// twice, preferring the later pass when the two disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    /// Pause between the platform call returning and closing the hand-off (ms).
    pub settle_delay_ms: u64,
    /// Upper bound on waiting for the platform, on top of the settle delay (ms).
    pub timeout_ms: u64,
    /// Capacity of the producer → consumer hand-off channel.  Clamped to
    /// `1..=MAX_CHANNEL_CAPACITY`.
    pub channel_capacity: usize,
    /// Enumerate twice and warn when the two passes disagree.
    pub confirm_stable: bool,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 50,
            timeout_ms: 1000,
            channel_capacity: 16,
            confirm_stable: false,
        }
    }
}

/// Largest hand-off capacity honoured; the channel allocates every slot
/// up front.
pub const MAX_CHANNEL_CAPACITY: usize = 64;

impl EnumerationConfig {
    /// Configured channel capacity, clamped to `1..=MAX_CHANNEL_CAPACITY`.
    pub fn effective_channel_capacity(&self) -> usize {
        self.channel_capacity.clamp(1, MAX_CHANNEL_CAPACITY)
    }

    fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    fn deadline(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.saturating_add(self.settle_delay_ms))
    }
}

/// Errors from a single enumeration.
#[derive(Debug, thiserror::Error)]
pub enum EnumerateError {
    /// The platform reported that enumeration failed.
    #[error("display enumeration failed: {0}")]
    Failed(String),

    /// The platform did not finish within the configured bound.
    #[error("display enumeration timed out after {collected} display(s)")]
    TimedOut { collected: usize },
}

/// Produces fresh [`Snapshot`]s from a [`DisplayPlatform`].
///
/// Every call to [`enumerate`](Enumerator::enumerate) queries the platform
/// again; nothing is cached, because the topology may change between calls.
pub struct Enumerator<P: DisplayPlatform> {
    platform: Arc<P>,
    config: EnumerationConfig,
}

impl<P: DisplayPlatform> Enumerator<P> {
    pub fn new(platform: Arc<P>, config: EnumerationConfig) -> Self {
        Self { platform, config }
    }

    /// Gather one snapshot of all displays in OS order.
    ///
    /// With [`EnumerationConfig::confirm_stable`] set, a second pass is made
    /// and returned; a mismatch between the passes is logged.
    pub fn enumerate(&self) -> Result<Snapshot, EnumerateError> {
        let first = self.enumerate_once()?;
        if !self.config.confirm_stable {
            return Ok(first);
        }

        let second = self.enumerate_once()?;
        if first.handles() != second.handles() {
            warn!(
                "display set changed between passes ({} -> {} display(s)), using the later pass",
                first.len(),
                second.len()
            );
        }
        Ok(second)
    }

    fn enumerate_once(&self) -> Result<Snapshot, EnumerateError> {
        let capacity = self.config.effective_channel_capacity();
        let (tx, rx) = mpsc::sync_channel::<MonitorInfoBlock>(capacity);
        let platform = Arc::clone(&self.platform);
        let settle = self.config.settle_delay();

        let producer = thread::Builder::new()
            .name("monswitch-enum".into())
            .spawn(move || {
                let result = platform.enumerate_displays(
                    &mut |handle: DisplayHandle, bounds: &Rect| -> bool {
                        // `bounds` does not outlive this call; send an owned copy.
                        let block = MonitorInfoBlock::new(handle, *bounds);
                        tx.send(block).is_ok()
                    },
                );
                if !settle.is_zero() {
                    thread::sleep(settle);
                }
                drop(tx);
                result.map_err(|e| e.to_string())
            })
            .map_err(|e| EnumerateError::Failed(format!("spawn producer: {}", e)))?;

        let deadline = Instant::now() + self.config.deadline();
        let mut blocks = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(block) => {
                    debug!("display {} at {}", block.handle(), block.bounds());
                    blocks.push(block);
                }
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    // Dropping `rx` makes the producer's next send fail, which
                    // asks the platform to stop.  The thread is left detached.
                    warn!(
                        "display enumeration did not finish within {:?}",
                        self.config.deadline()
                    );
                    return Err(EnumerateError::TimedOut {
                        collected: blocks.len(),
                    });
                }
            }
        }

        match producer.join() {
            Ok(Ok(())) => Ok(Snapshot::new(blocks)),
            Ok(Err(e)) => Err(EnumerateError::Failed(e)),
            Err(_) => Err(EnumerateError::Failed("enumeration thread panicked".into())),
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayMetadata;
    use crate::geometry::Point;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("scripted platform error")]
    struct ScriptedErr;

    /// Platform that replays a script of enumeration passes.
    ///
    /// Pass `n` reports `passes[min(n, last)]`.
    #[derive(Default)]
    struct ScriptedPlatform {
        passes: Vec<Vec<(isize, Rect)>>,
        fail: bool,
        /// Block inside the platform call until the test sends on the gate.
        gate: Option<Mutex<mpsc::Receiver<()>>>,
        /// Signalled when the platform call is about to return.
        finished: Option<Mutex<mpsc::Sender<()>>>,
        calls: AtomicUsize,
        delivered: Mutex<Vec<isize>>,
    }

    impl ScriptedPlatform {
        fn with_displays(displays: Vec<(isize, Rect)>) -> Self {
            Self {
                passes: vec![displays],
                ..Default::default()
            }
        }

        /// A platform that stalls until released, plus the release and
        /// "returned" channel ends.
        fn gated(displays: Vec<(isize, Rect)>) -> (Self, mpsc::Sender<()>, mpsc::Receiver<()>) {
            let (release_tx, release_rx) = mpsc::channel();
            let (finished_tx, finished_rx) = mpsc::channel();
            let platform = Self {
                gate: Some(Mutex::new(release_rx)),
                finished: Some(Mutex::new(finished_tx)),
                ..Self::with_displays(displays)
            };
            (platform, release_tx, finished_rx)
        }
    }

    impl DisplayPlatform for ScriptedPlatform {
        type Error = ScriptedErr;

        fn enumerate_displays(
            &self,
            on_display: &mut dyn FnMut(DisplayHandle, &Rect) -> bool,
        ) -> Result<(), ScriptedErr> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let _ = gate.lock().unwrap().recv();
            }
            let result = if self.fail {
                Err(ScriptedErr)
            } else {
                let pass = &self.passes[call.min(self.passes.len() - 1)];
                for (raw, rect) in pass {
                    // A stack-local rect, like the pointer the OS hands out.
                    let transient = *rect;
                    if !on_display(DisplayHandle::from_raw(*raw), &transient) {
                        break;
                    }
                    self.delivered.lock().unwrap().push(*raw);
                }
                Ok(())
            };
            if let Some(finished) = &self.finished {
                let _ = finished.lock().unwrap().send(());
            }
            result
        }

        fn cursor_position(&self) -> Result<Point, ScriptedErr> {
            Ok(Point::default())
        }

        fn set_cursor_position(&self, _: Point) -> Result<(), ScriptedErr> {
            Ok(())
        }

        fn display_from_point(&self, _: Point) -> DisplayHandle {
            DisplayHandle::NULL
        }

        fn display_metadata(&self, _: DisplayHandle) -> Result<DisplayMetadata, ScriptedErr> {
            Err(ScriptedErr)
        }
    }

    fn fast_config() -> EnumerationConfig {
        EnumerationConfig {
            settle_delay_ms: 0,
            timeout_ms: 2000,
            channel_capacity: 16,
            confirm_stable: false,
        }
    }

    fn three_displays() -> Vec<(isize, Rect)> {
        vec![
            (0x30, Rect::new(1920, 0, 3840, 1080)),
            (0x10, Rect::new(0, 0, 1920, 1080)),
            (0x20, Rect::new(-2560, 0, 0, 1440)),
        ]
    }

    #[test]
    fn collects_in_os_order() {
        let platform = Arc::new(ScriptedPlatform::with_displays(three_displays()));
        let snap = Enumerator::new(platform, fast_config()).enumerate().unwrap();
        let raw: Vec<isize> = snap.handles().iter().map(|h| h.as_raw()).collect();
        assert_eq!(raw, vec![0x30, 0x10, 0x20]);
        assert_eq!(snap.blocks()[2].bounds(), Rect::new(-2560, 0, 0, 1440));
        assert_eq!(snap.blocks()[2].center(), Point::new(-1280, 720));
    }

    #[test]
    fn capacity_one_still_drains_everything() {
        let displays: Vec<(isize, Rect)> = (1..=12)
            .map(|i| (i, Rect::new(i as i32 * 100, 0, i as i32 * 100 + 100, 100)))
            .collect();
        let platform = Arc::new(ScriptedPlatform::with_displays(displays));
        let cfg = EnumerationConfig {
            channel_capacity: 1,
            ..fast_config()
        };
        let snap = Enumerator::new(platform, cfg).enumerate().unwrap();
        assert_eq!(snap.len(), 12);
        assert_eq!(snap.blocks()[11].handle().as_raw(), 12);
    }

    #[test]
    fn oversized_capacity_is_clamped() {
        let cfg: EnumerationConfig =
            serde_json::from_str(r#"{ "channel_capacity": 18446744073709551615 }"#).unwrap();
        assert_eq!(cfg.effective_channel_capacity(), MAX_CHANNEL_CAPACITY);

        let platform = Arc::new(ScriptedPlatform::with_displays(three_displays()));
        let cfg = EnumerationConfig {
            settle_delay_ms: 0,
            ..cfg
        };
        assert_eq!(Enumerator::new(platform, cfg).enumerate().unwrap().len(), 3);
    }

    #[test]
    fn zero_capacity_is_treated_as_one() {
        let platform = Arc::new(ScriptedPlatform::with_displays(three_displays()));
        let cfg = EnumerationConfig {
            channel_capacity: 0,
            ..fast_config()
        };
        assert_eq!(Enumerator::new(platform, cfg.clone()).enumerate().unwrap().len(), 3);
        assert_eq!(cfg.effective_channel_capacity(), 1);
    }

    #[test]
    fn settle_delay_is_waited_before_returning() {
        let platform = Arc::new(ScriptedPlatform::with_displays(three_displays()));
        let cfg = EnumerationConfig {
            settle_delay_ms: 60,
            ..fast_config()
        };
        let started = Instant::now();
        let snap = Enumerator::new(platform, cfg).enumerate().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(60));
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn platform_failure_is_reported() {
        let platform = Arc::new(ScriptedPlatform {
            fail: true,
            ..ScriptedPlatform::with_displays(three_displays())
        });
        let err = Enumerator::new(platform, fast_config()).enumerate().unwrap_err();
        assert!(matches!(err, EnumerateError::Failed(_)));
    }

    #[test]
    fn stalled_platform_times_out() {
        let (platform, release, finished) = ScriptedPlatform::gated(three_displays());
        let cfg = EnumerationConfig {
            timeout_ms: 50,
            ..fast_config()
        };
        // The gate is still closed, so the platform cannot have returned.
        let err = Enumerator::new(Arc::new(platform), cfg).enumerate().unwrap_err();
        assert!(matches!(err, EnumerateError::TimedOut { collected: 0 }));

        release.send(()).unwrap();
        finished.recv_timeout(Duration::from_secs(10)).unwrap();
    }

    #[test]
    fn timed_out_consumer_stops_the_producer() {
        let (platform, release, finished) = ScriptedPlatform::gated(three_displays());
        let platform = Arc::new(platform);
        let cfg = EnumerationConfig {
            timeout_ms: 20,
            channel_capacity: 1,
            ..fast_config()
        };
        let result = Enumerator::new(Arc::clone(&platform), cfg).enumerate();
        assert!(matches!(result, Err(EnumerateError::TimedOut { .. })));

        // Only now let the detached producer run into the closed channel.
        release.send(()).unwrap();
        finished.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(platform.delivered.lock().unwrap().is_empty());
    }

    #[test]
    fn each_call_queries_the_platform_again() {
        let platform = Arc::new(ScriptedPlatform::with_displays(three_displays()));
        let enumerator = Enumerator::new(Arc::clone(&platform), fast_config());
        enumerator.enumerate().unwrap();
        enumerator.enumerate().unwrap();
        assert_eq!(platform.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn confirm_stable_uses_the_later_pass() {
        let platform = Arc::new(ScriptedPlatform {
            passes: vec![
                vec![(0x10, Rect::new(0, 0, 1920, 1080))],
                three_displays(),
            ],
            ..Default::default()
        });
        let cfg = EnumerationConfig {
            confirm_stable: true,
            ..fast_config()
        };
        let snap = Enumerator::new(Arc::clone(&platform), cfg).enumerate().unwrap();
        assert_eq!(platform.calls.load(Ordering::SeqCst), 2);
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: EnumerationConfig = serde_json::from_str(r#"{ "timeout_ms": 250 }"#).unwrap();
        assert_eq!(cfg.timeout_ms, 250);
        let d = EnumerationConfig::default();
        assert_eq!(cfg.settle_delay_ms, d.settle_delay_ms);
        assert_eq!(cfg.channel_capacity, d.channel_capacity);
        assert_eq!(cfg.confirm_stable, d.confirm_stable);
    }
}
