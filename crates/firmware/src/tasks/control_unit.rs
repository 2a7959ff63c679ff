//! Control unit — boots the state machine and supervises the task set.
//!
//! The control unit is the authoritative owner of the device state: it is
//! the only task that applies the boot transition, and the transition table
//! the other tasks' requests are checked against lives in the `control`
//! crate it guards.
//!
//! On entry it watches the two readiness flags. Once both have latched it
//! moves `Uninitialized → Idle`; if either is still false after
//! [`boot::STARTUP_READINESS_TIMEOUT`] it logs a startup failure — once,
//! without crashing — and keeps watching, so a task that recovers late
//! still brings the device up.

use control::{DeviceState, SharedDeviceState};
use embassy_time::{Duration, Instant, Ticker};

use crate::boot;

/// Supervisory loop period.
pub const P_CONTROL: Duration = Duration::from_millis(50);

/// Supervisory cycles between heartbeat logs (50 ms × 20 = 1 s).
pub const HEARTBEAT_CYCLES: u32 = 20;

/// Startup watchdog verdict for one supervisory cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStatus {
    /// Flags not yet up, deadline not yet passed.
    Pending,
    /// Both flags up — apply the boot transition.
    Ready,
    /// Deadline passed with at least one flag still down.
    TimedOut {
        /// Input reader flag at the time of the check.
        input_reader: bool,
        /// Codec feed flag at the time of the check.
        codec_feed: bool,
    },
}

/// Readiness watchdog for the startup phase.
pub struct StartupMonitor {
    deadline: Instant,
}

impl StartupMonitor {
    /// Start the countdown at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            deadline: now + boot::STARTUP_READINESS_TIMEOUT,
        }
    }

    /// Evaluate the flags. `Ready` wins over the deadline: a late task
    /// still boots the device.
    pub fn check(&self, shared: &SharedDeviceState, now: Instant) -> StartupStatus {
        let input_reader = shared.input_reader_ready().get();
        let codec_feed = shared.codec_feed_ready().get();
        if input_reader && codec_feed {
            StartupStatus::Ready
        } else if now >= self.deadline {
            StartupStatus::TimedOut {
                input_reader,
                codec_feed,
            }
        } else {
            StartupStatus::Pending
        }
    }
}

/// The supervisory loop.
///
/// `feed_watchdog` is called once per cycle; on hardware it pets the IWDG,
/// in tests it counts invocations.
pub async fn run(shared: &SharedDeviceState, mut feed_watchdog: impl FnMut()) -> ! {
    let monitor = StartupMonitor::new(Instant::now());
    let mut booted = false;
    let mut timeout_reported = false;
    let mut cycles: u32 = 0;

    let mut ticker = Ticker::every(P_CONTROL);
    loop {
        ticker.next().await;
        feed_watchdog();

        if !booted {
            match monitor.check(shared, Instant::now()) {
                StartupStatus::Ready => {
                    match shared.transition(DeviceState::Idle) {
                        Ok(()) => {
                            #[cfg(feature = "defmt")]
                            defmt::info!("all tasks ready, device idle");
                        }
                        Err(_error) => {
                            #[cfg(feature = "defmt")]
                            defmt::warn!("boot transition dropped");
                        }
                    }
                    booted = true;
                }
                StartupStatus::TimedOut {
                    input_reader,
                    codec_feed,
                } if !timeout_reported => {
                    #[cfg(feature = "defmt")]
                    defmt::error!(
                        "startup readiness timeout: input_reader={=bool} codec_feed={=bool}",
                        input_reader,
                        codec_feed
                    );
                    #[cfg(not(feature = "defmt"))]
                    let _ = (input_reader, codec_feed);
                    timeout_reported = true;
                }
                _ => {}
            }
        }

        cycles = cycles.wrapping_add(1);
        if cycles % HEARTBEAT_CYCLES == 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "heartbeat: state={=str} ticks={=u32}",
                shared.snapshot().current.label(),
                crate::tick::tick_count()
            );
        }
    }
}
