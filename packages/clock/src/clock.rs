//! Working and stopped clocks.
use std::marker::PhantomData;
use std::time::{Duration, SystemTime};

use swarm_tracker_primitives::DurationSinceUnixEpoch;

/// A source of the current time, expressed as a duration since the Unix
/// Epoch.
pub trait Time: Sized {
    fn now() -> DurationSinceUnixEpoch;

    /// The current time plus `add_time`, or `None` on overflow.
    fn now_add(add_time: &Duration) -> Option<DurationSinceUnixEpoch> {
        Self::now().checked_add(*add_time)
    }

    /// The current time minus `sub_time`, or `None` if the result would be
    /// before the Unix Epoch.
    fn now_sub(sub_time: &Duration) -> Option<DurationSinceUnixEpoch> {
        Self::now().checked_sub(*sub_time)
    }
}

/// Extra controls available on the [`Stopped`] clock.
///
/// The stopped time is thread-local: every test thread owns an independent
/// clock starting at the Unix Epoch.
pub trait StoppedTime: Time {
    /// Sets the thread-local time.
    fn local_set(unix_time: &DurationSinceUnixEpoch);

    /// Resets the thread-local time to the Unix Epoch.
    fn local_reset() {
        Self::local_set(&Duration::ZERO);
    }

    /// Moves the thread-local time forward.
    fn local_add(duration: &Duration);
}

/// A clock parameterized over its time source.
#[derive(Debug)]
pub struct Clock<T> {
    phantom: PhantomData<T>,
}

/// Time source backed by the system clock.
#[derive(Debug)]
pub struct WorkingClock;

/// Time source that only moves when told to.
#[derive(Debug)]
pub struct StoppedClock;

/// The production clock.
pub type Working = Clock<WorkingClock>;

/// The test clock.
pub type Stopped = Clock<StoppedClock>;

impl Time for Working {
    fn now() -> DurationSinceUnixEpoch {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("the system clock should not be set before the unix epoch")
    }
}

impl Time for Stopped {
    fn now() -> DurationSinceUnixEpoch {
        detail::FIXED_TIME.with(|time| *time.borrow())
    }
}

impl StoppedTime for Stopped {
    fn local_set(unix_time: &DurationSinceUnixEpoch) {
        detail::FIXED_TIME.with(|time| *time.borrow_mut() = *unix_time);
    }

    fn local_add(duration: &Duration) {
        detail::FIXED_TIME.with(|time| {
            let mut time = time.borrow_mut();
            *time = time.saturating_add(*duration);
        });
    }
}

mod detail {
    use std::cell::RefCell;
    use std::time::Duration;

    thread_local! {
        pub static FIXED_TIME: RefCell<Duration> = const { RefCell::new(Duration::ZERO) };
    }
}
