//! Clock abstraction for the Swarm Tracker.
//!
//! Production code reads the time through [`clock::Working`], which samples
//! the system clock. Tests read it through [`clock::Stopped`], which only
//! moves when told to, so expiry behavior can be exercised deterministically.
//!
//! Each consumer crate aliases the clock it compiles against:
//!
//! ```rust
//! use swarm_tracker_clock::clock;
//!
//! /// Working version, for production.
//! #[cfg(not(test))]
//! pub(crate) type CurrentClock = clock::Working;
//!
//! /// Stopped version, for testing.
//! #[cfg(test)]
//! pub(crate) type CurrentClock = clock::Stopped;
//! ```
pub mod clock;
