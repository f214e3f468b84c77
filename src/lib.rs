#![warn(missing_docs)]

//! # Bumpless PID Controller Library
//!
//! This library provides a polled, discrete PID (Proportional-Integral-Derivative) controller for
//! embedded control loops. It is `no_std` and never allocates.
//!
//! ## Features
//!
//! - Manual and automatic modes, with **bumpless transfer**: switching to automatic seeds the
//!   integrator with the current output so the process does not see a step.
//! - Anti reset-windup:
//!   - The integrator is bounded by the output limits and, optionally, by tighter integrator
//!     limits.
//!   - The integrator stops accumulating while the output is pinned to a limit.
//! - Proportional-on-error or proportional-on-measurement.
//! - Derivative on (exponentially filtered) measurement, so setpoint steps cause no derivative kick.
//! - Direct or reverse acting processes.
//! - Gains, limits, sample time and direction may all be changed while the loop is running.
//! - Invalid settings are rejected without touching the controller, and reported as a `Result`.
//!
//! ## Usage
//!
//! The controller is bound to three caller-owned `Cell`s holding the measured input, the output
//! and the setpoint. Call `compute` on every iteration of your loop with the current time; the
//! controller computes a new output at most once per sample time.
//!
//! ```rust
//! use core::cell::Cell;
//!
//! use bumpless_pid::pid::{Bindings, Direction, Mode, PidController, ProportionalMode, Tunings};
//! use bumpless_pid::time::Millis;
//!
//! let temperature = Cell::new(20.0);
//! let heater_duty = Cell::new(0.0);
//! let target = Cell::new(80.0);
//!
//! let mut pid = PidController::new(
//!     Bindings::new(&temperature, &heater_duty, &target),
//!     Tunings::new(2.0, 5.0, 1.0),
//!     ProportionalMode::OnError,
//!     Direction::Direct,
//! );
//!
//! // Controllers start in manual mode and leave the output alone
//! assert!(!pid.compute(Millis(0)));
//!
//! pid.set_mode(Mode::Automatic);
//! assert!(pid.compute(Millis(0)));
//! assert_eq!(heater_duty.get(), 120.0);
//!
//! // It's a no-op until the default sample time of 100ms elapsed
//! assert!(!pid.compute(Millis(50)));
//! assert!(pid.compute(Millis(100)));
//! ```
//!
//! ### Building a configuration
//!
//! ```rust
//! use core::cell::Cell;
//! use core::time::Duration;
//!
//! use bumpless_pid::pid::{Bindings, PidConfigBuilder, PidController, ProportionalMode};
//! use bumpless_pid::time::Millis;
//!
//! let config = PidConfigBuilder::default()
//!     .kp(1.5)
//!     .ki(0.4)
//!     .proportional_mode(ProportionalMode::OnMeasurement)
//!     .sample_time(Duration::from_millis(20))
//!     .output_limits(-10.0, 10.0)
//!     .build()
//!     .expect("Invalid PID config");
//!
//! let (input, output, setpoint) = (Cell::new(0.0), Cell::new(0.0), Cell::new(1.0));
//! let pid: PidController<'_, Millis> =
//!     PidController::from_config(Bindings::new(&input, &output, &setpoint), config);
//! assert_eq!(pid.ki(), 0.4);
//! ```
//!
//! ### Plugging in your clock
//!
//! ``` rust
//! use core::ops::Add;
//! use core::time::Duration;
//! use bumpless_pid::time::InstantLike;
//!
//! #[derive(Copy, Clone, Debug, PartialEq)]
//! struct Ticks(u16); // 1 tick = 1ms, wraps every 65.5s
//!
//! impl InstantLike for Ticks {
//!     fn duration_since(&self, earlier: Self) -> Duration {
//!         Duration::from_millis(self.0.wrapping_sub(earlier.0) as u64)
//!     }
//! }
//!
//! impl Add<Duration> for Ticks {
//!     type Output = Self;
//!
//!     fn add(self, rhs: Duration) -> Self {
//!         Ticks(self.0.wrapping_add(rhs.as_millis() as u16))
//!     }
//! }
//!
//! assert_eq!(Ticks(10).duration_since(Ticks(u16::MAX)), Duration::from_millis(11));
//! ```
//!
//! ## Logging
//!
//! Enable the `defmt` feature to log mode changes, direction changes and rejected settings through
//! [defmt](https://defmt.ferrous-systems.com).
//!
#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

/// The main module for the PID controller library.
pub mod pid;

/// The module containing time-related utilities to support sampling time handling
pub mod time;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
