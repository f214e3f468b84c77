// Implements a polled PID controller with bumpless transfer and anti-windup
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::cell::Cell;
use core::time::Duration;

use num_traits::float::FloatCore;
use num_traits::NumCast;

use crate::time::InstantLike;

/// Distance from an output limit within which the output counts as saturated. While saturated in
/// proportional-on-error mode, the integrator stops accumulating.
pub const SATURATION_BAND: f64 = 0.01;

/// Default sample time of a freshly constructed controller
pub const DEFAULT_SAMPLE_TIME: Duration = Duration::from_millis(100);

/// Default output limits, matching an 8-bit PWM duty cycle
pub const DEFAULT_OUTPUT_LIMITS: (f64, f64) = (0.0, 255.0);

/// Default integrator limits
pub const DEFAULT_INTEGRATOR_LIMITS: (f64, f64) = (-100.0, 100.0);

/// Default smoothing factor of the exponential input filter
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.9;

// Every float type FloatCore is implemented for can represent these constants
fn lit<T: FloatCore>(value: f64) -> T {
    <T as NumCast>::from(value).unwrap_or_else(T::nan)
}

fn clamp<T: FloatCore>(value: T, min: T, max: T) -> T {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Whether the controller is acting on the process
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// `compute` is a no-op and the output belongs to the caller
    #[default]
    Manual,
    /// `compute` drives the output
    Automatic,
}

/// The action of the controller.
///
/// A `Direct` acting process responds to a larger output with a larger input (e.g. a heater), a
/// `Reverse` acting process with a smaller input (e.g. a chiller).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// More output raises the input
    #[default]
    Direct,
    /// More output lowers the input
    Reverse,
}

/// Selects what the proportional term acts on
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProportionalMode {
    /// Classic PID: the proportional term is `kp * error`
    #[default]
    OnError,
    /// The proportional action is folded into the integrator and driven by changes of the
    /// measurement, so a setpoint step produces no proportional kick
    OnMeasurement,
}

/// Errors raised when a configuration value is rejected.
///
/// A rejected call never modifies the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PidConfigError {
    /// The proportional gain is negative or not finite
    #[cfg_attr(feature = "std", error("Proportional gain must be non-negative and finite"))]
    InvalidProportionalGain,
    /// The integral gain is negative or not finite
    #[cfg_attr(feature = "std", error("Integral gain must be non-negative and finite"))]
    InvalidIntegralGain,
    /// The derivative gain is negative or not finite
    #[cfg_attr(feature = "std", error("Derivative gain must be non-negative and finite"))]
    InvalidDerivativeGain,
    /// The lower output limit is not strictly below the upper one
    #[cfg_attr(
        feature = "std",
        error("Output lower limit must be strictly less than the upper limit")
    )]
    InvalidOutputLimits,
    /// The lower integrator limit is not strictly below the upper one
    #[cfg_attr(
        feature = "std",
        error("Integrator lower limit must be strictly less than the upper limit")
    )]
    InvalidIntegratorLimits,
    /// The sample time is zero
    #[cfg_attr(feature = "std", error("Sample time must be greater than zero"))]
    InvalidSampleTime,
}

/// PID gains in user units.
///
/// `ki` is in output units per (error unit × second) and `kd` in output units per (input unit per
/// second); the controller scales them by its sample time internally.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tunings<T> {
    /// Proportional gain
    pub kp: T,
    /// Integral gain
    pub ki: T,
    /// Derivative gain
    pub kd: T,
}

impl<T: FloatCore> Tunings<T> {
    /// Bundles the three gains together
    pub fn new(kp: T, ki: T, kd: T) -> Self {
        Self { kp, ki, kd }
    }

    fn validate(&self) -> Result<(), PidConfigError> {
        let valid = |gain: T| gain >= T::zero() && gain.is_finite();
        if !valid(self.kp) {
            return Err(PidConfigError::InvalidProportionalGain);
        }
        if !valid(self.ki) {
            return Err(PidConfigError::InvalidIntegralGain);
        }
        if !valid(self.kd) {
            return Err(PidConfigError::InvalidDerivativeGain);
        }
        Ok(())
    }
}

impl<T: FloatCore> Default for Tunings<T> {
    fn default() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }
}

/// The caller-owned variables a controller reads from and writes to.
///
/// The controller reads `input` and `setpoint` on every computed tick and writes `output`. It also
/// reads `output` to decide whether the loop is saturated, and to seed its integrator when
/// switching to [`Mode::Automatic`], so the caller may drive `output` by hand while the controller
/// is in [`Mode::Manual`].
///
/// The bindings borrow the variables for `'a`, so the variables necessarily outlive the
/// controller. Since `Cell` is not `Sync`, a controller cannot be shared with another thread
/// either; interrupt handlers that touch the same variables must be coordinated by the caller.
#[derive(Copy, Clone, Debug)]
pub struct Bindings<'a, T: Copy> {
    input: &'a Cell<T>,
    output: &'a Cell<T>,
    setpoint: &'a Cell<T>,
}

impl<'a, T: Copy> Bindings<'a, T> {
    /// Links the measured input, the controller output and the setpoint
    pub fn new(input: &'a Cell<T>, output: &'a Cell<T>, setpoint: &'a Cell<T>) -> Self {
        Self {
            input,
            output,
            setpoint,
        }
    }
}

/// Tuning, limits and timing of a PID controller.
///
/// Alongside the gains as the user entered them, the configuration stores *working* gains that are
/// pre-scaled by the sample time and pre-signed by the controller direction:
///
/// - `kp_work = ±kp`
/// - `ki_work = ±ki * Ts`
/// - `kd_work = ±kd / Ts`
///
/// Every setter keeps this relationship intact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidConfig<T: FloatCore> {
    tunings: Tunings<T>,

    kp: T,
    ki: T,
    kd: T,

    proportional_mode: ProportionalMode,
    direction: Direction,
    sample_time: Duration,

    output_min: T,
    output_max: T,
    integrator_min: T,
    integrator_max: T,

    /// Weight of the previous filtered input in the exponential filter
    alpha: T,
}

impl<T: FloatCore> Default for PidConfig<T> {
    fn default() -> Self {
        PidConfig {
            tunings: Tunings::default(),
            kp: T::zero(),
            ki: T::zero(),
            kd: T::zero(),
            proportional_mode: ProportionalMode::OnError,
            direction: Direction::Direct,
            sample_time: DEFAULT_SAMPLE_TIME,
            output_min: lit(DEFAULT_OUTPUT_LIMITS.0),
            output_max: lit(DEFAULT_OUTPUT_LIMITS.1),
            integrator_min: lit(DEFAULT_INTEGRATOR_LIMITS.0),
            integrator_max: lit(DEFAULT_INTEGRATOR_LIMITS.1),
            alpha: lit(DEFAULT_SMOOTHING_FACTOR),
        }
    }
}

impl<T: FloatCore> PidConfig<T> {
    /// Returns the gains as last accepted by [`PidConfig::set_tunings`]
    pub fn tunings(&self) -> Tunings<T> {
        self.tunings
    }

    /// Returns the proportional gain in user units.
    pub fn kp(&self) -> T {
        self.tunings.kp
    }

    /// Returns the integral gain in user units.
    pub fn ki(&self) -> T {
        self.tunings.ki
    }

    /// Returns the derivative gain in user units.
    pub fn kd(&self) -> T {
        self.tunings.kd
    }

    /// Returns the sample-time-scaled, direction-signed gains used by [`PidConfig::update`]
    pub fn working_gains(&self) -> (T, T, T) {
        (self.kp, self.ki, self.kd)
    }

    pub fn proportional_mode(&self) -> ProportionalMode {
        self.proportional_mode
    }

    /// Returns whether the proportional term acts on the error
    pub fn is_p_on_e(&self) -> bool {
        self.proportional_mode == ProportionalMode::OnError
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the sampling time for the PID controller.
    pub fn sample_time(&self) -> Duration {
        self.sample_time
    }

    /// Returns the output limits as `(min, max)`
    pub fn output_limits(&self) -> (T, T) {
        (self.output_min, self.output_max)
    }

    /// Returns the integrator limits as `(min, max)`
    pub fn integrator_limits(&self) -> (T, T) {
        (self.integrator_min, self.integrator_max)
    }

    pub fn smoothing_factor(&self) -> T {
        self.alpha
    }

    fn sample_time_secs(&self) -> T {
        lit(self.sample_time.as_secs_f64())
    }

    /// Sets the gains and the proportional mode together.
    ///
    /// The working gains are recomputed from the new gains, the current sample time and the
    /// current direction.
    ///
    /// The configuration holds no integrator, so a zero `ki` does not clear one here. Callers
    /// driving [`PidConfig::update`] with their own [`PidContext`] must reset it themselves;
    /// [`PidController::set_tunings`] does so.
    ///
    /// # Errors
    /// - [`PidConfigError::InvalidProportionalGain`], [`PidConfigError::InvalidIntegralGain`] or
    ///   [`PidConfigError::InvalidDerivativeGain`] if the respective gain is negative or not
    ///   finite. Nothing is updated in that case, not even the proportional mode.
    pub fn set_tunings(
        &mut self,
        tunings: Tunings<T>,
        proportional_mode: ProportionalMode,
    ) -> Result<(), PidConfigError> {
        if let Err(err) = tunings.validate() {
            warn!("Rejected PID tunings: {}", err);
            return Err(err);
        }

        self.tunings = tunings;
        self.proportional_mode = proportional_mode;

        let sample_time_secs = self.sample_time_secs();
        self.kp = tunings.kp;
        self.ki = tunings.ki * sample_time_secs;
        self.kd = tunings.kd / sample_time_secs;

        if self.direction == Direction::Reverse {
            self.negate_working_gains();
        }
        Ok(())
    }

    /// Sets the sample time, rescaling the working integral and derivative gains so the
    /// continuous-time behavior of the controller is unchanged.
    ///
    /// # Errors
    /// - [`PidConfigError::InvalidSampleTime`] if the sample time is zero.
    pub fn set_sample_time(&mut self, sample_time: Duration) -> Result<(), PidConfigError> {
        if sample_time.is_zero() {
            warn!("Rejected zero PID sample time");
            return Err(PidConfigError::InvalidSampleTime);
        }

        let ratio: T = lit(sample_time.as_secs_f64() / self.sample_time.as_secs_f64());
        self.ki = self.ki * ratio;
        self.kd = self.kd / ratio;

        debug!(
            "PID sample time changed from {} us to {} us",
            self.sample_time.as_micros() as u64,
            sample_time.as_micros() as u64
        );
        self.sample_time = sample_time;
        Ok(())
    }

    /// Sets the minimum and maximum output limits for the PID controller.
    ///
    /// These limits may be set to infinity to disable clamping. The output limits also bound the
    /// integrator in every proportional mode.
    ///
    /// # Errors
    /// - [`PidConfigError::InvalidOutputLimits`] if the minimum limit is greater than or equal to
    ///   the maximum limit, or either limit is NaN.
    pub fn set_output_limits(&mut self, output_min: T, output_max: T) -> Result<(), PidConfigError> {
        if output_min >= output_max || output_min.is_nan() || output_max.is_nan() {
            warn!("Rejected PID output limits");
            return Err(PidConfigError::InvalidOutputLimits);
        }

        self.output_min = output_min;
        self.output_max = output_max;
        Ok(())
    }

    /// Sets dedicated limits for the integrator.
    ///
    /// They apply on top of the output limits, and only in [`ProportionalMode::OnError`]. Limits
    /// tighter than the output limits keep the integral term from dominating the output.
    ///
    /// # Errors
    /// - [`PidConfigError::InvalidIntegratorLimits`] if the minimum limit is greater than or equal
    ///   to the maximum limit, or either limit is NaN.
    pub fn set_integrator_limits(
        &mut self,
        integrator_min: T,
        integrator_max: T,
    ) -> Result<(), PidConfigError> {
        if integrator_min >= integrator_max || integrator_min.is_nan() || integrator_max.is_nan() {
            warn!("Rejected PID integrator limits");
            return Err(PidConfigError::InvalidIntegratorLimits);
        }

        self.integrator_min = integrator_min;
        self.integrator_max = integrator_max;
        Ok(())
    }

    /// Sets the smoothing factor `alpha` of the exponential input filter
    /// `filtered = alpha * filtered + (1 - alpha) * input`.
    ///
    /// The higher the factor, the heavier the filtering and the longer the delay. The factor is not
    /// validated; values outside `[0, 1]` amplify or invert the filter and are a usage error.
    pub fn set_smoothing_factor(&mut self, alpha: T) {
        self.alpha = alpha;
    }

    /// Sets the controller direction, negating the working gains if the direction changes.
    ///
    /// Returns whether the direction changed.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction {
            return false;
        }
        self.negate_working_gains();
        self.direction = direction;
        debug!("PID direction changed to {}", direction);
        true
    }

    fn negate_working_gains(&mut self) {
        self.kp = T::zero() - self.kp;
        self.ki = T::zero() - self.ki;
        self.kd = T::zero() - self.kd;
    }

    /// Runs one step of the PID law.
    ///
    /// This function is pure: the state lives in `ctx`, which is consumed and returned updated
    /// together with the new, clamped output. `current_output` is the output value presently
    /// applied to the process and feeds the anti-windup check. No sample time gating happens here;
    /// [`PidController::compute`] wraps this function with the scheduler.
    pub fn update(
        &self,
        mut ctx: PidContext<T>,
        input: T,
        setpoint: T,
        current_output: T,
    ) -> (T, PidContext<T>) {
        let p_on_e = self.is_p_on_e();
        let error = setpoint - input;

        // Freeze the integrator while the output is pinned to a limit by the other terms
        let band: T = lit(SATURATION_BAND);
        let unsaturated =
            current_output < self.output_max - band && current_output > self.output_min + band;
        if !p_on_e || unsaturated {
            ctx.integrator = ctx.integrator + self.ki * error;
        }

        let previous_filtered_input = ctx.filtered_input;
        ctx.filtered_input =
            self.alpha * previous_filtered_input + (T::one() - self.alpha) * input;

        // Differentiate the input rather than the error to avoid derivative kick on setpoint steps.
        // Proportional-on-measurement uses the raw difference, since filtering starves it of the
        // small changes it needs to start acting
        let delta_input = match self.proportional_mode {
            ProportionalMode::OnError => {
                (ctx.filtered_input - previous_filtered_input) / self.sample_time_secs()
            }
            ProportionalMode::OnMeasurement => input - ctx.last_input,
        };

        if !p_on_e {
            ctx.integrator = ctx.integrator - self.kp * delta_input;
        }

        ctx.integrator = clamp(ctx.integrator, self.output_min, self.output_max);
        if p_on_e {
            ctx.integrator = clamp(ctx.integrator, self.integrator_min, self.integrator_max);
        }

        let p_part = if p_on_e { self.kp * error } else { T::zero() };
        let output = clamp(
            p_part + (ctx.integrator - self.kd * delta_input),
            self.output_min,
            self.output_max,
        );

        ctx.delta_input = delta_input;
        ctx.last_input = input;
        ctx.last_p_part = p_part;
        ctx.last_d_part = T::zero() - self.kd * delta_input;
        ctx.last_error = error;
        (output, ctx)
    }
}

/// Builds a [`PidConfig`], validating every value at once.
#[derive(Copy, Clone, Debug)]
pub struct PidConfigBuilder<T: FloatCore> {
    tunings: Tunings<T>,
    proportional_mode: ProportionalMode,
    direction: Direction,
    sample_time: Duration,
    output_limits: (T, T),
    integrator_limits: (T, T),
    alpha: T,
}

impl<T: FloatCore> Default for PidConfigBuilder<T> {
    fn default() -> Self {
        let config = PidConfig::default();
        Self {
            tunings: config.tunings,
            proportional_mode: config.proportional_mode,
            direction: config.direction,
            sample_time: config.sample_time,
            output_limits: config.output_limits(),
            integrator_limits: config.integrator_limits(),
            alpha: config.alpha,
        }
    }
}

impl<T: FloatCore> PidConfigBuilder<T> {
    /// Sets the proportional gain
    pub fn kp(mut self, kp: T) -> Self {
        self.tunings.kp = kp;
        self
    }

    /// Sets the integral gain
    pub fn ki(mut self, ki: T) -> Self {
        self.tunings.ki = ki;
        self
    }

    /// Sets the derivative gain
    pub fn kd(mut self, kd: T) -> Self {
        self.tunings.kd = kd;
        self
    }

    /// Sets all three gains
    pub fn tunings(mut self, tunings: Tunings<T>) -> Self {
        self.tunings = tunings;
        self
    }

    /// Selects proportional-on-error or proportional-on-measurement
    pub fn proportional_mode(mut self, proportional_mode: ProportionalMode) -> Self {
        self.proportional_mode = proportional_mode;
        self
    }

    /// Sets the controller direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the sample time
    pub fn sample_time(mut self, sample_time: Duration) -> Self {
        self.sample_time = sample_time;
        self
    }

    /// Sets the output limits
    pub fn output_limits(mut self, output_min: T, output_max: T) -> Self {
        self.output_limits = (output_min, output_max);
        self
    }

    /// Sets the integrator limits
    pub fn integrator_limits(mut self, integrator_min: T, integrator_max: T) -> Self {
        self.integrator_limits = (integrator_min, integrator_max);
        self
    }

    /// Sets the smoothing factor of the input filter
    pub fn smoothing_factor(mut self, alpha: T) -> Self {
        self.alpha = alpha;
        self
    }

    /// Validates the collected values and produces the configuration.
    ///
    /// The gains are scaled against the final sample time regardless of the order in which the
    /// builder methods were called.
    ///
    /// # Errors
    /// Returns the first error the equivalent sequence of [`PidConfig`] setters would produce.
    pub fn build(self) -> Result<PidConfig<T>, PidConfigError> {
        let mut config = PidConfig::default();
        config.set_sample_time(self.sample_time)?;
        config.set_output_limits(self.output_limits.0, self.output_limits.1)?;
        config.set_integrator_limits(self.integrator_limits.0, self.integrator_limits.1)?;
        config.direction = self.direction;
        config.set_tunings(self.tunings, self.proportional_mode)?;
        config.set_smoothing_factor(self.alpha);
        Ok(config)
    }
}

/// The evolving state of a PID controller: the integrator, the input filter and the diagnostics of
/// the last computation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PidContext<T> {
    integrator: T,
    last_input: T,
    filtered_input: T,
    delta_input: T,
    last_error: T,
    last_p_part: T,
    last_d_part: T,
}

impl<T: FloatCore> PidContext<T> {
    /// Creates a context with a zeroed integrator and history
    pub fn new() -> Self {
        Self {
            integrator: T::zero(),
            last_input: T::zero(),
            filtered_input: T::zero(),
            delta_input: T::zero(),
            last_error: T::zero(),
            last_p_part: T::zero(),
            last_d_part: T::zero(),
        }
    }

    /// Creates a context primed for a bumpless start.
    ///
    /// The integrator takes over `output`, clamped into the output limits of `config`, and the
    /// input history is seeded with `input`. The next [`PidConfig::update`] then continues from
    /// `output` instead of jumping.
    pub fn new_bumpless(config: &PidConfig<T>, input: T, output: T) -> Self {
        let mut ctx = Self::new();
        ctx.initialize(config, input, output);
        ctx
    }

    fn initialize(&mut self, config: &PidConfig<T>, input: T, output: T) {
        self.integrator = clamp(output, config.output_min, config.output_max);
        self.last_input = input;
        self.filtered_input = input;
    }

    /// Returns the integrator, which is the I part of the output (in proportional-on-measurement
    /// mode it also carries the proportional action)
    pub fn integrator(&self) -> T {
        self.integrator
    }

    pub fn last_input(&self) -> T {
        self.last_input
    }

    pub fn filtered_input(&self) -> T {
        self.filtered_input
    }

    /// Returns the input differential the D part was computed from
    pub fn delta_input(&self) -> T {
        self.delta_input
    }

    pub fn error(&self) -> T {
        self.last_error
    }

    pub fn p_part(&self) -> T {
        self.last_p_part
    }

    pub fn d_part(&self) -> T {
        self.last_d_part
    }
}

/// A PID controller bound to caller-owned input, output and setpoint variables.
///
/// The controller starts in [`Mode::Manual`]. Call [`PidController::compute`] on every iteration
/// of the application loop; it computes a new output at most once per sample time, and only in
/// [`Mode::Automatic`].
///
/// `I` is the clock reading type and `T` the numeric type of the control quantities.
#[derive(Debug)]
pub struct PidController<'a, I: InstantLike, T: FloatCore = f64> {
    bindings: Bindings<'a, T>,
    config: PidConfig<T>,
    ctx: PidContext<T>,
    mode: Mode,
    last_time: Option<I>,
}

impl<'a, I: InstantLike, T: FloatCore> PidController<'a, I, T> {
    /// Creates a controller in [`Mode::Manual`] with default limits and sample time.
    ///
    /// If any of the gains is invalid, the tunings are rejected as in
    /// [`PidController::set_tunings`] and the controller starts with zero gains.
    pub fn new(
        bindings: Bindings<'a, T>,
        tunings: Tunings<T>,
        proportional_mode: ProportionalMode,
        direction: Direction,
    ) -> Self {
        let mut config = PidConfig::default();
        config.direction = direction;
        // Rejection is already logged, and leaves zero gains in place
        let _ = config.set_tunings(tunings, proportional_mode);
        Self::from_config(bindings, config)
    }

    /// Creates a controller with the proportional term acting on the error.
    pub fn with_direction(bindings: Bindings<'a, T>, tunings: Tunings<T>, direction: Direction) -> Self {
        Self::new(bindings, tunings, ProportionalMode::OnError, direction)
    }

    /// Creates a controller in [`Mode::Manual`] from a validated configuration
    pub fn from_config(bindings: Bindings<'a, T>, config: PidConfig<T>) -> Self {
        Self {
            bindings,
            config,
            ctx: PidContext::new(),
            mode: Mode::Manual,
            last_time: None,
        }
    }

    pub fn config(&self) -> &PidConfig<T> {
        &self.config
    }

    pub fn context(&self) -> &PidContext<T> {
        &self.ctx
    }

    /// Computes a new output if the controller is automatic and at least one sample time has
    /// elapsed since the last computation. The very first call in automatic mode always computes.
    ///
    /// This never blocks. Call it as often as convenient.
    ///
    /// # Returns
    /// - `true` if a new output was computed and written to the output variable.
    /// - `false` if nothing was done.
    pub fn compute(&mut self, now: I) -> bool {
        if self.mode == Mode::Manual {
            return false;
        }

        if let Some(last_time) = self.last_time {
            if now.duration_since(last_time) < self.config.sample_time {
                return false;
            }
        }

        let (output, ctx) = self.config.update(
            self.ctx,
            self.bindings.input.get(),
            self.bindings.setpoint.get(),
            self.bindings.output.get(),
        );
        self.ctx = ctx;
        self.bindings.output.set(output);
        self.last_time = Some(now);
        trace!("PID output computed");
        true
    }

    /// Switches between manual and automatic mode.
    ///
    /// Switching from manual to automatic performs a bumpless transfer: the integrator takes over
    /// the current output and the input history is reset to the current input, so the first
    /// automatic output continues from whatever the output was.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == Mode::Automatic && self.mode == Mode::Manual {
            self.ctx.initialize(
                &self.config,
                self.bindings.input.get(),
                self.bindings.output.get(),
            );
            debug!("PID switched to automatic");
        } else if mode == Mode::Manual && self.mode == Mode::Automatic {
            debug!("PID switched to manual");
        }
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns whether the controller is in automatic mode
    pub fn is_active(&self) -> bool {
        self.mode == Mode::Automatic
    }

    /// Sets the gains, keeping the current proportional mode.
    ///
    /// A zero integral gain also clears the integrator.
    ///
    /// # Errors
    /// See [`PidConfig::set_tunings`].
    pub fn set_tunings(&mut self, tunings: Tunings<T>) -> Result<(), PidConfigError> {
        self.set_tunings_with_mode(tunings, self.config.proportional_mode)
    }

    /// Sets the gains and the proportional mode.
    ///
    /// A zero integral gain also clears the integrator.
    ///
    /// # Errors
    /// See [`PidConfig::set_tunings`].
    pub fn set_tunings_with_mode(
        &mut self,
        tunings: Tunings<T>,
        proportional_mode: ProportionalMode,
    ) -> Result<(), PidConfigError> {
        self.config.set_tunings(tunings, proportional_mode)?;
        if tunings.ki == T::zero() {
            self.ctx.integrator = T::zero();
        }
        Ok(())
    }

    /// Sets the sample time. See [`PidConfig::set_sample_time`].
    ///
    /// # Errors
    /// - [`PidConfigError::InvalidSampleTime`] if the sample time is zero.
    pub fn set_sample_time(&mut self, sample_time: Duration) -> Result<(), PidConfigError> {
        self.config.set_sample_time(sample_time)
    }

    /// Sets the output limits. In automatic mode, the output variable and the integrator are
    /// clamped into the new limits immediately.
    ///
    /// # Errors
    /// - [`PidConfigError::InvalidOutputLimits`] if `output_min >= output_max`.
    pub fn set_output_limits(&mut self, output_min: T, output_max: T) -> Result<(), PidConfigError> {
        self.config.set_output_limits(output_min, output_max)?;

        if self.is_active() {
            let output = self.bindings.output.get();
            self.bindings
                .output
                .set(clamp(output, output_min, output_max));
            self.ctx.integrator = clamp(self.ctx.integrator, output_min, output_max);
        }
        Ok(())
    }

    /// Sets the integrator limits. In automatic mode, the integrator is clamped into the new limits
    /// immediately.
    ///
    /// # Errors
    /// - [`PidConfigError::InvalidIntegratorLimits`] if `integrator_min >= integrator_max`.
    pub fn set_integrator_limits(
        &mut self,
        integrator_min: T,
        integrator_max: T,
    ) -> Result<(), PidConfigError> {
        self.config
            .set_integrator_limits(integrator_min, integrator_max)?;

        if self.is_active() {
            self.ctx.integrator = clamp(self.ctx.integrator, integrator_min, integrator_max);
        }
        Ok(())
    }

    /// Sets the smoothing factor of the input filter. See [`PidConfig::set_smoothing_factor`].
    pub fn set_smoothing_factor(&mut self, alpha: T) {
        self.config.set_smoothing_factor(alpha);
    }

    /// Sets the controller direction. A change takes effect on the next computation without
    /// re-entering the tunings.
    ///
    /// A change made in [`Mode::Manual`] is applied too, and carries over into automatic mode.
    pub fn set_controller_direction(&mut self, direction: Direction) {
        self.config.set_direction(direction);
    }

    pub fn direction(&self) -> Direction {
        self.config.direction
    }

    pub fn proportional_mode(&self) -> ProportionalMode {
        self.config.proportional_mode
    }

    /// Returns whether the proportional term acts on the error
    pub fn is_p_on_e(&self) -> bool {
        self.config.is_p_on_e()
    }

    /// Returns the proportional gain as entered by the user
    pub fn kp(&self) -> T {
        self.config.kp()
    }

    /// Returns the integral gain as entered by the user
    pub fn ki(&self) -> T {
        self.config.ki()
    }

    /// Returns the derivative gain as entered by the user
    pub fn kd(&self) -> T {
        self.config.kd()
    }

    pub fn sample_time(&self) -> Duration {
        self.config.sample_time
    }

    pub fn output_limits(&self) -> (T, T) {
        self.config.output_limits()
    }

    pub fn integrator_limits(&self) -> (T, T) {
        self.config.integrator_limits()
    }

    pub fn smoothing_factor(&self) -> T {
        self.config.alpha
    }

    /// Returns the input differential behind the last D part
    pub fn delta_input(&self) -> T {
        self.ctx.delta_input
    }

    /// Returns the error of the last computation
    pub fn input_error(&self) -> T {
        self.ctx.last_error
    }

    pub fn last_p_part(&self) -> T {
        self.ctx.last_p_part
    }

    /// Returns the integrator
    pub fn last_i_part(&self) -> T {
        self.ctx.integrator
    }

    pub fn last_d_part(&self) -> T {
        self.ctx.last_d_part
    }

    /// Returns the time of the last computation, if any
    pub fn last_time(&self) -> Option<I> {
        self.last_time
    }
}
