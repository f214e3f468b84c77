// Plant models for closed-loop simulation of the PID controller
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

use nalgebra as na;

/// A heater driving a thermal mass, observed through a lagging sensor.
pub struct TwoLagPlant {
    pub gain: f64,
    pub actuator_time_constant: f64,
    pub sensor_time_constant: f64,
}

impl TwoLagPlant {
    /// Implements the state-space realization of two cascaded first-order lags:
    /// ┌     ┐   ┌              ┐┌    ┐   ┌      ┐
    /// │ x₁' │ = │ -1/τ₁   0    ││ x₁ │ + │ K/τ₁ │ u
    /// │ x₂' │   │  1/τ₂  -1/τ₂ ││ x₂ │   │ 0    │
    /// └     ┘   └              ┘└    ┘   └      ┘
    ///     ┌      ┐┌    ┐
    /// y = │ 0  1 ││ x₁ │
    ///     └      ┘│ x₂ │
    ///             └    ┘
    pub fn f(&self, x: na::Vector2<f64>, u: f64) -> na::Vector2<f64> {
        let inv_tau_1 = 1.0 / self.actuator_time_constant;
        let inv_tau_2 = 1.0 / self.sensor_time_constant;

        let mat_a = na::Matrix2::new(-inv_tau_1, 0.0, inv_tau_2, -inv_tau_2);
        let mat_b = na::Vector2::new(self.gain * inv_tau_1, 0.0);

        mat_a * x + mat_b * u
    }

    pub fn h(&self, x: na::Vector2<f64>) -> f64 {
        x[1]
    }
}

/// Advances `x' = f(x)` by `dt` with the classic fourth-order Runge-Kutta method
pub fn rk4_step<F>(f: F, x: na::Vector2<f64>, dt: f64) -> na::Vector2<f64>
where
    F: Fn(na::Vector2<f64>) -> na::Vector2<f64>,
{
    let k1 = f(x);
    let k2 = f(x + k1 * (0.5 * dt));
    let k3 = f(x + k2 * (0.5 * dt));
    let k4 = f(x + k3 * dt);
    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}
