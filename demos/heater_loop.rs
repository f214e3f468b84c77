//! Closed-loop heater simulation under PID control, printed as a table.
//! This example requires the `--features simulation` flag to be enabled.
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

#[cfg(feature = "simulation")]
pub fn main() {
    use core::cell::Cell;

    use nalgebra as na;

    use bumpless_pid::pid::{Bindings, Direction, Mode, PidController, ProportionalMode, Tunings};
    use bumpless_pid::sim;
    use bumpless_pid::time::Millis;

    // The application loop spins every 10ms, the controller samples every 100ms
    const LOOP_PERIOD_MS: u32 = 10;
    const LOOP_PERIOD_S: f64 = LOOP_PERIOD_MS as f64 * 0.001;

    let plant = sim::TwoLagPlant {
        gain: 0.5,
        actuator_time_constant: 4.0,
        sensor_time_constant: 1.0,
    };

    let temperature = Cell::new(0.0);
    let duty = Cell::new(0.0);
    let target = Cell::new(0.0);

    let mut pid = PidController::new(
        Bindings::new(&temperature, &duty, &target),
        Tunings::new(4.0, 1.0, 0.0),
        ProportionalMode::OnError,
        Direction::Direct,
    );
    if let Err(err) = pid.set_output_limits(0.0, 100.0) {
        eprintln!("{err}");
        return;
    }

    let mut state = na::Vector2::<f64>::zeros();

    // Preheat by hand at 20% duty, then hand over to the controller and step the setpoint
    duty.set(20.0);
    println!("{:>8} {:>10} {:>10} {:>8} {:>8}", "t [s]", "setpoint", "temp", "duty", "mode");
    for i in 0..6000u32 {
        let now = Millis(i * LOOP_PERIOD_MS);
        if i == 2000 {
            target.set(temperature.get());
            pid.set_mode(Mode::Automatic);
        }
        if i == 3000 {
            target.set(30.0);
        }

        temperature.set(plant.h(state));
        let computed = pid.compute(now);

        let control = duty.get();
        state = sim::rk4_step(|x| plant.f(x, control), state, LOOP_PERIOD_S);

        if (computed && i % 100 == 0) || (pid.mode() == Mode::Manual && i % 500 == 0) {
            println!(
                "{:>8.1} {:>10.2} {:>10.2} {:>8.2} {:>8?}",
                f64::from(now.0) * 0.001,
                target.get(),
                temperature.get(),
                duty.get(),
                pid.mode()
            );
        }
    }
}

#[cfg(not(feature = "simulation"))]
fn main() {
    eprintln!("This example requires `--features simulation` to run.");
}
