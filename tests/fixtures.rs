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

#[cfg(test)]
#[allow(dead_code)]
pub mod test_pid {

    use core::cell::Cell;

    use bumpless_pid::pid::*;
    use bumpless_pid::time::Millis;

    /// The caller-owned variables a controller under test is bound to
    pub struct Signals {
        pub input: Cell<f64>,
        pub output: Cell<f64>,
        pub setpoint: Cell<f64>,
    }

    impl Signals {
        pub fn new(input: f64, output: f64, setpoint: f64) -> Self {
            Self {
                input: Cell::new(input),
                output: Cell::new(output),
                setpoint: Cell::new(setpoint),
            }
        }

        pub fn bindings(&self) -> Bindings<'_, f64> {
            Bindings::new(&self.input, &self.output, &self.setpoint)
        }

        pub fn make_controller(
            &self,
            kp: f64,
            ki: f64,
            kd: f64,
            proportional_mode: ProportionalMode,
        ) -> PidController<'_, Millis> {
            PidController::new(
                self.bindings(),
                Tunings::new(kp, ki, kd),
                proportional_mode,
                Direction::Direct,
            )
        }

        /// A direct acting, proportional-on-error controller already in automatic mode
        pub fn make_automatic_controller(&self, kp: f64, ki: f64, kd: f64) -> PidController<'_, Millis> {
            let mut pid = self.make_controller(kp, ki, kd, ProportionalMode::OnError);
            pid.set_mode(Mode::Automatic);
            pid
        }
    }

    /// The earliest time at which the controller computes again
    pub fn next_timestamp(pid: &PidController<'_, Millis>) -> Millis {
        pid.last_time().unwrap_or(Millis(0)) + pid.sample_time()
    }
}
