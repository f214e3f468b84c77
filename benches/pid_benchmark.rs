//! Benchmark for the PID controller
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

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bumpless_pid::{pid, time};

fn make_config(proportional_mode: pid::ProportionalMode) -> pid::PidConfig<f64> {
    pid::PidConfigBuilder::default()
        .kp(1.0)
        .ki(0.5)
        .kd(0.1)
        .proportional_mode(proportional_mode)
        .output_limits(-10.0, 10.0)
        .build()
        .unwrap()
}

/// The pure update law, without scheduling or bindings
fn bench_update(c: &mut Criterion) {
    let config = make_config(pid::ProportionalMode::OnError);
    let mut ctx = pid::PidContext::new();
    let setpoint = 1.0;
    let mut measurement = 0.9;
    let mut output: f64 = 0.0;

    c.bench_function("update law", |b| {
        b.iter(|| {
            (output, ctx) = config.update(ctx, black_box(measurement), black_box(setpoint), output);
            measurement += 0.0001; // prevent constant inputs
            black_box(output);
        });
    });
}

/// A computed tick through the bound cells, once per benchmark iteration
fn bench_computed_tick(c: &mut Criterion) {
    for (name, mode) in [
        ("computed tick, P on E", pid::ProportionalMode::OnError),
        ("computed tick, P on M", pid::ProportionalMode::OnMeasurement),
    ] {
        let input = Cell::new(0.9);
        let output = Cell::new(0.0);
        let setpoint = Cell::new(1.0);
        let mut pid = pid::PidController::from_config(
            pid::Bindings::new(&input, &output, &setpoint),
            make_config(mode),
        );
        pid.set_mode(pid::Mode::Automatic);

        let dt = 100;
        let mut now = time::Millis(0);

        c.bench_function(name, |b| {
            b.iter(|| {
                input.set(input.get() + 0.0001); // prevent constant inputs
                black_box(pid.compute(now));
                now.0 = now.0.wrapping_add(dt);
                black_box(output.get());
            });
        });
    }
}

/// The common case in a busy loop: polling before the sample time elapsed. This should cost little
/// more than the elapsed time comparison.
fn bench_early_poll(c: &mut Criterion) {
    let input = Cell::new(0.9);
    let output = Cell::new(0.0);
    let setpoint = Cell::new(1.0);
    let mut pid = pid::PidController::from_config(
        pid::Bindings::new(&input, &output, &setpoint),
        make_config(pid::ProportionalMode::OnError),
    );
    pid.set_mode(pid::Mode::Automatic);
    assert!(pid.compute(time::Millis(0)));

    c.bench_function("early poll", |b| {
        b.iter(|| black_box(pid.compute(black_box(time::Millis(50)))));
    });
}

criterion_group!(benches, bench_update, bench_computed_tick, bench_early_poll);
criterion_main!(benches);
