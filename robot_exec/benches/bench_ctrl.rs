//! # Control Cycle Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use comms_if::eqpt::mech::ActuatorSens;
use robot_lib::{
    arm_ctrl::{self, ArmCtrl, ArmGains},
    vision::PoseEstimate,
};
use util::module::State;

fn arm_ctrl_benchmark(c: &mut Criterion) {
    // ---- Build an arm which has already homed ----

    let params = arm_ctrl::Params {
        min_pos_deg: 0.0,
        max_pos_deg: 105.0,
        tolerance_deg: 2.0,
        degrees_per_rotation: 1.8,
        encoder_offset_rot: 0.0,
        gains: ArmGains {
            k_p: 0.018,
            k_g: 0.42,
            k_v: 0.0,
        },
        brake_enabled: true,
    };

    let mut arm = ArmCtrl::from_params(params).unwrap();

    let input = arm_ctrl::InputData {
        sens: ActuatorSens {
            pos_rot: 25.0,
            vel_rpm: 10.0,
            current_a: 2.0,
            abs_pos_rot: Some(0.125),
        },
    };

    arm.proc(&input).unwrap();
    arm.set_target_position(80.0);

    c.bench_function("ArmCtrl::proc::position", |b| {
        b.iter(|| arm.proc(black_box(&input)).unwrap())
    });

    arm.set_target_output(0.4);

    c.bench_function("ArmCtrl::proc::output", |b| {
        b.iter(|| arm.proc(black_box(&input)).unwrap())
    });
}

fn pose_decode_benchmark(c: &mut Criterion) {
    let raw = [1.5, 2.5, 0.0, 0.0, 0.0, 90.0, 20.0, 2.0, 1.2, 3.0, 0.5];

    c.bench_function("PoseEstimate::decode", |b| {
        b.iter(|| PoseEstimate::decode(black_box(&raw), black_box(5_000_000)))
    });
}

criterion_group!(benches, arm_ctrl_benchmark, pose_decode_benchmark);
criterion_main!(benches);
