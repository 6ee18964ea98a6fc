//! Tests for the spatialization engine


use tin_ear_dsp::spatializer::{ild_gains, SpatialVoice};
use tin_ear_dsp::SAMPLE_RATE;

const BLOCK_SIZE: usize = 256;

/// Deterministic broadband test signal.
fn test_signal(length: usize) -> Vec<f32> {
    let mut seed = 0x12345678u32;
    (0..length)
        .map(|_| {
            seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
            (seed >> 8) as f32 / (1 << 24) as f32 - 0.5
        })
        .collect()
}

#[test]
fn silence_in_silence_out() {
    let mut voice = SpatialVoice::new();
    voice.init();

    let input = [0.0; BLOCK_SIZE];
    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];

    for _ in 0..16 {
        voice.render(0.3, 0.2, 0.8, &input, &mut left, &mut right);
        assert!(left.iter().all(|x| *x == 0.0));
        assert!(right.iter().all(|x| *x == 0.0));
    }
}

#[test]
fn itd_symmetry_across_median_plane() {
    let mut voice_left = SpatialVoice::new();
    let mut voice_right = SpatialVoice::new();
    voice_left.init();
    voice_right.init();

    let input = test_signal(BLOCK_SIZE);
    let mut l_a = [0.0; BLOCK_SIZE];
    let mut r_a = [0.0; BLOCK_SIZE];
    let mut l_b = [0.0; BLOCK_SIZE];
    let mut r_b = [0.0; BLOCK_SIZE];

    for _ in 0..8 {
        voice_left.render(1.5, 0.3, 0.5, &input, &mut l_a, &mut r_a);
        voice_right.render(-1.5, 0.3, 0.5, &input, &mut l_b, &mut r_b);

        // Mirrored sources swap the ears.
        for n in 0..BLOCK_SIZE {
            assert!((l_a[n] - r_b[n]).abs() < 1.0e-6, "mismatch at sample {n}");
            assert!((r_a[n] - l_b[n]).abs() < 1.0e-6, "mismatch at sample {n}");
        }
    }
}

#[test]
fn ild_gains_are_bounded_and_complementary() {
    for n in 0..=200 {
        let sin_az = -1.0 + (n as f32) * 0.01;
        let (left, right) = ild_gains(sin_az);
        assert!((0.75..=1.25).contains(&left));
        assert!((0.75..=1.25).contains(&right));
        assert!((left + right - 2.0).abs() < 1.0e-6);
    }

    assert_eq!(ild_gains(1.0), (1.25, 0.75));
    assert_eq!(ild_gains(-1.0), (0.75, 1.25));
    assert_eq!(ild_gains(0.0), (1.0, 1.0));
}

#[test]
fn block_boundary_continuity() {
    // A source straight ahead at the default distance keeps every ramp
    // settled, so splitting a block must not change a single sample.
    let mut voice_whole = SpatialVoice::new();
    let mut voice_split = SpatialVoice::new();
    voice_whole.init();
    voice_split.init();

    let input = test_signal(256);
    let mut left_whole = [0.0; 256];
    let mut right_whole = [0.0; 256];
    let mut left_split = [0.0; 256];
    let mut right_split = [0.0; 256];

    voice_whole.render(0.0, 0.0, 1.0, &input, &mut left_whole, &mut right_whole);
    voice_split.render(
        0.0,
        0.0,
        1.0,
        &input[..128],
        &mut left_split[..128],
        &mut right_split[..128],
    );
    voice_split.render(
        0.0,
        0.0,
        1.0,
        &input[128..],
        &mut left_split[128..],
        &mut right_split[128..],
    );

    assert_eq!(left_whole, left_split);
    assert_eq!(right_whole, right_split);
}

#[test]
fn tall_source_reflection_delay_saturates_instead_of_wrapping() {
    let mut voice = SpatialVoice::new();
    voice.init();

    let silence = [0.0; BLOCK_SIZE];
    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];

    // A source 8 m overhead asks for a ~1120 sample reflection path, far
    // past the 512-sample line; the delay must saturate at the capacity.
    for _ in 0..4 {
        voice.render(0.0, 8.0, 0.1, &silence, &mut left, &mut right);
    }

    let mut impulse = [0.0; BLOCK_SIZE];
    impulse[0] = 1.0;

    let mut peak = 0.0f32;
    for block in 0..8 {
        let input: &[f32] = if block == 0 { &impulse } else { &silence };
        voice.render(0.0, 8.0, 0.1, input, &mut left, &mut right);
        for n in 0..BLOCK_SIZE {
            assert!(left[n].is_finite(), "non-finite output at sample {n}");
            assert!(right[n].is_finite(), "non-finite output at sample {n}");
            peak = peak.max(left[n].abs()).max(right[n].abs());
        }
    }

    // Direct path plus one −6 dB reflection of a unit impulse.
    assert!(peak <= 2.0, "unit impulse produced peak {peak}");
    assert!(peak > 1.0e-3, "impulse should still be audible");
}

#[test]
fn impulse_from_the_left_lags_and_boosts_the_left_ear() {
    let mut voice = SpatialVoice::new();
    voice.init();

    let silence = [0.0; BLOCK_SIZE];
    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];

    // Let the position ramps settle on the target before the impulse.
    for _ in 0..4 {
        voice.render(1.0, 0.0, 0.0, &silence, &mut left, &mut right);
    }

    let mut impulse = [0.0; BLOCK_SIZE];
    impulse[0] = 1.0;
    voice.render(1.0, 0.0, 0.0, &impulse, &mut left, &mut right);

    let onset = |out: &[f32]| out.iter().position(|x| x.abs() > 1.0e-3).unwrap();
    let peak = |out: &[f32]| out.iter().fold(0.0f32, |acc, x| acc.max(x.abs()));

    // The channel on the source side lags by the full interaural delay
    // (0.5 ms, 24 samples at 48 kHz) and carries the higher level.
    let expected_itd = (0.0005 * SAMPLE_RATE) as usize;
    let lag = onset(&left) - onset(&right);
    assert!(
        lag.abs_diff(expected_itd) <= 1,
        "interaural lag {lag} samples, expected about {expected_itd}"
    );
    assert!(peak(&left) > peak(&right), "source side should be louder");

    // At ground level the reflection path coincides with the direct one,
    // so no separate late arrival shows up on the dry ear.
    let last = BLOCK_SIZE - right[..].iter().rev().position(|x| x.abs() > 1.0e-3).unwrap();
    assert!(last < 64, "unexpected late energy at sample {last}");
}

#[test]
fn orbit() {
    let duration = 2.0;
    let frequency = 220.0;

    let mut voice = SpatialVoice::new();
    let mut input = [0.0; BLOCK_SIZE];
    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];
    let mut wav_left = Vec::new();
    let mut wav_right = Vec::new();
    voice.init();

    let blocks = (duration * SAMPLE_RATE / (BLOCK_SIZE as f32)) as usize;
    let mut phase = 0.0f32;

    for n in 0..blocks {
        for in_sample in input.iter_mut() {
            phase += frequency / SAMPLE_RATE;
            phase -= phase.floor();
            *in_sample = 0.5 * (2.0 * std::f32::consts::PI * phase).sin();
        }

        // Sweep the source through a half orbit at 2 m distance.
        let azimuth = -std::f32::consts::FRAC_PI_2
            + std::f32::consts::PI * (n as f32) / (blocks as f32);
        voice.render(
            2.0 * azimuth.sin(),
            0.5,
            2.0 * azimuth.cos(),
            &input,
            &mut left,
            &mut right,
        );
        wav_left.extend_from_slice(&left);
        wav_right.extend_from_slice(&right);
    }

    wav_writer::write_stereo("spatializer/orbit.wav", &wav_left, &wav_right).ok();
}
