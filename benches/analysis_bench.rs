//! lc3fx 性能基准测试.
//!
//! 覆盖 MDCT 分析、频带能量估计与完整的逐帧分析路径.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lc3fx::basop::{Word16, Word32};
use lc3fx::core::{CodecConfig, FrameDuration, SampleRate, ScratchArena};
use lc3fx::dsp::{BandLayout, DctIv, MdctWindow, per_band_energy, process_mdct};

/// 生成 N 个样点的测试帧
fn make_frame(n: usize) -> Vec<Word16> {
    (0..n)
        .map(|i| ((i * 7919 % 4096) as Word16 - 2048).wrapping_mul(4))
        .collect()
}

fn bench_mdct(c: &mut Criterion) {
    for (rate, duration) in [
        (SampleRate::Hz48000, FrameDuration::Ms10),
        (SampleRate::Hz48000, FrameDuration::Ms2_5),
        (SampleRate::Hz16000, FrameDuration::Ms10),
    ] {
        let n = rate.frame_len(duration);
        c.bench_function(&format!("mdct_{n}_{duration}"), |b| {
            let window = MdctWindow::for_duration(n, duration).unwrap();
            let dct = DctIv::new(n).unwrap();
            let mut arena = ScratchArena::new(n);
            let mut mem = vec![0; window.memory_len()];
            let x = make_frame(n);
            let mut y = vec![0; n];
            b.iter(|| {
                let e = process_mdct(
                    black_box(&x),
                    &mut mem,
                    window.coefficients(),
                    &dct,
                    &mut y,
                    &mut arena.frame(),
                );
                black_box(e);
            });
        });
    }
}

fn bench_band_energy(c: &mut Criterion) {
    c.bench_function("per_band_energy_48k_10ms", |b| {
        let layout = BandLayout::new(SampleRate::Hz48000, FrameDuration::Ms10, false);
        let d: Vec<Word32> = (0..480).map(|i| ((i * 104_729) % 65_536 - 32_768) << 12).collect();
        let mut d2 = vec![0; layout.n_bands()];
        let mut arena = ScratchArena::new(480);
        b.iter(|| {
            let e = per_band_energy(black_box(&d), 3, &layout, &mut d2, &mut arena.frame());
            black_box(e);
        });
    });
}

fn bench_analyzer(c: &mut Criterion) {
    c.bench_function("analyzer_frame_48k_10ms_stereo", |b| {
        let config = CodecConfig::new(SampleRate::Hz48000, FrameDuration::Ms10, 2);
        let mut analyzer = lc3fx::dsp::SpectralAnalyzer::new(&config).unwrap();
        let x = make_frame(analyzer.frame_len());
        let mut spectrum = vec![0; analyzer.frame_len()];
        let mut energies = vec![0; analyzer.n_bands()];
        b.iter(|| {
            for channel in 0..2 {
                let frame = analyzer.analyze(channel, black_box(&x), &mut spectrum, &mut energies);
                black_box(frame);
            }
        });
    });
}

criterion_group!(benches, bench_mdct, bench_band_energy, bench_analyzer);
criterion_main!(benches);
