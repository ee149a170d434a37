//! 频带能量估计.
//!
//! 对每个频带计算系数平方的均值, 先各自以最佳精度得到 (能量, 指数),
//! 再统一对齐到最大指数, 输出共享一个块指数.
//!
//! 单系数与双系数频带走专用的快速路径; 更宽的频带先求公共余量, 按宽度
//! 预留累加余量后求平方和, 乘以宽度倒数得到均值. 下标不小于 `max_bw_bin`
//! 的系数不参与计算.

use lc3fx_basop::{
    Frac32, Word16, Word32, add_sat, extract_h, get_scale_factor32, l_mac0, l_min, l_mult0,
    l_shl, l_shl_pos, l_shr_pos, norm_l, s_max, s_min, shl, shl_pos, sub_sat,
};
use lc3fx_core::{FrameDuration, SampleRate, ScratchFrame};

use crate::band_tables::BandLayout;
use crate::tables::{BANDS_NRG_SCALE, INV_INT_TABLE, MAX_BAND_WIDTH};

/// 对齐前的最小指数
const MIN_BAND_EXP: Word16 = -31;

/// 计算各频带平均能量, 返回 `d2` 的块指数 `2·d_exp + max_band_exp`.
///
/// - `d`: 频谱系数, 块指数为 `d_exp`
/// - `d2`: 输出, 至少 `n_bands` 个
/// - `scratch`: 需要 `n_bands` 个 16 位字存放各频带指数
pub fn per_band_energy(
    d: &[Word32],
    d_exp: Word16,
    layout: &BandLayout,
    d2: &mut [Word32],
    scratch: &mut ScratchFrame<'_>,
) -> Word16 {
    let n_bands = layout.n_bands();
    let offsets = layout.offsets();
    let max_bw = layout.max_bw_bin();
    let one = layout.bands_offset_one();
    let two = layout.bands_offset_two();
    debug_assert!(d2.len() >= n_bands);
    debug_assert!(d.len() >= max_bw.min(offsets[n_bands] as usize));
    debug_assert!(one <= two && two <= n_bands);

    let d2 = &mut d2[..n_bands];
    let exps = scratch.take_i16(n_bands);

    // 单系数频带
    for band in 0..one {
        let i = offsets[band] as usize;
        debug_assert_eq!(offsets[band + 1] as usize, i + 1);
        let coeff = if i < max_bw { d[i] } else { 0 };
        (d2[band], exps[band]) = single_energy(coeff);
    }

    // 双系数频带
    for band in one..two {
        let i = offsets[band] as usize;
        debug_assert_eq!(offsets[band + 1] as usize, i + 2);
        // 跨越上限时带外系数按零计入均值
        (d2[band], exps[band]) = if i + 1 < max_bw {
            pair_energy(d[i], d[i + 1])
        } else if i < max_bw {
            pair_energy(d[i], 0)
        } else {
            single_energy(0)
        };
    }

    // 宽频带
    for band in two..n_bands {
        let start = offsets[band] as usize;
        let end = offsets[band + 1] as usize;
        let stop = end.min(max_bw).max(start);
        let width = (end - start).min(MAX_BAND_WIDTH - 1);
        let coeffs = &d[start..stop];

        let s1 = s_min(15, get_scale_factor32(coeffs));
        let s2 = sub_sat(s1, BANDS_NRG_SCALE[width]);
        let mut nrg = 0;
        for &v in coeffs {
            let t = extract_h(l_shl(v, s2));
            nrg = l_mac0(nrg, t, t);
        }
        let mean = (Frac32(nrg) * INV_INT_TABLE[width]).raw();
        let s = norm_l(mean);
        d2[band] = l_shl_pos(mean, s);
        exps[band] = sub_sat(1, add_sat(shl_pos(s2, 1), s));
    }

    // 对齐到最大指数
    let smax = exps.iter().fold(MIN_BAND_EXP, |acc, &e| s_max(acc, e));
    for (v, &e) in d2.iter_mut().zip(exps.iter()) {
        *v = l_shr_pos(*v, s_min(sub_sat(smax, e), 31));
    }

    add_sat(shl(d_exp, 1), smax)
}

/// 与参考接口一致的调用形式: 快速路径分段与带宽上限按
/// (采样率, 帧长, 是否线性) 查表, 频带边界取自 `band_offsets`.
#[allow(clippy::too_many_arguments)]
pub fn process_per_band_energy(
    d: &[Word32],
    d_exp: Word16,
    band_offsets: &[Word16],
    sample_rate: SampleRate,
    n_bands: usize,
    linear: bool,
    duration: FrameDuration,
    d2: &mut [Word32],
    scratch: &mut ScratchFrame<'_>,
) -> Word16 {
    let reference = BandLayout::new(sample_rate, duration, linear);
    let layout = BandLayout::with_thresholds(
        band_offsets,
        n_bands,
        reference.bands_offset_one().min(n_bands),
        reference.bands_offset_two().min(n_bands),
        reference.max_bw_bin(),
    );
    per_band_energy(d, d_exp, &layout, d2, scratch)
}

/// 单个系数的能量与指数; 零系数得到 `(0, 1 - 30)`
#[inline]
fn single_energy(v: Word32) -> (Word32, Word16) {
    let s2 = if v != 0 { s_min(15, norm_l(v)) } else { 15 };
    let t = extract_h(l_shl_pos(v, s2));
    (l_mult0(t, t), sub_sat(1, shl_pos(s2, 1)))
}

/// 两个系数的平均能量与指数
#[inline]
fn pair_energy(a: Word32, b: Word32) -> (Word32, Word16) {
    let mut s2 = 15;
    if a != 0 {
        s2 = s_min(s2, norm_l(a));
    }
    if b != 0 {
        s2 = s_min(s2, norm_l(b));
    }
    let ta = extract_h(l_shl_pos(a, s2));
    let tb = extract_h(l_shl_pos(b, s2));
    let nrg = l_min(l_mult0(ta, ta), 0x3FFF_FFFF);
    (
        l_shr_pos(l_mac0(nrg, tb, tb), 1),
        sub_sat(1, shl_pos(s2, 1)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc3fx_core::ScratchArena;

    fn run(d: &[Word32], d_exp: Word16, layout: &BandLayout) -> (Vec<Word32>, Word16) {
        let mut arena = ScratchArena::new(480);
        let mut d2 = vec![0; layout.n_bands()];
        let e = per_band_energy(d, d_exp, layout, &mut d2, &mut arena.frame());
        (d2, e)
    }

    fn to_real(words: &[Word32], exponent: Word16) -> Vec<f64> {
        let scale = 2f64.powi(exponent as i32 - 31);
        words.iter().map(|&w| w as f64 * scale).collect()
    }

    /// 两个单系数、两个双系数、两个宽频带
    fn mixed_layout(max_bw_bin: usize) -> BandLayout {
        BandLayout::from_offsets(&[0, 1, 2, 4, 6, 11, 20], max_bw_bin).unwrap()
    }

    #[test]
    fn test_零输入() {
        let layout = BandLayout::new(SampleRate::Hz48000, FrameDuration::Ms10, false);
        let d = vec![0; 480];
        let (d2, e) = run(&d, 7, &layout);
        assert!(d2.iter().all(|&v| v == 0));
        assert!((-100..100).contains(&e));
    }

    #[test]
    fn test_单系数能量() {
        let layout = mixed_layout(20);
        let mut d = vec![0; 20];
        d[0] = 0x4000_0000;
        let (d2, e) = run(&d, 0, &layout);
        let real = to_real(&d2, e);
        assert!((real[0] - 0.25).abs() < 1e-6);
        assert!(real[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_各频带均值() {
        let layout = mixed_layout(20);
        let d: Vec<Word32> = (0..20).map(|i| (i as Word32 + 1) * 0x0100_0000).collect();
        let (d2, e) = run(&d, 3, &layout);
        let got = to_real(&d2, e);
        let coeffs = to_real(&d, 3);
        let offsets = layout.offsets();
        for b in 0..layout.n_bands() {
            let (s, t) = (offsets[b] as usize, offsets[b + 1] as usize);
            let mean = coeffs[s..t].iter().map(|v| v * v).sum::<f64>() / (t - s) as f64;
            assert!((got[b] - mean).abs() < mean * 2e-3, "b={b}: {} vs {mean}", got[b]);
        }
    }

    #[test]
    fn test_带宽之外不参与计算() {
        // 上限依次落在单系数、双系数与宽频带区间内
        for &max_bw in &[1usize, 3, 4, 8, 11] {
            let layout = mixed_layout(max_bw);
            let base: Vec<Word32> = (0..20).map(|i| 0x0200_0000 * (i % 7 + 1)).collect();
            let mut noisy = base.clone();
            for v in noisy.iter_mut().skip(max_bw) {
                *v = i32::MIN + 12345;
            }
            let mut clean = base.clone();
            for v in clean.iter_mut().skip(max_bw) {
                *v = 0;
            }
            let (a, ea) = run(&noisy, 0, &layout);
            let (b, eb) = run(&clean, 0, &layout);
            assert_eq!((a.clone(), ea), (b, eb), "max_bw={max_bw}");

            let offsets = layout.offsets();
            for band in 0..layout.n_bands() {
                if offsets[band] as usize >= max_bw {
                    assert_eq!(a[band], 0, "max_bw={max_bw} band={band}");
                }
            }
        }
    }

    #[test]
    fn test_双系数频带跨越上限按零补齐() {
        let layout = mixed_layout(3);
        let mut d = vec![0; 20];
        d[2] = 0x1000_0000;
        d[3] = 0x7000_0000;
        let (d2, e) = run(&d, 0, &layout);
        let real = to_real(&d2, e);
        // 带内只有一个系数, 均值按宽度 2 计算
        let expected = (0x1000_0000 as f64 / 2f64.powi(31)).powi(2) / 2.0;
        assert!((real[2] - expected).abs() < expected * 1e-4, "{} vs {expected}", real[2]);
        assert_eq!(d2[3], 0);
    }

    #[test]
    fn test_截断频带的能量与宽度无关() {
        // 同样两个系数分别落在被截断的双系数频带与宽频带中, 能量乘宽度应一致
        let mut pair = vec![0; 20];
        pair[2] = 0x1000_0000;
        let (d2, e) = run(&pair, 0, &mixed_layout(3));
        let in_pair = to_real(&d2, e)[2] * 2.0;

        let mut wide = vec![0; 20];
        wide[6] = 0x1000_0000;
        let (d2, e) = run(&wide, 0, &mixed_layout(7));
        let in_wide = to_real(&d2, e)[4] * 5.0;

        let direct = (0x1000_0000 as f64 / 2f64.powi(31)).powi(2);
        assert!((in_pair - direct).abs() < direct * 1e-3, "{in_pair} vs {direct}");
        assert!((in_wide - direct).abs() < direct * 1e-3, "{in_wide} vs {direct}");
    }

    #[test]
    fn test_参考接口形式() {
        let layout = BandLayout::new(SampleRate::Hz16000, FrameDuration::Ms10, false);
        let d: Vec<Word32> = (0..160).map(|i| ((i * 7919) % 1000 - 500) << 20).collect();
        let (expected, e1) = run(&d, 2, &layout);

        let mut arena = ScratchArena::new(160);
        let mut d2 = vec![0; layout.n_bands()];
        let e2 = process_per_band_energy(
            &d,
            2,
            layout.offsets(),
            SampleRate::Hz16000,
            layout.n_bands(),
            false,
            FrameDuration::Ms10,
            &mut d2,
            &mut arena.frame(),
        );
        assert_eq!((d2, e2), (expected, e1));
    }
}
