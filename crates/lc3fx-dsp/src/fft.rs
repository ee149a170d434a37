//! 定点混合基 FFT.
//!
//! Stockham 自动排序结构, 支持长度为 2/3/4/5 乘积的变换, 覆盖所有
//! LC3plus 帧长对应的 N/2 (10..=240). 数据为交织的 32 位复数
//! (`re, im, re, im, ...`), 在数据缓冲与工作缓冲之间乒乓.
//!
//! 每一级先把输入右移 `ceil(log2 r)` 位, 使复数模在求和后仍小于 2^31,
//! 返回值为累计右移位数, 调用方据此调整块指数.

use log::debug;

use lc3fx_basop::{Frac16, Frac32, Word16, Word32, l_add_sat, l_negate_sat, l_shr, l_sub_sat};
use lc3fx_core::{Lc3Error, Lc3Result};

use crate::trig::cos_sin_q15;

/// 支持的最大基数
const MAX_RADIX: usize = 5;
/// 分解顺序: 尽量使用基 4, 再依次取 2/3/5
const RADIX_ORDER: [usize; 4] = [4, 2, 3, 5];

/// Q15 复数旋转因子 `re + i·im`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Twiddle {
    pub re: Frac16,
    pub im: Frac16,
}

impl Twiddle {
    /// `exp(-2πi·t/period)`
    pub fn forward(t: i64, period: i64) -> Self {
        let (re, im) = cos_sin_q15(-t, period);
        Self { re, im }
    }

    /// 复数乘法 `(x + iy)·(re + i·im)`
    #[inline]
    pub fn rotate(self, x: Word32, y: Word32) -> (Word32, Word32) {
        let (x, y) = (Frac32(x), Frac32(y));
        let re = l_sub_sat((x * self.re).raw(), (y * self.im).raw());
        let im = l_add_sat((x * self.im).raw(), (y * self.re).raw());
        (re, im)
    }
}

/// 基数 r 每级需要的保护位 `ceil(log2 r)`
fn guard_bits(radix: usize) -> Word16 {
    (usize::BITS - (radix - 1).leading_zeros()) as Word16
}

/// FFT 计划: 基数分解与旋转因子表
#[derive(Debug, Clone)]
pub struct FftPlan {
    len: usize,
    radices: Vec<usize>,
    twiddles: Box<[Twiddle]>,
}

impl FftPlan {
    /// 为长度 `len` 的复数 FFT 建立计划
    pub fn new(len: usize) -> Lc3Result<Self> {
        if len == 0 {
            return Err(Lc3Error::InvalidArgument("FFT 长度不能为 0".into()));
        }
        let mut rest = len;
        let mut radices = Vec::new();
        for radix in RADIX_ORDER {
            while rest % radix == 0 {
                radices.push(radix);
                rest /= radix;
            }
        }
        if rest != 1 {
            return Err(Lc3Error::InvalidArgument(format!(
                "FFT 长度 {len} 含有不支持的因子 {rest}"
            )));
        }

        let twiddles = (0..len)
            .map(|j| Twiddle::forward(j as i64, len as i64))
            .collect();
        debug!("创建 FFT 计划: M={len}, 基数={radices:?}");
        Ok(Self {
            len,
            radices,
            twiddles,
        })
    }

    /// 复数点数
    pub fn len(&self) -> usize {
        self.len
    }

    /// 计划是否为空变换
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 各级基数
    pub fn radices(&self) -> &[usize] {
        &self.radices
    }

    /// 一次正变换累计的右移位数
    pub fn scale_bits(&self) -> Word16 {
        self.radices.iter().map(|&r| guard_bits(r)).sum()
    }

    /// 原位正变换 `X[k] = Σ x[n]·exp(-2πi·nk/M) / 2^shift`, 返回 `shift`.
    ///
    /// `data` 长度为 `2M`, `work` 至少 `2M`, 内容会被覆盖.
    pub fn forward(&self, data: &mut [Word32], work: &mut [Word32]) -> Word16 {
        let m = self.len;
        assert_eq!(data.len(), 2 * m, "FFT 数据长度不匹配");
        assert!(work.len() >= 2 * m, "FFT 工作区不足");
        let work = &mut work[..2 * m];

        let mut n = m;
        let mut stride = 1;
        let mut in_data = true;
        let mut shift = 0;
        for &radix in &self.radices {
            if in_data {
                self.stage(data, work, n, stride, radix);
            } else {
                self.stage(work, data, n, stride, radix);
            }
            shift += guard_bits(radix);
            n /= radix;
            stride *= radix;
            in_data = !in_data;
        }
        if !in_data {
            data.copy_from_slice(work);
        }
        shift
    }

    /// 一级蝶形: 长度 n 的子序列按基数 r 拆分, 步长为 stride
    fn stage(&self, src: &[Word32], dst: &mut [Word32], n: usize, stride: usize, radix: usize) {
        let m = n / radix;
        let guard = guard_bits(radix);
        let unit = self.len / radix;
        let mut a = [(0, 0); MAX_RADIX];

        for p in 0..m {
            for q in 0..stride {
                for (j, slot) in a.iter_mut().enumerate().take(radix) {
                    let idx = 2 * (q + stride * (p + j * m));
                    *slot = (l_shr(src[idx], guard), l_shr(src[idx + 1], guard));
                }
                for k in 0..radix {
                    let (mut re, mut im) = a[0];
                    for (j, &value) in a.iter().enumerate().take(radix).skip(1) {
                        let (x, y) = self.rotate(value, (j * k % radix) * unit);
                        re = l_add_sat(re, x);
                        im = l_add_sat(im, y);
                    }
                    let (re, im) = self.rotate((re, im), p * k * stride % self.len);
                    let out = 2 * (q + stride * (radix * p + k));
                    dst[out] = re;
                    dst[out + 1] = im;
                }
            }
        }
    }

    /// 乘以 `exp(-2πi·index/M)`, ±1 与 ±i 直接换位
    #[inline]
    fn rotate(&self, (x, y): (Word32, Word32), index: usize) -> (Word32, Word32) {
        let len = self.len;
        if index == 0 {
            (x, y)
        } else if 2 * index == len {
            (l_negate_sat(x), l_negate_sat(y))
        } else if 4 * index == len {
            (y, l_negate_sat(x))
        } else if 4 * index == 3 * len {
            (l_negate_sat(y), x)
        } else {
            self.twiddles[index].rotate(x, y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn lcg(state: &mut u64) -> i32 {
        *state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (*state >> 33) as i32
    }

    fn reference_dft(input: &[Word32]) -> Vec<(f64, f64)> {
        let m = input.len() / 2;
        (0..m)
            .map(|k| {
                let mut acc = (0.0, 0.0);
                for n in 0..m {
                    let (x, y) = (input[2 * n] as f64, input[2 * n + 1] as f64);
                    let angle = -2.0 * PI * (n * k) as f64 / m as f64;
                    let (c, s) = (angle.cos(), angle.sin());
                    acc.0 += x * c - y * s;
                    acc.1 += x * s + y * c;
                }
                acc
            })
            .collect()
    }

    #[test]
    fn test_基数分解() {
        assert_eq!(FftPlan::new(240).unwrap().radices(), &[4, 4, 3, 5]);
        assert_eq!(FftPlan::new(10).unwrap().radices(), &[2, 5]);
        assert_eq!(FftPlan::new(30).unwrap().scale_bits(), 1 + 2 + 3);
        assert!(FftPlan::new(14).is_err());
        assert!(FftPlan::new(0).is_err());
    }

    #[test]
    fn test_与浮点_dft_一致() {
        let mut state = 0x1234_5678;
        for &m in &[10usize, 20, 30, 40, 60, 80, 120, 160, 240] {
            let plan = FftPlan::new(m).unwrap();
            let input: Vec<Word32> = (0..2 * m)
                .map(|_| lcg(&mut state) - (1 << 30))
                .map(|v| v >> 1)
                .collect();
            let mut data = input.clone();
            let mut work = vec![0; 2 * m];
            let shift = plan.forward(&mut data, &mut work);
            assert_eq!(shift, plan.scale_bits());

            let expected = reference_dft(&input);
            let scale = (1u64 << shift) as f64;
            let peak = expected
                .iter()
                .map(|&(r, i)| r.abs().max(i.abs()))
                .fold(0.0, f64::max)
                / scale;
            for (k, &(r, i)) in expected.iter().enumerate() {
                let got = (data[2 * k] as f64, data[2 * k + 1] as f64);
                let tol = peak * 2e-3 + 16.0;
                assert!((got.0 - r / scale).abs() < tol, "M={m} k={k} 实部");
                assert!((got.1 - i / scale).abs() < tol, "M={m} k={k} 虚部");
            }
        }
    }

    #[test]
    fn test_单位冲激() {
        let plan = FftPlan::new(40).unwrap();
        let mut data = vec![0; 80];
        data[0] = 1 << 28;
        let mut work = vec![0; 80];
        let shift = plan.forward(&mut data, &mut work);
        let expected = (1 << 28) >> shift;
        for k in 0..40 {
            assert!((data[2 * k] - expected).abs() <= 1, "k={k}");
            assert!(data[2 * k + 1].abs() <= 1, "k={k}");
        }
    }
}
