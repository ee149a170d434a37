//! MDCT 低重叠分析窗.
//!
//! 窗总长 2N, 两端各有 z 个零, 中央 2z 个系数为 1, 其余为正弦/余弦过渡段,
//! 满足 Princen-Bradley 条件 `h[n]^2 + h[n+N]^2 = 1`. 末尾的 z 个零不存储,
//! 表长为 `2N - z`, 对应的历史缓冲长度为 `N - z`.
//!
//! 存储值为 `h[n]·sqrt(2/N)·2^3 / 2^c` 的 Q15 表示, 其中短帧 (`N <= 120`)
//! 额外缩小 `2^c` 以免饱和, 由 [`short_block_shift`] 在 MDCT 输出指数上补回.

use log::debug;

use lc3fx_basop::{MAX_16, Word16};
use lc3fx_core::{FrameDuration, Lc3Error, Lc3Result};

use crate::trig::{ONE_Q30, cos_sin_q30};

/// 窗表相对 `sqrt(2/N)` 的放大位数
pub const WINDOW_GAIN_BITS: u32 = 3;

/// 短帧窗表额外缩小的位数: `N <= 20` 为 2, `N <= 120` 为 1, 否则为 0
pub const fn short_block_shift(frame_len: usize) -> Word16 {
    if frame_len <= 20 {
        2
    } else if frame_len <= 120 {
        1
    } else {
        0
    }
}

/// 帧长对应的默认窗零点数: 10 ms 为 3N/8, 5 ms 与 2.5 ms 为 N/4
pub const fn default_zeros(duration: FrameDuration, frame_len: usize) -> usize {
    match duration {
        FrameDuration::Ms10 => 3 * frame_len / 8,
        FrameDuration::Ms5 | FrameDuration::Ms2_5 => frame_len / 4,
    }
}

/// 不可变的 MDCT 窗表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdctWindow {
    frame_len: usize,
    coeffs: Box<[Word16]>,
}

impl MdctWindow {
    /// 生成两端各 `zeros` 个零的低重叠正弦窗
    pub fn low_overlap(frame_len: usize, zeros: usize) -> Lc3Result<Self> {
        if frame_len < 8 || frame_len % 2 != 0 {
            return Err(Lc3Error::InvalidWindow(format!(
                "帧长必须为不小于 8 的偶数: {frame_len}"
            )));
        }
        if 2 * zeros >= frame_len {
            return Err(Lc3Error::InvalidWindow(format!(
                "零点数 {zeros} 过大, 帧长 {frame_len}"
            )));
        }

        let n = frame_len;
        let z = zeros;
        let slope = (n - 2 * z) as i64;
        let period = 8 * slope;
        let gain = window_gain_q30(n);

        let coeffs = (0..2 * n - z)
            .map(|i| {
                let h = if i < z {
                    0
                } else if i < n - z {
                    cos_sin_q30(2 * (i - z) as i64 + 1, period).1
                } else if i < n + z {
                    ONE_Q30
                } else {
                    cos_sin_q30(2 * (i - n - z) as i64 + 1, period).0
                };
                ((h * gain + (1 << 44)) >> 45).min(MAX_16 as i64) as Word16
            })
            .collect();

        debug!("生成 MDCT 窗: N={n}, 零点={z}, 表长={}", 2 * n - z);
        Ok(Self {
            frame_len,
            coeffs,
        })
    }

    /// 按帧长类别生成默认窗
    pub fn for_duration(frame_len: usize, duration: FrameDuration) -> Lc3Result<Self> {
        Self::low_overlap(frame_len, default_zeros(duration, frame_len))
    }

    /// 包装外部窗表, 表长必须在 `[3N/2, 2N]` 内
    pub fn from_coefficients(frame_len: usize, coeffs: Vec<Word16>) -> Lc3Result<Self> {
        let len = coeffs.len();
        if frame_len == 0 || frame_len % 2 != 0 {
            return Err(Lc3Error::InvalidWindow(format!(
                "帧长必须为正偶数: {frame_len}"
            )));
        }
        if len > 2 * frame_len || 2 * (2 * frame_len - len) > frame_len {
            return Err(Lc3Error::InvalidWindow(format!(
                "窗表长度 {len} 与帧长 {frame_len} 不匹配"
            )));
        }
        Ok(Self {
            frame_len,
            coeffs: coeffs.into_boxed_slice(),
        })
    }

    /// 帧长 N
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// 尾部省略的零点数 z
    pub fn zeros(&self) -> usize {
        2 * self.frame_len - self.coeffs.len()
    }

    /// 历史缓冲长度 `N - z`
    pub fn memory_len(&self) -> usize {
        self.coeffs.len() - self.frame_len
    }

    /// 窗系数 (Q15)
    pub fn coefficients(&self) -> &[Word16] {
        &self.coeffs
    }
}

/// `sqrt(2/N)·2^3 / 2^c`, Q30
fn window_gain_q30(frame_len: usize) -> i64 {
    let root = isqrt((1u64 << 61) / frame_len as u64) as i64;
    (root << WINDOW_GAIN_BITS) >> short_block_shift(frame_len)
}

fn isqrt(v: u64) -> u64 {
    if v < 2 {
        return v;
    }
    let mut x = v;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + v / x) / 2;
    }
    x
}
