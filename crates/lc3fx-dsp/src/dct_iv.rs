//! 定点 DCT-IV.
//!
//! 长度 N 的 DCT-IV 经前置旋转折算为 N/2 点复数 FFT, 再经后置旋转得到:
//!
//! ```text
//! X[k] = Σ x[n]·cos(π/N·(n + 1/2)·(k + 1/2))
//! ```
//!
//! 输入与输出共用块指数, 变换内部的右移量累加到指数上.

use log::debug;

use lc3fx_basop::{Word16, Word32, add_sat, l_negate_sat, l_shr_pos};
use lc3fx_core::{Lc3Error, Lc3Result};

use crate::fft::{FftPlan, Twiddle};

/// DCT-IV 计划
#[derive(Debug, Clone)]
pub struct DctIv {
    len: usize,
    fft: FftPlan,
    pre: Box<[Twiddle]>,
    post: Box<[Twiddle]>,
}

impl DctIv {
    /// 为长度 `len` (偶数) 建立计划
    pub fn new(len: usize) -> Lc3Result<Self> {
        if len == 0 || len % 2 != 0 {
            return Err(Lc3Error::InvalidArgument(format!(
                "DCT-IV 长度必须为正偶数: {len}"
            )));
        }
        let half = len / 2;
        let fft = FftPlan::new(half)?;
        let period = 8 * len as i64;
        // exp(-iπ(n + 1/4)/N)
        let pre = (0..half)
            .map(|n| Twiddle::forward(4 * n as i64 + 1, period))
            .collect();
        // exp(-iπk/N)
        let post = (0..half)
            .map(|k| Twiddle::forward(4 * k as i64, period))
            .collect();
        debug!("创建 DCT-IV 计划: N={len}");
        Ok(Self {
            len,
            fft,
            pre,
            post,
        })
    }

    /// 变换长度
    pub fn len(&self) -> usize {
        self.len
    }

    /// 计划是否为空变换
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 原位正变换.
    ///
    /// `x` 长度为 N, `work` 至少 N 个字; `exponent` 为 `x` 的块指数,
    /// 返回时已加上内部缩放位数.
    pub fn forward(&self, x: &mut [Word32], exponent: &mut Word16, work: &mut [Word32]) {
        let n = self.len;
        assert_eq!(x.len(), n, "DCT-IV 输入长度不匹配");
        assert!(work.len() >= n, "DCT-IV 工作区不足");
        let work = &mut work[..n];

        for (k, tw) in self.pre.iter().enumerate() {
            let re = l_shr_pos(x[2 * k], 1);
            let im = l_shr_pos(x[n - 1 - 2 * k], 1);
            let (re, im) = tw.rotate(re, im);
            work[2 * k] = re;
            work[2 * k + 1] = im;
        }

        let fft_shift = self.fft.forward(work, x);

        for (k, tw) in self.post.iter().enumerate() {
            let (re, im) = tw.rotate(work[2 * k], work[2 * k + 1]);
            x[2 * k] = re;
            x[n - 1 - 2 * k] = l_negate_sat(im);
        }

        *exponent = add_sat(*exponent, 1 + fft_shift);
    }
}
