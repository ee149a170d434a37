//! 定点 MDCT 分析变换.
//!
//! 每帧输入 N 个 16 位样点, 与上一帧保留的 `N - z` 个样点拼成分析段,
//! 加窗并做 TDAC 折叠得到 N 个 32 位值, 归一化后经 DCT-IV 得到 N 个
//! 频谱系数及其块指数.
//!
//! 窗表尾部的 z 个零不参与计算, 因此折叠的后半段分为只有一项乘积的
//! 前 z 个输出和两项乘积的其余输出.

use lc3fx_basop::{
    Word16, Word32, add_sat, get_scale_factor32, l_mac0, l_msu0, l_mult0, l_shl_pos, s_max,
    sub_sat,
};
use lc3fx_core::ScratchFrame;

use crate::dct_iv::DctIv;
use crate::window::short_block_shift;

/// 输入 PCM 的块指数: 16 位字的数值即样点值
pub const INPUT_EXPONENT: Word16 = 15;

/// 对一帧做 MDCT 分析, 返回频谱 `y` 的块指数.
///
/// - `x`: 本帧 N 个样点
/// - `mem`: 历史缓冲, 长度 `N - z`, 调用后更新为本帧末尾样点
/// - `window`: 窗表, 长度 `2N - z`
/// - `dct`: 长度 N 的 DCT-IV 计划
/// - `y`: 输出, 长度 N
/// - `scratch`: 需要 N 个 16 位字与 N 个 32 位字
///
/// 长度关系只在调试构建下检查.
pub fn process_mdct(
    x: &[Word16],
    mem: &mut [Word16],
    window: &[Word16],
    dct: &DctIv,
    y: &mut [Word32],
    scratch: &mut ScratchFrame<'_>,
) -> Word16 {
    let n = x.len();
    let mem_len = mem.len();
    debug_assert!(n % 2 == 0, "帧长必须为偶数");
    debug_assert_eq!(y.len(), n);
    debug_assert_eq!(dct.len(), n);
    debug_assert!(window.len() <= 2 * n && mem_len <= n);
    debug_assert_eq!(mem_len + 2 * n - window.len(), n, "历史长度应为 N - z");
    debug_assert!(2 * (2 * n - window.len()) <= n, "零点数不能超过 N/2");

    let buf = scratch.take_i16(n);
    buf[..mem_len].copy_from_slice(mem);
    buf[mem_len..].copy_from_slice(&x[..n - mem_len]);
    mem.copy_from_slice(&x[n - mem_len..]);

    tdac_fold(buf, x, window, mem_len, y);

    let s = s_max(0, get_scale_factor32(y));
    for v in y.iter_mut() {
        *v = l_shl_pos(*v, s);
    }
    let mut y_e = add_sat(sub_sat(INPUT_EXPONENT - 2, s), short_block_shift(n));

    let work = scratch.take_i32(n);
    dct.forward(y, &mut y_e, work);
    y_e
}

/// 加窗与时域混叠折叠, `buf` 为分析段前 N 个样点, 后 N 个取自 `x`
fn tdac_fold(buf: &[Word16], x: &[Word16], w: &[Word16], mem_len: usize, y: &mut [Word32]) {
    let n = x.len();
    let m = n / 2;
    let z = 2 * n - w.len();
    let base = n - mem_len;

    for i in 0..m {
        y[m + i] = l_msu0(l_mult0(buf[i], w[i]), buf[2 * m - 1 - i], w[2 * m - 1 - i]);
    }
    for i in 0..z {
        y[m - 1 - i] = l_mult0(x[base + i], w[2 * m + i]);
    }
    for i in z..m {
        y[m - 1 - i] = l_mac0(
            l_mult0(x[base + i], w[2 * m + i]),
            x[4 * m - mem_len - 1 - i],
            w[4 * m - 1 - i],
        );
    }
}
