//! 定点基本算子.
//!
//! 命名沿用 STL 习惯 (`l_` 前缀为 32 位运算, `0` 后缀为不加倍的整数乘法).
//! 不带 `_sat` 后缀的加减与累加不饱和, 由调用方保证范围;
//! 带 `_sat` 后缀的版本饱和到目标位宽.
//!
//! 所有算子均为纯函数, 不读写任何状态标志. 需要溢出/进位记录时使用
//! [`BasopContext`](crate::BasopContext) 上的同名方法.

use crate::{MAX_16, MAX_32, MIN_16, MIN_32, Word16, Word32};

// ============================================================
// 带溢出指示的内部实现, 纯函数与 BasopContext 共用
// ============================================================

#[inline]
pub(crate) fn saturate_o(x: Word32) -> (Word16, bool) {
    if x > MAX_16 as Word32 {
        (MAX_16, true)
    } else if x < MIN_16 as Word32 {
        (MIN_16, true)
    } else {
        (x as Word16, false)
    }
}

#[inline]
pub(crate) fn saturate32_o(x: i64) -> (Word32, bool) {
    if x > MAX_32 as i64 {
        (MAX_32, true)
    } else if x < MIN_32 as i64 {
        (MIN_32, true)
    } else {
        (x as Word32, false)
    }
}

#[inline]
pub(crate) fn shl_o(x: Word16, n: Word16) -> (Word16, bool) {
    if n < 0 {
        (shr(x, n.saturating_neg()), false)
    } else if x == 0 {
        (0, false)
    } else if n > norm_s(x) {
        (if x < 0 { MIN_16 } else { MAX_16 }, true)
    } else {
        (x << n, false)
    }
}

#[inline]
pub(crate) fn l_shl_o(x: Word32, n: Word16) -> (Word32, bool) {
    if n < 0 {
        (l_shr(x, n.saturating_neg()), false)
    } else if x == 0 {
        (0, false)
    } else if n > norm_l(x) {
        (if x < 0 { MIN_32 } else { MAX_32 }, true)
    } else {
        (x << n, false)
    }
}

#[inline]
pub(crate) fn l_add_sat_o(a: Word32, b: Word32) -> (Word32, bool) {
    match a.checked_add(b) {
        Some(v) => (v, false),
        None => (if a < 0 { MIN_32 } else { MAX_32 }, true),
    }
}

#[inline]
pub(crate) fn l_sub_sat_o(a: Word32, b: Word32) -> (Word32, bool) {
    match a.checked_sub(b) {
        Some(v) => (v, false),
        None => (if a < 0 { MIN_32 } else { MAX_32 }, true),
    }
}

#[inline]
pub(crate) fn l_negate_sat_o(a: Word32) -> (Word32, bool) {
    if a == MIN_32 { (MAX_32, true) } else { (-a, false) }
}

#[inline]
pub(crate) fn l_mult_o(a: Word16, b: Word16) -> (Word32, bool) {
    let p = a as Word32 * b as Word32;
    if p == 0x4000_0000 {
        (MAX_32, true)
    } else {
        (p << 1, false)
    }
}

#[inline]
pub(crate) fn l_mac_sat_o(acc: Word32, a: Word16, b: Word16) -> (Word32, bool) {
    let (p, o1) = l_mult_o(a, b);
    let (v, o2) = l_add_sat_o(acc, p);
    (v, o1 | o2)
}

#[inline]
pub(crate) fn l_msu_sat_o(acc: Word32, a: Word16, b: Word16) -> (Word32, bool) {
    let (p, o1) = l_mult_o(a, b);
    let (v, o2) = l_sub_sat_o(acc, p);
    (v, o1 | o2)
}

#[inline]
pub(crate) fn round_fx_sat_o(x: Word32) -> (Word16, bool) {
    let (v, o) = l_add_sat_o(x, 0x8000);
    (extract_h(v), o)
}

// ============================================================
// 饱和与位宽转换
// ============================================================

/// 将 32 位值限幅到 16 位范围
#[inline]
pub fn saturate(x: Word32) -> Word16 {
    saturate_o(x).0
}

/// 取 32 位值的高 16 位
#[inline]
pub fn extract_h(x: Word32) -> Word16 {
    (x >> 16) as Word16
}

/// 取 32 位值的低 16 位 (按位截断)
#[inline]
pub fn extract_l(x: Word32) -> Word16 {
    x as Word16
}

/// 16 位值放入 32 位的高半部分
#[inline]
pub fn l_deposit_h(x: Word16) -> Word32 {
    (x as Word32) << 16
}

/// 16 位值符号扩展为 32 位
#[inline]
pub fn l_deposit_l(x: Word16) -> Word32 {
    x as Word32
}

// ============================================================
// 16 位算术
// ============================================================

/// 16 位加法, 结果以 32 位返回且不饱和
#[inline]
pub fn add(a: Word16, b: Word16) -> Word32 {
    a as Word32 + b as Word32
}

/// 16 位减法, 结果以 32 位返回且不饱和
#[inline]
pub fn sub(a: Word16, b: Word16) -> Word32 {
    a as Word32 - b as Word32
}

/// 饱和 16 位加法
#[inline]
pub fn add_sat(a: Word16, b: Word16) -> Word16 {
    saturate(add(a, b))
}

/// 饱和 16 位减法
#[inline]
pub fn sub_sat(a: Word16, b: Word16) -> Word16 {
    saturate(sub(a, b))
}

/// 饱和取负 (`MIN_16` 映射为 `MAX_16`)
#[inline]
pub fn negate(a: Word16) -> Word16 {
    if a == MIN_16 { MAX_16 } else { -a }
}

/// 饱和绝对值
#[inline]
pub fn abs_s(a: Word16) -> Word16 {
    if a == MIN_16 { MAX_16 } else { a.abs() }
}

/// 16 位较大值
#[inline]
pub fn s_max(a: Word16, b: Word16) -> Word16 {
    a.max(b)
}

/// 16 位较小值
#[inline]
pub fn s_min(a: Word16, b: Word16) -> Word16 {
    a.min(b)
}

/// Q15 乘法, 截断: `saturate((a * b) >> 15)`
#[inline]
pub fn mult(a: Word16, b: Word16) -> Word16 {
    saturate((a as Word32 * b as Word32) >> 15)
}

/// Q15 乘法, 四舍五入: `saturate((a * b + 0x4000) >> 15)`
#[inline]
pub fn mult_r(a: Word16, b: Word16) -> Word16 {
    saturate((a as Word32 * b as Word32 + 0x4000) >> 15)
}

/// Q15 小数除法, 要求 `0 <= a <= b` 且 `b > 0`
#[inline]
pub fn div_s(a: Word16, b: Word16) -> Word16 {
    debug_assert!(a >= 0 && b > 0 && a <= b, "div_s 参数越界: {a}/{b}");
    if a == 0 {
        0
    } else if a == b {
        MAX_16
    } else {
        (((a as Word32) << 15) / b as Word32) as Word16
    }
}

// ============================================================
// 32 位算术
// ============================================================

/// 32 位加法, 不饱和 (补码回绕)
#[inline]
pub fn l_add(a: Word32, b: Word32) -> Word32 {
    a.wrapping_add(b)
}

/// 32 位减法, 不饱和 (补码回绕)
#[inline]
pub fn l_sub(a: Word32, b: Word32) -> Word32 {
    a.wrapping_sub(b)
}

/// 32 位取负, 不饱和
#[inline]
pub fn l_negate(a: Word32) -> Word32 {
    a.wrapping_neg()
}

/// 饱和 32 位加法
#[inline]
pub fn l_add_sat(a: Word32, b: Word32) -> Word32 {
    l_add_sat_o(a, b).0
}

/// 饱和 32 位减法
#[inline]
pub fn l_sub_sat(a: Word32, b: Word32) -> Word32 {
    l_sub_sat_o(a, b).0
}

/// 饱和 32 位取负
#[inline]
pub fn l_negate_sat(a: Word32) -> Word32 {
    l_negate_sat_o(a).0
}

/// 饱和 32 位绝对值
#[inline]
pub fn l_abs(a: Word32) -> Word32 {
    if a == MIN_32 { MAX_32 } else { a.abs() }
}

/// 32 位较大值
#[inline]
pub fn l_max(a: Word32, b: Word32) -> Word32 {
    a.max(b)
}

/// 32 位较小值
#[inline]
pub fn l_min(a: Word32, b: Word32) -> Word32 {
    a.min(b)
}

/// 16x16 小数乘法, 结果左移一位: `(a * b) << 1`, 唯一溢出点饱和到 `MAX_32`
#[inline]
pub fn l_mult(a: Word16, b: Word16) -> Word32 {
    l_mult_o(a, b).0
}

/// 16x16 整数乘法, 不加倍, 不会溢出
#[inline]
pub fn l_mult0(a: Word16, b: Word16) -> Word32 {
    a as Word32 * b as Word32
}

/// `acc + l_mult(a, b)`, 累加不饱和
#[inline]
pub fn l_mac(acc: Word32, a: Word16, b: Word16) -> Word32 {
    l_add(acc, l_mult(a, b))
}

/// `acc - l_mult(a, b)`, 累减不饱和
#[inline]
pub fn l_msu(acc: Word32, a: Word16, b: Word16) -> Word32 {
    l_sub(acc, l_mult(a, b))
}

/// `acc + l_mult(a, b)`, 饱和
#[inline]
pub fn l_mac_sat(acc: Word32, a: Word16, b: Word16) -> Word32 {
    l_mac_sat_o(acc, a, b).0
}

/// `acc - l_mult(a, b)`, 饱和
#[inline]
pub fn l_msu_sat(acc: Word32, a: Word16, b: Word16) -> Word32 {
    l_msu_sat_o(acc, a, b).0
}

/// `acc + a * b`, 不加倍, 不饱和
#[inline]
pub fn l_mac0(acc: Word32, a: Word16, b: Word16) -> Word32 {
    l_add(acc, l_mult0(a, b))
}

/// `acc - a * b`, 不加倍, 不饱和
#[inline]
pub fn l_msu0(acc: Word32, a: Word16, b: Word16) -> Word32 {
    l_sub(acc, l_mult0(a, b))
}

/// `acc + a * b`, 不加倍, 饱和
#[inline]
pub fn l_mac0_sat(acc: Word32, a: Word16, b: Word16) -> Word32 {
    l_add_sat(acc, l_mult0(a, b))
}

/// Q31 x Q15 -> Q31: `saturate32((x * y) >> 15)`, 截断
#[inline]
pub fn mpy_32_16(x: Word32, y: Word16) -> Word32 {
    saturate32_o((x as i64 * y as i64) >> 15).0
}

/// Q31 x Q31 -> Q31: `saturate32((x * y) >> 31)`, 截断
#[inline]
pub fn mpy_32_32(x: Word32, y: Word32) -> Word32 {
    saturate32_o((x as i64 * y as i64) >> 31).0
}

// ============================================================
// 舍入
// ============================================================

/// 舍入到高 16 位 (加 0x8000 后取高半部分), 加法不饱和
#[inline]
pub fn round_fx(x: Word32) -> Word16 {
    extract_h(l_add(x, 0x8000))
}

/// 舍入到高 16 位, 接近 `MAX_32` 时饱和到 `MAX_16`
#[inline]
pub fn round_fx_sat(x: Word32) -> Word16 {
    round_fx_sat_o(x).0
}

/// `round_fx_sat(l_mac_sat(acc, a, b))`
#[inline]
pub fn mac_r(acc: Word32, a: Word16, b: Word16) -> Word16 {
    round_fx_sat(l_mac_sat(acc, a, b))
}

/// `round_fx_sat(l_msu_sat(acc, a, b))`
#[inline]
pub fn msu_r(acc: Word32, a: Word16, b: Word16) -> Word16 {
    round_fx_sat(l_msu_sat(acc, a, b))
}

// ============================================================
// 归一化与移位
// ============================================================

/// 16 位值在符号位之前可左移的位数.
///
/// `norm_s(0) == 0`, `norm_s(-1) == 15`, `MAX_16`/`MIN_16` 返回 0.
#[inline]
pub fn norm_s(x: Word16) -> Word16 {
    if x == 0 {
        return 0;
    }
    let v = if x < 0 { !x } else { x };
    (v.leading_zeros() - 1) as Word16
}

/// 32 位值在符号位之前可左移的位数.
///
/// `norm_l(0) == 0`, `norm_l(-1) == 31`, `MAX_32`/`MIN_32` 返回 0.
#[inline]
pub fn norm_l(x: Word32) -> Word16 {
    if x == 0 {
        return 0;
    }
    let v = if x < 0 { !x } else { x };
    (v.leading_zeros() - 1) as Word16
}

/// 16 位算术左移, 负数位移量转为右移, 溢出时饱和
#[inline]
pub fn shl(x: Word16, n: Word16) -> Word16 {
    shl_o(x, n).0
}

/// 16 位算术右移, 负数位移量转为左移
#[inline]
pub fn shr(x: Word16, n: Word16) -> Word16 {
    if n < 0 {
        shl(x, n.saturating_neg())
    } else if n >= 15 {
        if x < 0 { -1 } else { 0 }
    } else {
        x >> n
    }
}

/// 32 位算术左移, 负数位移量转为右移, 溢出时饱和
#[inline]
pub fn l_shl(x: Word32, n: Word16) -> Word32 {
    l_shl_o(x, n).0
}

/// 32 位算术右移, 负数位移量转为左移
#[inline]
pub fn l_shr(x: Word32, n: Word16) -> Word32 {
    if n < 0 {
        l_shl(x, n.saturating_neg())
    } else if n >= 31 {
        if x < 0 { -1 } else { 0 }
    } else {
        x >> n
    }
}

/// 非负位移量的 [`shl`]
#[inline]
pub fn shl_pos(x: Word16, n: Word16) -> Word16 {
    debug_assert!(n >= 0);
    shl(x, n)
}

/// 非负位移量的 [`shr`]
#[inline]
pub fn shr_pos(x: Word16, n: Word16) -> Word16 {
    debug_assert!(n >= 0);
    shr(x, n)
}

/// 非负位移量的 [`l_shl`]
#[inline]
pub fn l_shl_pos(x: Word32, n: Word16) -> Word32 {
    debug_assert!(n >= 0);
    l_shl(x, n)
}

/// 非负位移量的 [`l_shr`]
#[inline]
pub fn l_shr_pos(x: Word32, n: Word16) -> Word32 {
    debug_assert!(n >= 0);
    l_shr(x, n)
}

/// 带舍入的 16 位右移
#[inline]
pub fn shr_r(x: Word16, n: Word16) -> Word16 {
    if n > 15 {
        return 0;
    }
    let out = shr(x, n);
    if n > 0 && (x as Word32 & (1 << (n - 1))) != 0 {
        out + 1
    } else {
        out
    }
}

/// 带舍入的 32 位右移
#[inline]
pub fn l_shr_r(x: Word32, n: Word16) -> Word32 {
    if n > 31 {
        return 0;
    }
    let out = l_shr(x, n);
    if n > 0 && (x & (1 << (n - 1))) != 0 {
        out + 1
    } else {
        out
    }
}

/// 缓冲区的公共余量: 非零元素 `norm_l` 的最小值, 全零时返回 31
pub fn get_scale_factor32(x: &[Word32]) -> Word16 {
    x.iter()
        .filter(|&&v| v != 0)
        .map(|&v| norm_l(v))
        .fold(31, Word16::min)
}

/// 缓冲区的公共余量: 非零元素 `norm_s` 的最小值, 全零时返回 15
pub fn get_scale_factor16(x: &[Word16]) -> Word16 {
    x.iter()
        .filter(|&&v| v != 0)
        .map(|&v| norm_s(v))
        .fold(15, Word16::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate_边界() {
        assert_eq!(saturate(40000), MAX_16);
        assert_eq!(saturate(-40000), MIN_16);
        assert_eq!(saturate(32767), 32767);
        assert_eq!(saturate(-32768), -32768);
        assert_eq!(saturate(0), 0);
    }

    #[test]
    fn test_norm_特殊值() {
        assert_eq!(norm_s(0), 0);
        assert_eq!(norm_s(-1), 15);
        assert_eq!(norm_s(MAX_16), 0);
        assert_eq!(norm_s(MIN_16), 0);
        assert_eq!(norm_s(1), 14);
        assert_eq!(norm_s(0x2000), 1);

        assert_eq!(norm_l(0), 0);
        assert_eq!(norm_l(-1), 31);
        assert_eq!(norm_l(MAX_32), 0);
        assert_eq!(norm_l(MIN_32), 0);
        assert_eq!(norm_l(0x4000_0000), 0);
        assert_eq!(norm_l(0x2000_0000), 1);
        assert_eq!(norm_l(1), 30);
        assert_eq!(norm_l(-0x4000_0000), 1);
    }

    #[test]
    fn test_移位方向与饱和() {
        assert_eq!(shl(0x4000, 1), MAX_16);
        assert_eq!(shl(-0x4001, 1), MIN_16);
        assert_eq!(shl(0x1000, -4), 0x0100);
        assert_eq!(shr(-8, 2), -2);
        assert_eq!(shr(-8, 20), -1);
        assert_eq!(shr(0x0100, -4), 0x1000);

        assert_eq!(l_shl(1, 30), 0x4000_0000);
        assert_eq!(l_shl(1, 31), MAX_32);
        assert_eq!(l_shl(-1, 31), MIN_32);
        assert_eq!(l_shl(-2, 31), MIN_32);
        assert_eq!(l_shl(0x100, -8), 1);
        assert_eq!(l_shr(MIN_32, 31), -1);
        assert_eq!(l_shr(MAX_32, 40), 0);
        assert_eq!(l_shr(1, -3), 8);
    }

    #[test]
    fn test_带舍入右移() {
        assert_eq!(shr_r(3, 1), 2);
        assert_eq!(shr_r(-3, 1), -1);
        assert_eq!(shr_r(100, 16), 0);
        assert_eq!(l_shr_r(0x18000, 16), 2);
        assert_eq!(l_shr_r(0x17fff, 16), 1);
        assert_eq!(l_shr_r(5, 0), 5);
    }

    #[test]
    fn test_乘法约定() {
        assert_eq!(mult(MIN_16, MIN_16), MAX_16);
        assert_eq!(mult(0x4000, 0x4000), 0x2000);
        assert_eq!(mult(-1, 1), -1);
        assert_eq!(mult_r(-1, 1), 0);
        assert_eq!(mult_r(MIN_16, MIN_16), MAX_16);

        assert_eq!(l_mult(MIN_16, MIN_16), MAX_32);
        assert_eq!(l_mult(0x4000, 0x4000), 0x2000_0000);
        assert_eq!(l_mult0(MIN_16, MIN_16), 0x4000_0000);
        assert_eq!(l_mult0(-3, 7), -21);

        assert_eq!(l_mac0(10, 3, 4), 22);
        assert_eq!(l_msu0(10, 3, 4), -2);
        assert_eq!(l_mac(0, 1, 1), 2);
        assert_eq!(l_mac_sat(MAX_32, 1, 1), MAX_32);
        assert_eq!(l_msu_sat(MIN_32, 1, 1), MIN_32);
        assert_eq!(l_mac0_sat(MAX_32 - 1, 2, 1), MAX_32);
    }

    #[test]
    fn test_32位加减() {
        assert_eq!(l_add(MAX_32, 1), MIN_32);
        assert_eq!(l_add_sat(MAX_32, 1), MAX_32);
        assert_eq!(l_sub_sat(MIN_32, 1), MIN_32);
        assert_eq!(l_sub_sat(0, MIN_32), MAX_32);
        assert_eq!(l_negate(MIN_32), MIN_32);
        assert_eq!(l_negate_sat(MIN_32), MAX_32);
        assert_eq!(l_abs(MIN_32), MAX_32);
        assert_eq!(add(MAX_16, MAX_16), 65534);
        assert_eq!(sub(MIN_16, MAX_16), -65535);
        assert_eq!(add_sat(MAX_16, 1), MAX_16);
        assert_eq!(sub_sat(MIN_16, 1), MIN_16);
        assert_eq!(negate(MIN_16), MAX_16);
        assert_eq!(abs_s(MIN_16), MAX_16);
    }

    #[test]
    fn test_舍入() {
        assert_eq!(round_fx(0x0001_8000), 2);
        assert_eq!(round_fx(0x0001_7fff), 1);
        assert_eq!(round_fx(-0x8000), 0);
        assert_eq!(round_fx(MAX_32), MIN_16);
        assert_eq!(round_fx_sat(MAX_32), MAX_16);
        assert_eq!(mac_r(0, 0x4000, 0x4000), 0x2000);
        assert_eq!(msu_r(0, 0x4000, 0x4000), -0x2000);
    }

    #[test]
    fn test_高低半字() {
        assert_eq!(extract_h(0x1234_5678), 0x1234);
        assert_eq!(extract_l(0x1234_5678), 0x5678);
        assert_eq!(extract_h(-1), -1);
        assert_eq!(l_deposit_h(-2), -0x2_0000);
        assert_eq!(l_deposit_l(-2), -2);
    }

    #[test]
    fn test_混合精度乘法() {
        assert_eq!(mpy_32_16(0x4000_0000, 0x4000), 0x2000_0000);
        assert_eq!(mpy_32_16(MIN_32, MIN_16), MAX_32);
        assert_eq!(mpy_32_16(-1, 1), -1);
        assert_eq!(mpy_32_32(0x4000_0000, 0x4000_0000), 0x2000_0000);
        assert_eq!(mpy_32_32(MIN_32, MIN_32), MAX_32);
    }

    #[test]
    fn test_小数除法() {
        assert_eq!(div_s(0, 7), 0);
        assert_eq!(div_s(5, 5), MAX_16);
        assert_eq!(div_s(1, 2), 0x4000);
        assert_eq!(div_s(1, 3), 10922);
    }

    #[test]
    fn test_缓冲区余量() {
        assert_eq!(get_scale_factor32(&[0, 0, 0]), 31);
        assert_eq!(get_scale_factor32(&[1, 0x100, -5]), 22);
        assert_eq!(get_scale_factor32(&[MIN_32, 1]), 0);
        assert_eq!(get_scale_factor16(&[0, 0]), 15);
        assert_eq!(get_scale_factor16(&[3, -0x800]), 4);
    }
}
