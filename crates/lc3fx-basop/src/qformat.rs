//! Q 格式类型化包装.
//!
//! 16 位字既可能是 Q15 小数 (窗系数、旋转因子、倒数表), 也可能是整数
//! (PCM 样点、位移量). 小数之间的乘法要用 `mult`/`l_mult`/`mpy_32_16`,
//! 整数乘法要用 `l_mult0`. 把小数包装成 [`Frac16`]/[`Frac32`] 后,
//! 错用乘法约定无法通过类型检查.

use std::ops::Mul;

use crate::ops::{l_mult, mpy_32_16, mult, mult_r};
use crate::{MAX_16, Word16, Word32};

/// Q15 小数, 表示 `word / 2^15`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Frac16(pub Word16);

/// Q31 小数, 表示 `word / 2^31`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Frac32(pub Word32);

impl Frac16 {
    /// 最接近 1.0 的 Q15 值
    pub const ONE: Self = Self(MAX_16);
    /// 0.0
    pub const ZERO: Self = Self(0);

    /// 原始字
    #[inline]
    pub const fn raw(self) -> Word16 {
        self.0
    }

    /// Q15 x Q15 -> Q15, 截断
    #[inline]
    pub fn mul_q15(self, rhs: Frac16) -> Frac16 {
        Frac16(mult(self.0, rhs.0))
    }

    /// Q15 x Q15 -> Q15, 四舍五入
    #[inline]
    pub fn mul_q15_r(self, rhs: Frac16) -> Frac16 {
        Frac16(mult_r(self.0, rhs.0))
    }
}

impl Frac32 {
    /// 原始字
    #[inline]
    pub const fn raw(self) -> Word32 {
        self.0
    }

    /// Q31 x Q15 -> Q31
    #[inline]
    pub fn mul_frac16(self, rhs: Frac16) -> Frac32 {
        Frac32(mpy_32_16(self.0, rhs.0))
    }
}

/// Q15 x Q15 -> Q31 (`l_mult`)
impl Mul for Frac16 {
    type Output = Frac32;

    #[inline]
    fn mul(self, rhs: Frac16) -> Frac32 {
        Frac32(l_mult(self.0, rhs.0))
    }
}

/// Q31 x Q15 -> Q31 (`mpy_32_16`)
impl Mul<Frac16> for Frac32 {
    type Output = Frac32;

    #[inline]
    fn mul(self, rhs: Frac16) -> Frac32 {
        self.mul_frac16(rhs)
    }
}
