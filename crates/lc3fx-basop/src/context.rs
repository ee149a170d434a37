//! 溢出与进位状态上下文.
//!
//! STL 的 `Overflow`/`Carry` 是进程级全局变量. 这里改为调用方持有的
//! [`BasopContext`], 每个方法返回与同名纯函数相同的值, 并在发生饱和时
//! 记录 `OVERFLOW`. 上下文只会被置位, 清零由调用方显式完成.

use bitflags::bitflags;

use crate::ops::{
    l_add_sat_o, l_mac_sat_o, l_msu_sat_o, l_mult_o, l_negate_sat_o, l_shl_o, l_sub_sat_o,
    round_fx_sat_o, saturate_o, shl_o,
};
use crate::{Word16, Word32};

bitflags! {
    /// 运算状态标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StatusFlags: u8 {
        /// 发生过饱和
        const OVERFLOW = 1 << 0;
        /// 最近一次带进位运算的进位输出
        const CARRY = 1 << 1;
    }
}

/// 带状态记录的算子上下文
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasopContext {
    status: StatusFlags,
}

impl BasopContext {
    /// 创建标志全部清零的上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前状态
    pub fn status(&self) -> StatusFlags {
        self.status
    }

    /// 是否发生过饱和
    pub fn overflow(&self) -> bool {
        self.status.contains(StatusFlags::OVERFLOW)
    }

    /// 当前进位
    pub fn carry(&self) -> bool {
        self.status.contains(StatusFlags::CARRY)
    }

    /// 设置进位 (多字运算的初始进位)
    pub fn set_carry(&mut self, carry: bool) {
        self.status.set(StatusFlags::CARRY, carry);
    }

    /// 清除全部标志
    pub fn clear(&mut self) {
        self.status = StatusFlags::empty();
    }

    #[inline]
    fn note<T>(&mut self, (value, overflowed): (T, bool)) -> T {
        if overflowed {
            self.status.insert(StatusFlags::OVERFLOW);
        }
        value
    }

    #[inline]
    pub fn saturate(&mut self, x: Word32) -> Word16 {
        self.note(saturate_o(x))
    }

    #[inline]
    pub fn add_sat(&mut self, a: Word16, b: Word16) -> Word16 {
        self.note(saturate_o(a as Word32 + b as Word32))
    }

    #[inline]
    pub fn sub_sat(&mut self, a: Word16, b: Word16) -> Word16 {
        self.note(saturate_o(a as Word32 - b as Word32))
    }

    #[inline]
    pub fn shl(&mut self, x: Word16, n: Word16) -> Word16 {
        self.note(shl_o(x, n))
    }

    #[inline]
    pub fn l_shl(&mut self, x: Word32, n: Word16) -> Word32 {
        self.note(l_shl_o(x, n))
    }

    #[inline]
    pub fn l_add_sat(&mut self, a: Word32, b: Word32) -> Word32 {
        self.note(l_add_sat_o(a, b))
    }

    #[inline]
    pub fn l_sub_sat(&mut self, a: Word32, b: Word32) -> Word32 {
        self.note(l_sub_sat_o(a, b))
    }

    #[inline]
    pub fn l_negate_sat(&mut self, a: Word32) -> Word32 {
        self.note(l_negate_sat_o(a))
    }

    #[inline]
    pub fn l_mult(&mut self, a: Word16, b: Word16) -> Word32 {
        self.note(l_mult_o(a, b))
    }

    #[inline]
    pub fn l_mac_sat(&mut self, acc: Word32, a: Word16, b: Word16) -> Word32 {
        self.note(l_mac_sat_o(acc, a, b))
    }

    #[inline]
    pub fn l_msu_sat(&mut self, acc: Word32, a: Word16, b: Word16) -> Word32 {
        self.note(l_msu_sat_o(acc, a, b))
    }

    #[inline]
    pub fn round_fx_sat(&mut self, x: Word32) -> Word16 {
        self.note(round_fx_sat_o(x))
    }

    /// 带进位加法: `a + b + carry`, 结果回绕.
    ///
    /// `CARRY` 为第 31 位的无符号进位输出, 有符号溢出时置 `OVERFLOW`.
    pub fn l_add_c(&mut self, a: Word32, b: Word32) -> Word32 {
        self.add_with_carry(a, b)
    }

    /// 带借位减法: `a + !b + carry`, 结果回绕.
    ///
    /// 无借位时 `CARRY` 为 1. 多字减法的最低字需先 `set_carry(true)`.
    pub fn l_sub_c(&mut self, a: Word32, b: Word32) -> Word32 {
        self.add_with_carry(a, !b)
    }

    fn add_with_carry(&mut self, a: Word32, b: Word32) -> Word32 {
        let c = self.carry() as u64;
        let unsigned = a as u32 as u64 + b as u32 as u64 + c;
        let signed = a as i64 + b as i64 + c as i64;
        let result = unsigned as u32 as Word32;
        self.set_carry(unsigned >> 32 != 0);
        if signed != result as i64 {
            self.status.insert(StatusFlags::OVERFLOW);
        }
        result
    }
}
