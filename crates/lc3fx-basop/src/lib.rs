//! # lc3fx-basop
//!
//! LC3plus 定点基本运算库, 语义对齐 ITU-T STL basic operators.
//!
//! - `ops`: 纯函数算子 (饱和/非饱和的 16/32 位加减乘、移位、归一化、舍入)
//! - `context`: 显式的溢出/进位状态上下文, 替代全局 Overflow/Carry 标志
//! - `qformat`: Q15/Q31 小数的类型化包装, 避免混用乘法约定
//!
//! 本 crate 不含任何浮点运算, 所有结果与平台无关、逐位确定.

pub mod context;
pub mod ops;
pub mod qformat;

/// 16 位定点字
pub type Word16 = i16;
/// 32 位定点字
pub type Word32 = i32;

/// 16 位最大值
pub const MAX_16: Word16 = i16::MAX;
/// 16 位最小值
pub const MIN_16: Word16 = i16::MIN;
/// 32 位最大值
pub const MAX_32: Word32 = i32::MAX;
/// 32 位最小值
pub const MIN_32: Word32 = i32::MIN;

pub use context::{BasopContext, StatusFlags};
pub use ops::*;
pub use qformat::{Frac16, Frac32};
