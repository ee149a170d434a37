//! 逐帧复用的暂存区.
//!
//! 会话建立时按最大帧长一次性分配 16 位与 32 位两块存储, 每次处理调用通过
//! [`ScratchArena::frame`] 取得一个 [`ScratchFrame`], 从中切出互不重叠的
//! 可变视图. 视图的生命周期不超过本次调用, 下一次调用重新从头切分.
//! 暂存内容在调用之间无定义, 使用方必须先写后读.

use lc3fx_basop::{Word16, Word32};

use crate::MAX_BANDS;

/// 暂存区, 构造后不再分配
#[derive(Debug, Clone)]
pub struct ScratchArena {
    words16: Box<[Word16]>,
    words32: Box<[Word32]>,
}

impl ScratchArena {
    /// 按帧长上限分配: 16 位 `max(2N, MAX_BANDS)` 字, 32 位 `2N` 字
    pub fn new(max_frame_len: usize) -> Self {
        Self::with_capacity((2 * max_frame_len).max(MAX_BANDS), 2 * max_frame_len)
    }

    /// 指定两块存储的字数
    pub fn with_capacity(words16: usize, words32: usize) -> Self {
        Self {
            words16: vec![0; words16].into_boxed_slice(),
            words32: vec![0; words32].into_boxed_slice(),
        }
    }

    /// 16 位存储容量
    pub fn capacity_i16(&self) -> usize {
        self.words16.len()
    }

    /// 32 位存储容量
    pub fn capacity_i32(&self) -> usize {
        self.words32.len()
    }

    /// 开始一次调用的切分
    pub fn frame(&mut self) -> ScratchFrame<'_> {
        ScratchFrame {
            rest16: &mut self.words16,
            rest32: &mut self.words32,
        }
    }
}

/// 单次调用内的暂存视图分配器
#[derive(Debug)]
pub struct ScratchFrame<'a> {
    rest16: &'a mut [Word16],
    rest32: &'a mut [Word32],
}

impl<'a> ScratchFrame<'a> {
    /// 切出 `len` 个 16 位字. 容量不足属于配置错误, 直接 panic.
    pub fn take_i16(&mut self, len: usize) -> &'a mut [Word16] {
        let rest = std::mem::take(&mut self.rest16);
        assert!(
            len <= rest.len(),
            "暂存区 16 位容量不足: 需要 {len}, 剩余 {}",
            rest.len()
        );
        let (head, tail) = rest.split_at_mut(len);
        self.rest16 = tail;
        head
    }

    /// 切出 `len` 个 32 位字. 容量不足属于配置错误, 直接 panic.
    pub fn take_i32(&mut self, len: usize) -> &'a mut [Word32] {
        let rest = std::mem::take(&mut self.rest32);
        assert!(
            len <= rest.len(),
            "暂存区 32 位容量不足: 需要 {len}, 剩余 {}",
            rest.len()
        );
        let (head, tail) = rest.split_at_mut(len);
        self.rest32 = tail;
        head
    }

    /// 剩余 16 位字数
    pub fn remaining_i16(&self) -> usize {
        self.rest16.len()
    }

    /// 剩余 32 位字数
    pub fn remaining_i32(&self) -> usize {
        self.rest32.len()
    }
}
