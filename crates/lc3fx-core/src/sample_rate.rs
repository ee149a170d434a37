//! 采样率定义.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Lc3Error, Lc3Result};
use crate::frame_duration::FrameDuration;

/// 支持的采样率等级
///
/// 等级序号 (`index`) 与参考实现的 `fs_idx` 一致, 用于查表.
/// 44.1 kHz 输入由上层按 48 kHz 的帧结构配置, 不单列等级.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SampleRate {
    /// 8 kHz (窄带)
    Hz8000,
    /// 16 kHz (宽带)
    Hz16000,
    /// 24 kHz (半超宽带)
    Hz24000,
    /// 32 kHz (超宽带)
    Hz32000,
    /// 48 kHz (全带)
    Hz48000,
}

impl SampleRate {
    /// 全部采样率, 按等级升序
    pub const ALL: [Self; 5] = [
        Self::Hz8000,
        Self::Hz16000,
        Self::Hz24000,
        Self::Hz32000,
        Self::Hz48000,
    ];

    /// 采样率 (Hz)
    pub const fn hz(self) -> u32 {
        match self {
            Self::Hz8000 => 8000,
            Self::Hz16000 => 16000,
            Self::Hz24000 => 24000,
            Self::Hz32000 => 32000,
            Self::Hz48000 => 48000,
        }
    }

    /// 等级序号 (0..=4)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 从 Hz 值解析
    pub fn from_hz(hz: u32) -> Lc3Result<Self> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.hz() == hz)
            .ok_or(Lc3Error::UnsupportedSampleRate(hz))
    }

    /// 给定帧长下每帧的采样数 N
    pub const fn frame_len(self, duration: FrameDuration) -> usize {
        (self.hz() as usize * duration.dms() as usize) / 10_000
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = Lc3Error;

    fn try_from(hz: u32) -> Lc3Result<Self> {
        Self::from_hz(hz)
    }
}

impl From<SampleRate> for u32 {
    fn from(rate: SampleRate) -> u32 {
        rate.hz()
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}
