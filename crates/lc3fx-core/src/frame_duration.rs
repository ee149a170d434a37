//! 帧长定义.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Lc3Error, Lc3Result};

/// 支持的帧长
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrameDuration {
    /// 2.5 ms
    #[serde(rename = "2.5ms")]
    Ms2_5,
    /// 5 ms
    #[serde(rename = "5ms")]
    Ms5,
    /// 10 ms
    #[default]
    #[serde(rename = "10ms")]
    Ms10,
}

impl FrameDuration {
    /// 以 0.1 ms 为单位的帧长
    pub const fn dms(self) -> u16 {
        match self {
            Self::Ms2_5 => 25,
            Self::Ms5 => 50,
            Self::Ms10 => 100,
        }
    }

    /// 从 0.1 ms 单位解析
    pub fn from_dms(dms: u16) -> Lc3Result<Self> {
        match dms {
            25 => Ok(Self::Ms2_5),
            50 => Ok(Self::Ms5),
            100 => Ok(Self::Ms10),
            other => Err(Lc3Error::UnsupportedFrameDuration(other)),
        }
    }

    /// 相对 10 ms 帧的缩短级数: 10 ms 为 0, 5 ms 为 1, 2.5 ms 为 2
    pub const fn short_shift(self) -> u32 {
        match self {
            Self::Ms10 => 0,
            Self::Ms5 => 1,
            Self::Ms2_5 => 2,
        }
    }
}

impl fmt::Display for FrameDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ms2_5 => f.write_str("2.5 ms"),
            Self::Ms5 => f.write_str("5 ms"),
            Self::Ms10 => f.write_str("10 ms"),
        }
    }
}
