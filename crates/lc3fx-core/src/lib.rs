//! # lc3fx-core
//!
//! LC3plus 定点分析核心的基础设施: 统一错误类型、采样率与帧长定义、
//! 会话配置以及每帧复用的暂存区.

pub mod config;
pub mod error;
pub mod frame_duration;
pub mod sample_rate;
pub mod scratch;

/// 最大频带数
pub const MAX_BANDS: usize = 64;

// 重导出常用类型
pub use config::CodecConfig;
pub use error::{Lc3Error, Lc3Result};
pub use frame_duration::FrameDuration;
pub use sample_rate::SampleRate;
pub use scratch::{ScratchArena, ScratchFrame};
