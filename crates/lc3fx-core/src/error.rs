//! 统一错误类型定义.
//!
//! 只有会话配置阶段 (构造窗表、频带表、变换计划) 会返回错误,
//! 逐帧处理路径没有可恢复的错误.

use thiserror::Error;

/// lc3fx 统一错误类型
#[derive(Debug, Error)]
pub enum Lc3Error {
    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 不支持的采样率
    #[error("不支持的采样率: {0} Hz")]
    UnsupportedSampleRate(u32),

    /// 不支持的帧长
    #[error("不支持的帧长: {0} (单位 0.1 ms)")]
    UnsupportedFrameDuration(u16),

    /// 无效声道数
    #[error("无效声道数: {0}")]
    InvalidChannelCount(usize),

    /// 窗表不合法
    #[error("窗表不合法: {0}")]
    InvalidWindow(String),

    /// 频带表不合法
    #[error("频带表不合法: {0}")]
    InvalidBandTable(String),

    /// 配置解析失败
    #[error("配置解析失败: {0}")]
    Config(#[from] serde_json::Error),
}

/// lc3fx 统一 Result 类型
pub type Lc3Result<T> = Result<T, Lc3Error>;
