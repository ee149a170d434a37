//! 会话配置.
//!
//! 配置在会话建立时解析并校验一次, 之后窗表、频带表与变换计划都由它派生.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Lc3Error, Lc3Result};
use crate::frame_duration::FrameDuration;
use crate::sample_rate::SampleRate;

/// 10 ms 帧的频谱带宽上限 (系数个数, 对应 20 kHz)
pub const MAX_BW_BIN: usize = 400;
/// 最大声道数
pub const MAX_CHANNELS: usize = 16;

/// 频谱分析会话配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// 采样率
    pub sample_rate: SampleRate,
    /// 帧长
    pub frame_duration: FrameDuration,
    /// 声道数
    pub channels: usize,
    /// 可选的带宽上限 (Hz), 对应命令行的 `-bandwidth`
    pub bandwidth_hz: Option<u32>,
    /// 是否使用线性 (等宽) 频带表
    pub linear_bands: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            sample_rate: SampleRate::Hz48000,
            frame_duration: FrameDuration::Ms10,
            channels: 1,
            bandwidth_hz: None,
            linear_bands: false,
        }
    }
}

impl CodecConfig {
    /// 以默认频带设置创建配置
    pub fn new(sample_rate: SampleRate, frame_duration: FrameDuration, channels: usize) -> Self {
        Self {
            sample_rate,
            frame_duration,
            channels,
            ..Self::default()
        }
    }

    /// 从 JSON 文本解析并校验
    pub fn from_json(text: &str) -> Lc3Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Lc3Result<()> {
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(Lc3Error::InvalidChannelCount(self.channels));
        }
        if let Some(hz) = self.bandwidth_hz {
            let nyquist = self.sample_rate.hz() / 2;
            if hz == 0 || hz > nyquist {
                return Err(Lc3Error::InvalidArgument(format!(
                    "带宽 {hz} Hz 超出范围 (0, {nyquist}]"
                )));
            }
        }
        debug!(
            "会话配置: {}, {}, {} 声道, N={}, 带宽上限系数={}",
            self.sample_rate,
            self.frame_duration,
            self.channels,
            self.frame_len(),
            self.max_bw_bin()
        );
        Ok(())
    }

    /// 每帧采样数 N
    pub fn frame_len(&self) -> usize {
        self.sample_rate.frame_len(self.frame_duration)
    }

    /// 参与频带能量计算的系数上限
    ///
    /// 默认按帧长缩放 20 kHz 上限; 设置 `bandwidth_hz` 时取两者较小值.
    pub fn max_bw_bin(&self) -> usize {
        let limit = MAX_BW_BIN >> self.frame_duration.short_shift();
        match self.bandwidth_hz {
            Some(hz) => {
                let bins = hz as usize * 2 * self.frame_len() / self.sample_rate.hz() as usize;
                limit.min(bins)
            }
            None => limit,
        }
    }
}
