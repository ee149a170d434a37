//! 频带划分表.
//!
//! 频带边界在会话建立时按 (采样率, 帧长, 是否线性) 生成:
//! 48 kHz 只编码 20 kHz 以下的 `5N/6` 个系数, 其他采样率编码全部 N 个系数;
//! 频带数为 `min(64, 编码系数数)`. 标准表的边界按平方律展宽,
//! 低频保留单系数与双系数频带; 线性表为等宽划分.
//!
//! 开头连续的单系数频带与其后连续的双系数频带走能量估计的快速路径,
//! 两段的结束位置由表本身推导.

use lc3fx_basop::Word16;
use lc3fx_core::config::MAX_BW_BIN;
use lc3fx_core::{FrameDuration, Lc3Error, Lc3Result, MAX_BANDS, SampleRate};

use crate::tables::MAX_BAND_WIDTH;

/// 频带划分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandLayout {
    offsets: [Word16; MAX_BANDS + 1],
    n_bands: usize,
    bands_offset_one: usize,
    bands_offset_two: usize,
    max_bw_bin: usize,
}

impl BandLayout {
    /// 生成指定配置的频带表, 带宽上限取帧长对应的 20 kHz
    pub fn new(sample_rate: SampleRate, duration: FrameDuration, linear: bool) -> Self {
        let frame_len = sample_rate.frame_len(duration);
        let bins = coded_bins(sample_rate, frame_len);
        let n_bands = bins.min(MAX_BANDS);

        let mut offsets = [0; MAX_BANDS + 1];
        for (b, slot) in offsets.iter_mut().enumerate().take(n_bands + 1) {
            let offset = if linear {
                b * bins / n_bands
            } else {
                b + (bins - n_bands) * b * b / (n_bands * n_bands)
            };
            *slot = offset as Word16;
        }

        let (bands_offset_one, bands_offset_two) = fast_path_runs(&offsets[..=n_bands]);
        Self {
            offsets,
            n_bands,
            bands_offset_one,
            bands_offset_two,
            max_bw_bin: MAX_BW_BIN >> duration.short_shift(),
        }
    }

    /// 校验并包装外部频带表
    ///
    /// 要求从 0 开始严格递增, 频带宽度小于 32, 频带数不超过 64.
    pub fn from_offsets(offsets: &[Word16], max_bw_bin: usize) -> Lc3Result<Self> {
        if offsets.len() < 2 || offsets.len() > MAX_BANDS + 1 {
            return Err(Lc3Error::InvalidBandTable(format!(
                "边界数 {} 超出范围 [2, {}]",
                offsets.len(),
                MAX_BANDS + 1
            )));
        }
        if offsets[0] != 0 {
            return Err(Lc3Error::InvalidBandTable("首个边界必须为 0".into()));
        }
        if let Some(b) = offsets.windows(2).position(|w| {
            let width = w[1] as i32 - w[0] as i32;
            width <= 0 || width >= MAX_BAND_WIDTH as i32
        }) {
            return Err(Lc3Error::InvalidBandTable(format!(
                "频带 {b} 宽度不在 [1, {}) 内",
                MAX_BAND_WIDTH
            )));
        }

        let n_bands = offsets.len() - 1;
        let (bands_offset_one, bands_offset_two) = fast_path_runs(offsets);
        Ok(Self::with_thresholds(
            offsets,
            n_bands,
            bands_offset_one,
            bands_offset_two,
            max_bw_bin,
        ))
    }

    /// 直接使用给定的快速路径分段, 不做校验
    pub(crate) fn with_thresholds(
        offsets: &[Word16],
        n_bands: usize,
        bands_offset_one: usize,
        bands_offset_two: usize,
        max_bw_bin: usize,
    ) -> Self {
        let mut table = [0; MAX_BANDS + 1];
        table[..=n_bands].copy_from_slice(&offsets[..=n_bands]);
        Self {
            offsets: table,
            n_bands,
            bands_offset_one,
            bands_offset_two,
            max_bw_bin,
        }
    }

    /// 替换带宽上限 (系数个数)
    pub fn with_max_bw_bin(mut self, max_bw_bin: usize) -> Self {
        self.max_bw_bin = max_bw_bin;
        self
    }

    /// 频带边界, 长度为 `n_bands + 1`
    pub fn offsets(&self) -> &[Word16] {
        &self.offsets[..=self.n_bands]
    }

    /// 频带数
    pub fn n_bands(&self) -> usize {
        self.n_bands
    }

    /// 单系数频带的结束位置 (频带序号)
    pub fn bands_offset_one(&self) -> usize {
        self.bands_offset_one
    }

    /// 双系数频带的结束位置 (频带序号)
    pub fn bands_offset_two(&self) -> usize {
        self.bands_offset_two
    }

    /// 参与能量计算的系数上限
    pub fn max_bw_bin(&self) -> usize {
        self.max_bw_bin
    }

    /// 第 `band` 个频带的宽度
    pub fn band_width(&self, band: usize) -> usize {
        (self.offsets[band + 1] - self.offsets[band]) as usize
    }
}

/// 编码的系数个数: 48 kHz 截到 20 kHz, 其余为全部 N 个
pub fn coded_bins(sample_rate: SampleRate, frame_len: usize) -> usize {
    match sample_rate {
        SampleRate::Hz48000 => frame_len * 5 / 6,
        _ => frame_len,
    }
}

/// 开头单系数频带数, 以及再加上其后双系数频带后的总数
fn fast_path_runs(offsets: &[Word16]) -> (usize, usize) {
    let widths = || offsets.windows(2).map(|w| w[1] - w[0]);
    let one = widths().take_while(|&w| w == 1).count();
    let two = one + widths().skip(one).take_while(|&w| w == 2).count();
    (one, two)
}
