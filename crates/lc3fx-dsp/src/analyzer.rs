//! 频谱分析会话.
//!
//! 在会话建立时按配置生成窗表、DCT-IV 计划与频带表, 为每个声道保留
//! 一份历史缓冲, 并持有逐帧复用的暂存区. 逐帧处理不做任何分配.

use log::debug;

use lc3fx_basop::{Word16, Word32};
use lc3fx_core::{CodecConfig, Lc3Result, ScratchArena};

use crate::band_energy::per_band_energy;
use crate::band_tables::BandLayout;
use crate::dct_iv::DctIv;
use crate::mdct::process_mdct;
use crate::window::MdctWindow;

/// 一帧分析结果的块指数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralFrame {
    /// 频谱系数的块指数
    pub spectrum_exp: Word16,
    /// 频带能量的块指数
    pub energy_exp: Word16,
}

/// 频谱分析器
#[derive(Debug, Clone)]
pub struct SpectralAnalyzer {
    config: CodecConfig,
    window: MdctWindow,
    dct: DctIv,
    layout: BandLayout,
    history: Vec<Box<[Word16]>>,
    scratch: ScratchArena,
}

impl SpectralAnalyzer {
    /// 按配置建立会话
    pub fn new(config: &CodecConfig) -> Lc3Result<Self> {
        config.validate()?;
        let frame_len = config.frame_len();
        let window = MdctWindow::for_duration(frame_len, config.frame_duration)?;
        let dct = DctIv::new(frame_len)?;
        let layout = BandLayout::new(config.sample_rate, config.frame_duration, config.linear_bands)
            .with_max_bw_bin(config.max_bw_bin());
        let history = (0..config.channels)
            .map(|_| vec![0; window.memory_len()].into_boxed_slice())
            .collect();

        debug!(
            "创建频谱分析器: N={}, 窗长={}, 频带数={}, 声道数={}",
            frame_len,
            window.coefficients().len(),
            layout.n_bands(),
            config.channels
        );
        Ok(Self {
            config: config.clone(),
            window,
            dct,
            layout,
            history,
            scratch: ScratchArena::new(frame_len),
        })
    }

    /// 分析一帧: MDCT 后计算频带能量.
    ///
    /// `x` 为 N 个样点, `spectrum` 长度为 N, `energies` 至少 `n_bands` 个.
    pub fn analyze(
        &mut self,
        channel: usize,
        x: &[Word16],
        spectrum: &mut [Word32],
        energies: &mut [Word32],
    ) -> SpectralFrame {
        let spectrum_exp = self.transform(channel, x, spectrum);
        let energy_exp = per_band_energy(
            spectrum,
            spectrum_exp,
            &self.layout,
            energies,
            &mut self.scratch.frame(),
        );
        SpectralFrame {
            spectrum_exp,
            energy_exp,
        }
    }

    /// 只做 MDCT, 返回频谱块指数
    pub fn transform(&mut self, channel: usize, x: &[Word16], spectrum: &mut [Word32]) -> Word16 {
        let n = self.frame_len();
        assert!(channel < self.history.len(), "声道序号越界: {channel}");
        assert_eq!(x.len(), n, "输入帧长不匹配");
        assert_eq!(spectrum.len(), n, "频谱缓冲长度不匹配");
        process_mdct(
            x,
            &mut self.history[channel],
            self.window.coefficients(),
            &self.dct,
            spectrum,
            &mut self.scratch.frame(),
        )
    }

    /// 清空全部历史缓冲
    pub fn reset(&mut self) {
        for mem in &mut self.history {
            mem.fill(0);
        }
    }

    /// 会话配置
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// 帧长 N
    pub fn frame_len(&self) -> usize {
        self.window.frame_len()
    }

    /// 频带数
    pub fn n_bands(&self) -> usize {
        self.layout.n_bands()
    }

    /// 声道数
    pub fn channels(&self) -> usize {
        self.history.len()
    }

    /// 频带表
    pub fn layout(&self) -> &BandLayout {
        &self.layout
    }

    /// 分析窗
    pub fn window(&self) -> &MdctWindow {
        &self.window
    }
}
