//! # lc3fx
//!
//! LC3plus 低延迟音频编码器的定点频谱分析核心, 纯 Rust 实现.
//!
//! - **基本运算**: 语义对齐 ITU-T STL 的饱和 16/32 位定点算子
//! - **MDCT 分析**: 低重叠窗、TDAC 折叠与混合基 FFT 实现的 DCT-IV
//! - **频带能量**: 按频带表估计平均能量, 输出共享块指数
//!
//! 数值路径不含浮点运算, 结果在所有平台上逐位一致.
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use lc3fx::core::{CodecConfig, FrameDuration, SampleRate};
//! use lc3fx::dsp::SpectralAnalyzer;
//!
//! let config = CodecConfig::new(SampleRate::Hz48000, FrameDuration::Ms10, 1);
//! let mut analyzer = SpectralAnalyzer::new(&config).unwrap();
//! let pcm = vec![0i16; analyzer.frame_len()];
//! let mut spectrum = vec![0; analyzer.frame_len()];
//! let mut energies = vec![0; analyzer.n_bands()];
//! let frame = analyzer.analyze(0, &pcm, &mut spectrum, &mut energies);
//! println!("频谱指数: {}, 能量指数: {}", frame.spectrum_exp, frame.energy_exp);
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `lc3fx-basop` | 定点基本运算 |
//! | `lc3fx-core` | 错误、配置与暂存区 |
//! | `lc3fx-dsp` | MDCT 与频带能量 |

pub mod logging;

/// 定点基本运算
pub use lc3fx_basop as basop;

/// 错误、配置与暂存区
pub use lc3fx_core as core;

/// MDCT 分析与频带能量估计
pub use lc3fx_dsp as dsp;

/// 获取 lc3fx 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
