//! # lc3fx-dsp
//!
//! LC3plus 编码端的定点频谱分析: 低重叠窗 MDCT 与频带能量估计.
//!
//! - `mdct`: 加窗、TDAC 折叠、归一化与 DCT-IV, 输出频谱及块指数
//! - `band_energy`: 按频带表计算平均能量, 输出共享块指数
//! - `analyzer`: 按会话配置组合以上两步, 管理每声道历史缓冲
//!
//! 变换所需的旋转因子、窗表与频带表都在会话建立时用整数运算生成.

pub mod analyzer;
pub mod band_energy;
pub mod band_tables;
pub mod dct_iv;
pub mod fft;
pub mod mdct;
pub mod tables;
pub mod trig;
pub mod window;

// 重导出常用类型
pub use analyzer::{SpectralAnalyzer, SpectralFrame};
pub use band_energy::{per_band_energy, process_per_band_energy};
pub use band_tables::BandLayout;
pub use dct_iv::DctIv;
pub use fft::FftPlan;
pub use mdct::{INPUT_EXPONENT, process_mdct};
pub use window::MdctWindow;
