//! 频带能量估计使用的常量表.

use lc3fx_basop::{Frac16, MAX_16, Word16};

/// 频带宽度上限 (不含)
pub const MAX_BAND_WIDTH: usize = 32;

/// 整数倒数表 `1/w`, Q15, 四舍五入; `w = 0, 1` 取 `MAX_16`
pub const INV_INT_TABLE: [Frac16; MAX_BAND_WIDTH] = build_inv_int_table();

/// 频带累加前的额外右移位数: 保证 `w` 个平方和不溢出 32 位
pub const BANDS_NRG_SCALE: [Word16; MAX_BAND_WIDTH] = [
    0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, //
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
];

const fn build_inv_int_table() -> [Frac16; MAX_BAND_WIDTH] {
    let mut table = [Frac16(MAX_16); MAX_BAND_WIDTH];
    let mut w = 2;
    while w < MAX_BAND_WIDTH {
        table[w] = Frac16(((32768 + w / 2) / w) as Word16);
        w += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_倒数表() {
        assert_eq!(INV_INT_TABLE[0], Frac16(MAX_16));
        assert_eq!(INV_INT_TABLE[1], Frac16(MAX_16));
        assert_eq!(INV_INT_TABLE[2], Frac16(16384));
        assert_eq!(INV_INT_TABLE[3], Frac16(10923));
        assert_eq!(INV_INT_TABLE[31], Frac16(1057));
    }

    #[test]
    fn test_累加余量足够() {
        for (w, &scale) in BANDS_NRG_SCALE.iter().enumerate() {
            assert!(w < 1 << (1 + 2 * scale), "w={w}");
            if scale > 0 {
                assert!(w >= 1 << (2 * scale - 1), "w={w} 缩放过度");
            }
        }
    }
}
