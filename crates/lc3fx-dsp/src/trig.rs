//! 整数三角函数.
//!
//! 只在会话建立时用于生成旋转因子与窗表. 角度先按象限与八分圆归约,
//! 再用 Q30 泰勒级数求值, 全程整数运算, 结果在任何平台上逐位一致.

use lc3fx_basop::{Frac16, MAX_16, MIN_16, Word16};

/// Q30 的 1.0
pub(crate) const ONE_Q30: i64 = 1 << 30;
/// π/2, Q30
const HALF_PI_Q30: i64 = 1_686_629_713;
/// 泰勒级数项数, 在 [0, π/4] 上误差远小于 Q30 的 1 LSB
const TAYLOR_TERMS: i64 = 6;

/// `2π·t/period` 的 (cos, sin), Q30
pub fn cos_sin_q30(t: i64, period: i64) -> (i64, i64) {
    debug_assert!(period > 0);
    let t = t.rem_euclid(period);
    let quadrant = 4 * t / period;
    let r = 4 * t - quadrant * period;

    // 象限内角度 φ = (π/2)·r/period; 超过 π/4 时改用余角
    let (c, s) = if 2 * r <= period {
        first_octant(scale_angle(r, period))
    } else {
        let (c, s) = first_octant(scale_angle(period - r, period));
        (s, c)
    };

    match quadrant {
        0 => (c, s),
        1 => (-s, c),
        2 => (-c, -s),
        _ => (s, -c),
    }
}

/// `2π·t/period` 的 (cos, sin), Q15, 1.0 饱和到 `MAX_16`
pub fn cos_sin_q15(t: i64, period: i64) -> (Frac16, Frac16) {
    let (c, s) = cos_sin_q30(t, period);
    (Frac16(q30_to_q15(c)), Frac16(q30_to_q15(s)))
}

fn scale_angle(r: i64, period: i64) -> i64 {
    (HALF_PI_Q30 * r + period / 2) / period
}

/// φ ∈ [0, π/4] 的 (cos, sin), Q30
fn first_octant(phi: i64) -> (i64, i64) {
    let x2 = (phi * phi + (ONE_Q30 >> 1)) >> 30;
    let (mut sin, mut sin_term) = (phi, phi);
    let (mut cos, mut cos_term) = (ONE_Q30, ONE_Q30);
    for k in 1..=TAYLOR_TERMS {
        sin_term = -((sin_term * x2) >> 30) / ((2 * k) * (2 * k + 1));
        sin += sin_term;
        cos_term = -((cos_term * x2) >> 30) / ((2 * k - 1) * (2 * k));
        cos += cos_term;
    }
    (cos, sin)
}

fn q30_to_q15(v: i64) -> Word16 {
    ((v + (1 << 14)) >> 15).clamp(MIN_16 as i64, MAX_16 as i64) as Word16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_特殊角() {
        assert_eq!(cos_sin_q15(0, 8), (Frac16(MAX_16), Frac16(0)));
        assert_eq!(cos_sin_q15(1, 8), (Frac16(23170), Frac16(23170)));
        assert_eq!(cos_sin_q15(2, 8), (Frac16(0), Frac16(MAX_16)));
        assert_eq!(cos_sin_q15(4, 8), (Frac16(MIN_16), Frac16(0)));
        assert_eq!(cos_sin_q15(6, 8), (Frac16(0), Frac16(MIN_16)));
        assert_eq!(cos_sin_q15(-2, 8), cos_sin_q15(6, 8));
    }

    #[test]
    fn test_与浮点参考一致() {
        for &period in &[40i64, 160, 480, 1920, 3840] {
            for t in 0..period {
                let (c, s) = cos_sin_q30(t, period);
                let angle = 2.0 * std::f64::consts::PI * t as f64 / period as f64;
                let scale = ONE_Q30 as f64;
                assert!((c as f64 / scale - angle.cos()).abs() < 1e-7, "cos t={t}/{period}");
                assert!((s as f64 / scale - angle.sin()).abs() < 1e-7, "sin t={t}/{period}");
            }
        }
    }
}
