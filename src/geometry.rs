//! 2Dピクセル座標上の角度計算

/// 2点の中点
pub fn midpoint(a: (f32, f32), b: (f32, f32)) -> (f32, f32) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

/// 3点 a-b-c の頂点 b における角度（度、0〜180）
///
/// b→a と b→c の atan2 差分から計算する。縮退入力（共線・一致）は
/// 0° または 180° になる。b と一致する点は方向が未定義になるため、
/// 呼び出し側で長さゼロの肢を弾くこと。
pub fn calculate_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let radians = f32::atan2(c.1 - b.1, c.0 - b.0) - f32::atan2(a.1 - b.1, a.0 - b.0);
    let mut angle = (radians.to_degrees()).abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}

/// 胴体の鉛直軸からの傾き（度、絶対値）
///
/// 肩中点→腰中点ベクトルの atan2(dx, dy)。画像Y軸は下向きが正なので、
/// 直立時は dy > 0, dx ≈ 0 で傾き 0° になる
pub fn torso_inclination(mid_shoulder: (f32, f32), mid_hip: (f32, f32)) -> f32 {
    let dx = mid_hip.0 - mid_shoulder.0;
    let dy = mid_hip.1 - mid_shoulder.1;
    f32::atan2(dx, dy).to_degrees().abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_right_angle() {
        let angle = calculate_angle((1.0, 0.0), (0.0, 0.0), (0.0, 1.0));
        assert!(approx_eq(angle, 90.0, 0.001), "got {}", angle);
    }

    #[test]
    fn test_straight_line_180() {
        let angle = calculate_angle((-1.0, 0.0), (0.0, 0.0), (1.0, 0.0));
        assert!(approx_eq(angle, 180.0, 0.001), "got {}", angle);
    }

    #[test]
    fn test_collinear_same_side_zero() {
        let angle = calculate_angle((1.0, 0.0), (0.0, 0.0), (2.0, 0.0));
        assert!(approx_eq(angle, 0.0, 0.001), "got {}", angle);
    }

    #[test]
    fn test_range_and_symmetry() {
        // 任意の3点で [0, 180] に収まり、a/c 入れ替えで不変
        let points = [
            ((3.0, 7.0), (1.0, -2.0), (-5.0, 4.0)),
            ((0.0, 0.0), (10.0, 10.0), (20.0, 0.0)),
            ((-1.0, -1.0), (0.0, 0.0), (-1.0, 1.0)),
            ((100.0, 50.0), (100.0, 150.0), (200.0, 105.0)),
        ];
        for &(a, b, c) in &points {
            let angle = calculate_angle(a, b, c);
            assert!((0.0..=180.0).contains(&angle), "out of range: {}", angle);
            let swapped = calculate_angle(c, b, a);
            assert!(approx_eq(angle, swapped, 0.001), "{} != {}", angle, swapped);
        }
    }

    #[test]
    fn test_knee_angle_standing() {
        // 直立: 腰-膝-足首がほぼ一直線 → 180°近く
        let hip = (300.0, 200.0);
        let knee = (300.0, 300.0);
        let ankle = (302.0, 400.0);
        let angle = calculate_angle(hip, knee, ankle);
        assert!(angle > 175.0, "got {}", angle);
    }

    #[test]
    fn test_knee_angle_deep_squat() {
        // 深いしゃがみ: 膝が大きく曲がる → 90°以下
        let hip = (300.0, 300.0);
        let knee = (350.0, 320.0);
        let ankle = (300.0, 340.0);
        let angle = calculate_angle(hip, knee, ankle);
        assert!(angle < 90.0, "got {}", angle);
    }

    #[test]
    fn test_inclination_vertical() {
        // 肩が腰の真上 → 傾き0°
        let inc = torso_inclination((100.0, 50.0), (100.0, 150.0));
        assert!(approx_eq(inc, 0.0, 0.001), "got {}", inc);
    }

    #[test]
    fn test_inclination_near_horizontal() {
        // ほぼ水平な胴体 → 約87°
        let inc = torso_inclination((100.0, 100.0), (200.0, 105.0));
        assert!(approx_eq(inc, 87.0, 1.0), "got {}", inc);
    }

    #[test]
    fn test_inclination_absolute() {
        // 左右どちらに倒れても正の値
        let left = torso_inclination((50.0, 100.0), (100.0, 200.0));
        let right = torso_inclination((150.0, 100.0), (100.0, 200.0));
        assert!(approx_eq(left, right, 0.001));
        assert!(left > 0.0);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(midpoint((0.0, 0.0), (10.0, 20.0)), (5.0, 10.0));
    }
}
