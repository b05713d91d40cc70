use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u8(100, 128), ((100u16 * 128 + 127) / 255) as u8);
}

#[test]
fn premultiply_opaque_is_identity() {
    assert_eq!(premultiply([10, 20, 30, 255]), [10, 20, 30, 255]);
    assert_eq!(unpremultiply([10, 20, 30, 255]), [10, 20, 30, 255]);
}

#[test]
fn premultiply_transparent_clears_color() {
    assert_eq!(premultiply([200, 100, 50, 0]), [0, 0, 0, 0]);
    assert_eq!(unpremultiply([0, 0, 0, 0]), [0, 0, 0, 0]);
}

#[test]
fn unpremultiply_recovers_half_alpha_approximately() {
    let p = premultiply([200, 100, 50, 128]);
    let s = unpremultiply(p);
    for i in 0..3 {
        let want = [200i32, 100, 50][i];
        assert!((i32::from(s[i]) - want).abs() <= 1, "{s:?}");
    }
    assert_eq!(s[3], 128);
}
