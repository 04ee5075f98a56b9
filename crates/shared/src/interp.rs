/// Linear interpolation from `start` towards `end` by factor `t` in `[0, 1]`.
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}
