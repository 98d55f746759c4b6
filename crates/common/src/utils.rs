//! 通用工具函数

/// 解析正整数
///
/// 接受 `"3"`、`" 3 "` 以及 `"3.0"` 这类整数值的小数写法，
/// 其余输入（空串、负数、零、非数字、带小数部分）返回 `None`。
pub fn parse_positive(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(value) = raw.parse::<u32>() {
        return (value > 0).then_some(value);
    }

    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}
