/// 工具函数集合

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;
const TIB: f64 = GIB * 1024.0;

/// 面板速率显示宽度：5 位数字 + 1 位单位
pub const SPEED_FIELD_WIDTH: usize = 6;

/// 格式化每秒字节数，输出固定 6 个字符宽度
///
/// 面板宽度依赖该定长输出，采样之间不能抖动。
pub fn format_speed(bytes_per_sec: f64) -> String {
    if !bytes_per_sec.is_finite() {
        return "    0B".to_string();
    }
    let value = bytes_per_sec.max(0.0);

    let (num, unit) = if value < KIB {
        (format!("{}", value.round() as u64), 'B')
    } else if value < MIB {
        (compact_fixed1(value / KIB), 'K')
    } else if value < GIB {
        (compact_fixed1(value / MIB), 'M')
    } else {
        (compact_fixed1(value / GIB), 'G')
    };

    format!("{:>5}{}", num, unit)
}

/// 格式化字节总量（KB、MB、GB、TB）
pub fn format_bytes(bytes: u64) -> String {
    format_byte_quantity(bytes as f64)
}

/// 格式化浮点字节量，用于速率的 "x/s" 展示
pub fn format_byte_quantity(bytes: f64) -> String {
    if !bytes.is_finite() {
        return "0 B".to_string();
    }
    let bytes = bytes.max(0.0);

    if bytes < KIB {
        format!("{} B", bytes.round() as u64)
    } else if bytes < MIB {
        format!("{} KB", to_fixed1(bytes / KIB))
    } else if bytes < GIB {
        format!("{} MB", to_fixed1(bytes / MIB))
    } else if bytes < TIB {
        format!("{} GB", to_fixed1(bytes / GIB))
    } else {
        format!("{} TB", to_fixed1(bytes / TIB))
    }
}

/// 保留一位小数，半数向上进位
pub fn to_fixed1(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

/// 四位整数部分时去掉小数，保证数字部分不超过 5 个字符
fn compact_fixed1(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded >= 1000.0 {
        format!("{}", value.round() as u64)
    } else {
        format!("{:.1}", rounded)
    }
}

/// 计算四舍五入后的整数百分比，结果限制在 [0, 100]
pub fn round_percent(part: f64, whole: f64) -> u8 {
    if whole <= 0.0 {
        return 0;
    }
    ((part / whole) * 100.0).round().clamp(0.0, 100.0) as u8
}
