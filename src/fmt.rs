//! Shared formatting utilities for size display and console output

use console::Emoji;

/// Rocket emoji for launch/start operations
pub const ROCKET: Emoji = Emoji("🚀", ">");

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Crossmark emoji for failure
pub const CROSSMARK: Emoji = Emoji("❌", "[FAIL]");

/// Sparkles emoji for completion/success
pub const SPARKLES: Emoji = Emoji("✨", "*");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Microscope emoji for analysis/inspection
pub const MICROSCOPE: Emoji = Emoji("🔍", ">>");

/// Warning emoji for caution/alerts
pub const WARNING: Emoji = Emoji("⚠️", "!");

/// The emoji, or its plain fallback when `NO_EMOJI` is set or the terminal
/// cannot show emoji
pub fn icon(emoji: Emoji<'static, 'static>) -> &'static str {
    if std::env::var_os("NO_EMOJI").is_some() || !console::Term::stdout().features().wants_emoji() {
        emoji.1
    } else {
        emoji.0
    }
}

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use layout_delta::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// assert_eq!(format_bytes(3 * 1_073_741_824), "3.00 GB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a signed byte difference, keeping the sign in front of the unit
///
/// ```
/// use layout_delta::fmt::format_signed_bytes;
///
/// assert_eq!(format_signed_bytes(2048), "2.00 KB");
/// assert_eq!(format_signed_bytes(-512), "-512 B");
/// ```
pub fn format_signed_bytes(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_bytes(bytes.unsigned_abs()))
    } else {
        format_bytes(bytes as u64)
    }
}

/// Format an object count with thousands separators
///
/// ```
/// use layout_delta::fmt::format_count;
///
/// assert_eq!(format_count(1_000_000), "1,000,000");
/// assert_eq!(format_count(999), "999");
/// ```
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_various_sizes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(2_621_440), "2.50 MB");
        assert_eq!(format_bytes(1_610_612_736), "1.50 GB");
    }

    #[test]
    fn test_format_signed_bytes_handles_extremes() {
        assert_eq!(format_signed_bytes(0), "0 B");
        assert!(format_signed_bytes(i64::MIN).starts_with('-'));
    }

    #[test]
    fn test_format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(10_000), "10,000");
        assert_eq!(format_count(250_000), "250,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
