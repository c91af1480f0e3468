/// Format seconds as MM:SS timestamp. Minutes keep counting past an hour.
pub fn format_timestamp(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parse `MM:SS` or `HH:MM:SS` back into seconds.
pub fn parse_timestamp_label(label: &str) -> Option<u64> {
    let parts = label
        .trim()
        .split(':')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [m, s] if *s < 60 => Some(m * 60 + s),
        [h, m, s] if *m < 60 && *s < 60 => Some(h * 3600 + m * 60 + s),
        _ => None,
    }
}

/// Link that starts playback at `seconds`.
pub fn jump_link(locator: &str, seconds: u64) -> String {
    let sep = if locator.contains('?') { '&' } else { '?' };
    format!("{locator}{sep}t={seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00");
        assert_eq!(format_timestamp(135), "02:15");
        assert_eq!(format_timestamp(3725), "62:05");
    }

    #[test]
    fn test_parse_timestamp_label() {
        assert_eq!(parse_timestamp_label("02:15"), Some(135));
        assert_eq!(parse_timestamp_label("1:02:05"), Some(3725));
        assert_eq!(parse_timestamp_label("62:05"), Some(3725));
        assert_eq!(parse_timestamp_label("2:75"), None);
        assert_eq!(parse_timestamp_label("abc"), None);
        assert_eq!(parse_timestamp_label(""), None);
    }

    #[test]
    fn test_jump_link() {
        assert_eq!(
            jump_link("https://youtu.be/dQw4w9WgXcQ", 42),
            "https://youtu.be/dQw4w9WgXcQ?t=42s"
        );
        assert_eq!(
            jump_link("https://www.youtube.com/watch?v=dQw4w9WgXcQ", 42),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"
        );
    }
}
