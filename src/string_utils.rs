pub fn size_to_str(size: u64) -> String {
    if size > 1024 * 1024 {
        format!("{} MiB ({} bytes)", size / (1024 * 1024), size)
    } else if size > 1024 {
        format!("{} KiB ({} bytes)", size / 1024, size)
    } else {
        format!("{} bytes", size)
    }
}

/// Parse sizes like `4096`, `64KiB`, `1MiB` or `2GiB`.
pub fn parse_human_size(size_str: &str) -> Result<u64, String> {
    let size_str = size_str.trim();
    let split_at = size_str
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(size_str.len());
    let (number, unit) = size_str.split_at(split_at);
    let number: u64 = number
        .parse()
        .map_err(|err| format!("invalid size '{}': {}", size_str, err))?;
    let multiplier: u64 = match unit.trim() {
        "" | "B" => 1,
        "KiB" => 1024,
        "MiB" => 1024 * 1024,
        "GiB" => 1024 * 1024 * 1024,
        unit => return Err(format!("invalid size unit '{}'", unit)),
    };
    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size '{}' is too big", size_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_sizes() {
        assert_eq!(parse_human_size("0"), Ok(0));
        assert_eq!(parse_human_size("4096"), Ok(4096));
        assert_eq!(parse_human_size("64KiB"), Ok(64 * 1024));
        assert_eq!(parse_human_size("2 MiB"), Ok(2 * 1024 * 1024));
        assert_eq!(parse_human_size("1GiB"), Ok(1024 * 1024 * 1024));
        assert!(parse_human_size("KiB").is_err());
        assert!(parse_human_size("12kb").is_err());
        assert!(parse_human_size("-1").is_err());
    }

    #[test]
    fn sizes_to_str() {
        assert_eq!(size_to_str(10), "10 bytes");
        assert_eq!(size_to_str(4096), "4 KiB (4096 bytes)");
        assert_eq!(size_to_str(3 * 1024 * 1024 + 1), "3 MiB (3145729 bytes)");
    }
}
