//! contains small utility functions that have nowhere else to go

/// returns the crate version
pub fn get_version() -> [u16; 3] {
    let parts: Vec<u16> = env!("CARGO_PKG_VERSION")
        .split('.')
        .map(|x| x.parse().unwrap_or(0))
        .collect();
    match parts[..] {
        [major, minor, patch, ..] => [major, minor, patch],
        _ => [0, 0, 0],
    }
}

/// converts a byte offset into a 1-based (line, column) pair. The column
/// counts characters, not bytes. Offsets past the end point behind the last
/// character.
pub fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(src.len());
    while !src.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &src[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

/// returns the full line of `src` that contains `offset`, without the line break
pub fn line_at(src: &str, offset: usize) -> &str {
    let (line, _) = line_col(src, offset);
    src.lines().nth(line - 1).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let src = "_begin f\n  push 1 ;\näb;";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 7), (1, 8));
        assert_eq!(line_col(src, 11), (2, 3));
        // `b` sits behind the two byte `ä`
        assert_eq!(line_col(src, 22), (3, 2));
        assert_eq!(line_col(src, 1000), (3, 4));
        assert_eq!(line_at(src, 11), "  push 1 ;");
        assert_eq!(line_at("", 0), "");
    }

    #[test]
    fn test_version() {
        assert_eq!(get_version(), [0, 1, 0]);
    }
}
