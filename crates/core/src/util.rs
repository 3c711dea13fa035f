/// Byte offset of a UTF-16 column within a single line. Columns past the end
/// of the line clamp to its length.
pub fn utf16_col_to_byte_col(line: &str, utf16_col: usize) -> usize {
    let mut curr_utf16 = 0;
    let mut curr_byte = 0;

    for c in line.chars() {
        if curr_utf16 >= utf16_col {
            break;
        }
        curr_utf16 += c.len_utf16();
        curr_byte += c.len_utf8();
    }
    curr_byte
}

pub fn byte_col_to_utf16_col(line: &str, byte_col: usize) -> usize {
    let end = byte_col.min(line.len());
    line[..end].chars().map(char::len_utf16).sum()
}

/// The text of line `line` in `content`, without its terminator.
pub fn line_at(content: &str, line: usize) -> &str {
    content
        .split('\n')
        .nth(line)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or("")
}
