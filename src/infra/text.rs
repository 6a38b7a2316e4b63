//! Text utilities
//!
//! Occurrence scanning and offset/line conversion. Offsets are byte offsets
//! into UTF-8 text; reported characters are UTF-16 code units.

/// Every byte offset at which `keyword` starts in `text`, overlaps included.
///
/// Scanning resumes one character after each hit, so `"aaaa"` scanned for
/// `"aa"` yields `[0, 1, 2]`. An empty keyword never matches.
pub fn forward_match(text: &str, keyword: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    if keyword.is_empty() {
        return offsets;
    }

    let mut from = 0;
    while let Some(found) = text[from..].find(keyword) {
        let offset = from + found;
        offsets.push(offset);

        let step = text[offset..].chars().next().map_or(1, char::len_utf8);
        from = offset + step;
        if from > text.len() {
            break;
        }
    }
    offsets
}

/// Line-break table for one file
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i + 1);
                }
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 0-based line containing byte `offset`
    pub fn line_of(&self, offset: usize) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32,
            Err(next) => next.saturating_sub(1) as u32,
        }
    }

    /// Byte offset where the 0-based `line` starts
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line as usize).copied()
    }

    /// Text of the 0-based `line`, without its line terminator
    pub fn line_text<'a>(&self, text: &'a str, line: u32) -> &'a str {
        let Some(start) = self.line_start(line) else {
            return "";
        };
        let end = self
            .line_start(line + 1)
            .unwrap_or(text.len())
            .min(text.len());
        let raw = &text[start.min(end)..end];
        let raw = raw.strip_suffix('\n').unwrap_or(raw);
        raw.strip_suffix('\r').unwrap_or(raw)
    }

    /// 0-based (line, UTF-16 character) for a byte offset into `text`
    pub fn position(&self, text: &str, offset: usize) -> (u32, u32) {
        let offset = clamp_to_boundary(text, offset);
        let line = self.line_of(offset);
        let start = self.line_start(line).unwrap_or(0).min(offset);
        let character: usize = text[start..offset].chars().map(char::len_utf16).sum();
        (line, character as u32)
    }
}

fn clamp_to_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_match_overlapping() {
        assert_eq!(forward_match("aaaa", "aa"), vec![0, 1, 2]);
        assert_eq!(forward_match("abcabc", "abc"), vec![0, 3]);
        assert_eq!(forward_match("testVar test", "test"), vec![0, 8]);
    }

    #[test]
    fn test_forward_match_empty_keyword() {
        assert!(forward_match("anything", "").is_empty());
        assert!(forward_match("", "").is_empty());
        assert!(forward_match("", "x").is_empty());
    }

    #[test]
    fn test_forward_match_multibyte() {
        let text = "const 名前 = 1; 名前;";
        let hits = forward_match(text, "名前");
        assert_eq!(hits.len(), 2);
        assert_eq!(&text[hits[0]..hits[0] + "名前".len()], "名前");
    }

    #[test]
    fn test_line_text_trims_terminators() {
        let text = "first\r\nsecond\nthird";
        let index = LineIndex::new(text);
        assert_eq!(index.line_text(text, 0), "first");
        assert_eq!(index.line_text(text, 1), "second");
        assert_eq!(index.line_text(text, 2), "third");
        assert_eq!(index.line_text(text, 9), "");
    }

    #[test]
    fn test_position_across_line_endings() {
        let text = "let a = 1;\nlet bb = 2;\r\nlet c = 3;";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 3);

        let offset = text.find("bb").unwrap();
        assert_eq!(index.position(text, offset), (1, 4));

        let offset = text.find('c').unwrap();
        assert_eq!(index.position(text, offset), (2, 4));
    }

    #[test]
    fn test_position_counts_utf16_units() {
        let text = "const s = '😀'; s;";
        let index = LineIndex::new(text);
        let offset = text.rfind('s').unwrap();
        // the emoji is two UTF-16 code units but four bytes
        assert_eq!(index.position(text, offset), (0, 16));
    }

    #[test]
    fn test_lone_carriage_return_breaks_line() {
        let text = "a\rb";
        let index = LineIndex::new(text);
        assert_eq!(index.position(text, 2), (1, 0));
    }
}
