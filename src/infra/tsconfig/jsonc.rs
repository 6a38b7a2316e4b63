//! JSON-with-comments preprocessing
//!
//! tsconfig files allow `//` and `/* */` comments and trailing commas.
//! Both are blanked out so the result parses with `serde_json`; byte
//! positions are preserved so parse errors still point at the right line.

/// Replace comments and trailing commas with whitespace
pub fn strip(input: &str) -> String {
    let without_comments = strip_comments(input);
    strip_trailing_commas(&without_comments)
}

fn strip_comments(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let mut in_string = false;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            out.push(b);
            if b == b'\\' && i + 1 < bytes.len() {
                out.push(bytes[i + 1]);
                i += 2;
                continue;
            }
            if b == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match (b, bytes.get(i + 1)) {
            (b'"', _) => {
                in_string = true;
                out.push(b);
                i += 1;
            }
            (b'/', Some(b'/')) => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out.push(b' ');
                    i += 1;
                }
            }
            (b'/', Some(b'*')) => {
                out.extend_from_slice(b"  ");
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    out.push(if bytes[i] == b'\n' { b'\n' } else { b' ' });
                    i += 1;
                }
                if i < bytes.len() {
                    out.extend_from_slice(b"  ");
                    i += 2;
                }
            }
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }

    // only ASCII bytes were replaced, so the buffer is still valid UTF-8
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn strip_trailing_commas(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = bytes.to_vec();
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == b'"' {
                in_string = false;
            }
        } else if b == b'"' {
            in_string = true;
        } else if b == b',' {
            let next = bytes[i + 1..].iter().find(|c| !c.is_ascii_whitespace());
            if matches!(next, Some(b'}') | Some(b']') | None) {
                out[i] = b' ';
            }
        }
        i += 1;
    }

    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strips_comments() {
        let input = r#"{
  // line comment
  "compilerOptions": { /* block */ "strict": true },
  "include": ["src/**/*"] /* trailing
  multi-line */
}"#;
        let value: Value = serde_json::from_str(&strip(input)).unwrap();
        assert_eq!(value["compilerOptions"]["strict"], Value::Bool(true));
        assert_eq!(value["include"][0], "src/**/*");
    }

    #[test]
    fn test_keeps_comment_markers_inside_strings() {
        let input = r#"{ "include": ["src/**/*.ts", "a//b", "c/*d*/"] }"#;
        let value: Value = serde_json::from_str(&strip(input)).unwrap();
        assert_eq!(value["include"][0], "src/**/*.ts");
        assert_eq!(value["include"][1], "a//b");
        assert_eq!(value["include"][2], "c/*d*/");
    }

    #[test]
    fn test_strips_trailing_commas() {
        let input = "{ \"files\": [\"a.ts\", \"b.ts\",], \"x\": { \"y\": 1, }, }";
        let value: Value = serde_json::from_str(&strip(input)).unwrap();
        assert_eq!(value["files"].as_array().unwrap().len(), 2);
        assert_eq!(value["x"]["y"], 1);
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let input = r#"{ "a": "say \"hi\" // not a comment", }"#;
        let value: Value = serde_json::from_str(&strip(input)).unwrap();
        assert_eq!(value["a"], "say \"hi\" // not a comment");
    }

    #[test]
    fn test_preserves_line_numbers() {
        let input = "{\n/* a\nb */\n\"x\": 1\n}";
        assert_eq!(strip(input).lines().count(), input.lines().count());
    }
}
