// src/secrets/parser.rs

use std::collections::HashMap;

/// Parse `.env`-style `KEY=VALUE` lines.
///
/// - blank lines and `#` comments are skipped
/// - lines without `=` are ignored
/// - only the first `=` splits; key and value are trimmed
/// - a value wrapped in double quotes loses them
///
/// Later assignments of the same key win.
pub fn parse_dotenv(contents: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        let mut value = value.trim();
        if value.starts_with('"') && value.ends_with('"') {
            value = value.trim_matches('"');
        }

        vars.insert(key.to_string(), value.to_string());
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assignments_comments_and_quotes() {
        let src = "\
# comment
API_KEY=xyz

  TOKEN = \"quoted value\"
URL=https://example.com/?a=b
not a pair
EMPTY=
";
        let vars = parse_dotenv(src);

        assert_eq!(vars.get("API_KEY").map(String::as_str), Some("xyz"));
        assert_eq!(vars.get("TOKEN").map(String::as_str), Some("quoted value"));
        assert_eq!(vars.get("URL").map(String::as_str), Some("https://example.com/?a=b"));
        assert_eq!(vars.get("EMPTY").map(String::as_str), Some(""));
        assert_eq!(vars.len(), 4);
    }

    #[test]
    fn surrounding_quotes_are_all_stripped() {
        let vars = parse_dotenv("Q=\"\nR=\"\"x\"\"");
        assert_eq!(vars.get("Q").map(String::as_str), Some(""));
        assert_eq!(vars.get("R").map(String::as_str), Some("x"));
    }

    #[test]
    fn last_assignment_wins() {
        let vars = parse_dotenv("A=1\nA=2\n");
        assert_eq!(vars.get("A").map(String::as_str), Some("2"));
    }
}
