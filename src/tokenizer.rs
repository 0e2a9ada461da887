// Line-oriented CSV tokenizer for published sheet exports.
//
// Quoted fields and doubled-quote escapes are honored within a line; quoted
// newlines are not supported since the exports never contain them.
use std::mem::take;

/// Split CSV text into rows of trimmed cells.
///
/// Every line yields a row, including a trailing empty line (one empty cell).
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| tokenize_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Split a single line into trimmed cells.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && matches!(chars.peek(), Some('"')) {
                    chars.next(); // escaped quote
                    cell.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                row.push(take(&mut cell).trim().to_string());
            }
            _ => cell.push(ch),
        }
    }
    row.push(cell.trim().to_string());
    row
}

/// True when every cell of the row is empty.
pub fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_comma_stays_in_cell() {
        assert_eq!(tokenize_line(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn doubled_quote_is_literal() {
        assert_eq!(tokenize_line(r#"a,"b""c",d"#), vec!["a", "b\"c", "d"]);
    }

    #[test]
    fn cells_are_trimmed() {
        assert_eq!(tokenize_line("  x ,\t y  ,"), vec!["x", "y", ""]);
    }

    #[test]
    fn crlf_and_trailing_line() {
        let rows = tokenize("a,b\r\nc\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c"], vec![""]]);
    }

    #[test]
    fn empty_input_is_one_blank_row() {
        let rows = tokenize("");
        assert_eq!(rows.len(), 1);
        assert!(is_blank(&rows[0]));
    }

    #[test]
    fn quote_outside_escape_toggles() {
        // a lone quote opens a field that swallows the rest of the line
        assert_eq!(tokenize_line(r#"a,"b,c"#), vec!["a", "b,c"]);
    }
}
