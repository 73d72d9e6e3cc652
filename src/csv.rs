//! Key-value CSV codec for the card file
//!
//! Rows are flat key,value sequences:
//!
//! ```text
//! id,1,data,buy milk,type,todo
//! ```
//!
//! Fields containing commas, quotes, or line breaks are written quoted with
//! inner quotes doubled, so free-text card data survives a round trip. This
//! is deliberately not a general CSV reader; it parses exactly the card
//! file layout and rejects anything else with a line-numbered error.

use crate::error::{Error, Result};

/// One parsed row: the 1-based line it started on plus its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

impl Row {
    /// Interpret the fields as key,value pairs.
    ///
    /// An odd field count is malformed. Duplicate keys are allowed here;
    /// callers decide whether the last occurrence wins.
    pub fn pairs(&self) -> Result<Vec<(String, String)>> {
        if self.fields.len() % 2 != 0 {
            return Err(Error::MalformedRow {
                line: self.line,
                reason: format!("expected key,value pairs, found {} fields", self.fields.len()),
            });
        }
        Ok(self
            .fields
            .chunks(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect())
    }
}

enum FieldState {
    /// At the start of a field, nothing consumed yet.
    Start,
    /// Inside an unquoted field.
    Unquoted,
    /// Inside a quoted field.
    Quoted,
    /// Just closed a quoted field; only a separator may follow.
    QuoteClosed,
}

/// Parse card file text into rows.
///
/// Blank lines are skipped. Quoted fields may span lines, so this walks
/// characters instead of splitting on newlines; reported line numbers are
/// physical lines.
pub fn parse(text: &str) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = FieldState::Start;
    let mut line = 1usize;
    let mut row_line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        // Normalize CRLF to a bare newline outside quoted fields.
        let ch = if !matches!(state, FieldState::Quoted) && ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
                '\n'
            } else {
                ch
            }
        } else {
            ch
        };

        match state {
            FieldState::Start => match ch {
                '"' => state = FieldState::Quoted,
                ',' => fields.push(String::new()),
                '\n' => {
                    line += 1;
                    if !fields.is_empty() {
                        // A separator just opened one more (empty) field
                        fields.push(String::new());
                        rows.push(Row {
                            line: row_line,
                            fields: std::mem::take(&mut fields),
                        });
                    }
                    row_line = line;
                }
                _ => {
                    field.push(ch);
                    state = FieldState::Unquoted;
                }
            },
            FieldState::Unquoted => match ch {
                ',' => {
                    fields.push(std::mem::take(&mut field));
                    state = FieldState::Start;
                }
                '\n' => {
                    line += 1;
                    fields.push(std::mem::take(&mut field));
                    rows.push(Row {
                        line: row_line,
                        fields: std::mem::take(&mut fields),
                    });
                    row_line = line;
                    state = FieldState::Start;
                }
                '"' => {
                    return Err(Error::MalformedRow {
                        line,
                        reason: "quote inside unquoted field".to_string(),
                    });
                }
                _ => field.push(ch),
            },
            FieldState::Quoted => match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        state = FieldState::QuoteClosed;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(ch),
            },
            FieldState::QuoteClosed => match ch {
                ',' => {
                    fields.push(std::mem::take(&mut field));
                    state = FieldState::Start;
                }
                '\n' => {
                    line += 1;
                    fields.push(std::mem::take(&mut field));
                    rows.push(Row {
                        line: row_line,
                        fields: std::mem::take(&mut fields),
                    });
                    row_line = line;
                    state = FieldState::Start;
                }
                _ => {
                    return Err(Error::MalformedRow {
                        line,
                        reason: "text after closing quote".to_string(),
                    });
                }
            },
        }
    }

    // Final row without a trailing newline
    match state {
        FieldState::Quoted => {
            return Err(Error::MalformedRow {
                line: row_line,
                reason: "unclosed quote".to_string(),
            });
        }
        FieldState::Unquoted | FieldState::QuoteClosed => {
            fields.push(field);
            rows.push(Row {
                line: row_line,
                fields,
            });
        }
        FieldState::Start => {
            if !fields.is_empty() {
                // Line ended on a comma, so one empty field is still open
                fields.push(field);
                rows.push(Row {
                    line: row_line,
                    fields,
                });
            }
        }
    }

    Ok(rows)
}

fn needs_quoting(field: &str) -> bool {
    field
        .chars()
        .any(|ch| matches!(ch, ',' | '"' | '\n' | '\r'))
}

/// Quote a field if its content requires it.
pub fn escape(field: &str) -> String {
    if !needs_quoting(field) {
        return field.to_string();
    }
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Render one row, without the trailing newline.
pub fn render_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| escape(field))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_rows(text: &str) -> Vec<Vec<String>> {
        parse(text)
            .expect("parse")
            .into_iter()
            .map(|row| row.fields)
            .collect()
    }

    #[test]
    fn parses_simple_rows() {
        let rows = field_rows("id,1,data,buy milk,type,todo\nid,2,data,call home,type,done\n");
        assert_eq!(
            rows,
            vec![
                vec!["id", "1", "data", "buy milk", "type", "todo"],
                vec!["id", "2", "data", "call home", "type", "done"],
            ]
        );
    }

    #[test]
    fn skips_blank_lines() {
        let rows = field_rows("\nid,1,data,a,type,todo\n\n\nid,2,data,b,type,todo\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn handles_missing_trailing_newline() {
        let rows = field_rows("id,1,data,a,type,todo");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 6);
    }

    #[test]
    fn quoted_fields_keep_commas_quotes_and_newlines() {
        let text = "id,1,data,\"milk, eggs\nand \"\"bread\"\"\",type,todo\n";
        let rows = field_rows(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][3], "milk, eggs\nand \"bread\"");
    }

    #[test]
    fn crlf_rows_parse() {
        let rows = field_rows("id,1,data,a,type,todo\r\nid,2,data,b,type,done\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "2");
    }

    #[test]
    fn empty_fields_survive() {
        let rows = field_rows("id,1,data,,type,todo\n");
        assert_eq!(rows[0][3], "");
    }

    #[test]
    fn trailing_comma_opens_empty_field() {
        assert_eq!(field_rows("id,1,data,\n"), vec![vec!["id", "1", "data", ""]]);
        assert_eq!(field_rows("id,1,data,"), vec![vec!["id", "1", "data", ""]]);
    }

    #[test]
    fn line_numbers_follow_quoted_newlines() {
        let text = "id,1,data,\"two\nlines\",type,todo\nid,2,data,b,type,todo\n";
        let rows = parse(text).expect("parse");
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn odd_field_count_is_malformed() {
        let rows = parse("id,1,data\n").expect("parse");
        let err = rows[0].pairs().expect_err("odd fields");
        assert!(matches!(err, Error::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn unclosed_quote_is_malformed() {
        let err = parse("id,1,data,\"oops,type,todo\n").expect_err("unclosed");
        assert!(matches!(err, Error::MalformedRow { .. }));
    }

    #[test]
    fn quote_inside_unquoted_field_is_malformed() {
        let err = parse("id,1,data,ab\"cd,type,todo\n").expect_err("stray quote");
        assert!(matches!(err, Error::MalformedRow { .. }));
    }

    #[test]
    fn text_after_closing_quote_is_malformed() {
        let err = parse("id,1,data,\"ok\"tail,type,todo\n").expect_err("trailing text");
        assert!(matches!(err, Error::MalformedRow { .. }));
    }

    #[test]
    fn escape_quotes_only_when_needed() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn render_row_round_trips() {
        let fields: Vec<String> = ["id", "7", "data", "milk, eggs\n\"bread\"", "type", "doing"]
            .into_iter()
            .map(String::from)
            .collect();
        let text = format!("{}\n", render_row(&fields));
        let rows = field_rows(&text);
        assert_eq!(rows, vec![fields]);
    }

    #[test]
    fn pairs_splits_fields() {
        let rows = parse("id,3,data,write tests,type,doing\n").expect("parse");
        let pairs = rows[0].pairs().expect("pairs");
        assert_eq!(
            pairs,
            vec![
                ("id".to_string(), "3".to_string()),
                ("data".to_string(), "write tests".to_string()),
                ("type".to_string(), "doing".to_string()),
            ]
        );
    }
}
