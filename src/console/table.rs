//! Fixed-width table rendering and wildcard filters.

use regex::Regex;

/// A simple column-aligned table.
///
/// ```text
/// +----------+-------------+
/// | Variable | Description |
/// +==========+=============+
/// | Nick     | The nick.   |
/// +----------+-------------+
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty, extra cells are dropped.
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(Into::into)
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Render the table; a table with no rows renders nothing.
    pub fn lines(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return Vec::new();
        }
        let widths = self.widths();
        let separator = |fill: char| {
            let mut line = String::from("+");
            for width in &widths {
                line.extend(std::iter::repeat_n(fill, width + 2));
                line.push('+');
            }
            line
        };
        let render = |cells: &[String]| {
            let mut line = String::from("|");
            for (cell, width) in cells.iter().zip(&widths) {
                let pad = width - cell.chars().count();
                line.push(' ');
                line.push_str(cell);
                line.extend(std::iter::repeat_n(' ', pad + 1));
                line.push('|');
            }
            line
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(separator('-'));
        lines.push(render(&self.headers));
        lines.push(separator('='));
        lines.extend(self.rows.iter().map(|row| render(row)));
        lines.push(separator('-'));
        lines
    }
}

/// A compiled case-insensitive glob (`*` any run, `?` any one character).
#[derive(Debug, Clone)]
pub struct Wildcard {
    regex: Option<Regex>,
}

impl Wildcard {
    pub fn new(pattern: &str) -> Self {
        // Convert wildcard pattern to regex
        let mut regex_pattern = String::from("(?i)^");
        for c in pattern.chars() {
            match c {
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                _ => regex_pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        regex_pattern.push('$');

        Self {
            regex: Regex::new(&regex_pattern).ok(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// Match `text` against a glob pattern, ignoring case.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    Wildcard::new(pattern).matches(text)
}

/// Case-insensitive prefix test.
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let mut table = Table::new(&["Variable", "Description"]);
        table.add_row(["Nick (String)", "The default nick."]);
        table.add_row(["Admin (Boolean)", "Admin flag."]);
        assert_eq!(
            table.lines(),
            vec![
                "+-----------------+-------------------+",
                "| Variable        | Description       |",
                "+=================+===================+",
                "| Nick (String)   | The default nick. |",
                "| Admin (Boolean) | Admin flag.       |",
                "+-----------------+-------------------+",
            ]
        );
    }

    #[test]
    fn empty_table_renders_nothing() {
        let table = Table::new(&["Command", "Description"]);
        assert!(table.is_empty());
        assert!(table.lines().is_empty());
    }

    #[test]
    fn short_rows_are_padded() {
        let mut table = Table::new(&["A", "B"]);
        table.add_row(["x"]);
        assert_eq!(table.lines()[3], "| x |   |");
    }

    #[test]
    fn wildcard_is_case_insensitive() {
        assert!(wildcard_match("chan*", "ChanBufferSize"));
        assert!(wildcard_match("*buffer*", "QueryBufferSize"));
        assert!(wildcard_match("Nic?", "nick"));
        assert!(!wildcard_match("Nick", "AltNick"));
        assert!(!wildcard_match("Nic?", "Nickname"));
    }

    #[test]
    fn wildcard_escapes_regex_metacharacters() {
        assert!(wildcard_match("a.b", "A.B"));
        assert!(!wildcard_match("a.b", "axb"));
        assert!(wildcard_match("(x)+", "(X)+"));
    }

    #[test]
    fn prefix_test_ignores_case() {
        assert!(starts_with_ignore_case("ChanModes", "chan"));
        assert!(starts_with_ignore_case("x", ""));
        assert!(!starts_with_ignore_case("Ch", "chan"));
    }
}
