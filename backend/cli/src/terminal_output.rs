//! Terminal output: status notes and plain tables.

// ---------------------------------------------------------------------------
// ANSI styles
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Whether stdout should get colour.
pub fn supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
        && (std::env::var_os("COLORTERM").is_some()
            || std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

fn note(colour: &str, symbol: &str, label: &str, msg: &str) -> String {
    if supports_color() {
        format!("{colour}{BOLD}{symbol}{RESET} {msg}")
    } else {
        format!("{label}: {msg}")
    }
}

pub fn note_info(msg: &str) {
    println!("{}", note(CYAN, "ℹ", "INFO", msg));
}

pub fn note_warn(msg: &str) {
    println!("{}", note(YELLOW, "⚠", "WARN", msg));
}

pub fn note_error(msg: &str) {
    eprintln!("{}", note(RED, "✗", "ERROR", msg));
}

pub fn note_success(msg: &str) {
    println!("{}", note(GREEN, "✓", "OK", msg));
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

pub struct Column {
    pub header: String,
    /// Longer cells are cut and end in `…`.
    pub max_width: Option<usize>,
}

impl Column {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            max_width: None,
        }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width.max(1));
        self
    }
}

fn fit(cell: &str, max_width: Option<usize>) -> String {
    let plain = strip_ansi(cell);
    match max_width {
        Some(max) if plain.chars().count() > max => {
            let mut cut: String = plain.chars().take(max - 1).collect();
            cut.push('…');
            cut
        }
        _ => cell.to_string(),
    }
}

/// Render left-aligned columns with a header and separator line.
pub fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| fit(row.get(i).map(String::as_str).unwrap_or(""), col.max_width))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.header.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(strip_ansi(cell).chars().count());
        }
    }

    let line = |row: &[String]| -> String {
        let padded: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let pad = widths[i].saturating_sub(strip_ansi(cell).chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect();
        format!("  {}\n", padded.join("  ").trim_end())
    };

    let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
    let separators: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = line(&headers);
    out.push_str(&line(&separators));
    for row in &cells {
        out.push_str(&line(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn renders_aligned_table() {
        let cols = vec![Column::left("Module"), Column::left("Commands")];
        let rows = vec![
            vec!["core".to_string(), "ping, load".to_string()],
            vec!["greet".to_string(), "hello".to_string()],
        ];
        let table = render_table(&cols, &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "  Module  Commands");
        assert_eq!(lines[1], "  ------  ----------");
        assert_eq!(lines[2], "  core    ping, load");
        assert_eq!(lines[3], "  greet   hello");
    }

    #[test]
    fn truncates_long_cells() {
        let cols = vec![Column::left("C").max_width(4)];
        let table = render_table(&cols, &[vec!["abcdefgh".to_string()]]);
        assert!(table.contains("abc…"));
        assert!(!table.contains("abcd"));
    }
}
