use std::sync::LazyLock;

use regex::Regex;

use super::types::{ImplicationRow, ImplicationsTable, RiskLevel, TableCell};

/// Header line of a pipe table whose first column is "Risk".
static RISK_TABLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*\|\s*Risk\s*\|").expect("Invalid risk table header regex")
});

/// Header + separator + one data row.
const MIN_TABLE_LINES: usize = 3;

/// Find the risk/recommendation pipe table in a section.
///
/// `None` when there is no `| Risk |` header or the table has no data row
/// (header and separator alone do not make a table).
pub fn extract_implications_table(section: &str) -> Option<ImplicationsTable> {
    let anchor = RISK_TABLE_HEADER.find(section)?;

    let lines: Vec<&str> = section[anchor.start()..]
        .lines()
        .map(str::trim)
        .take_while(|l| l.starts_with('|'))
        .collect();

    if lines.len() < MIN_TABLE_LINES {
        tracing::debug!(lines = lines.len(), "Risk table without data rows ignored");
        return None;
    }

    let headers = split_cells(lines[0]);
    let risk_columns: Vec<bool> = headers.iter().map(|h| is_risk_header(h)).collect();

    let rows: Vec<ImplicationRow> = lines[2..]
        .iter()
        .filter(|l| !is_separator(l))
        .map(|line| ImplicationRow {
            cells: split_cells(line)
                .into_iter()
                .enumerate()
                .map(|(i, text)| {
                    let risk = if risk_columns.get(i).copied().unwrap_or(false) {
                        parse_risk_tokens(&text)
                    } else {
                        Vec::new()
                    };
                    TableCell { text, risk }
                })
                .collect(),
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    tracing::debug!(columns = headers.len(), rows = rows.len(), "Implications table extracted");
    Some(ImplicationsTable { headers, rows })
}

/// Split on `|`, trim, drop the empty cells created by leading and
/// trailing pipes. Interior empty cells are kept so columns stay aligned.
pub fn split_cells(line: &str) -> Vec<String> {
    let mut cells: Vec<String> = line.split('|').map(|c| c.trim().to_string()).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

/// Single token (`High`) or hyphen compound (`Medium-High`). Every part must
/// be a known level, otherwise nothing is recognized.
pub fn parse_risk_tokens(cell: &str) -> Vec<RiskLevel> {
    let parts: Option<Vec<RiskLevel>> = cell
        .trim()
        .trim_matches(|c| c == '*' || c == '_')
        .split(['-', '\u{2013}', '/'])
        .map(RiskLevel::parse)
        .collect();
    parts.unwrap_or_default()
}

fn is_risk_header(header: &str) -> bool {
    let h = header.to_ascii_lowercase();
    ["risk", "severity", "level"].iter().any(|k| h.contains(k))
}

fn is_separator(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "Overview.\n\n\
        | Risk | Severity | Recommendation |\n\
        |------|----------|----------------|\n\
        | Unauthorized writes | Medium-High | Restrict HMI access |\n\
        | Stale firmware | Low | Schedule update |\n\
        \nClosing remark.";

    #[test]
    fn extracts_rows_and_headers() {
        let table = extract_implications_table(TABLE).unwrap();
        assert_eq!(table.headers, vec!["Risk", "Severity", "Recommendation"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].cells[2].text, "Schedule update");
    }

    #[test]
    fn compound_severity_is_two_tokens() {
        let table = extract_implications_table(TABLE).unwrap();
        assert_eq!(table.rows[0].cells[1].risk, vec![RiskLevel::Medium, RiskLevel::High]);
        assert_eq!(table.rows[1].cells[1].risk, vec![RiskLevel::Low]);
    }

    #[test]
    fn risk_column_text_is_not_a_level() {
        let table = extract_implications_table(TABLE).unwrap();
        // First column header is "Risk" but its cells are descriptions.
        assert!(table.rows[0].cells[0].risk.is_empty());
        assert!(table.rows[0].cells[2].risk.is_empty());
    }

    #[test]
    fn header_and_separator_only_is_none() {
        let text = "| Risk | Severity |\n|---|---|\n";
        assert!(extract_implications_table(text).is_none());
    }

    #[test]
    fn no_risk_header_is_none() {
        let text = "| Item | Level |\n|---|---|\n| a | High |";
        assert!(extract_implications_table(text).is_none());
    }

    #[test]
    fn split_cells_keeps_interior_blanks() {
        assert_eq!(split_cells("| a |  | c |"), vec!["a", "", "c"]);
        assert_eq!(split_cells("a | b"), vec!["a", "b"]);
    }

    #[test]
    fn parse_risk_tokens_is_all_or_nothing() {
        assert_eq!(parse_risk_tokens("High"), vec![RiskLevel::High]);
        assert_eq!(parse_risk_tokens("**Critical**"), vec![RiskLevel::Critical]);
        assert!(parse_risk_tokens("High-ish").is_empty());
        assert!(parse_risk_tokens("").is_empty());
    }
}
