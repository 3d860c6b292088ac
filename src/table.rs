//! Elastic-column ASCII table rendering for the console report.

use std::borrow::Cow;
use std::fmt::Write as _;

/// Horizontal alignment for one rendered column. Numeric columns read
/// better right-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub fn render_table(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let column_count = headers.len();
    let mut widths = headers
        .iter()
        .map(|h| display_width(h))
        .collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();

    let header_line = format_row(headers, &widths, aligns);
    let _ = writeln!(output, "{header_line}");

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let separator_line = format_row(&separator_cells, &separator_widths, aligns);
    let _ = writeln!(output, "{separator_line}");

    for row in rows {
        let row_line = format_row(row, &widths, aligns);
        let _ = writeln!(output, "{row_line}");
    }

    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) {
    let rendered = render_table(headers, rows, aligns);
    print!("{rendered}");
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        let sanitized = sanitize_cell(value);
        let display = display_width(sanitized.as_ref());
        let padding = widths
            .get(idx)
            .copied()
            .unwrap_or_default()
            .saturating_sub(display);
        let align = aligns.get(idx).copied().unwrap_or(Align::Left);
        let mut cell = String::with_capacity(display + padding);
        match align {
            Align::Left => {
                cell.push_str(sanitized.as_ref());
                if padding > 0 {
                    cell.push_str(&" ".repeat(padding));
                }
            }
            Align::Right => {
                if padding > 0 {
                    cell.push_str(&" ".repeat(padding));
                }
                cell.push_str(sanitized.as_ref());
            }
        }
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        let mut sanitized = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\n' | '\r' | '\t' => sanitized.push(' '),
                other => sanitized.push(other),
            }
        }
        Cow::Owned(sanitized)
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn render_table_pads_columns_to_widest_cell() {
        let rendered = render_table(
            &strings(&["category", "total"]),
            &[strings(&["Electronics", "1000.00"]), strings(&["Toys", "5.00"])],
            &[Align::Left, Align::Right],
        );
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "category       total");
        assert_eq!(lines[2], "Electronics  1000.00");
        assert_eq!(lines[3], "Toys            5.00");
    }

    #[test]
    fn right_alignment_pads_on_the_left() {
        let rendered = render_table(
            &strings(&["n"]),
            &[strings(&["1"]), strings(&["100"])],
            &[Align::Right],
        );
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[2], "  1");
        assert_eq!(lines[3], "100");
    }

    #[test]
    fn sanitize_cell_flattens_control_characters() {
        let rendered = render_table(
            &strings(&["value"]),
            &[strings(&["a\nb\tc"])],
            &[Align::Left],
        );
        assert!(rendered.contains("a b c"));
    }
}
