//! Plain-text tables for terminal output.

use itertools::Itertools;

/// Cells longer than this are cut and end with an ellipsis.
pub const MAX_CELL_WIDTH: usize = 60;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let header_cells = headers.iter().map(|h| clean_cell(h)).collect::<Vec<_>>();
    let body = rows
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|idx| row.get(idx).map(|cell| clean_cell(cell)).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = (0..headers.len())
        .map(|idx| {
            body.iter()
                .map(|row| char_width(&row[idx]))
                .chain(std::iter::once(char_width(&header_cells[idx])))
                .max()
                .unwrap_or(0)
                .max(3)
        })
        .collect::<Vec<_>>();

    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    std::iter::once(&header_cells)
        .chain(std::iter::once(&rule))
        .chain(body.iter())
        .map(|cells| format_line(cells, &widths) + "\n")
        .collect()
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell}{}", " ".repeat(width - char_width(cell))))
        .join("  ")
        .trim_end()
        .to_string()
}

fn clean_cell(value: &str) -> String {
    let flat = value.replace(['\n', '\r', '\t'], " ");
    if char_width(&flat) <= MAX_CELL_WIDTH {
        flat
    } else {
        let mut cut = flat.chars().take(MAX_CELL_WIDTH - 1).collect::<String>();
        cut.push('…');
        cut
    }
}

fn char_width(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn columns_are_padded_to_widest_cell() {
        let rendered = render_table(
            &strings(&["metric", "value"]),
            &[strings(&["rows", "2"]), strings(&["null values", "1"])],
        );
        assert_eq!(
            rendered,
            "metric       value\n-----------  -----\nrows         2\nnull values  1\n"
        );
    }

    #[test]
    fn short_rows_and_control_characters_are_tolerated() {
        let rendered = render_table(&strings(&["a", "b"]), &[strings(&["x\ty"])]);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[2], "x y");
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "z".repeat(MAX_CELL_WIDTH + 10);
        let rendered = render_table(&strings(&["c"]), &[vec![long]]);
        let last = rendered.lines().last().unwrap();
        assert_eq!(last.chars().count(), MAX_CELL_WIDTH);
        assert!(last.ends_with('…'));
    }
}
