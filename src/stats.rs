use std::collections::HashSet;

use anyhow::Result;
use log::info;
use serde::Serialize;

use crate::{cli::StatsArgs, data::Dataset, io_utils, table};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatistics {
    pub row_count: usize,
    pub column_count: usize,
    pub null_value_count: usize,
    pub duplicate_row_count: usize,
}

impl DatasetStatistics {
    pub fn render_rows(&self) -> Vec<Vec<String>> {
        [
            ("rows", self.row_count),
            ("columns", self.column_count),
            ("null values", self.null_value_count),
            ("duplicate rows", self.duplicate_row_count),
        ]
        .into_iter()
        .map(|(label, count)| vec![label.to_string(), count.to_string()])
        .collect()
    }
}

/// Counts rows, first-row columns, blank cells, and rows whose canonical form repeats.
pub fn compute_statistics(dataset: &Dataset) -> DatasetStatistics {
    let Some(first) = dataset.first() else {
        return DatasetStatistics::default();
    };

    let null_value_count = dataset
        .iter()
        .flat_map(|row| row.values())
        .filter(|value| value.is_blank())
        .count();

    let distinct = dataset
        .iter()
        .map(|row| row.canonical_form())
        .collect::<HashSet<_>>()
        .len();

    DatasetStatistics {
        row_count: dataset.len(),
        column_count: first.len(),
        null_value_count,
        duplicate_row_count: dataset.len() - distinct,
    }
}

pub fn execute(args: &StatsArgs) -> Result<()> {
    let (name, dataset) = io_utils::load_dataset(&args.input)?;
    let statistics = compute_statistics(&dataset);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&statistics)?);
    } else {
        let headers = vec!["metric".to_string(), "value".to_string()];
        table::print_table(&headers, &statistics.render_rows());
    }
    info!(
        "Computed statistics for {} row(s) from '{}'",
        statistics.row_count, name
    );
    Ok(())
}
