// View state - Immutable display options applied to a loaded series
use crate::domain::dashboard::{TableRow, TableView};
use crate::domain::sample::{Sample, Series};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Source labels to keep; `None` keeps every source
    pub selected_sources: Option<BTreeSet<String>>,
    pub normalize: bool,
    pub table_expanded: bool,
}

impl ViewState {
    pub fn filter(&self, series: &Series) -> Series {
        match &self.selected_sources {
            Some(selected) => series.filter_sources(selected),
            None => series.clone(),
        }
    }

    /// Filtered series, normalized against its first sample when enabled
    pub fn display(&self, series: &Series) -> Series {
        let filtered = self.filter(series);
        if self.normalize {
            filtered.normalized()
        } else {
            filtered
        }
    }

    pub fn selected_in(&self, series: &Series) -> Vec<String> {
        let available = series.sources();
        match &self.selected_sources {
            Some(selected) => available
                .into_iter()
                .filter(|s| selected.contains(s))
                .collect(),
            None => available,
        }
    }

    pub fn table(&self, displayed: &Series) -> TableView {
        let total_entries = displayed.len();
        let rows: Vec<TableRow> = if self.table_expanded {
            displayed.samples().iter().rev().map(table_row).collect()
        } else {
            displayed.last().map(table_row).into_iter().collect()
        };

        let notice = (!self.table_expanded && total_entries > 1).then(|| {
            format!(
                "Showing most recent entry only. Click 'Show More' to see all {} entries.",
                total_entries
            )
        });

        TableView {
            rows,
            total_entries,
            expanded: self.table_expanded,
            notice,
        }
    }
}

fn table_row(sample: &Sample) -> TableRow {
    TableRow {
        date: sample.timestamp.format("%d/%m").to_string(),
        time: sample.timestamp.format("%H:%M").to_string(),
        weight: sample.weight,
        fat_percentage: sample.fat_percentage,
        bmi: sample.bmi,
        source: sample.source.clone(),
    }
}
