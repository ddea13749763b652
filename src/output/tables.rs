use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::normalize::BuildStatus;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn status_cell(status: BuildStatus) -> Cell {
    let color = match status {
        BuildStatus::Success => TableColor::Green,
        BuildStatus::Unstable => TableColor::Yellow,
        BuildStatus::Failure => TableColor::Red,
        BuildStatus::Aborted | BuildStatus::Unknown => TableColor::DarkGrey,
    };
    Cell::new(status.to_string()).fg(color)
}

pub fn optional_cell<T: std::fmt::Display>(value: Option<T>) -> Cell {
    match value {
        Some(value) => Cell::new(value.to_string()),
        None => Cell::new("-").fg(TableColor::DarkGrey),
    }
}
