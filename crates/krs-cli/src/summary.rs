//! Terminal tables for the command output.

use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use krs_aggregate::{DashboardSummary, FilterOptions};
use krs_classify::{FEATURE_NAMES, RiskAssessment};
use krs_model::{AreaStats, AreaStatus, RiskLabel, WaterSource, WelfareRank};

use crate::pipeline::PreprocessOutcome;

/// Headline counts of the filtered dataset.
pub fn dashboard_table(summary: &DashboardSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Total Data"),
        header_cell("Kecamatan"),
        header_cell("Aman"),
        header_cell("Rentan Stunting"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.total_records).add_attribute(Attribute::Bold),
        Cell::new(summary.area_count),
        count_cell(summary.aman_count, Color::Green),
        count_cell(summary.rentan_count, Color::Red),
    ]);
    table
}

/// One row per area, in area-name order.
pub fn area_table(stats: &BTreeMap<String, AreaStats>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kecamatan"),
        header_cell("Status"),
        header_cell("Persentase Berisiko"),
        header_cell(RiskLabel::BERISIKO),
        header_cell(RiskLabel::TIDAK_BERISIKO),
        header_cell("Total"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (area, area_stats) in stats {
        table.add_row(vec![
            Cell::new(area).add_attribute(Attribute::Bold),
            status_cell(area_stats.status),
            Cell::new(format!("{:.1}%", area_stats.percentage)),
            Cell::new(area_stats.count_berisiko),
            Cell::new(area_stats.count_tidak_berisiko),
            Cell::new(area_stats.total),
        ]);
    }
    table
}

/// The available filter choices, `Semua` first.
pub fn filter_options_lines(options: &FilterOptions) -> Vec<String> {
    let mut lines = vec![format!(
        "Kecamatan: {}",
        std::iter::once(krs_aggregate::ALL_OPTION)
            .chain(options.kecamatan.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    )];
    if options.has_years() {
        let years: Vec<String> = options.tahun.iter().map(i64::to_string).collect();
        lines.push(format!(
            "Tahun: {}, {}",
            krs_aggregate::ALL_OPTION,
            years.join(", ")
        ));
    }
    lines
}

/// Feature vector, score and label of one classified profile.
pub fn assessment_table(assessment: &RiskAssessment) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Feature"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, value) in FEATURE_NAMES.iter().zip(assessment.features.iter()) {
        table.add_row(vec![Cell::new(*name), Cell::new(value)]);
    }
    table.add_row(vec![
        Cell::new("score").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.4}", assessment.score)).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("label").add_attribute(Attribute::Bold),
        label_cell(&assessment.label),
    ]);
    table
}

/// Questionnaire options with the codes the model sees.
pub fn categories_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Option"),
        header_cell("Code"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for source in WaterSource::ALL {
        table.add_row(vec![
            dim_cell("sumber_air_layak_tidak"),
            Cell::new(source.label()),
            Cell::new(source.code()),
        ]);
    }
    for rank in WelfareRank::ALL {
        table.add_row(vec![
            dim_cell("kesejahteraan_prioritas"),
            Cell::new(rank.label()),
            Cell::new(rank.code()),
        ]);
    }
    table
}

pub fn print_preprocess_summary(outcome: &PreprocessOutcome) {
    println!("Input: {}", outcome.input.display());
    println!("Output: {}", outcome.output.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows read"),
        header_cell("Rows written"),
        header_cell("Dropped"),
    ]);
    apply_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let dropped = outcome.rows_in.saturating_sub(outcome.rows_out);
    table.add_row(vec![
        Cell::new(outcome.rows_in),
        Cell::new(outcome.rows_out).add_attribute(Attribute::Bold),
        count_cell(dropped, Color::Yellow),
    ]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: AreaStatus) -> Cell {
    match status {
        AreaStatus::Aman => Cell::new(status.label()).fg(Color::Green),
        AreaStatus::RentanStunting => Cell::new(status.label())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn label_cell(label: &RiskLabel) -> Cell {
    if label.is_berisiko() {
        Cell::new(label.as_str())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(label.as_str()).fg(Color::Green)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_table_has_a_row_per_area() {
        let mut stats = BTreeMap::new();
        stats.insert("Bogor Barat".to_string(), AreaStats::from_counts(2, 3, 5));
        stats.insert("Bogor Timur".to_string(), AreaStats::from_counts(0, 4, 4));
        let table = area_table(&stats);
        assert_eq!(table.row_count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("40.0%"));
        assert!(rendered.contains("Rentan Stunting"));
    }

    #[test]
    fn test_categories_table_lists_every_option() {
        let table = categories_table();
        assert_eq!(table.row_count(), WaterSource::ALL.len() + WelfareRank::ALL.len());
    }

    #[test]
    fn test_filter_options_put_semua_first() {
        let options = FilterOptions {
            kecamatan: vec!["A".to_string(), "B".to_string()],
            tahun: vec![2024, 2023],
        };
        assert_eq!(
            filter_options_lines(&options),
            vec!["Kecamatan: Semua, A, B", "Tahun: Semua, 2024, 2023"]
        );
    }
}
