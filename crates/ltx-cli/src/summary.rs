use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ltx_cli::pipeline::RunResult;

pub fn print_summary(result: &RunResult) {
    if result.dry_run {
        println!("Dry run: nothing written to {}", result.output_dir.display());
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    if !result.gazetteer_loaded {
        println!("Gazetteer unavailable: map dataset is empty");
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Dataset"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for dataset in &result.datasets {
        table.add_row(vec![
            Cell::new(&dataset.file).fg(Color::Blue),
            count_cell(dataset.rows),
        ]);
    }
    println!("{table}");

    let stats = &result.stats;
    let geocoding = &result.geocoding;
    let rows: [(&str, usize); 14] = [
        ("Transplant records", stats.transplant_records),
        ("Donor records", stats.donor_records),
        ("Flow records skipped", stats.flow_records_skipped),
        ("Flow groups without geocode", stats.flow_groups_unresolved),
        ("Postal code lookups", geocoding.lookups),
        ("Unresolved postal codes", geocoding.unresolved),
        ("Survival subjects", stats.survival_subjects),
        ("Clipped at horizon", stats.horizon_clipped),
        ("Excluded past horizon", stats.horizon_excluded),
        ("OPO strata", stats.survival_strata),
        ("OPO strata too small", stats.survival_strata_skipped),
        ("Undefined p-values", stats.undefined_p_values),
        ("Donors without recovery date", stats.donors_unclassified),
        ("Donors without type or outcome", stats.donors_incomplete),
    ];
    let mut table = Table::new();
    table.set_header(vec![header_cell("Run statistic"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), count_cell(value)]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        Cell::new(count).fg(Color::DarkGrey)
    } else {
        Cell::new(count)
    }
}
