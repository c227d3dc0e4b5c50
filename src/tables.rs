use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};

use crate::engine::{DailyMaxEmission, GenerationTotal, HeatRate};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(header);
    table
}

pub fn build_totals_table(totals: &[GenerationTotal]) -> Table {
    let mut table = new_table(vec!["Generator", "Total"]);
    for total in totals {
        table.add_row(vec![
            Cell::new(&total.name),
            Cell::new(format!("{:.3}", total.total_value)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn build_max_emissions_table(max_emissions: &[DailyMaxEmission]) -> Table {
    let mut table = new_table(vec!["Date", "Generator", "Emission"]);
    for row in max_emissions {
        table.add_row(vec![
            Cell::new(row.date.format("%Y-%m-%d")).add_attribute(Attribute::Dim),
            Cell::new(&row.generator_name),
            Cell::new(format!("{:.3}", row.emission)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn build_heat_rates_table(heat_rates: &[HeatRate]) -> Table {
    let mut table = new_table(vec!["Generator", "Heat rate"]);
    for row in heat_rates {
        table.add_row(vec![
            Cell::new(&row.generator_name),
            Cell::new(format!("{:.3}", row.heat_rate)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
