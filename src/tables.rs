use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{boiler::Boiler, point::AllocatedPoint},
    quantity::{power::Kilowatts, rate::MegawattHourRate},
};

pub fn build_series_table(series: &[AllocatedPoint]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec![
        "Time",
        "Day-ahead",
        "Imbalance",
        "Combined",
        "Efficient boiler",
        "E-boiler power",
        "Gas-boiler power",
    ]);
    for point in series {
        let color = match point.boiler {
            Boiler::Electric => Color::Blue,
            Boiler::Gas => Color::Red,
            Boiler::Unknown => Color::DarkGrey,
        };
        table.add_row(vec![
            Cell::new(point.time.format("%Y-%m-%d %H:%M")),
            rate_cell(point.day_ahead).add_attribute(Attribute::Dim),
            rate_cell(point.imbalance).add_attribute(Attribute::Dim),
            rate_cell(point.combined).fg(color),
            Cell::new(point.boiler).fg(color),
            power_cell(point.electric_power),
            power_cell(point.gas_power),
        ]);
    }
    table
}

fn rate_cell(rate: Option<MegawattHourRate>) -> Cell {
    rate.map_or_else(|| Cell::new("n/a"), Cell::new).set_alignment(CellAlignment::Right)
}

fn power_cell(power: Kilowatts) -> Cell {
    let cell = Cell::new(power).set_alignment(CellAlignment::Right);
    if power == Kilowatts::ZERO { cell.add_attribute(Attribute::Dim) } else { cell }
}
