use super::ui;
use crate::core::RateTable;
use crate::core::currency::PAIR_SEPARATOR;
use comfy_table::Cell;

/// Renders the effective rate table, one row per pair.
pub fn render(table: &RateTable) -> String {
    if table.is_empty() {
        return ui::style_text("No exchange rates loaded.", ui::StyleType::Error);
    }

    let mut out = ui::new_styled_table();
    out.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
    ]);

    for (key, rate) in table.sorted() {
        let (from, to) = key.split_once(PAIR_SEPARATOR).unwrap_or((key, ""));
        out.add_row(vec![
            Cell::new(key),
            Cell::new(from),
            Cell::new(to),
            ui::decimal_cell(rate),
        ]);
    }

    format!(
        "{}\n\n{out}\n{}",
        ui::style_text("Exchange rates", ui::StyleType::Title),
        ui::style_text(
            &format!("{} pair(s)", table.len()),
            ui::StyleType::Subtle
        )
    )
}

pub fn run(table: &RateTable) {
    println!("{}", render(table));
}
