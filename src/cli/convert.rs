use super::ui;
use crate::core::{ConversionRequest, ConversionResult, RateTable, convert};
use anyhow::Result;
use comfy_table::Cell;

pub fn render(request: &ConversionRequest, result: &ConversionResult) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Amount"),
        ui::header_cell("Rate"),
        ui::header_cell("Converted"),
    ]);
    table.add_row(vec![
        Cell::new(format!("{} {}", request.amount, request.source_currency)),
        ui::decimal_cell(result.exchange_rate),
        ui::result_cell(result.converted_amount),
    ]);

    format!(
        "{} {} → {}\n\n{table}",
        ui::style_text("Conversion:", ui::StyleType::Title),
        request.source_currency,
        ui::style_text(&request.target_currency, ui::StyleType::TotalValue),
    )
}

/// Converts once against `table` and prints the outcome.
pub fn run(table: &RateTable, request: &ConversionRequest) -> Result<ConversionResult> {
    match convert(table, request) {
        Ok(result) => {
            println!("{}", render(request, &result));
            Ok(result)
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            Err(e.into())
        }
    }
}
