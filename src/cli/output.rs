use colored::Colorize;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::*;
use geolocate::{Classification, LookupResult};
use log::error;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Classification Colors
--------------------------------------------------------------------------------------*/

fn line_color(classification: Classification) -> colored::Color {
    match classification {
        Classification::Local => colored::Color::Blue,
        Classification::NonRoutable => colored::Color::BrightMagenta,
        Classification::CacheHit => colored::Color::Green,
        Classification::CacheMiss | Classification::Resolved => colored::Color::Red,
    }
}

fn cell_color(classification: Classification) -> Color {
    match classification {
        Classification::Local => Color::Blue,
        Classification::NonRoutable => Color::Magenta,
        Classification::CacheHit => Color::Green,
        Classification::CacheMiss | Classification::Resolved => Color::Red,
    }
}

/*--------------------------------------------------------------------------------------
  Summary Line
--------------------------------------------------------------------------------------*/

pub fn line(result: &LookupResult) {
    let address = result.address.color(line_color(result.classification));
    println!(
        "{{IP:{}, CC:{}, Class:{}}}",
        address, result.country_code, result.classification
    );
}

/*--------------------------------------------------------------------------------------
  JSON Line
--------------------------------------------------------------------------------------*/

pub fn json(result: &LookupResult) {
    match serde_json::to_string(result) {
        Ok(json) => println!("{json}"),
        Err(error) => error!("Failed to serialize result for {}: {}", result.address, error),
    }
}

/*--------------------------------------------------------------------------------------
  Results Table
--------------------------------------------------------------------------------------*/

pub fn table(results: &[LookupResult]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        ["IP", "ISP", "City", "Country", "Class", "Error"].map(|header| {
            Cell::new(header)
                .add_attribute(Attribute::Bold)
                .fg(Color::Green)
        }),
    );

    for result in results {
        table.add_row(vec![
            Cell::new(&result.address)
                .add_attribute(Attribute::Bold)
                .fg(cell_color(result.classification)),
            Cell::new(&result.isp),
            Cell::new(&result.city),
            Cell::new(format!("{} ({})", result.country_name, result.country_code)),
            Cell::new(result.classification),
            Cell::new(&result.error),
        ]);
    }

    // Right-align the IP column
    let column = table.column_mut(0).expect("The first column exists");
    column.set_cell_alignment(CellAlignment::Right);

    println!("{table}");
}
