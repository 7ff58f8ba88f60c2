use crate::output::{OutputFormat, json::print_json, table::print_table};
use anyhow::Result;
use boardlink_core::serial;
use comfy_table::{Cell, Table};

pub fn run(format: OutputFormat) -> Result<()> {
    let ports = serial::list_ports()?;

    if format.is_json() {
        return print_json(&ports);
    }

    if ports.is_empty() {
        println!("No serial ports found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Device", "Description", "HWID"]);

    for port in ports {
        table.add_row(vec![
            Cell::new(port.device),
            Cell::new(port.description),
            Cell::new(port.hwid),
        ]);
    }

    print_table(table)
}
