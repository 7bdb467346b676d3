//! Get command - fetch a dataset record.

use colored::Colorize;
use serde_json::json;

use crate::cli::Connection;

pub fn run(
    pid: String,
    datablocks: bool,
    connection: Connection,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = super::connect(&connection)?;
    let dataset = client.datasets_get_one(&pid)?;

    let output = if datablocks {
        let blocks = client.datasets_origdatablocks_get_one(&pid)?;
        json!({"dataset": dataset, "origdatablocks": blocks})
    } else {
        dataset
    };

    if output.is_null() {
        return Err(format!("{} {}", "No dataset found with pid".red(), pid).into());
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
