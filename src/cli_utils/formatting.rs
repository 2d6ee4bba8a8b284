use chrono::{DateTime, NaiveDateTime};
use colored::Colorize;

use crate::auth::roles::Role;
use crate::users::db_types::UserStatus;

/// Print rows under bold headers, columns padded to the widest cell
pub fn format_table(headers: Vec<&str>, rows: Vec<Vec<String>>) {
    let col_widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .fold(header.len(), usize::max)
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(&col_widths)
        .map(|(h, width)| format!("{:width$}", h, width = *width))
        .collect::<Vec<_>>()
        .join(" | ");

    println!("{}", header_line.bold());
    println!("{}", "-".repeat(header_line.len()));

    for row in rows {
        let row_line = row
            .iter()
            .zip(&col_widths)
            .map(|(cell, width)| format!("{:width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("{}", row_line);
    }
}

/// Print key-value pairs with aligned keys
pub fn format_record(data: Vec<(&str, String)>) {
    let max_key_len = data.iter().map(|(k, _)| k.len()).max().unwrap_or(20);

    for (key, value) in data {
        let padded_key = format!("{:width$}", key, width = max_key_len);
        println!("  {}: {}", padded_key.bright_cyan(), value);
    }
}

pub fn print_header(text: &str) {
    println!();
    println!("{}", text.bold().bright_cyan());
    println!("{}", "=".repeat(text.chars().count()));
    println!();
}

pub fn format_json<T: serde::Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "Unable to format as JSON".to_string())
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Candle time as a UTC date, with the clock only when it is not midnight
pub fn format_candle_time(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) if ts % 86_400 == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

pub fn format_price(value: f64) -> String {
    format!("{:.5}", value)
}

pub fn format_status(status: UserStatus) -> String {
    match status {
        UserStatus::Active => "active".green().to_string(),
        UserStatus::Disabled => "disabled".red().to_string(),
    }
}

pub fn format_role(role: Role) -> String {
    match role {
        Role::Admin => role.as_str().bright_magenta().to_string(),
        Role::Manager => role.as_str().bright_cyan().to_string(),
        Role::User | Role::Viewer => role.as_str().to_string(),
    }
}
