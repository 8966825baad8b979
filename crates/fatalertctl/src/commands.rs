//! Command handlers for fatalertctl.

use anyhow::{bail, Result};
use owo_colors::OwoColorize;

use fatalert::config::AlertConfig;
use fatalert::store::{ErrorRecord, ErrorStore};

/// Handle `list`: one page of records, most recent first
pub fn list(db_path: &str, page: u64, page_size: u64) -> Result<()> {
    let store = ErrorStore::open_at(db_path)?;
    let page = page.max(1);
    let page_size = page_size.max(1);
    let offset = (page - 1) * page_size;

    let records = store.list_page(page_size, offset)?;
    let total = store.count()?;

    if records.is_empty() {
        println!("No captured errors (page {}, {} total).", page, total);
        return Ok(());
    }

    println!(
        "{:>6}  {:<19}  {:<15}  {:<5}  {}",
        "ID".bold(),
        "TIME (UTC)".bold(),
        "TYPE".bold(),
        "MODE".bold(),
        "MESSAGE".bold()
    );
    for record in &records {
        println!(
            "{:>6}  {:<19}  {:<15}  {:<5}  {}",
            record.id,
            record.created_utc.format("%Y-%m-%d %H:%M:%S"),
            record.kind.label(),
            record.runtime_mode,
            truncate(&record.message, 60)
        );
    }
    println!();
    println!(
        "Page {} ({} of {} records). Use --page / --page-size to paginate.",
        page,
        records.len(),
        total
    );
    Ok(())
}

/// Handle `show <id>`: full detail of one record
pub fn show(db_path: &str, id: i64) -> Result<()> {
    let store = ErrorStore::open_at(db_path)?;
    let Some(record) = store.get(id)? else {
        bail!("no captured error with id {}", id);
    };

    print_record(&record);
    Ok(())
}

/// Handle `count`
pub fn count(db_path: &str) -> Result<()> {
    let store = ErrorStore::open_at(db_path)?;
    println!("{}", store.count()?);
    Ok(())
}

/// Handle `clear`: refuses without explicit confirmation. The hosting
/// environment's authorization check sits in front of this command; the flag
/// stands in for its replay-protection token.
pub fn clear(db_path: &str, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to clear the error log; re-run with --yes to confirm");
    }
    let store = ErrorStore::open_at(db_path)?;
    let before = store.count()?;
    store.clear_all()?;
    println!("Cleared {} captured errors.", before);
    Ok(())
}

/// Handle `config`: effective configuration with defaults applied
pub fn config(config_path: &str) -> Result<()> {
    let config = AlertConfig::load_from(config_path)?;

    let kw = 18;
    print_kv("to_email", or_unset(&config.to_email), kw);
    print_kv("subject_prefix", &config.subject_prefix, kw);
    print_kv(
        "throttle_minutes",
        &format!(
            "{}{}",
            config.throttle_minutes,
            if config.throttle_minutes == 0 { "   (disabled)" } else { "" }
        ),
        kw,
    );
    print_kv("hosting_logs_url", or_unset(&config.hosting_logs_url), kw);
    print_kv("include_request", on_off(config.include_request), kw);
    print_kv("include_user", on_off(config.include_user), kw);
    print_kv("only_frontend", on_off(config.only_frontend), kw);
    print_kv("ignore_cli", on_off(config.ignore_cli), kw);
    print_kv("ignore_cron", on_off(config.ignore_cron), kw);
    Ok(())
}

fn print_record(record: &ErrorRecord) {
    let kw = 14;
    print_kv("id", &record.id.to_string(), kw);
    print_kv(
        "time (UTC)",
        &record.created_utc.format("%Y-%m-%d %H:%M:%S").to_string(),
        kw,
    );
    print_kv(
        "type",
        &format!("{} ({})", record.kind.label(), record.kind.code()),
        kw,
    );
    print_kv("signature", &record.signature, kw);
    print_kv("message", &record.message, kw);
    print_kv("file", or_unset(&record.file), kw);
    print_kv("line", &record.line.to_string(), kw);
    print_kv("url", or_unset(&record.url), kw);
    print_kv("user_id", &record.user_id.to_string(), kw);
    print_kv("mode", &record.runtime_mode, kw);
}

fn print_kv(key: &str, value: &str, width: usize) {
    println!("{:width$} {}", key.bold(), value, width = width);
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}
