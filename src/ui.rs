use colored::Colorize;
use defaultskit::Report;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a report for humans.
pub fn report(report: &Report, check_mode: bool) {
    let suffix = status_suffix(report, check_mode);
    let headline = if suffix.is_empty() {
        report.message.clone()
    } else {
        format!("{} {}", report.message, suffix.dimmed())
    };

    match (report.changed, check_mode) {
        (true, true) => warn(&headline),
        (true, false) => success(&headline),
        (false, _) => info(&headline),
    }

    let label = report.result.key().unwrap_or("domain");
    match report.result.value() {
        Some(value) if value.contains('\n') => {
            kv(label, "");
            for line in value.lines() {
                dim(line);
            }
        }
        Some(value) => kv(label, value),
        None => kv(label, &"(not set)".dimmed().to_string()),
    }
}

fn status_suffix(report: &Report, check_mode: bool) -> &'static str {
    match (report.changed, check_mode) {
        (true, true) => "(check mode, not applied)",
        (true, false) => "",
        (false, _) => "(unchanged)",
    }
}
