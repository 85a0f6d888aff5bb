use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
    Plain,
}

/// Turns ANSI styling on or off for every helper in this module.
pub fn set_color_enabled(enabled: bool) {
    if enabled {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[ok]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Hint => ("HINT", ""),
        MessageKind::Section | MessageKind::Plain => ("", ""),
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();

    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Plain => text,
        _ => {
            let (label, icon) = build_label(kind);
            if icon.is_empty() {
                format!("{label}: {text}")
            } else {
                format!("{label}: {icon} {text}")
            }
        }
    };

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.bright_cyan().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info | MessageKind::Plain => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Unlabelled line, used for table rows.
pub fn line(message: impl fmt::Display) {
    print(MessageKind::Plain, message);
}

/// Highlights a table row that needs attention.
pub fn flagged_line(message: impl fmt::Display) {
    println!("{}", message.to_string().bright_yellow());
}

/// Renders a quantity without trailing zeros: `50`, `2.5`, `0.125`.
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{:.0}", value);
    }
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `general_materials` -> `GENERAL MATERIALS`.
pub fn category_title(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_drop_trailing_zeros() {
        assert_eq!(format_quantity(50.0), "50");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(0.125), "0.125");
        assert_eq!(format_quantity(-4.0), "-4");
    }

    #[test]
    fn labels_are_applied_without_colour() {
        set_color_enabled(false);
        assert_eq!(apply_style(MessageKind::Warning, "low"), "WARNING: [!] low");
        assert_eq!(apply_style(MessageKind::Plain, "row"), "row");
        assert_eq!(apply_style(MessageKind::Section, " Report "), "=== Report ===");
        assert_eq!(category_title("paint_materials"), "PAINT MATERIALS");
    }
}
