use chrono::Local;

use crate::cli::args::{parse_count, ParsedArgs};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, category_title, format_quantity, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::UsageReport;
use crate::errors::LedgerError;
use crate::inventory::{Category, Movement};

const RULE_WIDTH: usize = 80;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "inventory",
            "Show current stock for one or all categories",
            "inventory [category]",
            cmd_inventory,
        ),
        CommandEntry::new(
            "low-stock",
            "List materials at or below their minimum level",
            "low-stock",
            cmd_low_stock,
        ),
        CommandEntry::new(
            "transactions",
            "Show recent stock movements, newest first",
            "transactions [limit]",
            cmd_transactions,
        ),
        CommandEntry::new(
            "report",
            "Show usage totals for one or all categories",
            "report [category]",
            cmd_report,
        ),
    ]
}

fn cmd_inventory(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let categories: Vec<&Category> = match parsed.positional.first() {
        Some(raw) => {
            let name = context.resolve_category(raw);
            let category = context
                .engine
                .category(&name)
                .ok_or(LedgerError::CategoryNotFound(name))?;
            vec![category]
        }
        None => context.engine.categories().iter().collect(),
    };

    let snapshot = context.engine.snapshot();
    output_section(format!("INVENTORY STATUS - {}", snapshot.site.site_name));
    io::print_info(format!(
        "Last updated: {}",
        snapshot
            .site
            .last_updated
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    ));

    for category in categories {
        output::line("");
        output::line(category_title(&category.name));
        output::line(format!(
            "{:<32} {:>10} {:>10} {:>11}  {:<10}",
            "Material", "In Stock", "Consumed", "Transferred", "Unit"
        ));
        output::line("-".repeat(RULE_WIDTH));
        if category.materials.is_empty() {
            output::line("  (no materials)");
            continue;
        }
        for material in &category.materials {
            let row = format!(
                "{:<32} {:>10} {:>10} {:>11}  {:<10}",
                material.name,
                format_quantity(material.in_stock),
                format_quantity(material.consumed),
                format_quantity(material.transferred),
                material.unit
            );
            if material.is_low_stock() {
                output::flagged_line(format!("{row} LOW"));
            } else {
                output::line(row);
            }
        }
    }
    Ok(())
}

fn cmd_low_stock(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let alerts = context.engine.check_low_stock();
    if alerts.is_empty() {
        io::print_success("All materials are above minimum stock levels.");
        return Ok(());
    }

    output_section("LOW STOCK ALERTS");
    for alert in alerts {
        io::print_warning(format!(
            "{} ({}): {} {} (minimum {})",
            alert.material,
            alert.category,
            format_quantity(alert.current_stock),
            alert.unit,
            format_quantity(alert.minimum_stock)
        ));
    }
    Ok(())
}

fn cmd_transactions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let limit = match parsed.positional.first() {
        Some(raw) => parse_count("limit", raw)?,
        None => context.config.recent_transactions_limit,
    };

    let transactions = context.engine.list_transactions(Some(limit));
    if transactions.is_empty() {
        io::print_info("No transactions recorded yet.");
        return Ok(());
    }

    output_section("RECENT TRANSACTIONS");
    for txn in transactions {
        let unit = context
            .engine
            .material(&txn.category, &txn.material)
            .map(|material| material.unit.as_str())
            .unwrap_or("units");
        output::line(format!(
            "{} | {:<11} | {:<30} | {} {}",
            txn.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            txn.kind().as_str().to_uppercase(),
            txn.material,
            format_quantity(txn.quantity),
            unit
        ));
        let counterpart = txn.movement.counterpart();
        if !counterpart.is_empty() {
            let label = match txn.movement {
                Movement::Receipt { .. } => "Source",
                Movement::Consumption { .. } => "Purpose",
                Movement::Transfer { .. } => "Destination",
            };
            output::line(format!("    {label}: {counterpart}"));
        }
        if !txn.remarks.is_empty() {
            output::line(format!("    Remarks: {}", txn.remarks));
        }
    }
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let reports = match parsed.positional.first() {
        Some(raw) => {
            let name = context.resolve_category(raw);
            vec![context.engine.generate_report(&name)?]
        }
        None => context.engine.generate_reports(),
    };

    output_section(format!("MATERIAL USAGE REPORT - {}", context.engine.site_name()));
    io::print_info(format!(
        "Generated on: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    for report in &reports {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &UsageReport) {
    output::line("");
    output::line(category_title(&report.category));
    output::line("-".repeat(RULE_WIDTH / 2));
    output::line(format!("  Material types    : {}", report.material_types));
    output::line(format!(
        "  Total in stock    : {}",
        format_quantity(report.total_in_stock)
    ));
    output::line(format!(
        "  Total consumed    : {}",
        format_quantity(report.total_consumed)
    ));
    output::line(format!(
        "  Total transferred : {}",
        format_quantity(report.total_transferred)
    ));
    output::line("  Top consumed:");
    if report.top_consumed.is_empty() {
        output::line("    (none)");
    }
    for (rank, entry) in report.top_consumed.iter().enumerate() {
        output::line(format!(
            "    {}. {}: {} {}",
            rank + 1,
            entry.material,
            format_quantity(entry.consumed),
            entry.unit
        ));
    }
}
