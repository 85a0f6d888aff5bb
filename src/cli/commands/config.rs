use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show the effective configuration",
        "config [show]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        None | Some("show") => {
            show_config(context);
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "Unknown config action `{}`. Usage: config [show]",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    let app_dir = &context.app_dir;
    output_section("Configuration");
    io::print_info(format!(
        "  Config file        : {}",
        context.config_manager.config_path().display()
    ));
    io::print_info(format!("  Site name          : {}", config.site_name));
    io::print_info(format!(
        "  Data file          : {}",
        config.resolve_data_file(app_dir).display()
    ));
    io::print_info(format!(
        "  Backups directory  : {}",
        config.resolve_backups_dir(app_dir).display()
    ));
    io::print_info(format!("  Backup retention   : {}", config.backup_retention));
    io::print_info(format!(
        "  Recent transactions: {}",
        config.recent_transactions_limit
    ));
    io::print_info(format!(
        "  Receipt source     : {}",
        config.default_receipt_source
    ));
    io::print_info(format!(
        "  Colour output      : {}",
        if config.ui_color_enabled { "on" } else { "off" }
    ));
}
