use chrono::Local;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backup",
            "Write a timestamped copy of the inventory",
            "backup [label]",
            cmd_backup,
        ),
        CommandEntry::new("backups", "List existing backups", "backups", cmd_backups),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let label = args.join(" ");
    let label = Some(label.trim()).filter(|value| !value.is_empty());
    let path = context.engine.backup(label)?;
    io::print_success(format!("Backup written to {}", path.display()));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.engine.list_backups()?;
    if backups.is_empty() {
        let dir = context.config.resolve_backups_dir(&context.app_dir);
        io::print_info(format!("No backups found in {}", dir.display()));
        return Ok(());
    }

    output_section("Backups");
    for backup in backups {
        let created = backup
            .created_at
            .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".into());
        output::line(format!(
            "  {:<20} {:<20} {}",
            created,
            backup.label.as_deref().unwrap_or("-"),
            backup.file_name
        ));
    }
    Ok(())
}
