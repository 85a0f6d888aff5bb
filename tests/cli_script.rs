use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use site_inventory::inventory::GENERAL_MATERIALS;
use site_inventory::storage::json_backend::load_snapshot_from_path;
use tempfile::TempDir;

fn script(home: &TempDir, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("site_inventory_cli").unwrap();
    cmd.env("SITE_INVENTORY_CLI_SCRIPT", "1")
        .env("SITE_INVENTORY_HOME", home.path())
        .env("NO_COLOR", "1")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    script(
        &home,
        "receive general cement 50 --source Dealer\nconsume general cement 45 --purpose Slab\nlow-stock\nexit\n",
    )
    .success()
    .stdout(contains("Received 50 bags of cement"))
    .stdout(contains("In stock: 5 bags"))
    .stdout(contains("cement (general_materials): 5 bags (minimum 10)"));

    let snapshot = load_snapshot_from_path(&home.path().join("materials_data.json")).unwrap();
    let cement = snapshot.material(GENERAL_MATERIALS, "cement").unwrap();
    assert_eq!(cement.in_stock, 5.0);
    assert_eq!(snapshot.transactions.len(), 2);
}

#[test]
fn rejected_commands_do_not_stop_the_script() {
    let home = TempDir::new().unwrap();
    script(
        &home,
        "consume general cement 10\nrecieve general cement 1\nreceive roofing tiles 3\ntransactions\n",
    )
    .success()
    .stdout(contains("Insufficient stock for `cement`"))
    .stdout(contains("Suggestion: `receive`?"))
    .stdout(contains("Category not found: roofing"))
    .stdout(contains("No transactions recorded yet."));
}

#[test]
fn report_and_inventory_render_after_movements() {
    let home = TempDir::new().unwrap();
    let input = "\
# seed some usage
add-category trial
add-material trial A pieces 0
add-material trial B pieces 0
receive trial A 40
receive trial B 40
consume trial A 30
consume trial B 10
report trial
inventory trial
transactions 1
";
    script(&home, input)
        .success()
        .stdout(contains("MATERIAL USAGE REPORT"))
        .stdout(contains("1. A: 30 pieces"))
        .stdout(contains("2. B: 10 pieces"))
        .stdout(contains("TRIAL"))
        .stdout(contains("CONSUMPTION").and(contains("| B")));
}

#[test]
fn backup_command_writes_into_the_backups_dir() {
    let home = TempDir::new().unwrap();
    script(&home, "receive general cement 5\nbackup nightly\nbackups\n")
        .success()
        .stdout(contains("Backup written to"))
        .stdout(contains("nightly"));

    let entries: Vec<_> = std::fs::read_dir(home.path().join("backups"))
        .unwrap()
        .collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn corrupt_data_file_is_reported_and_replaced() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("materials_data.json"), "[1, 2").unwrap();
    script(&home, "inventory general\n")
        .success()
        .stdout(contains("could not be read"))
        .stdout(contains("GENERAL MATERIALS"));
    assert!(home.path().join("materials_data.json.corrupt").exists());
}
