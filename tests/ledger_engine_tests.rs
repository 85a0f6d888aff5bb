mod common;

use common::setup_engine;
use site_inventory::{
    errors::LedgerError,
    inventory::{Movement, NewMaterial, TransactionKind, GENERAL_MATERIALS, PAINT_MATERIALS},
};

#[test]
fn cement_receive_consume_and_overdraw() {
    let (mut engine, _) = setup_engine();
    let cement = engine.material(GENERAL_MATERIALS, "cement").unwrap();
    assert_eq!(cement.in_stock, 0.0);
    assert_eq!(cement.minimum_stock, 10.0);

    engine
        .receive(GENERAL_MATERIALS, "cement", 50.0, "Office", "", None)
        .unwrap();
    let cement = engine.material(GENERAL_MATERIALS, "cement").unwrap();
    assert_eq!(cement.in_stock, 50.0);
    assert!(!cement.is_low_stock());

    engine
        .consume(GENERAL_MATERIALS, "cement", 45.0, "Slab casting", "")
        .unwrap();
    let cement = engine.material(GENERAL_MATERIALS, "cement").unwrap();
    assert_eq!(cement.in_stock, 5.0);
    assert_eq!(cement.consumed, 45.0);
    assert!(engine
        .check_low_stock()
        .iter()
        .any(|alert| alert.material == "cement"));

    let err = engine
        .consume(GENERAL_MATERIALS, "cement", 10.0, "Plaster", "")
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientStock { available, requested, .. }
            if available == 5.0 && requested == 10.0
    ));
    assert_eq!(engine.material(GENERAL_MATERIALS, "cement").unwrap().in_stock, 5.0);
    assert_eq!(engine.list_transactions(None).len(), 2);
}

#[test]
fn consuming_exact_stock_drains_to_zero() {
    let (mut engine, _) = setup_engine();
    engine
        .receive(GENERAL_MATERIALS, "Rope 14mm", 500.0, "Stores", "", None)
        .unwrap();
    engine
        .transfer(GENERAL_MATERIALS, "Rope 14mm", 500.0, "Block B", "")
        .unwrap();
    let rope = engine.material(GENERAL_MATERIALS, "Rope 14mm").unwrap();
    assert_eq!(rope.in_stock, 0.0);
    assert_eq!(rope.transferred, 500.0);
}

#[test]
fn list_transactions_returns_newest_first() {
    let (mut engine, _) = setup_engine();
    for qty in 1..=5 {
        engine
            .receive(GENERAL_MATERIALS, "cement", f64::from(qty), "Office", "", None)
            .unwrap();
    }
    let recent = engine.list_transactions(Some(2));
    let quantities: Vec<f64> = recent.iter().map(|txn| txn.quantity).collect();
    assert_eq!(quantities, vec![5.0, 4.0]);
    assert_eq!(engine.list_transactions(Some(100)).len(), 5);
}

#[test]
fn transactions_record_kind_and_counterpart() {
    let (mut engine, _) = setup_engine();
    engine
        .receive(PAINT_MATERIALS, "AP Smooth Putty", 4.0, "Asian Paints", "invoice 31", None)
        .unwrap();
    engine
        .transfer(PAINT_MATERIALS, "AP Smooth Putty", 1.0, "Tower 2", "")
        .unwrap();

    let recent = engine.list_transactions(None);
    assert_eq!(recent[0].kind(), TransactionKind::Transfer);
    assert_eq!(
        recent[0].movement,
        Movement::Transfer {
            destination: "Tower 2".into()
        }
    );
    assert_eq!(recent[1].kind(), TransactionKind::Receipt);
    assert_eq!(recent[1].remarks, "invoice 31");
    assert_eq!(recent[1].timestamp, common::fixed_time());
}

#[test]
fn receiving_unknown_material_needs_details() {
    let (mut engine, _) = setup_engine();
    let err = engine
        .receive(GENERAL_MATERIALS, "Binding wire", 20.0, "Office", "", None)
        .unwrap_err();
    assert!(matches!(err, LedgerError::MaterialNotFound { .. }));
    assert!(engine.list_transactions(None).is_empty());

    let details = NewMaterial::new("kg", 5.0);
    engine
        .receive(GENERAL_MATERIALS, "Binding wire", 20.0, "Office", "", Some(details))
        .unwrap();
    let wire = engine.material(GENERAL_MATERIALS, "Binding wire").unwrap();
    assert_eq!(wire.in_stock, 20.0);
    assert_eq!(wire.consumed, 0.0);
    assert_eq!(wire.unit, "kg");
    let last = engine.categories()[0].materials.last().unwrap();
    assert_eq!(last.name, "Binding wire");
}

#[test]
fn usage_report_ranks_top_consumers() {
    let (mut engine, _) = setup_engine();
    engine.add_category("trial").unwrap();
    for (name, consumed) in [("A", 30.0), ("B", 10.0), ("C", 0.0), ("D", 50.0)] {
        engine
            .add_material("trial", name, NewMaterial::new("pieces", 0.0))
            .unwrap();
        engine.receive("trial", name, 60.0, "Office", "", None).unwrap();
        if consumed > 0.0 {
            engine.consume("trial", name, consumed, "Work", "").unwrap();
        }
    }

    let report = engine.generate_report("trial").unwrap();
    let top: Vec<&str> = report
        .top_consumed
        .iter()
        .map(|rank| rank.material.as_str())
        .collect();
    assert_eq!(top, vec!["D", "A", "B"]);
    assert_eq!(report.material_types, 4);
    assert_eq!(report.total_consumed, 90.0);
    assert_eq!(report.total_in_stock, 150.0);
    assert_eq!(engine.generate_reports().len(), 3);
}

#[test]
fn low_stock_includes_materials_exactly_at_minimum() {
    let (mut engine, _) = setup_engine();
    for category in [GENERAL_MATERIALS, PAINT_MATERIALS] {
        let names: Vec<(String, f64)> = engine
            .category(category)
            .unwrap()
            .materials
            .iter()
            .map(|m| (m.name.clone(), m.minimum_stock))
            .collect();
        for (name, minimum) in names {
            engine
                .receive(category, &name, minimum + 1.0, "Office", "", None)
                .unwrap();
        }
    }
    assert!(engine.check_low_stock().is_empty());

    engine.consume(GENERAL_MATERIALS, "cement", 1.0, "", "").unwrap();
    let alerts = engine.check_low_stock();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].material, "cement");
    assert_eq!(alerts[0].current_stock, alerts[0].minimum_stock);
}

#[test]
fn rejected_operations_leave_state_unchanged() {
    let (mut engine, _) = setup_engine();
    engine
        .receive(GENERAL_MATERIALS, "cement", 10.0, "Office", "", None)
        .unwrap();
    let before = engine.snapshot().clone();

    assert!(matches!(
        engine.receive(GENERAL_MATERIALS, "cement", 0.0, "Office", "", None),
        Err(LedgerError::InvalidQuantity(_))
    ));
    assert!(matches!(
        engine.consume(GENERAL_MATERIALS, "cement", -3.0, "", ""),
        Err(LedgerError::InvalidQuantity(_))
    ));
    assert!(matches!(
        engine.transfer("roofing", "tiles", 1.0, "", ""),
        Err(LedgerError::MaterialNotFound { .. })
    ));
    assert!(matches!(
        engine.receive("roofing", "tiles", 1.0, "", "", None),
        Err(LedgerError::CategoryNotFound(_))
    ));
    assert!(matches!(
        engine.add_material(GENERAL_MATERIALS, "cement", NewMaterial::new("bags", 1.0)),
        Err(LedgerError::DuplicateMaterial { .. })
    ));
    assert!(matches!(
        engine.add_category(PAINT_MATERIALS),
        Err(LedgerError::DuplicateCategory(_))
    ));
    assert!(matches!(
        engine.add_material(GENERAL_MATERIALS, "  ", NewMaterial::new("bags", 1.0)),
        Err(LedgerError::InvalidName(_))
    ));

    assert_eq!(engine.snapshot(), &before);
}

#[test]
fn names_are_trimmed_at_the_boundary() {
    let (mut engine, _) = setup_engine();
    engine
        .receive(" general_materials ", " cement ", 3.0, "Office", "", None)
        .unwrap();
    let txn = engine.list_transactions(Some(1))[0];
    assert_eq!(txn.category, GENERAL_MATERIALS);
    assert_eq!(txn.material, "cement");
}
