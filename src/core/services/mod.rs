pub mod report_service;
pub mod stock_service;

pub use report_service::{
    ConsumptionRank, LowStockAlert, ReportService, UsageReport, DEFAULT_TRANSACTION_LIMIT,
    TOP_CONSUMED_LIMIT,
};
pub use stock_service::StockService;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, LedgerError>;

/// Trims a category, material or unit name and rejects blanks.
pub(crate) fn normalize_name(field: &str, raw: &str) -> ServiceResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidName(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Movement quantities must be finite and strictly positive.
pub(crate) fn validate_quantity(quantity: f64) -> ServiceResult<f64> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(quantity)
    } else {
        Err(LedgerError::InvalidQuantity(format!(
            "quantity must be a positive number, got {}",
            quantity
        )))
    }
}

/// Thresholds and pack sizes may be zero but never negative.
pub(crate) fn validate_threshold(field: &str, value: f64) -> ServiceResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LedgerError::InvalidQuantity(format!(
            "{} must be zero or more, got {}",
            field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_blanks_rejected() {
        assert_eq!(normalize_name("material", "  cement ").unwrap(), "cement");
        let err = normalize_name("material", "   ").expect_err("blank name");
        assert!(matches!(err, LedgerError::InvalidName(ref m) if m.contains("material")));
    }

    #[test]
    fn quantity_must_be_positive_and_finite() {
        assert!(validate_quantity(0.5).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(validate_quantity(bad), Err(LedgerError::InvalidQuantity(_))),
                "{bad} should be rejected"
            );
        }
        assert!(validate_threshold("minimum_stock", 0.0).is_ok());
        assert!(validate_threshold("minimum_stock", -2.0).is_err());
    }
}
