//! Validation utilities for Factory Insights inputs

use rust_decimal::Decimal;

use crate::models::{AnalysisParams, InvoiceLineItem};
use crate::types::DateRange;

/// Longest accepted material code
pub const MAX_MATERIAL_CODE_LEN: usize = 64;

// ============================================================================
// Invoice Validations
// ============================================================================

/// Validate a single invoice line
pub fn validate_line_item(item: &InvoiceLineItem) -> Result<(), &'static str> {
    if item.quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    if item.unit_price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    Ok(())
}

/// Validate every line of an invoice
pub fn validate_line_items(items: &[InvoiceLineItem]) -> Result<(), &'static str> {
    items.iter().try_for_each(validate_line_item)
}

// ============================================================================
// Report Validations
// ============================================================================

/// Validate the trailing window length of a consumption report
pub fn validate_months_back(months_back: u32, max_months_back: u32) -> Result<(), &'static str> {
    if months_back > max_months_back {
        return Err("Requested window exceeds the maximum number of months");
    }
    Ok(())
}

/// Validate that a date range is not inverted
pub fn validate_date_range(range: &DateRange) -> Result<(), &'static str> {
    if range.start > range.end {
        return Err("Start date must not be after end date");
    }
    Ok(())
}

/// Validate a material code used as a lookup key
pub fn validate_material_code(code: &str) -> Result<(), &'static str> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err("Material code cannot be empty");
    }
    if trimmed.len() > MAX_MATERIAL_CODE_LEN {
        return Err("Material code is too long");
    }
    Ok(())
}

// ============================================================================
// Analytics Validations
// ============================================================================

/// Validate replenishment parameters
pub fn validate_analysis_params(params: &AnalysisParams) -> Result<(), &'static str> {
    let values = [
        params.lead_time_days,
        params.order_cost,
        params.holding_cost,
        params.safety_days,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Err("Analysis parameters must be finite numbers");
    }
    if values.iter().any(|v| *v < 0.0) {
        return Err("Analysis parameters cannot be negative");
    }
    Ok(())
}
