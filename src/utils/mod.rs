//! Utility functions for the pool analytics engine.
//!
//! This module is organized into focused submodules:
//!
//! - [`conversion`] - Decimal-string parsing and address normalization
//! - [`fees`] - 24h fee and APY calculations shared by reconciler and table
//! - [`format`] - Percentage, fee tier and dollar rendering
//! - [`tokens`] - Token display-name overrides per network

mod conversion;
mod fees;
mod format;
mod tokens;

// ============================================
// Re-exports
// ============================================

// Conversion utilities
pub use conversion::{
    finite_or_zero, hex_encode, normalize_address, parse_decimal, parse_decimal_opt, parse_u32,
    parse_u8,
};

// Fee and yield calculations
pub use fees::{apy, daily_fees, fee_fraction, DAYS_PER_YEAR, FEE_TIER_DENOMINATOR};

// Display formatting
pub use format::{format_dollar_amount, format_fee_tier, format_percentage};

// Token display names
pub use tokens::{format_token_name, format_token_symbol};
