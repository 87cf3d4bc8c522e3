//! Stable error-code constants referenced by error `code()` accessors.
//!
//! Codes are part of the public contract: callers may match on them, so
//! existing values must never change meaning.

pub const DOC_NOT_OBJECT: &str = "PRICING_DOC_001";
pub const DOC_MISSING_FIELD: &str = "PRICING_DOC_002";
pub const DOC_INVALID_NUMERIC: &str = "PRICING_DOC_003";
pub const DOC_INVALID_CURRENCY: &str = "PRICING_DOC_004";

pub const OVERRIDE_KEY_PARSE: &str = "PRICING_OVR_001";

pub const CONFIG_NON_FINITE: &str = "PRICING_CFG_001";
pub const CONFIG_NEGATIVE: &str = "PRICING_CFG_002";
