/// Decimal places kept for a computed AUM figure.
pub const AUM_DECIMAL_PLACES: u32 = 2;

/// Maximum fractional digits accepted for a holding quantity.
pub const QUANTITY_DECIMAL_PLACES: u32 = 8;

/// Maximum fractional digits accepted for a holding unit price.
pub const UNIT_PRICE_DECIMAL_PLACES: u32 = 4;

/// Total significant digits allowed for stored decimal amounts.
pub const MAX_DECIMAL_DIGITS: u32 = 20;

/// Maximum length of names (portfolio, client, asset).
pub const MAX_NAME_LENGTH: usize = 255;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: i64 = 500;
