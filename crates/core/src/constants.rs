use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal places kept on every persisted money amount
pub const MONEY_SCALE: u32 = 2;

/// Largest amount accepted for any money input
pub const MAX_MONEY_AMOUNT: Decimal = dec!(1000000000000000);

/// Date format used on the wire and in storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of expense categories returned by the top-categories summary
pub const TOP_CATEGORIES_LIMIT: usize = 5;

/// Minimum accepted password length on registration and password change
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Lifetime of a password reset token
pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;
