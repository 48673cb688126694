use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Average calendar days per year used for annualization
pub const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Decimal precision for reported returns
pub const DECIMAL_PRECISION: u32 = 6;

/// Annual risk-free rate used for the Sharpe ratio
pub const RISK_FREE_RATE: Decimal = dec!(0.02);

/// Confidence level for historical value at risk
pub const VAR_CONFIDENCE: Decimal = dec!(0.95);

/// Observations in a rolling volatility window
pub const ROLLING_WINDOW: usize = 30;

/// Minimum batch size before batch calculations run in parallel
pub const PARALLEL_THRESHOLD: usize = 8;
