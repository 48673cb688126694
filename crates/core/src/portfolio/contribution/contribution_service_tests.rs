//! Unit tests for contribution analysis.

use super::*;
use crate::errors::{Error, PerformanceError};
use crate::portfolio::performance::DateRange;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn full_year() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )
    .unwrap()
}

// ============================================================================
// Single-position contribution
// ============================================================================

#[test]
fn test_contribution_basic() {
    let result = calculate_contribution(dec!(10000), dec!(11000), dec!(50000), dec!(55000))
        .unwrap();

    assert_eq!(result.weight, dec!(0.20));
    assert_eq!(result.instrument_return, dec!(0.10));
    assert_eq!(result.contribution, dec!(0.02));
    assert_eq!(result.absolute_contribution, dec!(1000));
    assert_eq!(result.percentage_of_total, dec!(0.20));
}

#[test]
fn test_contribution_negative_position() {
    let result = calculate_contribution(dec!(20000), dec!(18000), dec!(100000), dec!(105000))
        .unwrap();

    assert_eq!(result.weight, dec!(0.2));
    assert_eq!(result.instrument_return, dec!(-0.1));
    assert_eq!(result.contribution, dec!(-0.02));
    assert_eq!(result.absolute_contribution, dec!(-2000));
    assert_eq!(result.percentage_of_total, dec!(-0.4));
}

#[test]
fn test_contribution_new_position_keeps_absolute() {
    let result = calculate_contribution(Decimal::ZERO, dec!(2500), dec!(50000), dec!(55000))
        .unwrap();

    assert_eq!(result.weight, Decimal::ZERO);
    assert_eq!(result.instrument_return, Decimal::ZERO);
    assert_eq!(result.contribution, Decimal::ZERO);
    assert_eq!(result.absolute_contribution, dec!(2500));
}

#[test]
fn test_contribution_zero_portfolio_start() {
    let result = calculate_contribution(dec!(100), dec!(120), Decimal::ZERO, dec!(500))
        .unwrap();

    assert_eq!(result.weight, Decimal::ZERO);
    assert_eq!(result.instrument_return, dec!(0.2));
    assert_eq!(result.contribution, Decimal::ZERO);
    assert_eq!(result.absolute_contribution, dec!(20));
}

#[test]
fn test_flat_portfolio_has_zero_percentage() {
    let result = calculate_contribution(dec!(100), dec!(110), dec!(1000), dec!(1000))
        .unwrap();
    assert_eq!(result.percentage_of_total, Decimal::ZERO);
}

#[test]
fn test_contribution_near_zero_position_start_overflows() {
    let err =
        calculate_contribution(Decimal::new(1, 28), dec!(10000000000), dec!(100), dec!(110))
            .unwrap_err();
    assert!(matches!(
        err,
        Error::Performance(PerformanceError::NumericOverflow(_))
    ));
}

// ============================================================================
// Helpers
// ============================================================================

#[test]
fn test_portfolio_return() {
    assert_eq!(portfolio_return(dec!(50000), dec!(55000)).unwrap(), dec!(0.1));
    assert_eq!(portfolio_return(dec!(200), dec!(150)).unwrap(), dec!(-0.25));
    assert_eq!(portfolio_return(Decimal::ZERO, dec!(10)).unwrap(), Decimal::ZERO);
}

#[test]
fn test_portfolio_return_overflow() {
    assert!(matches!(
        portfolio_return(Decimal::new(1, 28), dec!(10000000000)),
        Err(Error::Performance(PerformanceError::NumericOverflow(_)))
    ));
}

#[test]
fn test_percentage_contribution() {
    assert_eq!(percentage_contribution(dec!(250), dec!(1000)).unwrap(), dec!(0.25));
    assert_eq!(percentage_contribution(dec!(250), Decimal::ZERO).unwrap(), Decimal::ZERO);
}

#[test]
fn test_extremes_empty() {
    let (top, worst) = get_extremes(&[]);
    assert_eq!(top, ContributionSummary::empty());
    assert_eq!(worst, ContributionSummary::empty());
    assert!(top.is_empty());
}

#[test]
fn test_extremes_single() {
    let (top, worst) = get_extremes(&[("AAPL".to_string(), dec!(0.015))]);
    assert_eq!(top, worst);
    assert_eq!(top.ticker, "AAPL");
    assert_eq!(top.contribution, dec!(0.015));
}

#[test]
fn test_extremes_many() {
    let contributions = vec![
        ("MSFT".to_string(), dec!(0.01)),
        ("TSLA".to_string(), dec!(-0.03)),
        ("NVDA".to_string(), dec!(0.05)),
        ("VOD".to_string(), dec!(-0.03)),
    ];
    let (top, worst) = get_extremes(&contributions);
    assert_eq!(top.ticker, "NVDA");
    // Tie on the minimum goes to the first entry.
    assert_eq!(worst.ticker, "TSLA");
    assert_eq!(worst.contribution, dec!(-0.03));
}

// ============================================================================
// Portfolio analysis
// ============================================================================

#[test]
fn test_analyze_positions() {
    let service = ContributionService::default();
    let positions = vec![
        PositionValuation::new("AAA", dec!(10000), dec!(11000)),
        PositionValuation::new("BBB", dec!(30000), dec!(31500)),
        PositionValuation::new("CCC", dec!(10000), dec!(9500)),
    ];

    let analysis = service.analyze_positions(&positions, full_year()).unwrap();

    assert_eq!(analysis.start_value, dec!(50000));
    assert_eq!(analysis.end_value, dec!(52000));
    assert_eq!(analysis.portfolio_return, dec!(0.04));
    assert_eq!(analysis.days, 365);

    let tickers: Vec<_> = analysis.positions.iter().map(|p| p.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["BBB", "AAA", "CCC"]);
    assert_eq!(analysis.top_contributor.ticker, "BBB");
    assert_eq!(analysis.worst_contributor.ticker, "CCC");

    // Start-weighted contributions add up to the portfolio return.
    let summed: Decimal = analysis.positions.iter().map(|p| p.result.contribution).sum();
    assert_eq!(summed, dec!(0.04));

    let shares: Decimal = analysis
        .positions
        .iter()
        .map(|p| p.result.percentage_of_total)
        .sum();
    assert_eq!(shares, Decimal::ONE);

    let annualized = analysis.annualized_return.unwrap();
    assert!((annualized - dec!(0.04)).abs() < dec!(0.001));
}

#[test]
fn test_analyze_positions_overflow_is_an_error() {
    let service = ContributionService::default();
    let positions = vec![
        PositionValuation::new("DUST", Decimal::new(1, 28), dec!(10000000000)),
        PositionValuation::new("AAA", dec!(100), dec!(110)),
    ];

    let err = service
        .analyze_positions(&positions, full_year())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Performance(PerformanceError::NumericOverflow(_))
    ));
}

#[test]
fn test_analyze_no_positions() {
    let service = ContributionService::default();
    let analysis = service.analyze_positions(&[], full_year()).unwrap();

    assert!(analysis.positions.is_empty());
    assert_eq!(analysis.portfolio_return, Decimal::ZERO);
    assert!(analysis.top_contributor.is_empty());
    assert!(analysis.worst_contributor.is_empty());
}
