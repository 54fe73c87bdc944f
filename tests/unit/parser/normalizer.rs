//! Unit tests for the price adjustment step

use sigmill::models::{CandidateSignal, Direction};
use sigmill::parser::{adjust_prices, validate, SignalExtractor};

fn buy_candidate() -> CandidateSignal {
    CandidateSignal {
        symbol: "XAUUSD".to_string(),
        direction: Direction::Buy,
        entry_min: 2000.0,
        entry_max: 2000.0,
        stop_loss: 1990.0,
        take_profits: vec![2010.0, 2020.0],
    }
}

#[test]
fn buy_moves_stop_down_and_take_profits_up() {
    let adjusted = adjust_prices(buy_candidate(), 0.50);
    assert_eq!(adjusted.stop_loss, 1989.50);
    assert_eq!(adjusted.take_profits, vec![2010.50, 2020.50]);
    // Entry is never adjusted.
    assert_eq!(adjusted.entry_min, 2000.0);
    assert_eq!(adjusted.entry_max, 2000.0);
}

#[test]
fn sell_inverts_the_adjustment_signs() {
    let candidate = CandidateSignal {
        direction: Direction::Sell,
        stop_loss: 2010.0,
        take_profits: vec![1990.0, 1980.0],
        ..buy_candidate()
    };
    let adjusted = adjust_prices(candidate, 0.50);
    assert_eq!(adjusted.stop_loss, 2010.50);
    assert_eq!(adjusted.take_profits, vec![1989.50, 1979.50]);
}

#[test]
fn adjustment_is_configurable() {
    let adjusted = adjust_prices(buy_candidate(), 0.25);
    assert_eq!(adjusted.stop_loss, 1989.75);
    assert_eq!(adjusted.take_profits, vec![2010.25, 2020.25]);
}

#[test]
fn extract_then_adjust_matches_reference_scenario() {
    // "XAUUSD BUY Entry: 2000 SL: 1990 TP: 2010" must yield SL 1989.50 and
    // TP 2010.50, which the validator accepts at max distance 15.0.
    let extractor = SignalExtractor::new(&["XAUUSD".to_string()]);
    let extracted = extractor
        .extract("XAUUSD BUY Entry: 2000 SL: 1990 TP: 2010")
        .expect("should parse");
    assert_eq!(extracted.entry_min, 2000.0);
    assert_eq!(extracted.entry_max, 2000.0);
    assert_eq!(extracted.stop_loss, 1990.0);
    assert_eq!(extracted.take_profits, vec![2010.0]);

    let adjusted = adjust_prices(extracted, 0.50);
    assert_eq!(adjusted.stop_loss, 1989.50);
    assert_eq!(adjusted.take_profits, vec![2010.50]);

    // Distance 10.5 is within the default 15.0 and TP1 clears the entry.
    assert!(validate(&adjusted, 15.0).is_ok());
}

#[test]
fn sell_adjustment_round_trips_through_extraction() {
    let extractor = SignalExtractor::new(&["XAUUSD".to_string()]);
    let extracted = extractor
        .extract("XAUUSD SELL Entry: 2000 SL: 2010 TP: 1990")
        .expect("should parse");
    let adjusted = adjust_prices(extracted, 0.50);
    assert_eq!(adjusted.stop_loss, 2010.50);
    assert_eq!(adjusted.take_profits, vec![1989.50]);
}
