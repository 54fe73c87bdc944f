//! Unit tests for content fingerprints

use sigmill::models::{CandidateSignal, Direction};
use sigmill::parser::{adjust_prices, content_hash, SignalExtractor};

fn candidate(tps: Vec<f64>) -> CandidateSignal {
    CandidateSignal {
        symbol: "XAUUSD".to_string(),
        direction: Direction::Buy,
        entry_min: 2000.0,
        entry_max: 2005.0,
        stop_loss: 1990.0,
        take_profits: tps,
    }
}

#[test]
fn same_signal_in_different_wording_collides() {
    let extractor = SignalExtractor::new(&["XAUUSD".to_string()]);
    let a = extractor
        .extract("XAUUSD BUY Entry: 2000 SL: 1990 TP: 2010")
        .expect("should parse");
    let b = extractor
        .extract("XAUUSD BUY @ 2000 SL 1990 TP 2010")
        .expect("should parse");

    assert_eq!(
        content_hash(&adjust_prices(a, 0.50)),
        content_hash(&adjust_prices(b, 0.50))
    );
}

#[test]
fn changed_take_profit_changes_the_hash() {
    let extractor = SignalExtractor::new(&["XAUUSD".to_string()]);
    let a = extractor
        .extract("XAUUSD BUY Entry: 2000 SL: 1990 TP: 2010")
        .expect("should parse");
    let b = extractor
        .extract("XAUUSD BUY Entry: 2000 SL: 1990 TP: 2011")
        .expect("should parse");

    assert_ne!(
        content_hash(&adjust_prices(a, 0.50)),
        content_hash(&adjust_prices(b, 0.50))
    );
}

#[test]
fn take_profit_order_does_not_affect_the_hash() {
    let forward = candidate(vec![2010.0, 2020.0, 2030.0]);
    let reversed = candidate(vec![2030.0, 2010.0, 2020.0]);
    assert_eq!(content_hash(&forward), content_hash(&reversed));
}

#[test]
fn every_field_participates_in_the_hash() {
    let base = candidate(vec![2010.0]);
    let variants = [
        CandidateSignal {
            symbol: "EURUSD".to_string(),
            ..base.clone()
        },
        CandidateSignal {
            direction: Direction::Sell,
            ..base.clone()
        },
        CandidateSignal {
            entry_min: 1999.0,
            ..base.clone()
        },
        CandidateSignal {
            entry_max: 2006.0,
            ..base.clone()
        },
        CandidateSignal {
            stop_loss: 1991.0,
            ..base.clone()
        },
    ];

    let base_hash = content_hash(&base);
    for variant in &variants {
        assert_ne!(content_hash(variant), base_hash, "variant: {:?}", variant);
    }
}

#[test]
fn hash_is_stable_and_fixed_length() {
    let a = candidate(vec![2010.0]);
    let first = content_hash(&a);
    let second = content_hash(&a);
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
}

#[test]
fn sub_rounding_differences_collide() {
    let a = candidate(vec![2010.0]);
    let b = CandidateSignal {
        stop_loss: 1990.0004,
        ..candidate(vec![2010.0004])
    };
    assert_eq!(content_hash(&a), content_hash(&b));
}
