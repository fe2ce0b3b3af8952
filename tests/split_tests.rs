// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::engine::split::{parse_shares, self_share};
use pocketbook::engine::transaction::{TransactionDraft, validate};
use pocketbook::engine::{SPLIT_TOLERANCE, expand, remaining_share, resolve};
use pocketbook::error::InvalidSplit;
use pocketbook::models::{PaymentMode, SplitShare, Transaction};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn share(person: &str, amount: Decimal) -> SplitShare {
    SplitShare::new(person, amount)
}

#[test]
fn needs_two_people() {
    assert_eq!(
        resolve(vec![share("Self", dec!(100))], dec!(100)),
        Err(InvalidSplit::TooFewShares(1))
    );
}

#[test]
fn every_share_needs_a_person() {
    assert_eq!(
        resolve(vec![share("Self", dec!(50)), share("  ", dec!(50))], dec!(100)),
        Err(InvalidSplit::EmptyPerson(2))
    );
}

#[test]
fn negative_share_rejected() {
    assert!(matches!(
        resolve(vec![share("Self", dec!(150)), share("Raj", dec!(-50))], dec!(100)),
        Err(InvalidSplit::NegativeShare { .. })
    ));
}

#[test]
fn duplicate_names_ignore_case() {
    assert_eq!(
        resolve(
            vec![share("Self", dec!(50)), share("Raj", dec!(25)), share("raj", dec!(25))],
            dec!(100)
        ),
        Err(InvalidSplit::DuplicatePerson("raj".into()))
    );
    assert_eq!(
        resolve(vec![share("self", dec!(50)), share("SELF", dec!(50))], dec!(100)),
        Err(InvalidSplit::DuplicatePerson("Self".into()))
    );
}

#[test]
fn self_must_take_part() {
    assert_eq!(
        resolve(vec![share("Raj", dec!(50)), share("Priya", dec!(50))], dec!(100)),
        Err(InvalidSplit::MissingSelf)
    );
}

#[test]
fn sum_must_match_within_a_paisa() {
    let ok = resolve(
        vec![share("Self", dec!(33.33)), share("Raj", dec!(33.33)), share("Priya", dec!(33.33))],
        dec!(100),
    );
    assert!(ok.is_ok());

    assert_eq!(
        resolve(vec![share("Self", dec!(50)), share("Raj", dec!(49.98))], dec!(100)),
        Err(InvalidSplit::SumMismatch {
            total: dec!(100),
            sum: dec!(99.98)
        })
    );
}

#[test]
fn self_share_never_received() {
    let mut me = share("self", dec!(50));
    me.payment_received = true;
    me.payment_received_date = NaiveDate::from_ymd_opt(2024, 1, 1);
    let mut raj = share("Raj", dec!(50));
    raj.payment_received_date = NaiveDate::from_ymd_opt(2024, 1, 1);

    let resolved = resolve(vec![me, raj], dec!(100)).unwrap();
    assert_eq!(resolved[0].person, "Self");
    assert!(!resolved[0].payment_received);
    assert_eq!(resolved[0].payment_received_date, None);
    assert_eq!(resolved[1].payment_received_date, None);
}

#[test]
fn remaining_share_floors_at_zero() {
    assert_eq!(remaining_share(dec!(900), &[dec!(300), dec!(300)]), dec!(300));
    assert_eq!(remaining_share(dec!(100), &[dec!(80), dec!(40)]), dec!(0));
}

#[test]
fn parse_shares_fills_only_the_last_blank() {
    let shares = parse_shares("Self=300, Raj=300, Priya=", dec!(900)).unwrap();
    assert_eq!(shares.len(), 3);
    assert_eq!(shares[2].person, "Priya");
    assert_eq!(shares[2].amount, dec!(300));

    assert_eq!(
        parse_shares("Self=,Raj=300", dec!(900)),
        Err(InvalidSplit::MissingAmount("Self".into()))
    );
    assert!(matches!(
        parse_shares("Self=abc,Raj=1", dec!(900)),
        Err(InvalidSplit::Malformed(_))
    ));
}

#[test]
fn auto_filled_share_still_validated() {
    // The blank share floors at 0, which leaves the sum short of the total.
    let shares = parse_shares("Self=80,Raj=40,Priya", dec!(100)).unwrap();
    assert_eq!(shares[2].amount, dec!(0));
    assert!(matches!(
        resolve(shares, dec!(100)),
        Err(InvalidSplit::SumMismatch { .. })
    ));
}

#[test]
fn expand_yields_one_receivable_per_other_person() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let mut shares = vec![share("Self", dec!(300)), share("Raj", dec!(300)), share("Priya", dec!(300))];
    shares[1].payment_received = true;
    let new = validate(
        TransactionDraft::new("Dinner", dec!(900), PaymentMode::Cash, date).split(shares),
        date,
    )
    .unwrap();
    let tx = Transaction::from_new(11, new);

    assert_eq!(self_share(&tx), Some(dec!(300)));
    let owed = expand(&tx);
    assert_eq!(owed.len(), 2);
    assert!(owed.iter().all(|r| r.from_split && r.transaction_id == 11));
    assert_eq!(owed[0].person, "Raj");
    assert!(owed[0].payment_received);
    assert_eq!(owed[0].payment_received_date, Some(date));
    assert_eq!(owed[1].person, "Priya");
    assert!(!owed[1].payment_received);
}

fn arb_cents() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..100_000i64, 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Any accepted split adds up to its total within the tolerance.
    #[test]
    fn prop_accepted_split_sums_to_total(others in arb_cents(), mine in 0i64..100_000i64, drift in -3i64..=3i64) {
        let mut shares = vec![share("Self", Decimal::new(mine, 2))];
        for (i, cents) in others.iter().enumerate() {
            shares.push(share(&format!("P{}", i), Decimal::new(*cents, 2)));
        }
        let exact: Decimal = shares.iter().map(|s| s.amount).sum();
        let total = exact + Decimal::new(drift, 2);

        match resolve(shares, total) {
            Ok(resolved) => {
                let sum: Decimal = resolved.iter().map(|s| s.amount).sum();
                prop_assert!((total - sum).abs() <= SPLIT_TOLERANCE);
            }
            Err(e) => {
                prop_assert!(drift.abs() > 1);
                prop_assert!(matches!(e, InvalidSplit::SumMismatch { .. }), "unexpected error: {e:?}");
            }
        }
    }
}
