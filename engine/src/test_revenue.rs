use crate::invariants;
use crate::{CreateOffering, Engine, EngineError, PricingCurve};

const NOW: u64 = 1_700_000_000;
const HOUR: u64 = 3_600;
const DAY: u64 = 24 * HOUR;

fn engine_with_offering(total_shares: u64) -> Engine {
    let engine = Engine::new();
    engine
        .create_offering(
            CreateOffering {
                id: "vid-1".into(),
                creator: "creator".into(),
                total_shares,
                base_price: 100,
                curve: PricingCurve::Supply {
                    price_increment: 0,
                    sale_deadline: NOW + 28 * DAY,
                },
            },
            NOW,
        )
        .unwrap();
    engine
}

#[test]
fn claim_pays_pro_rata_share_of_pool() {
    let engine = engine_with_offering(1_000);
    engine.buy_shares("vid-1", &"alice".into(), 100, NOW).unwrap();

    let pool = engine
        .deposit_revenue("vid-1", &"creator".into(), 1_000, NOW + DAY)
        .unwrap();
    assert_eq!(pool, 1_000);

    // floor(100/1000 * 1000) = 100.
    let claimed = engine
        .claim_revenue("vid-1", &"alice".into(), NOW + 2 * DAY)
        .unwrap();
    assert_eq!(claimed, 100);

    let record = engine.record("vid-1");
    invariants::assert_all(&record.config, &record.state.read().unwrap());
}

#[test]
fn only_creator_may_deposit() {
    let engine = engine_with_offering(1_000);
    let err = engine
        .deposit_revenue("vid-1", &"mallory".into(), 1_000, NOW)
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Unauthorized {
            id: "vid-1".into(),
            actor: "mallory".into(),
        }
    );
    assert_eq!(engine.get_revenue("vid-1").unwrap().total_amount, 0);
}

#[test]
fn deposit_rejects_non_positive_amount() {
    let engine = engine_with_offering(1_000);
    for amount in [0, -5] {
        let err = engine
            .deposit_revenue("vid-1", &"creator".into(), amount, NOW)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)), "got {err:?}");
    }
}

#[test]
fn deposits_accumulate_in_pool() {
    let engine = engine_with_offering(1_000);
    engine.deposit_revenue("vid-1", &"creator".into(), 300, NOW).unwrap();
    let pool = engine
        .deposit_revenue("vid-1", &"creator".into(), 200, NOW + HOUR)
        .unwrap();
    assert_eq!(pool, 500);

    let summary = engine.get_revenue("vid-1").unwrap();
    assert_eq!(summary.total_amount, 500);
    assert_eq!(summary.distributed_amount, 0);
    assert_eq!(summary.last_distribution, NOW + HOUR);
}

#[test]
fn claim_without_holding_fails() {
    let engine = engine_with_offering(1_000);
    engine.deposit_revenue("vid-1", &"creator".into(), 1_000, NOW).unwrap();

    let err = engine.claim_revenue("vid-1", &"nobody".into(), NOW).unwrap_err();
    assert!(matches!(err, EngineError::NothingToClaim { .. }), "got {err:?}");
}

#[test]
fn second_claim_without_new_deposit_fails() {
    let engine = engine_with_offering(1_000);
    engine.buy_shares("vid-1", &"alice".into(), 100, NOW).unwrap();
    engine.deposit_revenue("vid-1", &"creator".into(), 1_000, NOW).unwrap();

    assert_eq!(engine.claim_revenue("vid-1", &"alice".into(), NOW).unwrap(), 100);
    let err = engine.claim_revenue("vid-1", &"alice".into(), NOW).unwrap_err();
    assert_eq!(
        err,
        EngineError::NothingToClaim {
            id: "vid-1".into(),
            investor: "alice".into(),
        }
    );
}

#[test]
fn new_deposit_unlocks_incremental_claim() {
    let engine = engine_with_offering(1_000);
    engine.buy_shares("vid-1", &"alice".into(), 100, NOW).unwrap();

    engine.deposit_revenue("vid-1", &"creator".into(), 1_000, NOW).unwrap();
    assert_eq!(engine.claim_revenue("vid-1", &"alice".into(), NOW).unwrap(), 100);

    // Pool grows to 1_500: entitlement floor(100 * 1500 / 1000) = 150,
    // of which 100 is already claimed.
    engine.deposit_revenue("vid-1", &"creator".into(), 500, NOW + DAY).unwrap();
    assert_eq!(
        engine.claim_revenue("vid-1", &"alice".into(), NOW + DAY).unwrap(),
        50
    );

    let record = engine.record("vid-1");
    invariants::assert_all(&record.config, &record.state.read().unwrap());
}

#[test]
fn entitlements_floor_and_never_overdraw_the_pool() {
    // 3 shares, holdings 1 and 2, pool 100: payouts 33 + 66 = 99 <= 100.
    let engine = engine_with_offering(3);
    engine.buy_shares("vid-1", &"alice".into(), 1, NOW).unwrap();
    engine.buy_shares("vid-1", &"bob".into(), 2, NOW).unwrap();
    engine.deposit_revenue("vid-1", &"creator".into(), 100, NOW).unwrap();

    assert_eq!(engine.claim_revenue("vid-1", &"alice".into(), NOW).unwrap(), 33);
    assert_eq!(engine.claim_revenue("vid-1", &"bob".into(), NOW).unwrap(), 66);

    let summary = engine.get_revenue("vid-1").unwrap();
    assert_eq!(summary.distributed_amount, 99);
    assert!(summary.distributed_amount <= summary.total_amount);

    let record = engine.record("vid-1");
    invariants::assert_all(&record.config, &record.state.read().unwrap());
}

#[test]
fn claims_interleaved_with_deposits_stay_within_pool() {
    let engine = engine_with_offering(10);
    engine.buy_shares("vid-1", &"alice".into(), 4, NOW).unwrap();
    engine.buy_shares("vid-1", &"bob".into(), 6, NOW).unwrap();

    let mut timestamp = NOW;
    for amount in [137, 999, 1, 2_500] {
        timestamp += HOUR;
        engine
            .deposit_revenue("vid-1", &"creator".into(), amount, timestamp)
            .unwrap();
        for investor in ["alice", "bob"] {
            // Small deposits may leave an investor with nothing new.
            match engine.claim_revenue("vid-1", &investor.to_string(), timestamp) {
                Ok(paid) => assert!(paid > 0),
                Err(EngineError::NothingToClaim { .. }) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
            let record = engine.record("vid-1");
            invariants::assert_all(&record.config, &record.state.read().unwrap());
        }
    }
}

#[test]
fn timed_offerings_distribute_revenue_the_same_way() {
    let engine = Engine::new();
    let stream_start = NOW + 18 * HOUR;
    engine
        .create_offering(
            CreateOffering {
                id: "stream-1".into(),
                creator: "creator".into(),
                total_shares: 1_000,
                base_price: 100,
                curve: PricingCurve::Timed {
                    max_price: 1_000,
                    stream_start,
                    pre_live_duration: 12 * HOUR,
                },
            },
            NOW,
        )
        .unwrap();

    engine
        .buy_shares("stream-1", &"alice".into(), 200, stream_start - 6 * HOUR)
        .unwrap();
    // Revenue arrives after the stream.
    engine
        .deposit_revenue("stream-1", &"creator".into(), 5_000, stream_start + DAY)
        .unwrap();
    assert_eq!(
        engine
            .claim_revenue("stream-1", &"alice".into(), stream_start + 2 * DAY)
            .unwrap(),
        1_000
    );
}
