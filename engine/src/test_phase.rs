use crate::invariants;
use crate::{CreateOffering, Engine, PricingCurve, SalePhase};

const NOW: u64 = 1_700_000_000;
const HOUR: u64 = 3_600;
const DAY: u64 = 24 * HOUR;

fn supply_offering(engine: &Engine, id: &str, deadline: u64) {
    engine
        .create_offering(
            CreateOffering {
                id: id.into(),
                creator: "creator".into(),
                total_shares: 100,
                base_price: 100,
                curve: PricingCurve::Supply {
                    price_increment: 10,
                    sale_deadline: deadline,
                },
            },
            NOW,
        )
        .unwrap();
}

fn timed_offering(engine: &Engine, id: &str, stream_start: u64, pre_live: u64) {
    engine
        .create_offering(
            CreateOffering {
                id: id.into(),
                creator: "creator".into(),
                total_shares: 100,
                base_price: 100,
                curve: PricingCurve::Timed {
                    max_price: 1_000,
                    stream_start,
                    pre_live_duration: pre_live,
                },
            },
            NOW,
        )
        .unwrap();
}

#[test]
fn timed_lifecycle_upcoming_pre_live_live() {
    let engine = Engine::new();
    let stream_start = NOW + 18 * HOUR;
    timed_offering(&engine, "stream-1", stream_start, 12 * HOUR);

    // Pre-live window opens at stream_start - 12h = NOW + 6h.
    assert_eq!(
        engine.get_stream_status("stream-1", NOW).unwrap(),
        SalePhase::Upcoming
    );
    // Exactly at the window open the sale is on.
    assert_eq!(
        engine.get_stream_status("stream-1", NOW + 6 * HOUR).unwrap(),
        SalePhase::PreLive
    );
    assert_eq!(
        engine.get_stream_status("stream-1", NOW + 12 * HOUR).unwrap(),
        SalePhase::PreLive
    );
    // Exactly at stream start the offering is live.
    assert_eq!(
        engine.get_stream_status("stream-1", stream_start).unwrap(),
        SalePhase::Live
    );
}

#[test]
fn timed_phase_transitions_are_forward_only() {
    let engine = Engine::new();
    let stream_start = NOW + 18 * HOUR;
    timed_offering(&engine, "stream-1", stream_start, 12 * HOUR);

    let mut previous = engine.get_stream_status("stream-1", NOW).unwrap();
    for hours in 1..=30 {
        let current = engine
            .get_stream_status("stream-1", NOW + hours * HOUR)
            .unwrap();
        invariants::assert_valid_phase_transition(previous, current);
        previous = current;
    }
    assert_eq!(previous, SalePhase::Live);
}

#[test]
fn supply_open_until_deadline_passes() {
    let engine = Engine::new();
    let deadline = NOW + 7 * DAY;
    supply_offering(&engine, "vid-1", deadline);

    assert_eq!(
        engine.get_stream_status("vid-1", NOW).unwrap(),
        SalePhase::Open
    );
    // The deadline instant itself still accepts purchases.
    assert_eq!(
        engine.get_stream_status("vid-1", deadline).unwrap(),
        SalePhase::Open
    );
    assert_eq!(
        engine.get_stream_status("vid-1", deadline + 1).unwrap(),
        SalePhase::Closed
    );
}

#[test]
fn sale_phase_serializes_as_screaming_snake_case() {
    // The REST surface exposes these verbatim (UPCOMING / PRE_LIVE / ...).
    assert_eq!(
        serde_json::to_string(&SalePhase::Upcoming).unwrap(),
        "\"UPCOMING\""
    );
    assert_eq!(
        serde_json::to_string(&SalePhase::PreLive).unwrap(),
        "\"PRE_LIVE\""
    );
    assert_eq!(
        serde_json::to_string(&SalePhase::Live).unwrap(),
        "\"LIVE\""
    );
}

#[test]
fn supply_closes_when_sold_out() {
    let engine = Engine::new();
    supply_offering(&engine, "vid-1", NOW + 7 * DAY);

    engine.buy_shares("vid-1", &"alice".into(), 100, NOW).unwrap();
    assert_eq!(
        engine.get_stream_status("vid-1", NOW).unwrap(),
        SalePhase::Closed
    );
}
