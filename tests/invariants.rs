//! Randomized sweeps over the desk.
//!
//! These tests verify, after every step of a seeded random sequence:
//! 1. Quantity conservation on every order that is not cancelled
//! 2. Every fill is recorded twice, once per side, cross-referenced
//! 3. Status always matches the quantities
//! 4. Every trade happens at the resting order's price
//! 5. An order left pending after submission has no crossing counterparty
//!
//! and that the same seed always produces the same book.
//!
//! ## Running
//!
//! ```bash
//! cargo test --release --test invariants -- --nocapture
//! ```

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tradebook::engine::status::resolve;
use tradebook::types::Transaction;
use tradebook::{DeskConfig, Order, OrderDesk, OrderEdit, OrderStatus, OrderTicket};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Steps per sweep
const SWEEP_STEPS: usize = 1_500;

/// Symbols the sweeps trade; a subset of the defaults so books interact
const SYMBOLS: [&str; 2] = ["ABC1", "XYZ1"];

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// One random action against the desk
#[derive(Debug, Clone)]
enum Step {
    Submit(OrderTicket),
    Cancel(u64),
    EditQuantity(u64, u64),
}

/// Generate a deterministic action sequence.
///
/// Same seed = same sequence. Prices sit in a narrow band around 10.00 so
/// most submissions cross something.
fn generate_steps(count: usize, seed: u64) -> Vec<Step> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut steps = Vec::with_capacity(count);

    for i in 0..count {
        let roll: f64 = rng.gen();
        let known = i as u64;

        let step = if roll < 0.1 && known > 0 {
            Step::Cancel(rng.gen_range(1..=known))
        } else if roll < 0.15 && known > 0 {
            Step::EditQuantity(rng.gen_range(1..=known), rng.gen_range(1..=200))
        } else {
            let symbol = SYMBOLS[rng.gen_range(0..SYMBOLS.len())];
            let side = if rng.gen_bool(0.5) { "buy" } else { "sell" };
            let quantity: u64 = rng.gen_range(1..=100);
            let cents: u64 = rng.gen_range(950..=1050);
            let price = format!("{}.{:02}", cents / 100, cents % 100);
            Step::Submit(OrderTicket::new(symbol, side, quantity, price))
        };
        steps.push(step);
    }

    steps
}

/// Apply one step; rejected edits and cancels are part of the sweep
fn apply(desk: &mut OrderDesk, step: &Step, now: DateTime<Utc>) -> Option<Order> {
    match step {
        Step::Submit(ticket) => Some(desk.submit_order(ticket, now).unwrap()),
        Step::Cancel(id) => {
            let _ = desk.cancel_order(*id, now);
            None
        }
        Step::EditQuantity(id, quantity) => {
            let _ = desk.edit_order(*id, &OrderEdit::quantity(*quantity), now);
            None
        }
    }
}

/// Run a sequence and return the final desk
fn run_sequence(seed: u64, count: usize) -> OrderDesk {
    let mut desk = OrderDesk::new(&DeskConfig::default());
    for (i, step) in generate_steps(count, seed).iter().enumerate() {
        apply(&mut desk, step, t0() + Duration::seconds(i as i64));
    }
    desk
}

fn assert_conservation_and_status(orders: &[Order]) {
    for order in orders {
        assert!(order.pending_quantity <= order.quantity, "order {}", order.id);
        if order.status == OrderStatus::Cancelled {
            assert_eq!(order.pending_quantity, 0, "order {}", order.id);
            continue;
        }
        assert_eq!(
            order.quantity - order.pending_quantity,
            order.transacted_quantity(),
            "conservation broken on order {}",
            order.id
        );
        assert_eq!(
            order.status,
            resolve(order.quantity, order.pending_quantity),
            "stale status on order {}",
            order.id
        );
    }
}

/// Every transaction id appears exactly twice, on two orders pointing at each other
fn assert_symmetry(orders: &[Order]) {
    let mut by_id: HashMap<u64, Vec<(u64, &Transaction)>> = HashMap::new();
    for order in orders {
        for tx in &order.transactions {
            by_id.entry(tx.id).or_default().push((order.id, tx));
        }
    }

    for (tx_id, records) in by_id {
        assert_eq!(records.len(), 2, "transaction {tx_id} recorded {} times", records.len());
        let (holder_a, a) = records[0];
        let (holder_b, b) = records[1];

        assert_ne!(holder_a, holder_b);
        assert_eq!(a.order_id, holder_b);
        assert_eq!(b.order_id, holder_a);
        assert!(a.is_mirror_of(b));
        assert!(a.quantity > 0);
    }
}

/// Sweeps never edit prices, so the resting side is the older order
fn assert_price_rule(orders: &[Order]) {
    let by_id: HashMap<u64, &Order> = orders.iter().map(|o| (o.id, o)).collect();
    for order in orders {
        for tx in &order.transactions {
            let resting = by_id[&order.id.min(tx.order_id)];
            assert_eq!(tx.price, resting.price, "transaction {}", tx.id);
        }
    }
}

// ============================================================================
// SWEEPS
// ============================================================================

#[test]
fn sweep_invariants_hold_after_every_step() {
    for seed in [1u64, 7, 42] {
        let mut desk = OrderDesk::new(&DeskConfig::default());

        for (i, step) in generate_steps(SWEEP_STEPS / 3, seed).iter().enumerate() {
            let created = apply(&mut desk, step, t0() + Duration::seconds(i as i64));

            let orders = desk.list_orders();
            assert_conservation_and_status(orders);
            assert_symmetry(orders);
            assert_price_rule(orders);

            if let Some(created) = created {
                assert_eq!(created.id as usize, orders.len());
                if created.pending_quantity > 0 {
                    let crossing = orders.iter().filter(|o| {
                        o.id != created.id
                            && o.symbol == created.symbol
                            && o.side == created.side.opposite()
                            && o.is_active()
                            && o.crosses(created.side, created.price)
                    });
                    assert_eq!(crossing.count(), 0, "order {} left crossed", created.id);
                }
            }
        }
    }
}

#[test]
fn sweep_transaction_ids_are_increasing() {
    let desk = run_sequence(99, SWEEP_STEPS);

    let mut ids: Vec<u64> = desk
        .list_orders()
        .iter()
        .flat_map(|o| o.transactions.iter().map(|t| t.id))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    assert!(!ids.is_empty(), "expected some fills");
    assert_eq!(ids[0], 100);
    assert_eq!(*ids.last().unwrap() - ids[0] + 1, ids.len() as u64, "gap in transaction ids");
}

/// Same sequence produces the same fingerprint.
#[test]
fn verify_determinism() {
    const SEED: u64 = 12345;

    let start = Instant::now();
    let a = run_sequence(SEED, SWEEP_STEPS);
    let b = run_sequence(SEED, SWEEP_STEPS);
    println!("  two runs of {} steps in {:.2?}", SWEEP_STEPS, start.elapsed());

    assert_eq!(a.book().fingerprint(), b.book().fingerprint());
    assert_eq!(a.book(), b.book());

    let c = run_sequence(SEED + 1, SWEEP_STEPS);
    assert_ne!(a.book().fingerprint(), c.book().fingerprint());
}

#[test]
fn persisted_book_resumes_identically() {
    let steps = generate_steps(SWEEP_STEPS, 5);
    let (head, tail) = steps.split_at(SWEEP_STEPS / 2);

    let mut straight = OrderDesk::new(&DeskConfig::default());
    for (i, step) in steps.iter().enumerate() {
        apply(&mut straight, step, t0() + Duration::seconds(i as i64));
    }

    let mut first = OrderDesk::new(&DeskConfig::default());
    for (i, step) in head.iter().enumerate() {
        apply(&mut first, step, t0() + Duration::seconds(i as i64));
    }
    let json = first.book().to_json().unwrap();

    let book = tradebook::OrderBook::from_json(&json).unwrap();
    let mut resumed = OrderDesk::with_book(&DeskConfig::default(), book);
    for (i, step) in tail.iter().enumerate() {
        let offset = (head.len() + i) as i64;
        apply(&mut resumed, step, t0() + Duration::seconds(offset));
    }

    assert_eq!(straight.book().fingerprint(), resumed.book().fingerprint());
}

#[test]
fn fifo_within_a_price_level() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut desk = OrderDesk::new(&DeskConfig::default());

    let sizes: Vec<u64> = (0..10).map(|_| rng.gen_range(1..=20)).collect();
    for (i, size) in sizes.iter().enumerate() {
        let ticket = OrderTicket::new("ABC1", "sell", *size, "10");
        desk.submit_order(&ticket, t0() + Duration::seconds(i as i64)).unwrap();
    }

    let total: u64 = sizes.iter().sum();
    let take = total / 2;
    let created = desk
        .submit_order(&OrderTicket::new("ABC1", "buy", take, "10"), t0() + Duration::hours(1))
        .unwrap();

    // fills walk the resting orders oldest first
    let filled_ids: Vec<u64> = created.transactions.iter().map(|t| t.order_id).collect();
    let expected: Vec<u64> = (1..=filled_ids.len() as u64).collect();
    assert_eq!(filled_ids, expected);
    assert_eq!(created.pending_quantity, 0);

    // everything before the last filled order is executed, everything after untouched
    let last = *filled_ids.last().unwrap();
    for order in desk.list_orders().iter().filter(|o| o.side == tradebook::Side::Sell) {
        if order.id < last {
            assert_eq!(order.status, OrderStatus::Executed);
        } else if order.id > last {
            assert_eq!(order.status, OrderStatus::Open);
        }
    }
}
