//! Shared helpers for pact benchmark suites.

use pact_kernel::crypto::signature::{signing_key_from_label, SigningKey};
use pact_kernel::transcript::builder::{RoundDraft, TranscriptBuilder};
use pact_kernel::transcript::model::{Receipt, TranscriptV1};
use pact_kernel::transcript::round::RoundType;
use serde_json::json;

/// A message body shaped like a real offer, sized by `fields`.
#[must_use]
pub fn offer_message(fields: usize) -> serde_json::Value {
    let terms: serde_json::Map<String, serde_json::Value> = (0..fields)
        .map(|i| (format!("term_{i:04}"), json!({"value": i, "unit": "ms"})))
        .collect();
    json!({"service": "weather.forecast", "price": 2_500, "terms": terms})
}

/// A sealed, fulfilled transcript with `counter_rounds` COUNTER rounds
/// between the opening ASK and the closing ACCEPT.
///
/// # Panics
///
/// Panics if the builder rejects a round. Inputs are constant and
/// timestamps strictly increase, so setup failures are fatal.
#[must_use]
pub fn negotiation(counter_rounds: usize, message_fields: usize) -> TranscriptV1 {
    let buyer = signing_key_from_label("bench-buyer");
    let provider = signing_key_from_label("bench-provider");
    let mut b = TranscriptBuilder::new("bench", "intent-bench", 1_000);
    let mut ts = 1_000;
    let mut push = |b: &mut TranscriptBuilder, kind: RoundType, agent: &str, key: &SigningKey| {
        b.push(
            RoundDraft::new(kind, agent, ts, offer_message(message_fields)),
            key,
        )
        .unwrap();
        ts += 10;
    };

    push(&mut b, RoundType::Intent, "buyer", &buyer);
    push(&mut b, RoundType::Ask, "provider", &provider);
    for i in 0..counter_rounds {
        if i % 2 == 0 {
            push(&mut b, RoundType::Counter, "buyer", &buyer);
        } else {
            push(&mut b, RoundType::Counter, "provider", &provider);
        }
    }
    push(&mut b, RoundType::Accept, "buyer", &buyer);
    b.set_receipt(Receipt {
        receipt_id: "receipt-bench".into(),
        fulfilled: true,
        agreed_price: 2_500,
        paid_amount: 2_500,
        timestamp_ms: ts,
    });
    b.finish().unwrap()
}
