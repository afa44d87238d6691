//! Terminal shape and party attribution.
//!
//! Parties are read off the signed rounds: the buyer signed round 0 (the
//! intent), the provider is the first signer with a different key. Only
//! rounds the verifier accepted are consulted.

use pact_kernel::transcript::model::{FailureCode, FailureEvent, Receipt, TranscriptV1};
use pact_kernel::transcript::round::{RoundType, RoundV1};

/// How a transcript ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalShape<'a> {
    Fulfilled(&'a Receipt),
    Unfulfilled(&'a Receipt),
    Failure(&'a FailureEvent),
    /// Both a receipt and a failure event.
    Conflicting {
        receipt: &'a Receipt,
        failure: &'a FailureEvent,
    },
    /// Neither: the negotiation stopped early.
    Open,
}

impl<'a> TerminalShape<'a> {
    #[must_use]
    pub fn of(transcript: &'a TranscriptV1) -> Self {
        match (&transcript.receipt, &transcript.failure_event) {
            (Some(receipt), Some(failure)) => Self::Conflicting { receipt, failure },
            (Some(receipt), None) if receipt.fulfilled => Self::Fulfilled(receipt),
            (Some(receipt), None) => Self::Unfulfilled(receipt),
            (None, Some(failure)) => Self::Failure(failure),
            (None, None) => Self::Open,
        }
    }
}

/// Which side a party is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Buyer,
    Provider,
}

/// Buyer and provider public keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parties<'a> {
    pub buyer: Option<&'a str>,
    pub provider: Option<&'a str>,
}

impl<'a> Parties<'a> {
    /// Identify parties from the given (verified) rounds.
    #[must_use]
    pub fn from_rounds(rounds: &'a [RoundV1]) -> Self {
        let Some(first) = rounds.first() else {
            return Self::default();
        };
        let buyer = first.public_key_b58.as_str();
        let provider = rounds
            .iter()
            .map(|r| r.public_key_b58.as_str())
            .find(|key| *key != buyer);
        Self {
            buyer: Some(buyer),
            provider,
        }
    }

    /// Side of the given key, if it is a party.
    #[must_use]
    pub fn side_of(&self, public_key_b58: &str) -> Option<Party> {
        if self.buyer == Some(public_key_b58) {
            Some(Party::Buyer)
        } else if self.provider == Some(public_key_b58) {
            Some(Party::Provider)
        } else {
            None
        }
    }
}

/// Who a failure event is attributed to, and on what evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// A party signed an `ABORT` round.
    Signed(Party),
    /// Only the event's `initiated_by` names the party.
    Claimed(Party),
    Unattributable,
}

/// Attribute an `ABORTED_POLICY` failure.
///
/// A signed `ABORT` round outranks the event's `initiated_by` claim. The
/// last `ABORT` round by a party wins.
#[must_use]
pub fn attribute_abort(rounds: &[RoundV1], event: &FailureEvent, parties: &Parties<'_>) -> Attribution {
    debug_assert_eq!(event.code, FailureCode::AbortedPolicy);
    let signed = rounds
        .iter()
        .rev()
        .filter(|r| r.round_type == RoundType::Abort)
        .find_map(|r| parties.side_of(&r.public_key_b58));
    if let Some(party) = signed {
        return Attribution::Signed(party);
    }
    match event
        .initiated_by
        .as_deref()
        .and_then(|key| parties.side_of(key))
    {
        Some(party) => Attribution::Claimed(party),
        None => Attribution::Unattributable,
    }
}
