//! Typed domain separators for crate-internal hashing.
//!
//! Every domain-separated digest MUST select a domain via [`HashDomain`].
//! This module is the single authority for domain-separator byte strings.
//! Adding a new domain is a single change here: the enum, `as_bytes()`,
//! `ALL`, and `Display` are all generated from the same macro invocation.
//!
//! Wire digests (round hash, chain seed, envelope hash, terminal seal) are
//! NOT domain-separated: they are plain SHA-256 over canonical bytes so that
//! independent implementations agree bit-for-bit. See [`super::hash`].

/// Declares `HashDomain` enum, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`super::hash::canonical_hash`].
        ///
        /// Every variant maps to a unique, null-terminated byte string used as
        /// a SHA-256 prefix.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    // -----------------------------------------------------------------------
    // Resolver
    // -----------------------------------------------------------------------

    /// Constitution snapshot hashing (the rule-set identity on judgments).
    ConstitutionSnapshot => b"PACT::CONSTITUTION_SNAPSHOT::V1\0",

    /// Judgment digest (canonical judgment minus the digest field).
    JudgmentDigest => b"PACT::JUDGMENT_DIGEST::V1\0",

    // -----------------------------------------------------------------------
    // Passport
    // -----------------------------------------------------------------------

    /// Ledger configuration snapshot hashing.
    LedgerPolicy => b"PACT::LEDGER_POLICY::V1\0",

    /// Exported history row hashing.
    HistoryRow => b"PACT::HISTORY_ROW::V1\0",

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    /// Deterministic signing-key derivation for fixtures and tests.
    FixtureKey => b"PACT::FIXTURE_KEY::V1\0",
}
