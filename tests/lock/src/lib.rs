//! Shared fixtures for the lock tests and the `transcript_fixture` binary.
