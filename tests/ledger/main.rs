//! Ledger integration tests: stock derivation and movement recording
//! against the in-memory store.
