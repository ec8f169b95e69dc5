//! Cross-strategy tests of the public chunking entry point.

mod invariants;
