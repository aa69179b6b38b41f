//! Integration tests for the edge-aware tone manipulation engines.
//!
//! These exercise interaction between crates rather than a single module
//! in isolation: bilateral grid against the Lab conversion it is normally
//! fed through, the heal solver against a bilateral-smoothed source, and
//! retouch's wavelet/shape pipeline end to end against the scenarios in
//! the tone-manipulation spec (identity retouch, constant fill, clone
//! translate).
