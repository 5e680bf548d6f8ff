//! Behavioral specifications for the weir lock manager.
//!
//! These tests are black-box: they exercise the public API of weir-coord
//! and weir-lock only, over the in-process store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/exclusion.rs"]
mod exclusion;
#[path = "specs/liveness.rs"]
mod liveness;
#[path = "specs/vector.rs"]
mod vector;
