//! Flutter-facing bindings over `taskpad_core`.

pub mod api;
