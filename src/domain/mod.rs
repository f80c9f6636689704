//! Domain types for a single checkout attempt and the ports the flow drives.

pub mod gateway;
pub mod outcome;
pub mod ports;
pub mod transaction;
