//! H2 driver.
//!
//! - [`H2Dialect`]: capability table and type rules for H2 2.x

mod dialect;

pub use dialect::H2Dialect;
