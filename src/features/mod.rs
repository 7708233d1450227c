//! Feature routers registered by the shell at startup. Each module owns
//! its own routes; heavier analysis lives outside this crate.

pub mod customer;
pub mod inventory;
pub mod profit;
pub mod waste;
