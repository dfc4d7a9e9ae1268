//! HTTP request handlers

pub mod account;
pub mod health;
pub mod helps;
pub mod schools;
