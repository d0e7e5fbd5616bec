//! Procurement service: financial breakdowns for POs, change orders and
//! vendor invoices, and the per-vendor accounts-payable summary.

pub mod config;
pub mod engine;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
