//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers:
//! the analytical query batteries, threshold classification, card issuance,
//! and dealer ranking.

pub mod card_service;
pub mod customer_service;
pub mod dealer_service;
pub mod finance_service;
