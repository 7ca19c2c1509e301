//! Shared utilities: builder contract validation.

pub mod validation;

pub use validation::validate_network;
