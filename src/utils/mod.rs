//! Small shared helpers used by more than one validator.

pub mod time;
