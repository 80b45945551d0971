//! Relays the outcome of an external analysis into the stores and the
//! session's push channel.

pub mod outcome;
