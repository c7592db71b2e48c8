//! Command input collection
//!
//! Inputs are declared per command as an [`InputSpec`], filled from the
//! command line into an [`InputSet`], completed by [`interact`] and optionally
//! by [`lookup_choice`] from a human-readable fragment.

mod filter;
mod interact;
mod lookup;
mod set;
mod source;
mod spec;

pub use filter::{Filter, parse_approver_emails, parse_filters};
pub use interact::interact;
pub use lookup::lookup_choice;
pub use set::InputSet;
pub use source::Invocation;
pub use spec::{InputSpec, ValueFilter, input};
