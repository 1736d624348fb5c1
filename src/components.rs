//! Reusable HTML components for page generation
//!
//! Maud component functions used when rendered markdown is emitted as a
//! standalone document rather than a fragment.

pub mod layout;
