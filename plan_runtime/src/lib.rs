//! Caller-side helpers for Plan72.
//!
//! Re-exports the data contracts from `plan_schema` and adds the pieces that
//! sit between a user surface and the compiler (text parsing of codes and
//! resource nodes, the stored-profile codec) without pulling in `plan_core`.

mod input_text;
mod profile;

pub use input_text::{
    parse_coordinate, parse_level, parse_moment, parse_resource_node, parse_scenarios,
    InputParseError,
};
pub use plan_schema::*;
pub use profile::{ProfileError, SavedProfile};
