//! CLI command implementations

pub mod json_output;
pub mod loop_cmd;
pub mod pack;
