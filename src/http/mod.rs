//! HTTP protocol layer module
//!
//! Protocol-level plumbing shared by every handler variant: response
//! builders and content-type detection, decoupled from routing and
//! filesystem logic.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_200_response, build_404_response, build_500_response, build_502_response,
};
