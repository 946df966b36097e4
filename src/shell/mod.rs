//! The HTML shell page every server route answers with.
//!
//! The client application mounts into the shell and reads its route table from
//! the embedded JSON block, so the server and the browser agree on routes.

pub mod page;

pub use page::{ShellPage, ROUTES_ELEMENT_ID};
