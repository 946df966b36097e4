//! Security subsystem.
//!
//! The shell server has no authentication surface; hardening is limited to
//! response headers.

pub mod headers;
