//! Core domain types
//!
//! This module contains the structures shared by the client library and the
//! command-line front end. None of them perform I/O.

pub mod job;
pub mod kind;
pub mod timeout;
