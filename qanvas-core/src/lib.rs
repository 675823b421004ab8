//! Qanvas Core
//!
//! Core types and abstractions for the Qanvas rendering-service client.
//!
//! This crate contains:
//! - Domain types: job kinds, tickets, lifecycle status and the timeout policy
//! - DTOs: the payloads submitted to the rendering service

pub mod domain;
pub mod dto;
