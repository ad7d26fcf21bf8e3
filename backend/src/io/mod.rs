//! # IO Module
//!
//! Boundary between the record store adapter and the domain layer. Records
//! arrive as loosely typed DTOs (string amounts, JSON item payloads, textual
//! dates) and leave this layer as validated domain models.

pub mod mappers;
