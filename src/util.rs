//! Shared utility modules used across rankeval components.

pub mod varint;
