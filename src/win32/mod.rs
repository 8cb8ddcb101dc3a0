//! Win32-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`DisplayPlatform`](crate::traits::DisplayPlatform) trait, built on
//! `user32` display and cursor APIs.
//!
//! Nothing outside this module should reference Win32 directly.

pub mod platform;
