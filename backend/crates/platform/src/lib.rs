//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, SHA-1 signatures)
//! - Password hashing (Argon2id)
//! - JWT signing and verification
//! - Cookie and bearer credential handling
//! - Upload staging and the remote media host client

pub mod cookie;
pub mod crypto;
pub mod jwt;
pub mod media;
pub mod password;
