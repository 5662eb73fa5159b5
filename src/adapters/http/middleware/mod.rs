//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `function_key` - Function-level key check for the function host

pub mod function_key;

pub use function_key::{
    function_key_middleware, FunctionKeyRejection, FunctionKeyState, FUNCTION_KEY_HEADER,
    FUNCTION_KEY_QUERY,
};
