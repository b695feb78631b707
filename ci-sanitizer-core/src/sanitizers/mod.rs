//! Rule compilation for the sanitization engine.
//!
//! `compiler` turns the ordered rule list into a shared, read-only
//! [`CompiledRules`](compiler::CompiledRules) set whose patterns are compiled
//! on first use and cached for the lifetime of the sanitizer.

pub mod compiler;
