//! Built-in engines.

pub mod echo;

pub use echo::EchoEngine;
