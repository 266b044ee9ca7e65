pub mod domain;
pub mod error;
pub mod protocol;

#[cfg(test)]
#[path = "tests/wire_tests.rs"]
mod tests;
