//! chatbar library exports: the headless input bar model and the terminal demo

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;
