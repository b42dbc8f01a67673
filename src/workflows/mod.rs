pub mod batch;
pub mod display;
pub mod matchers;
pub mod prompt;
pub mod session;
