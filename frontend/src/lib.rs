pub mod app;
pub mod command;
pub mod runtime;
pub mod view;

#[cfg(test)]
mod tests;

pub use app::{App, Command, Message};
pub use command::{parse, Input, HELP};
pub use runtime::Runtime;
pub use view::render;
