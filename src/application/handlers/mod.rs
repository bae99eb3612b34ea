//! Route handlers and lifecycle hooks served by the default route table.

mod command;
mod echo;
mod greeting;
mod keepalive;

pub use command::CommandHandler;
pub use echo::EchoHandler;
pub use greeting::GreetingHandler;
pub use keepalive::{KeepaliveHooks, KEEPALIVE_TIMER};
