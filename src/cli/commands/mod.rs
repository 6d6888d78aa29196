pub mod function;
pub mod gateway;

pub use function::{FunctionCommands, FunctionSubcommands, function_command};
pub use gateway::gateway_command;
