pub mod claude_code;

pub use claude_code::SubprocessActor;
