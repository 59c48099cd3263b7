pub mod prompt;

pub use prompt::PinPrompt;
