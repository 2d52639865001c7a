pub mod options;
pub mod reversal;
pub mod settings;
pub mod shared;
