pub mod cli;
pub mod codec;
pub mod generate;
pub mod helpers;
