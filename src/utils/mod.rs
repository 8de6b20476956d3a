pub mod input;
pub mod timefmt;
