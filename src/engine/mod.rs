pub mod actions;
pub mod assign;
pub mod phase;
pub mod resolve;
pub mod win;
