pub mod catalog;
pub mod chat;
pub mod night;
pub mod player;
pub mod role;
pub mod room;
