pub mod debug;
pub mod grid;
pub mod level;
pub mod player;
pub mod ron;
pub mod settings;
