pub mod app;
pub mod lyrics;
pub mod player;
pub mod remote;
pub mod session;
pub mod theme;
pub mod ui;
