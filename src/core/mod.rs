pub mod battle;
pub mod cues;
pub mod damage;
pub mod factory;
pub mod session;
pub mod state;
pub mod utils;
