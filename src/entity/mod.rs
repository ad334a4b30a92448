pub mod actor;
pub mod ghost;
pub mod item;
pub mod manager;
pub mod personality;
pub mod player;
pub mod pts;
