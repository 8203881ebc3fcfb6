pub mod damage;
pub mod event;
pub mod map;
pub mod movement;
pub mod pickup;
pub mod player;
pub mod registry;
pub mod step;
pub mod world;
