pub mod actor;
pub mod anim;
pub mod collision;
pub mod damage;
pub mod direction;
pub mod flags;
pub mod geom;
pub mod pickup;
pub mod sound;
pub mod status;
pub mod tile;
