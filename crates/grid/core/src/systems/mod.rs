//! Pure turn-pipeline stages.
//!
//! Every system takes a snapshot by value and returns its successor. Systems
//! that act on behalf of one entity take its id as an extra argument.

mod collectible;
mod damage;
mod gc;
mod locked;
mod movement;
mod moving;
mod pathfinding;
mod portal;
mod position;
mod push;
pub mod status;
mod terminal;
mod tile;
mod trail;

pub use collectible::collectible_system;
pub use damage::damage_system;
pub use gc::garbage_collection_system;
pub use locked::unlock_system;
pub use movement::movement_system;
pub use moving::moving_system;
pub use pathfinding::{pathfinding_system, shortest_path_step, straight_line_step};
pub use portal::portal_system;
pub use position::position_system;
pub use push::push_system;
pub use status::{status_gc_system, status_tick_system};
pub use terminal::{lose_system, turn_system, win_system};
pub use tile::{tile_cost_system, tile_reward_system};
pub use trail::trail_system;

pub(crate) use trail::record_current;
