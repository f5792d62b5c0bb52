pub mod utils;

mod roster;
