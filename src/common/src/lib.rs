pub mod error;
pub mod input;
pub mod utility;

pub mod model {
    pub mod game;
    pub mod messages;
}
