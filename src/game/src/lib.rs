pub mod entrypoint;

pub mod service {
    pub mod player_input;
    pub mod scoreboard;
    pub mod session;
}
