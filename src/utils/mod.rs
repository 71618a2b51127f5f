pub mod daily;
pub mod game_state;
pub mod report;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod tile;
pub mod ui;
pub mod word;
pub mod word_list;
pub mod wordle;
