pub mod board_read;
pub mod mapping_read;
