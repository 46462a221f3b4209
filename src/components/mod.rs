// mod.rs
pub mod common_data_bus;
pub mod functional_unit;
pub mod instruction;
pub mod memory;
pub mod register_file;
pub mod reservation_station;
