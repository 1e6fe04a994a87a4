pub mod cli;
pub mod commands;
pub mod error;

pub mod core {
    pub mod classify;
    pub mod identity;
    pub mod scanner;
    pub mod variant;
}

pub mod store {
    pub mod catalog;
    pub mod json;
    pub mod memory;
    pub mod variant_store;
}

pub mod io {
    pub mod reject_writer;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
