pub mod dto;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;


pub use server::{router, start_server};
