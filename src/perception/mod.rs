pub mod stability;
pub mod trace;
pub mod traits;
pub mod types;
pub mod window;
