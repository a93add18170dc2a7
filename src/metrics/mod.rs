pub mod manager;
pub mod traits;
pub mod value;
