pub mod models;
pub mod saavn;

pub use models::*;
pub use saavn::*;
