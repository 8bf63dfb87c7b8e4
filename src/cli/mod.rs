pub mod clean;
pub mod list;
pub mod version;

pub use clean::CleanArgs;
pub use list::ListArgs;
