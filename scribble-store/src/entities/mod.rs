pub mod prelude;
pub mod records;
