//! Core domain models for rowstore.
//!
//! Values, rows, ordered column maps, and the two catalog records. These are
//! pure data types with no I/O of their own.

pub mod columns;
pub mod producer;
pub mod row;
pub mod value;
pub mod vehicle;

pub use columns::ColumnMap;
pub use producer::Producer;
pub use row::Row;
pub use value::Value;
pub use vehicle::VehicleModel;
