//! Tabular data model and the DataContext.

pub mod cell;
pub mod context;
pub mod table;

pub use cell::{Cell, DType};
pub use context::{DataContext, DataContextBuilder};
pub use table::{schema_is_equal, Column, RowView, Table};
