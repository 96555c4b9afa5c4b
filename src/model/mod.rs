//! Model layer - state types shared by components and services
//!
//! - `catalog` - The fixed set of browsable tables
//! - `table_data` - Rows fetched from the backend
//! - `modal` - Modal overlay management

pub mod catalog;
pub mod modal;
pub mod table_data;

pub use catalog::{TableDescriptor, TableId, CATALOG};
pub use modal::{Modal, ModalStack};
pub use table_data::{FetchState, TableData};
