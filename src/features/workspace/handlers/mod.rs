pub mod page_handler;

pub use page_handler::{index, select_file, upload_file};
