//! Watermark storage: category and thread read records.

mod models;
mod queries;

pub use models::{CategoryRead, ThreadRead};
pub(crate) use queries::{
    category_cutoffs, category_record, insert_thread_record, thread_record, thread_records,
    update_thread_record, upsert_category_record,
};
