pub mod model;
pub mod slug;

pub use model::{CreatePage, Page, PageStatus, PageSummary, PublishPage, SeoMeta, UpdatePage};
pub use slug::{generate_slug, validate_slug};
