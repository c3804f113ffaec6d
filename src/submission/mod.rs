pub mod event;
pub mod notifier;
pub mod parser;

pub use event::{FormDataMap, FormSubmissionEvent, ItemResponse};
pub use notifier::{Outcome, SubmissionNotifier};
