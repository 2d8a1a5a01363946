mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::ArticleRepository;
pub use types::{batch_len, prepare_batch, RawBatch, RejectedItem};
