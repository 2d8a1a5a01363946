mod error;
mod response;
mod traits;

pub use error::{FetchError, FetchStatus, Result};
pub use response::{decode_response, SourceResponse};
pub use traits::ArticleSource;
