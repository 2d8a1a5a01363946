use std::collections::BTreeMap;

use crate::article::{ArticleError, Category, NewArticle, RawArticle};

/// Upstream items grouped by the category they were fetched for.
pub type RawBatch = BTreeMap<Category, Vec<RawArticle>>;

/// An item that could not be turned into a [`NewArticle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedItem {
    pub category: Category,
    pub index: usize,
    pub error: ArticleError,
}

/// Splits a batch into insertable articles and rejected items.
///
/// Order follows the batch: categories ascending, items as fetched.
pub fn prepare_batch(batch: &RawBatch) -> (Vec<NewArticle>, Vec<RejectedItem>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for (category, items) in batch {
        for (index, raw) in items.iter().enumerate() {
            match NewArticle::from_raw(*category, raw) {
                Ok(article) => accepted.push(article),
                Err(error) => rejected.push(RejectedItem {
                    category: *category,
                    index,
                    error,
                }),
            }
        }
    }

    (accepted, rejected)
}

/// Number of items across every category of a batch.
pub fn batch_len(batch: &RawBatch) -> usize {
    batch.values().map(Vec::len).sum()
}
