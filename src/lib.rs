//! Multinomial Naive Bayes classification of short text posts.
//!
//! A [`NaiveBayesClassifier`] is trained from a `tag`/`content` CSV corpus
//! with [`train`], then scores another corpus with [`predict`]. Both write a
//! human-readable report to the given sink.

pub mod classifier;
pub mod error;
pub mod helpers;
pub mod prediction;
pub mod training;

pub use classifier::{tokenize, CorpusStats, NaiveBayesClassifier, Scored};
pub use error::{Error, Result};
pub use prediction::{predict, Performance};
pub use training::train;
