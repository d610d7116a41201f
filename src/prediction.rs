use std::io;

use tracing::{debug, info};

use crate::classifier::{tokenize, NaiveBayesClassifier, Scored};
use crate::error::Result;
use crate::helpers::format;
use crate::helpers::{Row, RowReader};

/// Tally of correct predictions over a test corpus
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Performance {
    pub correct: u64,
    pub total: u64,
}

impl Performance {
    /// Share of posts predicted correctly, NaN for an empty corpus.
    pub fn accuracy(&self) -> f64 {
        self.correct as f64 / self.total as f64
    }
}

/// Predict the label of every post in a `tag`/`content` CSV corpus.
///
/// Writes one block per post with the expected label, the prediction, its
/// score and the content, followed by the overall performance line.
pub fn predict<R, W>(
    classifier: &NaiveBayesClassifier,
    input: R,
    out: &mut W,
) -> Result<Performance>
where
    R: io::BufRead,
    W: io::Write,
{
    let mut reader = RowReader::new(input)?;
    let mut performance = Performance::default();

    write!(out, "\ntest data:")?;

    for row in reader.rows() {
        let row = row?;
        let truth = row.label();
        if let Some(truth) = truth {
            write!(out, "\n  correct = {truth}, ")?;
        }

        let predicted = predict_row(classifier, &row);
        let (label, score) = predicted
            .map(|scored| (scored.label, scored.log_probability))
            .unwrap_or(("", f64::MIN));

        write!(
            out,
            "predicted = {label}, log-probability score = {}\n  content = {}\n",
            format::log(score),
            row.content().unwrap_or_default()
        )?;

        if predicted.is_some() && truth == Some(label) {
            performance.correct += 1;
        }
        performance.total += 1;
    }

    write!(
        out,
        "\nperformance: {} / {} posts predicted correctly\n",
        performance.correct, performance.total
    )?;

    info!(
        correct = performance.correct,
        total = performance.total,
        "prediction complete"
    );

    Ok(performance)
}

/// A blank line or a row holding a single field carries no content, so only
/// the label priors decide.
fn predict_row<'c>(classifier: &'c NaiveBayesClassifier, row: &Row) -> Option<Scored<'c>> {
    match row.content() {
        Some(content) if row.field_count() > 1 => classifier.classify(&tokenize(content)),
        _ => {
            debug!(
                fields = row.field_count(),
                "scoring row by label prior only"
            );
            classifier.classify_by_prior()
        }
    }
}
