use std::io;

use tracing::{debug, info};

use crate::classifier::{CorpusStats, NaiveBayesClassifier};
use crate::error::Result;
use crate::helpers::format;
use crate::helpers::RowReader;

/// Train a classifier on a `tag`/`content` CSV corpus.
///
/// Writes the training summary to `out`. With `debug` set it also writes
/// every parsed post, the label priors and the per-label word likelihoods.
/// Posts lacking a label field count towards the totals but add no label.
pub fn train<R, W>(input: R, out: &mut W, debug: bool) -> Result<NaiveBayesClassifier>
where
    R: io::BufRead,
    W: io::Write,
{
    let mut reader = RowReader::new(input)?;
    let mut stats = CorpusStats::new();

    if debug {
        write!(out, "training data:")?;
    }

    for (index, row) in reader.rows().enumerate() {
        let row = row?;
        let label = row.label();
        let content = row.content();

        if label.is_none() {
            debug!(row = index + 1, "training row has no label field");
        }
        if debug {
            if let Some(label) = label {
                write!(out, "\n  label = {label}, content = ")?;
            }
            if let Some(content) = content {
                write!(out, "{content}")?;
            }
        }

        stats.observe(label, content);
    }

    if debug {
        writeln!(out)?;
    }
    writeln!(out, "trained on {} examples", stats.total_posts())?;
    if debug {
        writeln!(out, "vocabulary size = {}", stats.vocab_size())?;
        writeln!(out)?;
    }

    info!(
        posts = stats.total_posts(),
        vocab = stats.vocab_size(),
        "training complete"
    );

    let classifier = NaiveBayesClassifier::new(stats);
    if debug {
        write_parameters(&classifier, out)?;
    }

    Ok(classifier)
}

/// Write each label's prior and each seen `(label, word)` likelihood.
pub fn write_parameters<W: io::Write>(
    classifier: &NaiveBayesClassifier,
    out: &mut W,
) -> Result<()> {
    let stats = classifier.stats();

    write!(out, "classes:")?;
    for (label, count) in stats.labels() {
        write!(
            out,
            "\n  {label}, {} examples, log-prior = {}",
            format::count(count),
            format::log(classifier.log_prior(label))
        )?;
    }

    write!(out, "\nclassifier parameters:")?;
    for (label, word, count) in stats.label_words() {
        write!(
            out,
            "\n  {label}:{word}, count = {}, log-likelihood = {}",
            format::count(count),
            format::log(classifier.log_likelihood(label, word))
        )?;
    }
    writeln!(out)?;

    Ok(())
}
