use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Document frequency statistics gathered from a training corpus.
///
/// Every counter counts documents, not occurrences: a word repeated inside
/// one post is counted once for that post.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    total_posts: u64,
    vocab_size: u64,
    label_counts: BTreeMap<String, u64>,
    word_doc_counts: HashMap<String, u64>,
    label_word_doc_counts: BTreeMap<String, BTreeMap<String, u64>>,
}

impl CorpusStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one training post.
    ///
    /// A post without content still counts towards the totals and its
    /// label, but adds no words. A post without a label counts towards the
    /// totals and the word counts only, so no label is ever invented.
    pub fn observe(&mut self, label: Option<&str>, content: Option<&str>) {
        if let Some(label) = label {
            *self.label_counts.entry(label.to_owned()).or_default() += 1;
        }

        if let Some(content) = content {
            let words = tokenize(content);

            for &word in &words {
                let count = self.word_doc_counts.entry(word.to_owned()).or_default();
                *count += 1;
                if *count == 1 {
                    self.vocab_size += 1;
                }
            }

            if let Some(label) = label.filter(|_| !words.is_empty()) {
                let label_words = self
                    .label_word_doc_counts
                    .entry(label.to_owned())
                    .or_default();
                for word in words {
                    *label_words.entry(word.to_owned()).or_default() += 1;
                }
            }
        }

        self.total_posts += 1;
    }

    pub fn total_posts(&self) -> u64 {
        self.total_posts
    }

    pub fn vocab_size(&self) -> u64 {
        self.vocab_size
    }

    pub fn label_count(&self, label: &str) -> u64 {
        self.label_counts.get(label).copied().unwrap_or_default()
    }

    pub fn word_doc_count(&self, word: &str) -> u64 {
        self.word_doc_counts.get(word).copied().unwrap_or_default()
    }

    pub fn label_word_doc_count(&self, label: &str, word: &str) -> u64 {
        self.label_word_doc_counts
            .get(label)
            .and_then(|words| words.get(word))
            .copied()
            .unwrap_or_default()
    }

    /// Labels with their post counts, in label order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.label_counts
            .iter()
            .map(|(label, &count)| (label.as_str(), count))
    }

    /// `(label, word, posts)` triples, ordered by label then word.
    pub fn label_words(&self) -> impl Iterator<Item = (&str, &str, u64)> + '_ {
        self.label_word_doc_counts.iter().flat_map(|(label, words)| {
            words
                .iter()
                .map(move |(word, &count)| (label.as_str(), word.as_str(), count))
        })
    }
}

/// Label chosen for a post together with its log-probability score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<'a> {
    pub label: &'a str,
    pub log_probability: f64,
}

/// Multinomial Naive Bayes classifier over bag-of-words posts
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    stats: CorpusStats,
}

impl NaiveBayesClassifier {
    /// Freeze the gathered statistics into a classifier.
    pub fn new(stats: CorpusStats) -> Self {
        Self { stats }
    }

    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    /// Log of the share of training posts carrying `label`.
    ///
    /// Unseen labels give `-inf`, an empty corpus gives NaN.
    pub fn log_prior(&self, label: &str) -> f64 {
        (self.stats.label_count(label) as f64 / self.stats.total_posts as f64).ln()
    }

    /// Log-likelihood of `word` given `label`.
    ///
    /// Words never seen in training fall back to one post out of the corpus,
    /// words never seen with this label fall back to their corpus-wide post
    /// frequency, everything else uses the per-label frequency.
    pub fn log_likelihood(&self, label: &str, word: &str) -> f64 {
        let total_posts = self.stats.total_posts as f64;
        let word_posts = self.stats.word_doc_count(word);
        let label_word_posts = self.stats.label_word_doc_count(label, word);

        if word_posts == 0 {
            (1.0 / total_posts).ln()
        } else if label_word_posts == 0 {
            (word_posts as f64 / total_posts).ln()
        } else {
            (label_word_posts as f64 / self.stats.label_count(label) as f64).ln()
        }
    }

    /// Log-prior of `label` plus the log-likelihood of every word.
    pub fn log_probability<'w, I>(&self, label: &str, words: I) -> f64
    where
        I: IntoIterator<Item = &'w str>,
    {
        words
            .into_iter()
            .fold(self.log_prior(label), |acc, word| {
                acc + self.log_likelihood(label, word)
            })
    }

    /// Pick the most probable label for a set of unique words.
    pub fn classify(&self, words: &BTreeSet<&str>) -> Option<Scored<'_>> {
        self.best_label(|label| self.log_probability(label, words.iter().copied()))
    }

    /// Pick the label with the highest log-prior, ignoring any words.
    pub fn classify_by_prior(&self) -> Option<Scored<'_>> {
        self.best_label(|label| self.log_prior(label))
    }

    /// Labels are visited in order and only a strictly greater score replaces
    /// the current best, so the earliest label wins ties. Scores that do not
    /// exceed `f64::MIN` (`-inf`, NaN) never win.
    fn best_label<F>(&self, score: F) -> Option<Scored<'_>>
    where
        F: Fn(&str) -> f64,
    {
        let (best, _) = self.stats.labels().fold(
            (None, f64::MIN),
            |(best, best_score), (label, _)| {
                let log_probability = score(label);
                if log_probability > best_score {
                    (
                        Some(Scored {
                            label,
                            log_probability,
                        }),
                        log_probability,
                    )
                } else {
                    (best, best_score)
                }
            },
        );

        best
    }
}

/// Split content into its set of unique whitespace-delimited words.
///
/// Case and punctuation are kept as-is.
pub fn tokenize(content: &str) -> BTreeSet<&str> {
    content.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn train(posts: &[(&str, &str)]) -> NaiveBayesClassifier {
        let mut stats = CorpusStats::new();
        for &(label, content) in posts {
            stats.observe(Some(label), Some(content));
        }
        NaiveBayesClassifier::new(stats)
    }

    fn sports_and_news() -> NaiveBayesClassifier {
        train(&[("sports", "go team go"), ("news", "breaking news today")])
    }

    fn assert_close(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-12, "{left} != {right}");
    }

    #[test]
    fn test_tokenization() {
        let tokens = tokenize("  go team\tgo\nGo team! ");
        let expected: BTreeSet<&str> = ["go", "team", "Go", "team!"].into_iter().collect();
        assert_eq!(tokens, expected);
        assert_eq!(tokenize("go team go"), tokenize("go team go"));
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t ").is_empty());
    }

    #[test]
    fn test_corpus_stats() {
        let classifier = sports_and_news();
        let stats = classifier.stats();

        assert_eq!(stats.total_posts(), 2);
        assert_eq!(stats.vocab_size(), 5);
        assert_eq!(
            stats.labels().collect::<Vec<_>>(),
            vec![("news", 1), ("sports", 1)]
        );
        assert_eq!(stats.word_doc_count("go"), 1);
        assert_eq!(stats.label_word_doc_count("sports", "go"), 1);
        assert_eq!(stats.label_word_doc_count("news", "go"), 0);
        assert_eq!(stats.word_doc_count("missing"), 0);
    }

    #[test]
    fn test_vocab_counts_each_word_once() {
        let classifier = train(&[("a", "x y"), ("b", "x z"), ("a", "x x y")]);
        let stats = classifier.stats();

        assert_eq!(stats.total_posts(), 3);
        assert_eq!(stats.vocab_size(), 3);
        assert_eq!(stats.word_doc_count("x"), 3);
        assert_eq!(stats.word_doc_count("y"), 2);
        assert_eq!(stats.label_word_doc_count("a", "x"), 2);
        assert_eq!(
            stats.label_words().collect::<Vec<_>>(),
            vec![("a", "x", 2), ("a", "y", 2), ("b", "x", 1), ("b", "z", 1)]
        );
    }

    #[test]
    fn test_post_without_content() {
        let mut stats = CorpusStats::new();
        stats.observe(Some("a"), Some("hello"));
        stats.observe(Some("b"), None);
        stats.observe(Some("b"), Some(""));

        assert_eq!(stats.total_posts(), 3);
        assert_eq!(stats.label_count("b"), 2);
        assert_eq!(stats.vocab_size(), 1);
        assert_eq!(stats.label_words().count(), 1);
    }

    #[test]
    fn test_post_without_label() {
        let mut stats = CorpusStats::new();
        stats.observe(None, None);
        stats.observe(None, Some("x y"));
        stats.observe(Some("a"), Some("x"));

        assert_eq!(stats.total_posts(), 3);
        assert_eq!(stats.labels().collect::<Vec<_>>(), vec![("a", 1)]);
        assert_eq!(stats.label_count(""), 0);
        assert_eq!(stats.vocab_size(), 2);
        assert_eq!(stats.word_doc_count("x"), 2);
        assert_eq!(
            stats.label_words().collect::<Vec<_>>(),
            vec![("a", "x", 1)]
        );

        let classifier = NaiveBayesClassifier::new(stats);
        let scored = classifier.classify(&tokenize("")).unwrap();
        assert_eq!(scored.label, "a");
    }

    #[test]
    fn test_log_prior() {
        let classifier = train(&[("a", "x"), ("a", "y"), ("b", "z"), ("c", "w")]);

        assert_close(classifier.log_prior("a"), 0.5f64.ln());
        assert_close(classifier.log_prior("b"), 0.25f64.ln());
        assert_eq!(classifier.log_prior("unseen"), f64::NEG_INFINITY);
        assert!(NaiveBayesClassifier::new(CorpusStats::new())
            .log_prior("a")
            .is_nan());
    }

    #[test]
    fn test_log_likelihood_tiers() {
        let classifier = train(&[("a", "x y"), ("a", "x"), ("b", "y"), ("b", "z")]);

        // never seen in training
        assert_close(classifier.log_likelihood("a", "nope"), 0.25f64.ln());
        // seen, but never with this label
        assert_close(classifier.log_likelihood("b", "x"), 0.5f64.ln());
        assert_close(classifier.log_likelihood("a", "z"), 0.25f64.ln());
        // seen with this label
        assert_close(classifier.log_likelihood("a", "x"), 0.0);
        assert_close(classifier.log_likelihood("a", "y"), 0.5f64.ln());
        assert_close(classifier.log_likelihood("b", "z"), 0.5f64.ln());
    }

    #[test]
    fn test_log_probability() {
        let classifier = sports_and_news();
        let words = tokenize("go team");

        assert_close(
            classifier.log_probability("sports", words.iter().copied()),
            0.5f64.ln(),
        );
        assert_close(
            classifier.log_probability("news", words.iter().copied()),
            3.0 * 0.5f64.ln(),
        );
    }

    #[test]
    fn test_classify() {
        let classifier = sports_and_news();

        let scored = classifier.classify(&tokenize("go team")).unwrap();
        assert_eq!(scored.label, "sports");
        assert_close(scored.log_probability, 0.5f64.ln());

        let scored = classifier.classify(&tokenize("breaking today")).unwrap();
        assert_eq!(scored.label, "news");
    }

    #[test]
    fn test_classify_ties_pick_earliest_label() {
        let classifier = train(&[("beta", "x"), ("alpha", "y")]);

        let scored = classifier.classify(&tokenize("unseen")).unwrap();
        assert_eq!(scored.label, "alpha");

        let scored = classifier.classify_by_prior().unwrap();
        assert_eq!(scored.label, "alpha");
    }

    #[test]
    fn test_classify_by_prior() {
        let classifier = train(&[("a", "x"), ("b", "y"), ("b", "z")]);

        let scored = classifier.classify_by_prior().unwrap();
        assert_eq!(scored.label, "b");
        assert_close(scored.log_probability, (2.0f64 / 3.0).ln());
    }

    #[test]
    fn test_classify_untrained() {
        let classifier = NaiveBayesClassifier::new(CorpusStats::new());
        assert_eq!(classifier.classify(&tokenize("anything")), None);
        assert_eq!(classifier.classify_by_prior(), None);
    }
}
