use textsim::{PrunePolicy, TermDictionary, TfIdfCorpus};

/// Tokenization is external to the library; a demo-grade splitter is enough.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

fn main() -> textsim::Result<()> {
    let quotes = [
        "Life is about making an impact, not making an income.",
        "Whatever the mind of man can conceive and believe, it can achieve.",
        "Strive not to be a success, but rather to be of value.",
        "I attribute my success to this: I never gave or took any excuse.",
        "You miss 100 percent of the shots you don't take.",
        "The most difficult thing is the decision to act, the rest is merely tenacity.",
        "Every strike brings me closer to the next home run.",
        "Definiteness of purpose is the starting point of all achievement.",
    ];

    // vectorize each document and store it in the corpus
    let mut dict = TermDictionary::new();
    let mut corpus = TfIdfCorpus::with_policy(PrunePolicy {
        min_doc_freq: 0,
        max_doc_ratio: 0.20,
    });
    for (doc_id, quote) in quotes.iter().enumerate() {
        let tf = dict.vectorize(&tokenize(quote), true);
        corpus.add_doc(doc_id as u64, tf);
    }

    let stats = corpus.train();

    let mut stop_words: Vec<&str> = stats
        .removed_terms
        .iter()
        .filter_map(|term| dict.word(term.id))
        .collect();
    stop_words.sort_unstable();

    println!("documents:          {}", stats.document_count);
    println!("surviving terms:    {}", stats.distinct_term_count);
    println!("pruned stop words:  {:?}", stop_words);

    // rank the corpus against a free-text query
    let query = dict.vectorize(&tokenize("the decision to take a shot"), false);
    println!("\nranked results for \"the decision to take a shot\":");
    for hit in corpus.similar_docs(&query)? {
        println!("  [{:>5.3}] {}", hit.score, quotes[hit.doc_id as usize]);
    }

    Ok(())
}
