//! Criterion benchmarks for critique.
//!
//! Covers the stages a review goes through:
//! - Text analysis (cleaning, stopwords, stemming)
//! - Normalization into a padded id sequence
//! - Classification with a small embedding + LSTM model

use std::hint::black_box;
use std::sync::Arc;

use ahash::AHashMap;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use critique::analysis::analyzer::analyzer::Analyzer;
use critique::analysis::analyzer::review::ReviewAnalyzer;
use critique::config::MAX_LEN;
use critique::model::{
    Activation, Classifier, Dense, Embedding, Layer, Lstm, ModelArtifact, SequenceModel,
};
use critique::pipeline::SentimentPipeline;
use critique::sequence::Vocabulary;

const WORDS: &[&str] = &[
    "product", "amazing", "love", "waste", "money", "disappointed", "quality", "fast",
    "delivery", "satisfied", "broken", "cheap", "excellent", "recommend", "return",
    "battery", "screen", "price", "support", "terrible",
];

/// Generate review-like texts for benchmarking.
fn generate_reviews(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let len = 5 + i % 40;
            let body: Vec<&str> = (0..len).map(|j| WORDS[(i * 7 + j * 3) % WORDS.len()]).collect();
            format!("This {}! I would not buy it again.", body.join(" "))
        })
        .collect()
}

fn vocabulary() -> Vocabulary {
    let analyzer = ReviewAnalyzer::new().unwrap();
    let mut word_index = AHashMap::new();
    for word in WORDS {
        for token in analyzer.analyze(word).unwrap() {
            let next = word_index.len() as u32 + 1;
            word_index.entry(token.text).or_insert(next);
        }
    }
    Vocabulary::new(word_index).unwrap()
}

/// Deterministic pseudo-random weights.
fn weights(rows: usize, cols: usize, seed: usize) -> Vec<Vec<f32>> {
    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| (((r * 31 + c * 17 + seed) % 101) as f32 / 101.0 - 0.5) * 0.2)
                .collect()
        })
        .collect()
}

fn lstm_model(vocab_size: usize) -> SequenceModel {
    let (dim, units) = (16, 16);
    SequenceModel::new(ModelArtifact {
        name: Some("bench_lstm".to_string()),
        input_length: Some(MAX_LEN),
        layers: vec![
            Layer::Embedding(Embedding {
                weights: weights(vocab_size, dim, 1),
                mask_zero: true,
            }),
            Layer::Lstm(Lstm {
                units,
                kernel: weights(dim, 4 * units, 2),
                recurrent_kernel: weights(units, 4 * units, 3),
                bias: vec![0.0; 4 * units],
                activation: Activation::Tanh,
                recurrent_activation: Activation::Sigmoid,
                return_sequences: false,
            }),
            Layer::Dense(Dense {
                kernel: weights(units, 1, 4),
                bias: vec![0.0],
                activation: Activation::Sigmoid,
            }),
        ],
    })
    .unwrap()
}

fn bench_analysis(c: &mut Criterion) {
    let analyzer = ReviewAnalyzer::new().unwrap();
    let reviews = generate_reviews(100);
    let total_bytes: usize = reviews.iter().map(|r| r.len()).sum();

    let mut group = c.benchmark_group("analysis");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.bench_function("review_analyzer", |b| {
        b.iter(|| {
            for review in &reviews {
                let tokens: Vec<_> = analyzer.analyze(black_box(review)).unwrap().collect();
                black_box(tokens);
            }
        })
    });
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let vocabulary = vocabulary();
    let model = lstm_model(vocabulary.max_index() as usize + 1);
    let pipeline = SentimentPipeline::builder()
        .vocabulary(Arc::new(vocabulary))
        .classifier(Arc::new(model.clone()))
        .build()
        .unwrap();
    let reviews = generate_reviews(100);

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(reviews.len() as u64));
    group.bench_function("normalize", |b| {
        b.iter(|| {
            for review in &reviews {
                black_box(pipeline.normalize(black_box(review)).unwrap());
            }
        })
    });

    let sequences: Vec<_> = reviews
        .iter()
        .map(|review| pipeline.normalize(review).unwrap())
        .collect();
    group.bench_function("lstm_predict", |b| {
        b.iter(|| {
            for sequence in &sequences {
                black_box(model.predict(black_box(sequence)).unwrap());
            }
        })
    });

    group.bench_function("analyze", |b| {
        b.iter(|| {
            for review in &reviews {
                black_box(pipeline.analyze(black_box(review)).unwrap());
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_analysis, bench_pipeline);
criterion_main!(benches);
