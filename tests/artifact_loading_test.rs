use std::fs;
use std::path::Path;

use tempfile::TempDir;

use critique::config::PipelineConfig;
use critique::error::{CritiqueError, Result};
use critique::model::{Activation, Classifier, Dense, Embedding, Layer, ModelArtifact, SequenceModel};
use critique::pipeline::{Label, SentimentPipeline};
use critique::sequence::{Normalizer, Vocabulary};

const MAX_LEN: usize = 5;

const KERAS_TOKENIZER: &str = r##"{
    "class_name": "Tokenizer",
    "config": {
        "num_words": null,
        "filters": "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n",
        "lower": true,
        "split": " ",
        "char_level": false,
        "oov_token": null,
        "document_count": 4,
        "word_index": "{\"love\": 1, \"amaz\": 2, \"product\": 3}"
    }
}"##;

/// Sums the embedded sequence: every known word pushes towards positive.
fn word_count_model() -> ModelArtifact {
    ModelArtifact {
        name: Some("word_count".to_string()),
        input_length: Some(MAX_LEN),
        layers: vec![
            Layer::Embedding(Embedding {
                weights: vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]],
                mask_zero: false,
            }),
            Layer::Dropout { rate: 0.2 },
            Layer::Flatten,
            Layer::Dense(Dense {
                kernel: vec![vec![1.0]; MAX_LEN],
                bias: vec![-0.5],
                activation: Activation::Sigmoid,
            }),
        ],
    }
}

fn write_config(dir: &Path, model: &Path, vocabulary: &Path) -> Result<PipelineConfig> {
    let config = PipelineConfig {
        model_path: model.to_path_buf(),
        vocabulary_path: vocabulary.to_path_buf(),
        max_len: MAX_LEN,
        ..PipelineConfig::default()
    };
    let path = dir.join("critique.json");
    fs::write(&path, serde_json::to_string_pretty(&config)?)?;
    PipelineConfig::from_file(&path)
}

#[test]
fn pipeline_loads_keras_tokenizer_and_json_model() -> Result<()> {
    let dir = TempDir::new()?;
    let vocabulary_path = dir.path().join("tokenizer.json");
    let model_path = dir.path().join("sentiment_model.json");
    fs::write(&vocabulary_path, KERAS_TOKENIZER)?;
    SequenceModel::new(word_count_model())?.save(&model_path)?;

    let config = write_config(dir.path(), &model_path, &vocabulary_path)?;
    let pipeline = SentimentPipeline::from_config(&config)?;

    assert_eq!(
        pipeline.normalize("This product is amazing, I love it!")?,
        vec![0, 0, 3, 2, 1]
    );

    let positive = pipeline.analyze("This product is amazing, I love it!")?;
    assert_eq!(positive.label, Label::Positive);
    assert!((positive.probability - 0.924_141_8).abs() < 1e-5);

    let negative = pipeline.analyze("asdkjh qweiop")?;
    assert_eq!(negative.label, Label::Negative);
    assert!((negative.probability - 0.377_540_7).abs() < 1e-5);
    assert!((negative.confidence - 0.622_459_3).abs() < 1e-5);
    Ok(())
}

#[test]
fn bincode_artifacts_load_like_json_ones() -> Result<()> {
    let dir = TempDir::new()?;
    let json_vocabulary = dir.path().join("tokenizer.json");
    let bin_vocabulary = dir.path().join("tokenizer.bin");
    let bin_model = dir.path().join("sentiment_model.bin");

    fs::write(&json_vocabulary, KERAS_TOKENIZER)?;
    let vocabulary = Vocabulary::from_file(&json_vocabulary)?;
    vocabulary.save(&bin_vocabulary)?;
    assert_eq!(Vocabulary::from_file(&bin_vocabulary)?, vocabulary);

    SequenceModel::new(word_count_model())?.save(&bin_model)?;
    let model = SequenceModel::from_file(&bin_model)?;
    assert_eq!(model.model_name(), "word_count");
    assert_eq!(model.input_length(), Some(MAX_LEN));

    let config = write_config(dir.path(), &bin_model, &bin_vocabulary)?;
    let pipeline = SentimentPipeline::from_config(&config)?;
    assert_eq!(pipeline.analyze("love love love")?.label, Label::Positive);
    Ok(())
}

#[test]
fn normalizer_needs_only_the_vocabulary() -> Result<()> {
    let dir = TempDir::new()?;
    let vocabulary_path = dir.path().join("vocab.json");
    let stopwords_path = dir.path().join("stopwords.txt");
    fs::write(&vocabulary_path, r#"{"love": 1, "product": 2, "thi": 3}"#)?;
    fs::write(&stopwords_path, "product\n")?;

    let config = PipelineConfig {
        vocabulary_path,
        stopwords_path: Some(stopwords_path),
        max_len: 4,
        ..PipelineConfig::default()
    };
    let normalizer = Normalizer::from_config(&config)?;
    assert_eq!(normalizer.normalize("This product, love it")?, vec![0, 0, 3, 1]);
    Ok(())
}

#[test]
fn missing_artifacts_fail_to_load() -> Result<()> {
    let dir = TempDir::new()?;
    let vocabulary_path = dir.path().join("tokenizer.json");
    fs::write(&vocabulary_path, KERAS_TOKENIZER)?;

    let config = PipelineConfig {
        model_path: dir.path().join("missing.json"),
        vocabulary_path,
        max_len: MAX_LEN,
        ..PipelineConfig::default()
    };
    let err = SentimentPipeline::from_config(&config).unwrap_err();
    assert!(matches!(err, CritiqueError::ModelLoad(_)));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("missing.json"));
    Ok(())
}

#[test]
fn corrupt_artifacts_fail_to_load() -> Result<()> {
    let dir = TempDir::new()?;
    let vocabulary_path = dir.path().join("tokenizer.json");
    let model_path = dir.path().join("model.bin");
    fs::write(&vocabulary_path, "{ not json")?;
    fs::write(&model_path, [0xde, 0xad, 0xbe, 0xef])?;

    assert!(matches!(
        Vocabulary::from_file(&vocabulary_path),
        Err(CritiqueError::ModelLoad(_))
    ));
    assert!(matches!(
        SequenceModel::from_file(&model_path),
        Err(CritiqueError::ModelLoad(_))
    ));
    Ok(())
}

#[test]
fn mismatched_artifacts_are_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let vocabulary_path = dir.path().join("tokenizer.json");
    let model_path = dir.path().join("sentiment_model.json");
    fs::write(&vocabulary_path, r#"{"love": 1, "amaz": 2, "product": 3, "extra": 9}"#)?;
    SequenceModel::new(word_count_model())?.save(&model_path)?;

    let config = PipelineConfig {
        model_path: model_path.clone(),
        vocabulary_path: vocabulary_path.clone(),
        max_len: MAX_LEN,
        ..PipelineConfig::default()
    };
    let err = SentimentPipeline::from_config(&config).unwrap_err();
    assert!(matches!(err, CritiqueError::ModelLoad(_)));

    fs::write(&vocabulary_path, KERAS_TOKENIZER)?;
    let config = PipelineConfig {
        model_path,
        vocabulary_path,
        max_len: MAX_LEN + 1,
        ..PipelineConfig::default()
    };
    let err = SentimentPipeline::from_config(&config).unwrap_err();
    assert!(matches!(err, CritiqueError::ModelLoad(_)));
    Ok(())
}
