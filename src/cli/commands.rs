//! Command implementations for the critique CLI.

use std::io::{self, BufRead};

use crate::cli::args::*;
use crate::cli::interactive::InteractiveSession;
use crate::cli::output::*;
use crate::error::{CritiqueError, Result};
use crate::pipeline::SentimentPipeline;
use crate::sequence::Normalizer;

/// Reviews used by `critique examples` and the interactive `:examples` command.
pub const EXAMPLE_REVIEWS: [&str; 4] = [
    "This product is amazing, I love it!",
    "Waste of money. Very disappointed.",
    "Good quality and fast delivery.",
    "Not satisfied with the product.",
];

/// Execute a CLI command.
pub fn execute_command(args: CritiqueArgs) -> Result<()> {
    match &args.command {
        Command::Analyze(analyze_args) => analyze(analyze_args.clone(), &args),
        Command::Normalize(normalize_args) => normalize(normalize_args.clone(), &args),
        Command::Examples => examples(&args),
        Command::Interactive => interactive(&args),
    }
}

/// Classify one review, rejecting blank input.
pub fn classify(pipeline: &SentimentPipeline, review: &str) -> Result<AnalysisResult> {
    if review.trim().is_empty() {
        return Err(CritiqueError::invalid_argument("Please enter a review!"));
    }

    let prediction = pipeline.analyze(review)?;
    Ok(AnalysisResult {
        review: review.to_string(),
        prediction,
    })
}

/// Load the pipeline described by the command line.
fn load_pipeline(cli_args: &CritiqueArgs) -> Result<SentimentPipeline> {
    let config = cli_args.pipeline_config()?;
    if cli_args.verbosity() > 1 {
        println!("Loading model from: {}", config.model_path.display());
        println!("Loading vocabulary from: {}", config.vocabulary_path.display());
    }
    SentimentPipeline::from_config(&config)
}

/// Classify the given text, or every non-blank line of standard input.
fn analyze(args: AnalyzeArgs, cli_args: &CritiqueArgs) -> Result<()> {
    let pipeline = load_pipeline(cli_args)?;

    match args.text {
        Some(text) => {
            let result = classify(&pipeline, &text)?;
            output_result(&format!("Review: {text}"), &result, cli_args)
        }
        None => {
            let stdin = io::stdin();
            let mut analyzed = 0;
            for line in stdin.lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let result = classify(&pipeline, &line)?;
                output_result(&format!("Review: {line}"), &result, cli_args)?;
                analyzed += 1;
            }
            log::info!("analyzed {analyzed} reviews from standard input");
            Ok(())
        }
    }
}

/// Show the token ids a review is turned into. Needs no model.
fn normalize(args: NormalizeArgs, cli_args: &CritiqueArgs) -> Result<()> {
    let config = cli_args.pipeline_config()?;
    let normalizer = Normalizer::from_config(&config)?;

    let words = if args.words {
        Some(normalizer.words(&args.text)?)
    } else {
        None
    };
    let tokens = normalizer.normalize(&args.text)?;

    output_result(
        &format!("Review: {}", args.text),
        &NormalizationResult {
            review: args.text,
            words,
            tokens,
        },
        cli_args,
    )
}

/// Classify the built-in example reviews.
fn examples(cli_args: &CritiqueArgs) -> Result<()> {
    let pipeline = load_pipeline(cli_args)?;

    for review in EXAMPLE_REVIEWS {
        let result = classify(&pipeline, review)?;
        output_result(&format!("Review: {review}"), &result, cli_args)?;
    }

    Ok(())
}

/// Run the interactive session on standard input and output.
fn interactive(cli_args: &CritiqueArgs) -> Result<()> {
    let pipeline = load_pipeline(cli_args)?;
    let mut session = InteractiveSession::new(pipeline);

    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout.lock())
}
