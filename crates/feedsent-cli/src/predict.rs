//! Score a single comment from the command line.

use feedsent_core::AppConfig;
use feedsent_sentiment::{SentimentPipeline, StageTrace};

/// Load the pipeline from `config` and print the label for `comment`.
///
/// # Errors
///
/// Returns an error if the emoji table or classifier artifact cannot be loaded.
pub(crate) async fn run_predict(config: &AppConfig, comment: &str, trace: bool) -> anyhow::Result<()> {
    let pipeline = SentimentPipeline::from_config(config)?;
    let stages = pipeline.trace(comment).await;

    if trace {
        print!("{}", render_trace(&stages));
    } else {
        println!("{}", stages.sentiment);
    }
    Ok(())
}

pub(crate) fn render_trace(stages: &StageTrace) -> String {
    format!(
        "emoji score:     {:.4}\n\
         emoji sentiment: {}\n\
         normalized:      {:?}\n\
         translated:      {:?}\n\
         text sentiment:  {}\n\
         combined:        {}\n\
         model:           {}\n\
         final:           {}\n",
        stages.emoji_score,
        stages.emoji_sentiment,
        stages.normalized,
        stages.translated,
        stages.text_sentiment,
        stages.combined,
        stages.model_sentiment,
        stages.sentiment,
    )
}
