//! Forecast pipeline orchestration
//!
//! One request walks the stages strictly in order:
//! weather fetch, aggregation, prompt composition, completion, parsing.
//! The first failure ends the request; nothing partial is returned.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::aggregator;
use crate::config::SidekickConfig;
use crate::llm::{CompletionProvider, OpenAiClient, PromptComposer, ResponseParser};
use crate::models::ForecastResult;
use crate::weather::{OpenWeatherClient, WeatherProvider};
use crate::Result;

/// Pipeline progress, recorded on each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    WeatherFetched,
    Aggregated,
    PromptComposed,
    CompletionReceived,
    Parsed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Start => "start",
            PipelineStage::WeatherFetched => "weather_fetched",
            PipelineStage::Aggregated => "aggregated",
            PipelineStage::PromptComposed => "prompt_composed",
            PipelineStage::CompletionReceived => "completion_received",
            PipelineStage::Parsed => "parsed",
        };
        f.write_str(name)
    }
}

/// Runs the full location → structured forecast pipeline.
///
/// Holds only read-only collaborators, so one instance is shared by all
/// concurrent requests.
#[derive(Clone)]
pub struct ForecastService {
    weather: Arc<dyn WeatherProvider>,
    completion: Arc<dyn CompletionProvider>,
    composer: PromptComposer,
    parser: ResponseParser,
}

impl ForecastService {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        completion: Arc<dyn CompletionProvider>,
        composer: PromptComposer,
        parser: ResponseParser,
    ) -> Self {
        Self {
            weather,
            completion,
            composer,
            parser,
        }
    }

    /// Wire the production HTTP clients from validated configuration.
    pub fn from_config(config: &SidekickConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(OpenWeatherClient::new(&config.weather)?),
            Arc::new(OpenAiClient::new(&config.openai)?),
            PromptComposer::default(),
            ResponseParser::new()?,
        ))
    }

    #[instrument(skip(self))]
    pub async fn forecast(&self, location: &str) -> Result<ForecastResult> {
        let mut stage = PipelineStage::Start;
        let outcome = self.run(location, &mut stage).await;
        if let Err(err) = &outcome {
            warn!(last_stage = %stage, "Forecast pipeline failed: {}", err);
        }
        outcome
    }

    async fn run(&self, location: &str, stage: &mut PipelineStage) -> Result<ForecastResult> {
        let entries = self.weather.fetch(location).await?;
        advance(stage, PipelineStage::WeatherFetched);

        let weather_data = aggregator::aggregate(&entries);
        advance(stage, PipelineStage::Aggregated);
        debug!("Aggregated {} entries:\n{}", entries.len(), weather_data);

        let prompt = self.composer.compose(
            location,
            &weather_data,
            self.parser.format_instructions(),
        );
        advance(stage, PipelineStage::PromptComposed);

        let raw = self.completion.complete(&prompt).await?;
        advance(stage, PipelineStage::CompletionReceived);

        let result = self.parser.parse(&raw)?;
        advance(stage, PipelineStage::Parsed);
        info!("Forecast ready for {}", location);

        Ok(result)
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    debug!(from = %stage, to = %next, "Pipeline transition");
    *stage = next;
}
