use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use weather_core::{Config, ForecastPipeline, PipelineState};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Daily weather forecast by city name")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the quiet period (ms) before a typed query is committed.
    #[arg(long, global = true)]
    pub debounce_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the forecast for a city.
    Show {
        /// City or place name. Prompted for when absent.
        city: Option<String>,

        /// Print the pipeline state as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Read queries from stdin, one per line, and re-render on every change.
    Watch,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = ms;
        }
        tracing::debug!(?config, "Loaded configuration");

        let pipeline =
            ForecastPipeline::from_config(&config).context("Failed to set up forecast client")?;

        match self.command {
            Command::Show { city, json } => {
                let city = match city {
                    Some(c) => c,
                    None => inquire::Text::new("City:").prompt().context("No city entered")?,
                };
                show(&pipeline, &city, json).await
            }
            Command::Watch => watch(pipeline).await,
        }
    }
}

async fn show(pipeline: &ForecastPipeline, city: &str, json: bool) -> anyhow::Result<()> {
    let state = pipeline.run_query(city).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", render(&state));
    }

    if let Some(message) = state.error_message() {
        bail!("Forecast lookup for '{city}' failed: {message}");
    }
    Ok(())
}

async fn watch(pipeline: ForecastPipeline) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    watch_lines(pipeline, stdin, std::io::stdout()).await?;
    Ok(())
}

/// Feed every input line to the pipeline and write each state change to
/// `out`. Returns `out` once the last query has settled and been written.
async fn watch_lines<R, W>(
    pipeline: ForecastPipeline,
    input: R,
    mut out: W,
) -> anyhow::Result<W>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    writeln!(out, "{}", render(&pipeline.state()))?;

    let mut rx = pipeline.subscribe();
    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            writeln!(out, "{}", render(&state))?;
        }
        Ok::<_, std::io::Error>(out)
    });

    let mut lines = input.lines();
    let mut last = None;
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        pipeline.set_query(line.clone());
        last = Some(line);
    }

    // Input closed, so the last line is settled: commit it without waiting
    // out the quiet period.
    if let Some(query) = last {
        pipeline.submit(query);
        pipeline
            .subscribe()
            .wait_for(|s| !matches!(s, PipelineState::Loading))
            .await
            .context("Forecast pipeline closed before the last query settled")?;
    }

    // Closing the state channel lets the printer drain the final state and stop.
    drop(pipeline);
    let out = printer
        .await
        .context("Printer task failed")?
        .context("Failed to write forecast")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use weather_core::{Coordinates, DailyRaw, ForecastClient, GeocodeClient, ProviderError};

    #[derive(Debug)]
    struct OnlyLondon;

    #[async_trait]
    impl GeocodeClient for OnlyLondon {
        async fn geocode(&self, name: &str) -> Result<Coordinates, ProviderError> {
            if name == "London" {
                Ok(Coordinates::new(51.5074, -0.1278))
            } else {
                Err(ProviderError::NotFound(name.to_string()))
            }
        }
    }

    #[derive(Debug)]
    struct SunnyDay;

    #[async_trait]
    impl ForecastClient for SunnyDay {
        async fn fetch_forecast(
            &self,
            _coords: Coordinates,
        ) -> Result<Vec<DailyRaw>, ProviderError> {
            let date = NaiveDate::from_ymd_opt(2024, 1, 15)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid date");
            Ok(vec![DailyRaw {
                date,
                max_temp: 8.5,
                min_temp: 2.0,
                wind_speed_max: 14.2,
                weather_code: 0,
            }])
        }
    }

    fn pipeline() -> ForecastPipeline {
        let config = Config { debounce_ms: 50, ..Config::default() };
        ForecastPipeline::new(Arc::new(OnlyLondon), Arc::new(SunnyDay), &config)
    }

    #[tokio::test(start_paused = true)]
    async fn watch_writes_the_final_forecast_before_returning() {
        let out = watch_lines(pipeline(), &b"Lon\nLondon\n"[..], Vec::new())
            .await
            .expect("watch");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.starts_with("Type a city name"));
        assert!(text.contains("Weather Forecast [clear]"));
        let last = text.lines().last().expect("output");
        assert!(last.starts_with("Monday 15 Jan"), "{last}");
        assert!(last.contains("Sunny"));
    }

    #[tokio::test(start_paused = true)]
    async fn watch_writes_the_final_error() {
        let out = watch_lines(pipeline(), &b"Nowhereville\n"[..], Vec::new())
            .await
            .expect("watch");
        let text = String::from_utf8(out).expect("utf8");

        assert_eq!(text.lines().last(), Some("Error: not found"));
    }

    #[tokio::test]
    async fn watch_without_input_returns_idle_prompt() {
        let out = watch_lines(pipeline(), &b""[..], Vec::new()).await.expect("watch");
        let text = String::from_utf8(out).expect("utf8");

        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["Type a city name to see its forecast."]);
    }
}
