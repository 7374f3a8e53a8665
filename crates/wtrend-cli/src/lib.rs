//! Interactive weather trend session over line-oriented input

pub mod render;

use chrono::{Datelike, Local, NaiveDate};
use std::future::Future;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};
use wtrend_archive::{ArchiveResult, CoveragePolicy, WeatherAnalyzer, WeatherReport};
use wtrend_config::{AppConfig, CoverageMode};
use wtrend_core::Location;
use wtrend_db::DbClient;
use wtrend_ingest::SyntheticGenerator;

/// Map configured coverage settings onto the backfill policy
pub fn coverage_policy(cfg: &AppConfig) -> CoveragePolicy {
    match cfg.coverage.mode {
        CoverageMode::Count => CoveragePolicy::MinimumCount(cfg.coverage.threshold),
        CoverageMode::EveryDay => CoveragePolicy::EveryElapsedDay,
    }
}

pub fn log_format(cfg: &AppConfig) -> wtrend_obs::LogFormat {
    match cfg.logging.format {
        wtrend_config::LogFormat::Plain => wtrend_obs::LogFormat::Plain,
        wtrend_config::LogFormat::Json => wtrend_obs::LogFormat::Json,
    }
}

/// What the user is looking at
#[derive(Debug)]
enum Screen {
    Input { error: Option<String> },
    Results(Box<WeatherReport>),
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `q` or end of input
    Quit,
    /// Shutdown signal while waiting or working
    Interrupted,
}

fn is_quit(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit")
}

/// One interactive session. The store is opened on the first submitted
/// location and reopened on the next submission if that failed.
pub struct Session {
    config: AppConfig,
    analyzer: Option<WeatherAnalyzer<DbClient>>,
    seed: Option<u64>,
    today: Option<NaiveDate>,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            analyzer: None,
            seed: None,
            today: None,
        }
    }

    /// Reproducible synthetic backfill
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Pin the analysis date instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn is_connected(&self) -> bool {
        self.analyzer.is_some()
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    async fn analyzer(&mut self) -> ArchiveResult<&mut WeatherAnalyzer<DbClient>> {
        let analyzer = match self.analyzer.take() {
            Some(analyzer) => analyzer,
            None => {
                let client = DbClient::open(&self.config.database.path).await?;
                let generator = match self.seed {
                    Some(seed) => SyntheticGenerator::seeded(seed),
                    None => SyntheticGenerator::from_entropy(),
                };
                let policy = coverage_policy(&self.config);
                info!(path = %self.config.database.path, ?policy, "Weather store ready");
                WeatherAnalyzer::connect(client, policy, generator).await?
            }
        };
        Ok(self.analyzer.insert(analyzer))
    }

    /// Analyze the current year for a typed location.
    /// Blank input is rejected before the store is touched.
    pub async fn submit(&mut self, raw_location: &str) -> ArchiveResult<WeatherReport> {
        let location = Location::parse(raw_location)?;
        let today = self.today();
        let analyzer = self.analyzer().await?;
        analyzer
            .analyze_year(location.as_str(), today.year(), today)
            .await
    }

    /// Drive the input and results screens until quit, end of input, or
    /// `shutdown` resolves. Pipeline errors go back to the input screen.
    pub async fn run<I, W, F>(mut self, input: I, out: &mut W, shutdown: F) -> io::Result<SessionEnd>
    where
        I: AsyncBufRead + Unpin,
        W: Write,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut lines = input.lines();
        let mut screen = Screen::Input { error: None };

        let end = loop {
            match &screen {
                Screen::Input { error } => write!(out, "{}", render::input_screen(error.as_deref()))?,
                Screen::Results(report) => write!(out, "{}", render::report(report))?,
            }
            out.flush()?;

            let line = tokio::select! {
                _ = &mut shutdown => break SessionEnd::Interrupted,
                line = lines.next_line() => line?,
            };
            let Some(line) = line else {
                break SessionEnd::Quit;
            };
            if is_quit(&line) {
                break SessionEnd::Quit;
            }

            screen = match screen {
                Screen::Results(_) => Screen::Input { error: None },
                Screen::Input { .. } => {
                    writeln!(out, "\n{}\n", render::LOADING)?;
                    out.flush()?;

                    let outcome = tokio::select! {
                        _ = &mut shutdown => None,
                        outcome = self.submit(&line) => Some(outcome),
                    };
                    match outcome {
                        None => break SessionEnd::Interrupted,
                        Some(Ok(report)) => Screen::Results(Box::new(report)),
                        Some(Err(e)) => {
                            warn!(error = %e, "Analysis failed");
                            Screen::Input {
                                error: Some(e.to_string()),
                            }
                        }
                    }
                }
            };
        };

        if end == SessionEnd::Quit {
            writeln!(out, "\n{}", render::GOODBYE)?;
            out.flush()?;
        }
        Ok(end)
    }
}
