use std::{
    future::Future,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tubequiz_core::{
    ChatCompletionsClient, Provider, QuizSynthesizer, SynthesizerConfig, TranscriptAssembler,
    TranscriptConfig, YoutubeCaptions, format_quiz_readable, format_transcript_summary,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let whole = d.as_secs();
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Grok,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "tubequiz")]
#[command(about = "Turn a YouTube video's captions into a multiple-choice quiz")]
struct Cli {
    /// Video id or YouTube URL
    video: String,

    /// AI provider for quiz generation
    #[arg(short, long, default_value = "grok")]
    provider: CliProvider,

    /// Override the provider's default model
    #[arg(short, long)]
    model: Option<String>,

    /// Caption language to fetch (defaults to TUBEQUIZ_CAPTIONS_LANG or "en")
    #[arg(short, long)]
    lang: Option<String>,

    /// Print the quiz as a JSON array instead of Markdown
    #[arg(long)]
    json: bool,

    /// Print the assembled transcript before the quiz
    #[arg(long)]
    show_transcript: bool,

    /// Give up on a stage after this many seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Runs one stage under the caller-imposed deadline.
async fn with_deadline<T, E>(
    limit: Duration,
    stage: &str,
    fut: impl Future<Output = std::result::Result<T, E>>,
) -> Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| anyhow!("{stage} timed out after {}s", limit.as_secs()))?
        .with_context(|| format!("{stage} failed"))
}

async fn run(cli: Cli) -> Result<()> {
    let provider: Provider = cli.provider.into();
    let limit = Duration::from_secs(cli.timeout_secs);

    let mut transcript_config = TranscriptConfig::from_env();
    if let Some(lang) = cli.lang {
        transcript_config.language = lang;
    }

    let mut synth_config = SynthesizerConfig::from_env(provider);
    if let Some(model) = cli.model {
        synth_config = synth_config.with_model(model);
    }

    // Validate API key early
    synth_config.api_key()?;

    let assembler = TranscriptAssembler::with_config(YoutubeCaptions::new(), transcript_config);
    let synthesizer = QuizSynthesizer::new(ChatCompletionsClient::new(), synth_config);

    if !cli.json {
        println!(
            "\n{}  {}\n",
            style("tubequiz").cyan().bold(),
            style("Video Quiz Generator").dim()
        );
        println!("{}", style("─".repeat(60)).dim());
    }

    let total_start = Instant::now();

    // Step 1: Transcript
    let step_start = Instant::now();
    let spinner = (!cli.json).then(|| create_spinner("Fetching captions..."));
    let transcript = with_deadline(limit, "Transcript", assembler.get_transcript(&cli.video)).await;
    let transcript = match transcript {
        Ok(transcript) => transcript,
        Err(e) => {
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            return Err(e);
        }
    };
    if let Some(spinner) = spinner {
        spinner.finish_with_message(format!(
            "{} Transcript: {} {}",
            style("✓").green().bold(),
            style(format_transcript_summary(&transcript)).dim(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));
    }

    if cli.show_transcript && !cli.json {
        println!("\n{}\n", transcript.text);
    }

    // Step 2: Quiz
    let step_start = Instant::now();
    let spinner =
        (!cli.json).then(|| create_spinner(&format!("Generating quiz with {}...", provider.name())));
    let quiz = with_deadline(
        limit,
        "Quiz generation",
        synthesizer.synthesize_quiz(&transcript.text),
    )
    .await;
    let quiz = match quiz {
        Ok(quiz) => quiz,
        Err(e) => {
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            return Err(e);
        }
    };
    if let Some(spinner) = spinner {
        spinner.finish_with_message(format!(
            "{} Quiz generated ({}) {}",
            style("✓").green().bold(),
            provider.name(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&quiz)?);
        return Ok(());
    }

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );
    if quiz.is_fallback() {
        println!(
            "{} {}\n",
            style("Note:").yellow().bold(),
            style("the model reply could not be used, showing a generic quiz").dim()
        );
    }
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", format_quiz_readable(&quiz));

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        log::debug!("{e:?}");
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn minutes_are_not_rounded_up() {
        assert_eq!(format_duration(Duration::from_secs(170)), "2m 50s");
        assert_eq!(format_duration(Duration::from_millis(119_900)), "1m 59s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 0s");
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["tubequiz", "dQw4w9WgXcQ"]).unwrap();
        assert_eq!(cli.video, "dQw4w9WgXcQ");
        assert!(matches!(cli.provider, CliProvider::Grok));
        assert_eq!(cli.timeout_secs, 120);
        assert!(!cli.json);
    }

    #[test]
    fn cli_provider_flag() {
        let cli = Cli::try_parse_from(["tubequiz", "abc", "-p", "gemini", "--json"]).unwrap();
        assert_eq!(Provider::from(cli.provider), Provider::Gemini);
        assert!(cli.json);
    }

    #[tokio::test]
    async fn deadline_reports_stage_name() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, std::io::Error>(())
        };
        let err = with_deadline(Duration::from_millis(10), "Transcript", slow)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Transcript timed out"));
    }
}
