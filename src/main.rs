use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use carevoice::engine::mock::{
    MockSynthesisEngine, ScriptedRecognition, ScriptedRecognitionEngine,
};
use carevoice::{
    AudioOutputManager, Intent, IntentRouter, ListenOutcome, SpeechRecognitionCascade,
    UtteranceRequest, VoiceConfig, VoiceSessionController, assistant,
};

/// CareVoice - voice interaction core for a health companion assistant
#[derive(Parser)]
#[command(name = "carevoice", version, about)]
struct Cli {
    /// Path to a TOML config overlay
    #[arg(short, long, env = "CAREVOICE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify text into a navigation/emotional action
    Classify {
        /// Text to classify
        text: String,
    },
    /// Speak text through the mock synthesis engine
    Speak {
        /// Text to speak
        #[arg(default_value = "您好！我是您的健康助手。")]
        text: String,

        /// Utterance language (BCP-47)
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Run a scripted voice session through the full pipeline
    Session {
        /// Transcripts the mock recognition engine should hear, in order
        transcripts: Vec<String>,

        /// Confidence reported for each transcript
        #[arg(long, default_value = "0.9")]
        confidence: f32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,carevoice=info",
        1 => "info,carevoice=debug",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli
        .config
        .map_or_else(VoiceConfig::default, |path| VoiceConfig::load(&path));

    match cli.command {
        Command::Classify { text } => {
            let router = IntentRouter::new();
            let matched = router.classify_detailed(&text);
            if let Some(rule) = matched.rule {
                tracing::debug!(rule = rule.name, "matched rule");
            }
            println!("{}", serde_json::to_string_pretty(&matched.intent)?);
            if let Intent::OpenAssistant { context } = &matched.intent {
                println!("reply: {}", assistant::caring_reply(context));
            }
        }

        Command::Speak { text, language } => {
            let engine = Arc::new(MockSynthesisEngine::new());
            let output = AudioOutputManager::with_settle_delay(engine, config.settle_delay);
            let mut request = UtteranceRequest::new(&text)
                .rate(config.rate)
                .volume(config.volume);
            if let Some(language) = language {
                request = request.language(language);
            }
            let outcome = output.speak(request).await?.finished().await;
            println!("{outcome:?}");
        }

        Command::Session {
            transcripts,
            confidence,
        } => {
            anyhow::ensure!(!transcripts.is_empty(), "at least one transcript is required");

            let synthesis = Arc::new(MockSynthesisEngine::new());
            let output = Arc::new(AudioOutputManager::with_settle_delay(
                synthesis,
                config.settle_delay,
            ));
            let recognition = Arc::new(ScriptedRecognitionEngine::new(
                transcripts
                    .into_iter()
                    .map(|t| ScriptedRecognition::result(t, confidence))
                    .collect(),
            ));
            let cascade = SpeechRecognitionCascade::with_config(
                recognition,
                Arc::clone(&output),
                config.cascade(),
            );
            let controller = VoiceSessionController::new(
                cascade,
                IntentRouter::new(),
                Arc::clone(&output),
                config.language_order.clone(),
            );

            match controller.start().await? {
                ListenOutcome::Recognized(attempt) if attempt.is_success() => {
                    println!("heard: {}", attempt.transcript.as_deref().unwrap_or_default());
                    let intent = controller.confirm()?;
                    println!("{}", serde_json::to_string_pretty(&intent)?);
                    if let Intent::OpenAssistant { context } = &intent {
                        println!("reply: {}", assistant::caring_reply(context));
                        println!("greeting: {}", assistant::arrival_greeting(0));
                    }
                }
                ListenOutcome::Recognized(attempt) => {
                    let error = attempt.error.map(|e| e.to_string()).unwrap_or_default();
                    println!("recognition failed: {error}");
                }
                ListenOutcome::Cancelled => println!("session cancelled"),
            }
        }
    }

    Ok(())
}
