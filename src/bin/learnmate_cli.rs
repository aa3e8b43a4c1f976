use dotenvy::dotenv;
use learnmate::config::ClientConfig;
use learnmate::export::PdfExporter;
use learnmate::models::{Difficulty, Mode};
use learnmate::progress::JsonFileProgressStore;
use learnmate::session::{HttpRelayClient, SessionController, SessionError, SubmitOutcome};
use learnmate::speech::{CaptureOutcome, UnsupportedRecognizer};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Commands:
  <topic>                 explain a topic (Get Help)
  /quiz [topic]           generate a quiz
  /flash [topic]          generate flashcards
  /help [topic]           explain a topic
  /difficulty <level>     Beginner | Intermediate | Advanced
  /speak                  dictate a topic
  /pdf                    download the last reply as a PDF
  /readme                 download the README as a PDF
  /history                show this session's Q&A log
  /stats                  show progress and topics
  /theme                  toggle dark mode
  /quit                   exit";

fn print_stats(controller: &SessionController) {
    let state = controller.state();
    println!("📊 Total Interactions: {}", state.progress.interaction_count);
    println!("🔥 Learning Streak: {}", state.streak_label());
    println!("🏷️  Topics Explored: {}", state.topic_tags.join(", "));
}

fn print_history(controller: &SessionController) {
    let history = &controller.state().history;
    if history.is_empty() {
        println!("No questions asked yet.");
        return;
    }
    println!("📚 Previous Q&A History");
    for record in history {
        println!();
        println!("Q: {}", record.question);
        println!("{}: ({})", record.mode().history_label(), record.difficulty);
        println!("{}", record.answer);
    }
}

async fn run_submit(controller: &mut SessionController, mode: Mode, topic: &str) {
    if !topic.is_empty() {
        controller.set_topic(topic);
    }
    let topic = controller.state().topic.clone();
    let difficulty = controller.state().difficulty;

    println!("⏳ Thinking...");
    match controller.submit(&topic, mode, difficulty).await {
        Ok(SubmitOutcome::Replied(reply)) => {
            println!();
            println!("{}", controller.state().reply_heading());
            println!("{}", reply);
        }
        Ok(SubmitOutcome::Failed(failure)) => println!("{}", failure.display_text()),
        Err(e) => eprintln!("❌ {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let config = ClientConfig::from_env();

    let mut controller = SessionController::new(
        Arc::new(HttpRelayClient::new(&config.server_url)),
        Arc::new(JsonFileProgressStore::new(config.progress_file.clone())),
        Arc::new(UnsupportedRecognizer),
        Arc::new(PdfExporter::new(config.export_dir.clone())),
    );

    let boot = controller.bootstrap(chrono::Local::now().date_naive());

    println!("📘 AI LearnMate");
    println!("==========================================");
    println!("✨ Your AI-powered personalized study buddy with quizzes, flashcards & progress tracking.");
    if let Some(tip) = controller.state().tip {
        println!("💡 Tip of the Day: {}", tip);
    }
    if boot.celebrate {
        println!("🎉🎉🎉 {}-day learning streak! Keep it up! 🎉🎉🎉", boot.progress.streak);
    }
    print_stats(&controller);
    println!();
    println!("{}", HELP);

    let stdin = io::stdin();
    loop {
        print!("\n[{}] > ", controller.state().difficulty);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" => break,
            "/quiz" => run_submit(&mut controller, Mode::Quiz, rest).await,
            "/flash" | "/flashcard" => run_submit(&mut controller, Mode::Flashcard, rest).await,
            "/help" if !rest.is_empty() => run_submit(&mut controller, Mode::Help, rest).await,
            "/help" | "/?" => println!("{}", HELP),
            "/difficulty" => match rest.parse::<Difficulty>() {
                Ok(difficulty) => {
                    controller.set_difficulty(difficulty);
                    println!("🧩 Difficulty set to {}", difficulty);
                }
                Err(e) => eprintln!("❌ {}", e),
            },
            "/speak" => match controller.start_voice_capture().await {
                Ok(CaptureOutcome::Transcript(text)) => println!("🎤 Heard: {}", text),
                Ok(CaptureOutcome::Failed) => println!("🎤 Didn't catch that."),
                Err(SessionError::SpeechUnsupported) => {
                    eprintln!("❌ Speech recognition is not supported in this terminal.")
                }
                Err(e) => eprintln!("❌ {}", e),
            },
            "/pdf" => match controller.export_reply() {
                Ok(path) => println!("📄 Saved {}", path.display()),
                Err(e) => eprintln!("❌ {}", e),
            },
            "/readme" => match controller.export_readme() {
                Ok(path) => println!("📘 Saved {}", path.display()),
                Err(e) => eprintln!("❌ {}", e),
            },
            "/history" => print_history(&controller),
            "/stats" => print_stats(&controller),
            "/theme" => {
                controller.toggle_theme();
                println!("{:?} mode on", controller.state().theme);
            }
            _ if command.starts_with('/') => eprintln!("❌ Unknown command: {}", command),
            _ => run_submit(&mut controller, Mode::Help, line).await,
        }
    }

    println!("👋 Keep learning!");
    Ok(())
}
