use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use bioskills_core::{Config, QuizConfig, QuizSession, Renderer, SetLoader, UserInput};

use crate::render::{JsonRenderer, TextRenderer};

#[derive(Args)]
pub struct PlayArgs {
    /// Question set to start with (catalog id or resource name)
    #[arg(long)]
    set: Option<String>,
    /// Directory or base URL to load sets from
    #[arg(long)]
    source: Option<String>,
    /// Emit one JSON event per line instead of text
    #[arg(long)]
    json: bool,
    /// Advance automatically after a timeout
    #[arg(long)]
    auto_advance: bool,
}

/// Turn one line of player input into a session input.
///
/// Numbers pick an option by position; any other unrecognized text is taken
/// as the option text itself.
pub fn parse_input(line: &str) -> Option<UserInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" if rest.is_empty() => Some(UserInput::Quit),
        "n" | "next" if rest.is_empty() => Some(UserInput::Next),
        "r" | "restart" if rest.is_empty() => Some(UserInput::Restart),
        "s" | "switch" if !rest.is_empty() => Some(UserInput::SwitchSet(rest.to_string())),
        _ => match line.parse::<usize>() {
            Ok(number) => Some(UserInput::Choose(number)),
            Err(_) => Some(UserInput::Select(line.to_string())),
        },
    }
}

async fn read_input(tx: mpsc::UnboundedSender<UserInput>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(input) = parse_input(&line) else {
                    continue;
                };
                if tx.send(input).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read input");
                break;
            }
        }
    }
}

async fn play<R: Renderer>(
    loader: SetLoader,
    renderer: R,
    settings: QuizConfig,
    first_set: String,
    mut inputs: mpsc::UnboundedReceiver<UserInput>,
) {
    let mut session = QuizSession::new(loader, renderer, settings, first_set.clone());
    // A failed first load has already been rendered; the player can still
    // switch sets or quit.
    let _ = session.switch_set(&first_set).await;
    session.run(&mut inputs).await;
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut settings = config.quiz;
    if args.auto_advance {
        settings.auto_advance = true;
    }
    let source = args.source.unwrap_or(config.sets.source);
    let first_set = args.set.unwrap_or(config.sets.default_set);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let loader = SetLoader::new(&source);
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(read_input(tx));

        let stdout = std::io::stdout();
        if args.json {
            play(loader, JsonRenderer::new(stdout.lock()), settings, first_set, rx).await;
        } else {
            play(loader, TextRenderer::new(stdout.lock()), settings, first_set, rx).await;
        }
    });
    // Don't wait on a stdin read that may never finish.
    runtime.shutdown_background();
    Ok(())
}
