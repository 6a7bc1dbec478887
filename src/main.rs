use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use std::{
    error::Error,
    io::{self, Write},
    path::PathBuf,
    thread,
    time::Duration,
};
use times_tables::{
    config::{Config, ConfigStore, FileConfigStore},
    game::{Difficulty, GameMode, GameSettings},
    progress::ProgressStore,
    results::{pair_label, ResultsSummary},
    runtime::{FixedTicker, GameEvent, Runner, StdinEventSource},
    session::{Feedback, Game, GameResults},
    storage::{KeyValueStore, MemoryStore, SqliteStore},
    util::{format_time, parse_answer, progress_bar},
};
use tracing_subscriber::EnvFilter;

/// Labels for multiple-choice options
const CHOICE_LABELS: [char; 3] = ['a', 'b', 'c'];

/// Countdown values that get a reminder line
const TIME_WARNINGS: [u32; 2] = [30, 10];

/// practise your times tables in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Cli {
    /// progress database to use instead of the default location
    #[clap(long, global = true)]
    db: Option<PathBuf>,

    /// keep progress in memory only; nothing is saved
    #[clap(long, global = true)]
    ephemeral: bool,

    /// config file to use instead of the default location
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// play a game (default); options left out come from the last game
    Play(PlayArgs),
    /// show totals and the trickiest questions
    Stats,
    /// list recent games, newest first
    History {
        /// number of games to show
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// forget all progress, history and saved settings
    Reset,
}

#[derive(Args, Debug, Clone, Default)]
struct PlayArgs {
    /// tables to practise, e.g. 3,7,8
    #[clap(short, long, value_delimiter = ',', value_parser = clap::value_parser!(u32).range(0..=12))]
    tables: Vec<u32>,

    #[clap(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    #[clap(short, long, value_enum)]
    mode: Option<GameMode>,

    /// number of questions in questions mode
    #[clap(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    questions: Option<u32>,

    /// seconds on the clock in time mode
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    time_limit: Option<u32>,
}

impl PlayArgs {
    /// Overlay the flags that were given on top of the saved settings
    fn apply(self, mut settings: GameSettings) -> GameSettings {
        if !self.tables.is_empty() {
            settings.tables = self.tables.into_iter().collect();
        }
        if let Some(difficulty) = self.difficulty {
            settings.difficulty = difficulty;
        }
        if let Some(mode) = self.mode {
            settings.game_mode = mode;
        }
        if let Some(questions) = self.questions {
            settings.question_count = questions;
        }
        if let Some(time_limit) = self.time_limit {
            settings.time_limit = time_limit;
        }
        settings
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = config_store.load();
    init_logging(&config);

    let progress = ProgressStore::new(open_store(&cli, &config));
    let mut out = io::stdout().lock();

    match cli.command.unwrap_or(Command::Play(PlayArgs::default())) {
        Command::Play(args) => play(&progress, args, &config, &mut out),
        Command::Stats => print_stats(&progress, &mut out),
        Command::History { limit } => print_history(&progress, limit, &mut out),
        Command::Reset => {
            progress.reset()?;
            writeln!(out, "All progress cleared.")?;
            Ok(())
        }
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_store(cli: &Cli, config: &Config) -> Box<dyn KeyValueStore> {
    if cli.ephemeral {
        return Box::new(MemoryStore::new());
    }

    let Some(path) = cli.db.clone().or_else(|| config.resolved_db_path()) else {
        tracing::warn!("no location for the progress database; progress will not be saved");
        return Box::new(MemoryStore::new());
    };

    match SqliteStore::open(&path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot open progress database; progress will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

fn play<S: KeyValueStore, W: Write>(
    progress: &ProgressStore<S>,
    args: PlayArgs,
    config: &Config,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let settings = args.apply(progress.saved_settings()).normalized();
    let mut game = Game::new(settings, rand::thread_rng())?;
    progress.save_settings(game.settings());

    let runner = Runner::new(StdinEventSource::new(), FixedTicker::seconds());
    let feedback_delay = Duration::from_millis(config.feedback_delay_ms);

    print_intro(&game, progress, out)?;
    print_question(&game, out)?;

    loop {
        match runner.step() {
            GameEvent::Tick => {
                if game.on_tick() {
                    writeln!(out, "\nTime's up!")?;
                    break;
                }
                if let Some(remaining) = game.seconds_remaining() {
                    if TIME_WARNINGS.contains(&remaining) {
                        writeln!(out, "\n{} left!", format_time(remaining))?;
                        out.flush()?;
                    }
                }
            }
            GameEvent::Line(line) => {
                let line = line.trim();
                if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                    writeln!(out, "Bye!")?;
                    return Ok(());
                }

                let answer = read_answer(&game, line);
                let outcome = game.submit_answer(answer, progress)?;
                match outcome.feedback {
                    Feedback::Correct { message } => writeln!(out, "{message}")?,
                    Feedback::Incorrect { .. } => writeln!(
                        out,
                        "Not quite! {} = {}",
                        outcome.question, outcome.question.answer
                    )?,
                }
                out.flush()?;

                if outcome.finished {
                    break;
                }
                thread::sleep(feedback_delay);
                print_question(&game, out)?;
            }
            GameEvent::Closed => break,
        }
    }

    let results = game.finish(progress);
    let summary = ResultsSummary::build(&results, &progress.get_progress());
    print_results(&results, &summary, out)
}

/// Option letters pick a choice; anything else is read as a typed number
fn read_answer<R: rand::Rng>(game: &Game<R>, line: &str) -> Option<i64> {
    let mut chars = line.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let c = c.to_ascii_lowercase();
        if let Some(idx) = CHOICE_LABELS.iter().position(|l| *l == c) {
            return game.options().get(idx).map(|&option| i64::from(option));
        }
    }
    parse_answer(line)
}

fn print_intro<S: KeyValueStore, R: rand::Rng, W: Write>(
    game: &Game<R>,
    progress: &ProgressStore<S>,
    out: &mut W,
) -> io::Result<()> {
    let settings = game.settings();
    writeln!(out, "Times Tables Challenge")?;

    let stats = progress.get_total_stats();
    if stats.total_games > 0 {
        writeln!(
            out,
            "You've played {} games and answered {} questions correctly!",
            stats.total_games, stats.total_correct
        )?;
    }

    let tables = settings.tables.iter().join(", ");
    match settings.game_mode {
        GameMode::Questions => writeln!(
            out,
            "Tables {tables} | {} | {} questions",
            settings.difficulty, settings.question_count
        )?,
        GameMode::Time => writeln!(
            out,
            "Tables {tables} | {} | {} on the clock",
            settings.difficulty,
            format_time(settings.time_limit)
        )?,
    }
    if settings.difficulty.is_multiple_choice() {
        writeln!(out, "Pick a, b or c (or type the answer). q quits.")?;
    } else {
        writeln!(out, "Type your answer. q quits.")?;
    }
    Ok(())
}

fn print_question<R: rand::Rng, W: Write>(game: &Game<R>, out: &mut W) -> io::Result<()> {
    let Some(question) = game.current_question() else {
        return Ok(());
    };
    let settings = game.settings();

    let position = match (settings.game_mode, game.seconds_remaining()) {
        (GameMode::Time, Some(remaining)) => format_time(remaining),
        _ => format!("{} / {}", game.question_number(), settings.question_count),
    };
    writeln!(
        out,
        "\n{} {position}  score {}",
        progress_bar(game.progress_fraction(), 20),
        game.score()
    )?;
    writeln!(out, "{question} = ?")?;

    if !game.options().is_empty() {
        let choices = game
            .options()
            .iter()
            .zip(CHOICE_LABELS)
            .map(|(option, label)| format!("{label}) {option}"))
            .join("   ");
        writeln!(out, "{choices}")?;
    }
    write!(out, "> ")?;
    out.flush()
}

fn print_results<W: Write>(
    results: &GameResults,
    summary: &ResultsSummary,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    writeln!(out, "\n{}/{}  ({}% correct)", summary.score, summary.total, summary.percentage)?;
    writeln!(out, "{}", summary.message)?;

    if !summary.improved.is_empty() {
        writeln!(out, "\nYou've improved! These were tricky before, but you got them right this time:")?;
        writeln!(out, "  {}", summary.improved.join(", "))?;
    }

    if !results.incorrect_questions.is_empty() {
        writeln!(out, "\nQuestions to practise:")?;
        for q in &results.incorrect_questions {
            let label = pair_label(q.multiplier, q.multiplicand);
            match q.user_answer {
                Some(said) => writeln!(out, "  {label} = {}   (you said {said})", q.correct_answer)?,
                None => writeln!(out, "  {label} = {}", q.correct_answer)?,
            }
        }
    }

    if !summary.still_challenging.is_empty() {
        writeln!(out, "\nKeep working on: {}", summary.still_challenging.join(", "))?;
    }
    Ok(())
}

fn print_stats<S: KeyValueStore, W: Write>(
    progress: &ProgressStore<S>,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let stats = progress.get_total_stats();
    if stats.total_games == 0 {
        writeln!(out, "No games played yet.")?;
        return Ok(());
    }

    writeln!(out, "Games played:      {}", stats.total_games)?;
    writeln!(
        out,
        "Answered correctly: {} of {}",
        stats.total_correct, stats.total_questions
    )?;

    let challenging = progress.challenging_questions();
    if !challenging.is_empty() {
        writeln!(out, "\nTrickiest questions:")?;
        for record in challenging.iter().take(10) {
            writeln!(
                out,
                "  {:<8} wrong {:>3}  right {:>3}",
                pair_label(record.multiplier, record.multiplicand),
                record.times_wrong,
                record.times_correct
            )?;
        }
    }
    Ok(())
}

fn print_history<S: KeyValueStore, W: Write>(
    progress: &ProgressStore<S>,
    limit: usize,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let sessions = progress.get_sessions();
    if sessions.is_empty() {
        writeln!(out, "No games played yet.")?;
        return Ok(());
    }

    for session in sessions.iter().rev().take(limit) {
        let tables = session.tables.iter().join(",");
        writeln!(
            out,
            "{}  {:>3}/{:<3} {:<6} tables {}",
            session
                .date
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            session.score,
            session.total,
            session.difficulty.to_string(),
            tables
        )?;
    }
    Ok(())
}
