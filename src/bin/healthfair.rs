//! Health Fair console game
//!
//! Plays diagnostic cases in the terminal against a disease dataset.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use healthfair::{Case, Catalogue, GameConfig, HealthFairResult};

/// Command-line options; flags override the config file.
#[derive(Debug, Parser)]
#[command(name = "healthfair", version, about = "Differential diagnosis training game")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disease dataset (JSON) [default: bundled demo]
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Seed for reproducible cases
    #[arg(short, long)]
    seed: Option<u64>,

    /// Symptoms offered per question
    #[arg(short = 'n', long)]
    suggestions: Option<usize>,
}

impl Cli {
    fn into_config(self) -> HealthFairResult<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if self.dataset.is_some() {
            config.dataset = self.dataset;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(n) = self.suggestions {
            config.suggestions = n;
        }
        Ok(config)
    }
}

enum Turn {
    Continue,
    CaseOver,
    Quit,
}

struct Console<I> {
    input: I,
}

impl<I: BufRead> Console<I> {
    /// Prompts and reads one trimmed line; `None` on end of input.
    fn prompt(&mut self, text: &str) -> Option<String> {
        print!("{text}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

fn print_belief(case: &Case) {
    println!("\nCurrent probabilities:");
    for (id, p) in case.belief().ranked().into_iter().take(10) {
        let name = case.catalogue().get(id.as_str()).map_or("?", |d| d.name.as_str());
        println!("  ({id}) {name}: {p:.3}");
    }
}

fn print_candidates(case: &Case) {
    println!("\nDiseases still in play:");
    for id in case.belief().active() {
        if let Some(d) = case.catalogue().get(id.as_str()) {
            println!("  {d}");
        }
    }
}

fn ask_symptom<I: BufRead>(console: &mut Console<I>, case: &mut Case) -> Option<Turn> {
    let choices = case.suggest();
    if choices.is_empty() {
        println!("No symptoms left to ask about.");
        return Some(Turn::Continue);
    }
    println!("\nSymptoms you can ask about:");
    for (i, s) in choices.iter().enumerate() {
        println!("{}) {s}", i + 1);
    }
    let sel = console.prompt("> ")?;
    let Some(symptom) = sel
        .parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| choices.get(i))
    else {
        println!("Invalid option.");
        return Some(Turn::Continue);
    };
    let answer = case.ask(symptom.clone());
    println!("Patient answers: {}", if answer.reported { "yes" } else { "no" });
    Some(Turn::Continue)
}

fn play_turn<I: BufRead>(console: &mut Console<I>, case: &mut Case) -> Option<Turn> {
    print_belief(case);
    println!("\nActions:");
    println!("1) Ask about a symptom");
    println!("2) Make a diagnosis");
    println!("3) Show patient profile");
    println!("4) Discard a disease");
    println!("0) Quit");

    match console.prompt("> ")?.as_str() {
        "1" => ask_symptom(console, case),
        "2" => {
            print_candidates(case);
            let input = console.prompt("Disease code: ")?;
            let Some(guess) = case.catalogue().resolve(&input).map(|d| d.id.clone()) else {
                println!("Invalid code.");
                return Some(Turn::Continue);
            };
            let outcome = case.diagnose(guess.as_str());
            if outcome.correct {
                println!("\nCorrect diagnosis!\n");
            } else {
                let name = case
                    .catalogue()
                    .get(outcome.truth.as_str())
                    .map_or(outcome.truth.to_string(), |d| d.name.clone());
                println!("\nIncorrect. The patient had: {name}\n");
            }
            Some(Turn::CaseOver)
        }
        "3" => {
            println!("\nPatient profile:");
            for (label, value) in case.patient().profile().entries() {
                println!("  - {label}: {value}");
            }
            Some(Turn::Continue)
        }
        "4" => {
            print_candidates(case);
            let input = console.prompt("Disease code to discard: ")?;
            let code = case.catalogue().resolve(&input).map(|d| d.id.clone());
            if let Some(code) = code.filter(|c| case.eliminate(c.as_str())) {
                println!("{code} discarded.");
            } else {
                println!("Invalid code.");
            }
            if case.is_exhausted() {
                println!("Every disease has been discarded; the case is closed.");
                return Some(Turn::CaseOver);
            }
            Some(Turn::Continue)
        }
        "0" => Some(Turn::Quit),
        _ => {
            println!("Invalid option.");
            Some(Turn::Continue)
        }
    }
}

fn run(config: &GameConfig) -> HealthFairResult<()> {
    let catalogue = Arc::new(match &config.dataset {
        Some(path) => Catalogue::load(path)?,
        None => Catalogue::demo()?,
    });
    let mut console = Console {
        input: io::stdin().lock(),
    };

    println!("=== Health Fair - diagnosis simulator ===\n");
    let mut case_config = config.clone();
    loop {
        let mut case = Case::from_config(Arc::clone(&catalogue), &case_config)?;
        // Successive cases in a seeded session must differ.
        case_config.seed = case_config.seed.map(|s| s.wrapping_add(1));

        let complaints: Vec<String> = case.presenting_symptoms().iter().map(ToString::to_string).collect();
        println!("A new patient has arrived, reporting: {}", complaints.join(", "));

        let quit = loop {
            match play_turn(&mut console, &mut case) {
                Some(Turn::Continue) => {}
                Some(Turn::CaseOver) => break false,
                Some(Turn::Quit) | None => break true,
            }
        };
        if quit {
            break;
        }
        match console.prompt("\nPlay another case? (y/n): ") {
            Some(answer) if answer.eq_ignore_ascii_case("y") => {}
            _ => break,
        }
    }
    println!("\nThanks for playing Health Fair!");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = config.validate().and_then(|()| run(&config)) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
