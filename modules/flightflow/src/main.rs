use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use flightflow::catalog::{find_flight, seed_flights, seed_trips};
use flightflow::seat_map::{self, SeatMap};
use flightflow::session::SUGGESTIONS;
use flightflow::{Assistant, CabinClass, ChatSession, Config, InterpretationResult, SeatStatus};

#[derive(Parser)]
#[command(name = "flightflow")]
#[command(about = "Ask the flight assistant about the demo catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret one utterance and print the result
    Ask {
        utterance: String,

        /// Print the interpretation as JSON
        #[arg(long)]
        json: bool,

        /// Skip the follow-up recommendation
        #[arg(long)]
        no_recommend: bool,
    },

    /// Interactive session over stdin
    Chat,

    /// List the demo catalog
    Flights,

    /// Show the seat map for a catalog flight
    Seats {
        /// Catalog id or flight number, e.g. "3" or "UA9012"
        flight: String,

        /// Occupancy seed; random when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Seats to select, e.g. --select 12A --select 12B
        #[arg(long)]
        select: Vec<String>,

        /// Print the whole map as JSON
        #[arg(long)]
        json: bool,
    },

    /// List booked trips
    Trips,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("flightflow=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Flights => {
            for flight in seed_flights() {
                println!("{flight}");
            }
            Ok(())
        }
        Commands::Seats {
            flight,
            seed,
            select,
            json,
        } => seats(&flight, seed, &select, json),
        Commands::Trips => {
            for trip in seed_trips() {
                println!("{trip}");
                for flight in &trip.flights {
                    println!("  {flight}");
                }
            }
            Ok(())
        }
        Commands::Ask {
            utterance,
            json,
            no_recommend,
        } => {
            let config = Config::from_env()?;
            ask(&Assistant::from_config(&config), &utterance, json, no_recommend).await
        }
        Commands::Chat => {
            let config = Config::from_env()?;
            chat(Assistant::from_config(&config)).await
        }
    }
}

fn seats(flight: &str, seed: Option<u64>, select: &[String], json: bool) -> Result<()> {
    let catalog = seed_flights();
    let flight = find_flight(&catalog, flight)
        .with_context(|| format!("No flight {flight} in the catalog"))?;

    let mut map = match seed {
        Some(seed) => seat_map::generate_seeded(&flight.aircraft, seed),
        None => seat_map::generate_random(&flight.aircraft, &mut rand::rng()),
    };
    for id in select {
        map.select(id)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        print_seat_map(&map);
    }
    Ok(())
}

fn print_seat_map(map: &SeatMap) {
    println!("{} | {} rows | {}", map.aircraft, map.rows, map.layout);
    for cabin in [
        CabinClass::First,
        CabinClass::Business,
        CabinClass::Premium,
        CabinClass::Economy,
    ] {
        let Some(sample) = map.seats().iter().find(|s| s.cabin == cabin) else {
            continue;
        };
        println!(
            "  {:<8} +${:<4} {:>3} available  {}",
            cabin.as_str(),
            sample.price,
            map.count(cabin, SeatStatus::Available),
            sample.features.join(", ")
        );
    }

    let selected: Vec<&str> = map.selected().map(|s| s.id.as_str()).collect();
    if !selected.is_empty() {
        println!(
            "Selected: {} (+${})",
            selected.join(", "),
            map.selected_surcharge()
        );
    }
}

fn print_result(result: &InterpretationResult) {
    println!("{}", result.message());
    match result {
        InterpretationResult::GeneralSearch { parameters, .. } => {
            println!("{}", serde_json::to_string_pretty(parameters).unwrap_or_default());
        }
        InterpretationResult::SpecificFilter { flights, .. } => {
            for flight in flights {
                println!("  {flight}");
            }
        }
    }
}

async fn ask(assistant: &Assistant, utterance: &str, json: bool, no_recommend: bool) -> Result<()> {
    let catalog = seed_flights();
    let result = assistant.handle(utterance, &catalog).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    if !no_recommend && !result.flights().is_empty() {
        let text = assistant
            .generate_recommendation(result.flights(), utterance)
            .await;
        println!("\n{text}");
    }

    Ok(())
}

async fn chat(assistant: Assistant) -> Result<()> {
    let mut session = ChatSession::new(assistant, seed_flights());
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if let Some(greeting) = session.messages().first() {
        println!("{}", greeting.content);
    }
    println!("Try: {}", SUGGESTIONS.join(" | "));

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }

        let Some(turn) = session.submit(&line).await else {
            continue;
        };
        print_result(&turn.result);

        if let Some(task) = turn.recommendation {
            match task.await {
                Ok(text) => {
                    println!("\n{text}");
                    session.append_recommendation(text);
                }
                Err(e) => info!(error = %e, "Recommendation task ended early"),
            }
        }
    }

    let form = session.form();
    info!(
        messages = session.messages().len(),
        from = form.from.as_str(),
        to = form.to.as_str(),
        class = %form.cabin_class,
        "Chat session ended"
    );
    Ok(())
}
