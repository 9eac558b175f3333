use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, InteractionKind, InteractionRecord};
use pipeline::{CompatibilityTier, RankedContent, RankedProfile, RankingPolicy};
use rand::seq::IndexedRandom;
use server::{EngineConfig, RankingOrchestrator};
use sources::{IndexStore, discovery_locations, extract_signals};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// travel-rank - Travel companion and event ranking engine
#[derive(Parser)]
#[command(name = "travel-rank")]
#[command(about = "Ranks travel companions and events for a member", long_about = None)]
struct Cli {
    /// Path to the JSON dataset directory
    #[arg(short, long, default_value = "data/sample")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank people for a member
    Discover {
        /// Member to rank for
        #[arg(long)]
        user_id: String,

        /// compatibility, closest_nearby, travel_experience, mutual_connections or recent
        #[arg(long, default_value = "compatibility")]
        policy: RankingPolicy,

        /// Number of results (defaults to TRAVEL_RANK_LIMIT)
        #[arg(long)]
        limit: Option<usize>,

        /// Show reasons and facets for each result
        #[arg(long)]
        explain: bool,
    },

    /// Rank events and recommendations across a member's locations
    Events {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rate an event and show its new average
    Rate {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        entity_id: String,

        /// Rating from 1 to 5
        #[arg(long)]
        rating: u8,
    },

    /// Show a member's signals and discovery locations
    Profile {
        #[arg(long)]
        user_id: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = DataIndex::load_from_files(&cli.data_dir)
        .with_context(|| format!("Failed to load dataset from {}", cli.data_dir.display()))?;
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    let store = Arc::new(IndexStore::new(data_index));
    let config = EngineConfig::from_env();
    info!("Engine configuration: {:?}", config);
    let orchestrator = RankingOrchestrator::from_store(store.clone(), config);

    match cli.command {
        Commands::Discover {
            user_id,
            policy,
            limit,
            explain,
        } => handle_discover(&orchestrator, &user_id, policy, limit, explain).await?,
        Commands::Events { user_id, limit } => handle_events(&orchestrator, &user_id, limit).await?,
        Commands::Rate {
            user_id,
            entity_id,
            rating,
        } => handle_rate(&orchestrator, &store, user_id, entity_id, rating).await?,
        Commands::Profile { user_id } => handle_profile(&store, &user_id).await?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(orchestrator, &store, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'discover' command
async fn handle_discover(
    orchestrator: &RankingOrchestrator,
    user_id: &str,
    policy: RankingPolicy,
    limit: Option<usize>,
    explain: bool,
) -> Result<()> {
    let ranked = orchestrator
        .rank_people(user_id, policy, limit)
        .await
        .with_context(|| format!("Failed to rank people for {}", user_id))?;

    println!(
        "{}",
        format!("People for {} (by {}):", user_id, policy).bold().blue()
    );
    if ranked.is_empty() {
        println!("  No matches found");
    }
    for (i, entry) in ranked.iter().enumerate() {
        print_profile(i + 1, entry, explain);
    }
    Ok(())
}

/// Handle the 'events' command
async fn handle_events(
    orchestrator: &RankingOrchestrator,
    user_id: &str,
    limit: Option<usize>,
) -> Result<()> {
    let ranked = orchestrator
        .rank_content(user_id, limit)
        .await
        .with_context(|| format!("Failed to rank events for {}", user_id))?;

    println!("{}", format!("Events for {}:", user_id).bold().blue());
    if ranked.is_empty() {
        println!("  Nothing found at any of this member's locations");
    }
    for (i, entry) in ranked.iter().enumerate() {
        print_content(i + 1, entry);
    }
    Ok(())
}

/// Handle the 'rate' command
async fn handle_rate(
    orchestrator: &RankingOrchestrator,
    store: &IndexStore,
    user_id: String,
    entity_id: String,
    rating: u8,
) -> Result<()> {
    let title = {
        let index = store.shared_index();
        let index = index.read().await;
        index
            .get_content(&entity_id)
            .map(|item| item.title.clone())
            .ok_or_else(|| anyhow!("Content item {} not found", entity_id))?
    };

    let record = InteractionRecord::new(user_id, entity_id, InteractionKind::Rating, Utc::now())
        .with_rating(rating);
    let updated = orchestrator
        .record_interaction(record)
        .await
        .context("Failed to record rating")?;

    match updated {
        Some(average) => println!(
            "{} {} is now rated {:.1} ({} ratings)",
            "✓".green(),
            title.bold(),
            average.average,
            average.count
        ),
        None => println!("{} Rating recorded for {}", "✓".green(), title.bold()),
    }
    println!("  (the dataset files on disk are not modified)");
    Ok(())
}

/// Handle the 'profile' command
async fn handle_profile(store: &IndexStore, user_id: &str) -> Result<()> {
    let index = store.shared_index();
    let index = index.read().await;
    let profile = index
        .get_profile(user_id)
        .ok_or_else(|| anyhow!("Member {} not found", user_id))?;
    let signals = extract_signals(profile);

    println!("{}", format!("Member: {} ({})", profile.display_name, profile.id).bold().blue());
    println!("{}Interests: {}", "• ".green(), signals.interests.join(", "));
    println!("{}Activities: {}", "• ".green(), signals.activities.join(", "));
    println!(
        "{}Travel style: {}",
        "• ".green(),
        signals.travel_style.as_deref().unwrap_or("-")
    );
    println!(
        "{}Age: {}",
        "• ".green(),
        signals.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
    );
    println!("{}Verified: {}", "• ".green(), signals.verified);
    println!(
        "{}Connections: {}",
        "• ".cyan(),
        index.connections_of(user_id).map(|c| c.len()).unwrap_or(0)
    );
    println!(
        "{}Interactions: {}",
        "• ".cyan(),
        index.get_viewer_interactions(user_id).len()
    );

    println!("Discovery locations:");
    for location in discovery_locations(profile) {
        println!("  - {} ({})", location.label, location.location);
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: RankingOrchestrator,
    store: &IndexStore,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let member_ids: Vec<String> = {
        let index = store.shared_index();
        let index = index.read().await;
        index.profiles().map(|p| p.id.clone()).collect()
    };
    if member_ids.is_empty() || requests == 0 {
        return Err(anyhow!("Benchmark needs at least one member and one request"));
    }

    let user_ids: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| member_ids.choose(&mut rng).cloned())
            .collect()
    };

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(user_ids.len());
    for (i, user_id) in user_ids.into_iter().enumerate() {
        let orchestrator = orchestrator.clone();
        let permits = permits.clone();
        // Alternate between people and content requests
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            if i % 2 == 0 {
                orchestrator
                    .rank_people(&user_id, RankingPolicy::MutualConnections, None)
                    .await?;
            } else {
                orchestrator.rank_content(&user_id, None).await?;
            }
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        timings.len() as f64 / total_time.as_secs_f64()
    );

    Ok(())
}

fn print_profile(rank: usize, entry: &RankedProfile, explain: bool) {
    let tier = match entry.compatibility.tier {
        CompatibilityTier::High => "high".green(),
        CompatibilityTier::Medium => "medium".yellow(),
        CompatibilityTier::Low => "low".normal(),
    };
    let name = if entry.profile.display_name.is_empty() {
        entry.profile.id.as_str()
    } else {
        entry.profile.display_name.as_str()
    };
    let mutual = entry
        .mutual_connections
        .map(|m| format!(", {} mutual", m))
        .unwrap_or_default();
    println!(
        "{}. {} [{}] - Score: {} ({}){}",
        rank.to_string().green(),
        name.bold(),
        entry.profile.id,
        entry.compatibility.score,
        tier,
        mutual
    );

    if explain {
        for reason in &entry.compatibility.reasons {
            println!("   • {}", reason);
        }
        let facets = &entry.compatibility.facets;
        let mut badges = Vec::new();
        if facets.location_overlap {
            badges.push("same place");
        }
        if facets.date_overlap {
            badges.push("overlapping dates");
        }
        if facets.style_overlap {
            badges.push("same style");
        }
        if facets.user_type_compatible {
            badges.push("compatible account types");
        }
        if !badges.is_empty() {
            println!("   Badges: {}", badges.join(", ").cyan());
        }
        println!(
            "   Distance: {}, travel experience: {}",
            entry.distance, entry.travel_experience
        );
    }
}

fn print_content(rank: usize, entry: &RankedContent) {
    let mut flags = Vec::new();
    if entry.is_engaged {
        flags.push("going".green().to_string());
    }
    if entry.authored_by_viewer {
        flags.push("yours".cyan().to_string());
    }
    if entry.item.ai_generated {
        flags.push("suggested".yellow().to_string());
    }
    println!(
        "{}. {} - {} @ {} [{}] - Score: {:.1}{}",
        rank.to_string().green(),
        entry.item.title.bold(),
        entry.item.starts_at.format("%Y-%m-%d %H:%M"),
        entry.item.location,
        entry.found_at,
        entry.feedback_score,
        if flags.is_empty() {
            String::new()
        } else {
            format!(" ({})", flags.join(", "))
        }
    );
}
