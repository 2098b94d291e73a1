//! autotune CLI - drive the adaptive self-tuning engine.

mod simulation;

use anyhow::{Context, Result};
use autotune_storage::{JsonSnapshotStore, SnapshotStore};
use autotune_tuner::{
    AdaptiveTuner, ImprovementArea, ImprovementOpportunity, ParameterMap, Priority, TaskCategory,
    TunerConfig,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::simulation::Workload;

#[derive(Parser)]
#[command(name = "autotune")]
#[command(about = "Adaptive self-tuning engine", long_about = None)]
struct Cli {
    /// JSON tuner configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a synthetic workload and evolve the population
    Simulate {
        /// Generations to evolve
        #[arg(long, default_value = "5")]
        generations: usize,
        /// Completed tasks recorded before each generation
        #[arg(long, default_value = "20")]
        tasks_per_generation: usize,
        /// Seed for the synthetic workload
        #[arg(long)]
        seed: Option<u64>,
        /// Snapshot directory to resume from and save to
        #[arg(long)]
        state: Option<PathBuf>,
        /// Snapshots to keep after saving
        #[arg(long, default_value = "10")]
        keep: usize,
    },
    /// Compute one improvement step toward a target
    Improve {
        /// Performance area (accuracy, user_satisfaction, reliability, efficiency, latency, resource_usage)
        #[arg(long, value_parser = parse_area)]
        area: ImprovementArea,
        /// Current value
        #[arg(long, allow_negative_numbers = true)]
        current: f64,
        /// Target value
        #[arg(long, allow_negative_numbers = true)]
        target: f64,
        /// Priority (low, medium, high, critical)
        #[arg(long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
    },
    /// Show adaptations for a task category from stored feedback
    Adapt {
        /// Task category (productivity, communication, research, automation, general)
        #[arg(long, value_parser = parse_category)]
        category: TaskCategory,
        /// Snapshot directory
        #[arg(long, default_value = ".autotune")]
        state: PathBuf,
    },
    /// Show stored snapshots and the current best configuration
    Show {
        /// Snapshot directory
        #[arg(long, default_value = ".autotune")]
        state: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Simulate {
            generations,
            tasks_per_generation,
            seed,
            state,
            keep,
        } => {
            let tuner = AdaptiveTuner::new(config)?;

            let mut store = match &state {
                Some(dir) => Some(JsonSnapshotStore::new(dir).await?),
                None => None,
            };
            if let Some(store) = &store {
                if let Some(stored) = store.load_latest().await? {
                    info!("Resuming from snapshot {}", stored.meta.id);
                    tuner.restore(stored.snapshot).await?;
                }
            }

            let mut workload = Workload::new(generations, seed);
            for round in 0..generations {
                for _ in 0..tasks_per_generation {
                    let (result, category) = workload.sample(round);
                    tuner.record_completion(result, category).await;
                }
                let result = tuner.evolve_population().await;
                let metrics = tuner.metrics_snapshot().await;
                println!(
                    "Generation {:>3} | best {:.4} | mean {:.4} | success {:>5.1}% | tasks {}",
                    result.generation,
                    result.best_fitness,
                    result.mean_fitness,
                    metrics.success_rate * 100.0,
                    metrics.total_tasks,
                );
            }

            let applied = tuner.apply_best_configuration().await;
            if applied.success {
                println!("Best configuration:");
                print_parameters(&applied.parameters);
            }

            for category in TaskCategory::ALL {
                for adaptation in tuner.get_adaptations(category).await {
                    println!(
                        "  [{}] {:?} ({:.2}): {}",
                        category, adaptation.kind, adaptation.confidence, adaptation.recommendation
                    );
                }
            }

            if let Some(store) = &mut store {
                let id = store.save(&tuner.snapshot().await, "simulate").await?;
                let removed = store.prune(keep).await?;
                println!("Saved snapshot {} (pruned {})", id, removed);
            }
        }
        Commands::Improve { area, current, target, priority } => {
            let tuner = AdaptiveTuner::new(config)?;
            let opportunity = ImprovementOpportunity::new(area, current, target)
                .with_priority(priority)
                .with_rationale("requested from command line");
            let result = tuner.execute_improvement(&opportunity);

            if result.success {
                println!("Improvement for {}:", result.area);
                println!("  Improvement: {:.4}", result.actual_improvement);
                println!("  New value: {:.4} (target {:.4})", result.new_value, result.target_value);
            } else {
                println!(
                    "No improvement possible for {}: target {:.4} not reachable from {:.4}",
                    result.area, result.target_value, result.new_value
                );
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Adapt { category, state } => {
            let tuner = restore_latest(config, &state).await?;
            let adaptations = tuner.get_adaptations(category).await;

            if adaptations.is_empty() {
                println!("No feedback recorded for {}", category);
            }
            if let Some(summary) = tuner.category_summary(category).await {
                println!(
                    "{}: {} samples, success {:.1}%, rating {:.2}, time {:.0}ms",
                    category,
                    summary.samples,
                    summary.success_rate * 100.0,
                    summary.avg_rating,
                    summary.avg_execution_time_ms,
                );
            }
            for adaptation in adaptations {
                let parameter = adaptation.kind.parameter().unwrap_or("-");
                println!(
                    "  {:?} [{}] confidence {:.2}",
                    adaptation.kind, parameter, adaptation.confidence
                );
                println!("    {}", adaptation.recommendation);
            }
        }
        Commands::Show { state } => {
            let store = JsonSnapshotStore::open(&state);
            let snapshots = store.list().await?;

            println!("Snapshots ({})", snapshots.len());
            for meta in &snapshots {
                println!(
                    "  {} | gen {:>4} | {} | {}",
                    meta.id, meta.generation, meta.saved_at, meta.label
                );
            }

            let tuner = restore_latest(config, &state).await?;
            let applied = tuner.apply_best_configuration().await;
            if applied.success {
                println!("Best configuration:");
                print_parameters(&applied.parameters);
            } else {
                println!("No generation evolved yet");
            }
        }
    }

    Ok(())
}

async fn load_config(path: Option<&Path>) -> Result<TunerConfig> {
    let Some(path) = path else {
        return Ok(TunerConfig::default());
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: TunerConfig = serde_json::from_str(&json)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

async fn restore_latest(config: TunerConfig, state: &Path) -> Result<AdaptiveTuner> {
    let tuner = AdaptiveTuner::new(config)?;
    let store = JsonSnapshotStore::open(state);
    if let Some(stored) = store.load_latest().await? {
        tuner.restore(stored.snapshot).await?;
    }
    Ok(tuner)
}

fn print_parameters(parameters: &ParameterMap) {
    for (key, value) in parameters {
        println!("  {}: {}", key, value);
    }
}

fn parse_area(s: &str) -> Result<ImprovementArea, String> {
    ImprovementArea::ALL
        .into_iter()
        .find(|a| a.as_str() == s.to_lowercase())
        .ok_or_else(|| format!("unknown area '{}'", s))
}

fn parse_category(s: &str) -> Result<TaskCategory, String> {
    TaskCategory::ALL
        .into_iter()
        .find(|c| c.as_str() == s.to_lowercase())
        .ok_or_else(|| format!("unknown category '{}'", s))
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    match s.to_lowercase().as_str() {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        "critical" => Ok(Priority::Critical),
        _ => Err(format!("unknown priority '{}'", s)),
    }
}
