//! Goalboard CLI - personal goal tracking.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use goalboard_core::{
    GoalType, MacroGoal, MacroGoalId, MacroGoalPatch, MicroGoalId, NewMacroGoal, NewMicroGoal,
};
use goalboard_goals::{BasicGoalManager, GoalManager, ManagerConfig};
use goalboard_progress::{
    macro_completion, micro_contribution, milestones, BasicProgressTracker, GoalStatus,
    ProgressConfig, ProgressTracker,
};
use goalboard_storage::JsonStorage;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "goalboard")]
#[command(about = "Track macro goals and the micro goals that get you there", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, default_value = ".goalboard")]
    data_dir: PathBuf,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a macro goal
    AddGoal {
        /// Goal name
        name: String,
        /// Tracking type: percentage or hours
        #[arg(long = "type", default_value = "percentage")]
        goal_type: GoalType,
        /// Target hours (hours goals)
        #[arg(long)]
        hours: Option<f64>,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Icon
        #[arg(long)]
        icon: Option<String>,
    },
    /// Add a micro goal to a macro goal
    AddTask {
        /// Macro goal ID
        goal: MacroGoalId,
        /// Task name
        name: String,
    },
    /// Change fields of a macro goal
    UpdateGoal {
        /// Macro goal ID
        id: MacroGoalId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        goal_type: Option<GoalType>,
        /// Target hours
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Add worked hours to a micro goal
    Log {
        /// Micro goal ID
        id: MicroGoalId,
        /// Hours worked
        hours: f64,
    },
    /// Set the completion percentage of a micro goal
    Set {
        /// Micro goal ID
        id: MicroGoalId,
        /// Completion (0-100)
        completion: f64,
    },
    /// Mark a micro goal done
    Done {
        /// Micro goal ID
        id: MicroGoalId,
    },
    /// Reset a micro goal
    Undo {
        /// Micro goal ID
        id: MicroGoalId,
    },
    /// Delete a macro goal and its micro goals
    RemoveGoal {
        /// Macro goal ID
        id: MacroGoalId,
    },
    /// Delete a micro goal
    RemoveTask {
        /// Micro goal ID
        id: MicroGoalId,
    },
    /// List macro goals with their completion
    List,
    /// Show one macro goal and its micro goals
    Show {
        /// Macro goal ID
        id: MacroGoalId,
    },
    /// Dashboard statistics
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Rank and badges
    Badges {
        /// Completed micro goals needed for Task Crusher
        #[arg(long, default_value = "10")]
        task_target: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    debug!(data_dir = %cli.data_dir.display(), "Opening storage");
    let storage = JsonStorage::new(&cli.data_dir).await?;
    let mut manager = BasicGoalManager::new(storage).with_config(ManagerConfig::default());

    match cli.command {
        Commands::AddGoal { name, goal_type, hours, description, icon } => {
            let goal = manager
                .create_macro_goal(NewMacroGoal {
                    name,
                    description,
                    goal_type,
                    total_hours: hours,
                    icon,
                })
                .await?;
            println!("Added goal: {} - {}", goal.id, goal.name);
        }
        Commands::AddTask { goal, name } => {
            let micro = manager.create_micro_goal(NewMicroGoal::named(goal, name)).await?;
            println!("Added task: {} - {}", micro.id, micro.name);
        }
        Commands::UpdateGoal { id, name, goal_type, hours, description, icon } => {
            let goal = manager
                .update_macro_goal(
                    id,
                    MacroGoalPatch {
                        name,
                        description,
                        goal_type,
                        total_hours: hours,
                        icon,
                    },
                )
                .await?;
            println!("Updated goal: {} - {}", goal.id, goal.name);
        }
        Commands::Log { id, hours } => {
            let micro = manager.log_hours(id, hours).await?;
            println!("{}: {}h logged", micro.name, micro.hours);
        }
        Commands::Set { id, completion } => {
            let micro = manager.set_completion(id, completion).await?;
            println!("{}: {:.0}%", micro.name, micro.completion);
        }
        Commands::Done { id } => {
            let micro = manager.toggle_micro_goal(id, true).await?;
            println!("Done: {}", micro.name);
        }
        Commands::Undo { id } => {
            let micro = manager.toggle_micro_goal(id, false).await?;
            println!("Reset: {}", micro.name);
        }
        Commands::RemoveGoal { id } => {
            let removed = manager.delete_macro_goal(id).await?;
            println!("Removed goal {} and {} task(s)", id, removed);
        }
        Commands::RemoveTask { id } => {
            manager.delete_micro_goal(id).await?;
            println!("Removed task {}", id);
        }
        Commands::List => {
            let goals = manager.macro_goals().await?;
            let micro_goals = manager.micro_goals().await?;

            println!("Goals ({})", goals.len());
            for goal in &goals {
                let completion = macro_completion(goal, &micro_goals);
                println!(
                    "  {} | {} {} | {:>6.1}% | {} {}",
                    goal.id,
                    bar(completion),
                    format_status(GoalStatus::from_completion(completion)),
                    completion,
                    goal.icon.as_deref().unwrap_or("•"),
                    goal.name,
                );
            }
        }
        Commands::Show { id } => {
            let goal = manager.macro_goal(id).await?;
            let micro_goals = manager.micro_goals_for(id).await?;
            print_goal(&goal, &micro_goals);
        }
        Commands::Stats { json } => {
            let tracker = BasicProgressTracker::new(manager.into_storage());
            let snapshot = tracker.snapshot().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }

            let stats = &snapshot.stats;
            println!("Goalboard Status");
            let overall = stats.overall_completion;
            println!("  Overall: {:.1}% {}", overall, bar(overall));
            println!("  Goals: {}", stats.total_goals);
            for (status, count) in [
                (GoalStatus::Completed, stats.status.completed),
                (GoalStatus::InProgress, stats.status.in_progress),
                (GoalStatus::NotStarted, stats.status.not_started),
            ] {
                println!("    {}: {}", status.label(), count);
            }
            println!("    Percentage-based: {}", stats.types.percentage);
            println!("    Hours-based: {}", stats.types.hours);
            println!("  Tasks: {}", stats.micro_goals.total);
            println!("    Completed: {}", stats.micro_goals.completed);
            println!("    Avg completion: {}%", stats.micro_goals.average_completion);
        }
        Commands::Badges { task_target } => {
            let tracker = BasicProgressTracker::new(manager.into_storage())
                .with_config(ProgressConfig { micro_goal_target: task_target });
            let snapshot = tracker.snapshot().await?;
            let rank = snapshot.rank;

            println!("{} {} ({:.1}%)", rank.emoji(), rank.title(), snapshot.overall);
            println!("  \"{}\"", rank.quote());
            println!();
            for badge in &snapshot.badges {
                println!(
                    "  [{}] {} {} - {} ({})",
                    if badge.unlocked { "x" } else { " " },
                    badge.icon,
                    badge.name,
                    badge.description,
                    badge.requirement,
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_goal(goal: &MacroGoal, micro_goals: &[goalboard_core::MicroGoal]) {
    let completion = macro_completion(goal, micro_goals);

    println!("Goal: {}", goal.id);
    println!("  Name: {} {}", goal.icon.as_deref().unwrap_or(""), goal.name);
    if !goal.description.is_empty() {
        println!("  Description: {}", goal.description);
    }
    match goal.goal_type {
        GoalType::Hours => println!("  Type: hours (target {}h)", goal.target_hours()),
        GoalType::Percentage => println!("  Type: percentage"),
    }
    println!("  Completion: {:.1}% {}", completion, bar(completion));
    println!("  Created: {}", goal.created_at);

    let reached: Vec<String> = milestones(completion)
        .into_iter()
        .filter(|m| m.achieved)
        .map(|m| m.name)
        .collect();
    if !reached.is_empty() {
        println!("  Milestones: {}", reached.join(", "));
    }

    println!("  Tasks ({})", micro_goals.len());
    for micro in micro_goals {
        let detail = match goal.goal_type {
            GoalType::Hours => format!("{}h / {}h", micro.hours, goal.target_hours()),
            GoalType::Percentage => format!("{:.0}%", micro.completion),
        };
        println!(
            "    [{}] {} | {} | {} {}",
            if micro.is_complete() { "x" } else { " " },
            micro.id,
            bar(micro_contribution(goal, micro)),
            micro.name,
            detail,
        );
    }
}

fn format_status(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::NotStarted => "NOT STARTED",
        GoalStatus::InProgress => "IN PROGRESS",
        GoalStatus::Completed => "COMPLETED",
    }
}

/// Ten-cell text progress bar; overshoot renders as full.
fn bar(completion: f64) -> String {
    let filled = (completion / 10.0).round().clamp(0.0, 10.0) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}
