//! `printshop` - command-line front end for the print shop ERP
//!
//! Operators sign in once (`printshop login`); the session mirror on disk
//! carries their identity across invocations.

use std::path::PathBuf;

use anyhow::Context;
use chrono::DateTime;
use clap::{Parser, Subcommand};
use printshop_api::utils::logging::init_tracing;
use printshop_api::AppContext;
use printshop_core::workflow::ApprovalDecision;
use printshop_domain::{AuditEntry, Order, Phase, PhaseMetrics};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "printshop",
    about = "Print shop ERP: production queues, CRM, inventory and admin",
    version,
    propagate_version = true
)]
struct Cli {
    /// Configuration file (TOML or JSON); defaults to env vars and probing
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Check database, schema and session mirror
    Health,
    /// Sign in a staff member by email
    Login {
        email: String,
        /// Access token issued by the identity provider
        #[arg(long, default_value = "local")]
        token: String,
    },
    /// Sign out and clear the session mirror
    Logout,
    /// Show the signed-in staff member
    Whoami,
    /// Orders waiting in a phase queue (pre_press, press, post_press)
    Queue { phase: Phase },
    /// Orders the signed-in operator holds in a phase
    Mine { phase: Phase },
    /// Take an order from a phase queue
    Claim { phase: Phase, order: String },
    /// Tick a checklist step (1-based); `--undo` unticks it
    Advance {
        phase: Phase,
        order: String,
        step: usize,
        #[arg(long)]
        undo: bool,
    },
    /// Record the client's answer to the design proof
    Approve {
        order: String,
        /// The client asked for changes instead of approving
        #[arg(long)]
        changes: bool,
    },
    /// Close a phase and pass the order to the next queue
    Finish {
        phase: Phase,
        order: String,
        /// Sheets of paper consumed (press)
        #[arg(long)]
        paper: Option<f64>,
        /// Sheets of paper wasted (press)
        #[arg(long)]
        waste: Option<f64>,
    },
    /// Log a production incident
    Incident { phase: Phase, order: String, kind: String, detail: String },
    /// Audit history: global, per phase, or matching a text
    History {
        #[arg(long, conflicts_with = "search")]
        phase: Option<Phase>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Timeline of an order by id, production id or quote code
    Trace { order: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => printshop_infra::config::load_from_file(Some(path.clone())),
        None => printshop_infra::config::load(),
    }
    .context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    let ctx = AppContext::new_with_config(config).context("failed to open the database")?;
    run(&ctx, cli.command, cli.json).await
}

async fn run(ctx: &AppContext, command: Commands, json: bool) -> anyhow::Result<()> {
    use printshop_api as api;

    match command {
        Commands::Migrate => {
            let info = api::migrate(ctx).await.map_err(anyhow::Error::msg)?;
            emit(&info, json, |info| {
                println!(
                    "{}: schema version {}",
                    info.path,
                    info.schema_version.map_or_else(|| "none".to_string(), |v| v.to_string())
                )
            })
        }
        Commands::Health => {
            let health = api::get_app_health(ctx).await;
            emit(&health, json, |health| {
                println!("healthy: {} (score {:.2})", health.is_healthy, health.score);
                for component in &health.components {
                    let mark = if component.is_healthy { "ok" } else { "FAIL" };
                    println!(
                        "  {:<14} {:<4} {}",
                        component.name,
                        mark,
                        component.message.as_deref().unwrap_or("")
                    );
                }
            })?;
            if health.is_healthy {
                Ok(())
            } else {
                anyhow::bail!("{}", health.message.unwrap_or_else(|| "unhealthy".to_string()))
            }
        }
        Commands::Login { email, token } => {
            let session = api::login(ctx, &email, &token).await.map_err(anyhow::Error::msg)?;
            emit(&session, json, |s| {
                println!("Signed in as {} ({})", s.name, s.role.display_name());
                println!("Home module: {}", s.role.home_module());
            })
        }
        Commands::Logout => {
            api::logout(ctx).await.map_err(anyhow::Error::msg)?;
            emit(&(), json, |_| println!("Signed out"))
        }
        Commands::Whoami => {
            let session = api::current_session(ctx).await.map_err(anyhow::Error::msg)?;
            emit(&session, json, |session| match session {
                Some(s) => println!("{} <{}> - {}", s.name, s.email, s.role.display_name()),
                None => println!("Not signed in"),
            })
        }
        Commands::Queue { phase } => {
            let orders = api::list_queue(ctx, phase).await.map_err(anyhow::Error::msg)?;
            emit(&orders, json, |orders| print_orders(phase, orders))
        }
        Commands::Mine { phase } => {
            let tasks = api::list_my_tasks(ctx, phase).await.map_err(anyhow::Error::msg)?;
            emit(&tasks, json, |tasks| {
                let orders: Vec<Order> = tasks.iter().map(|task| task.order.clone()).collect();
                print_orders(phase, &orders)
            })
        }
        Commands::Claim { phase, order } => {
            let claimed = api::claim_order(ctx, phase, &order).await.map_err(anyhow::Error::msg)?;
            if !claimed {
                anyhow::bail!("Sign in to claim orders");
            }
            emit(&claimed, json, |_| println!("{order} claimed in {}", phase.title()))
        }
        Commands::Advance { phase, order, step, undo } => {
            let record = api::update_checklist_step(ctx, phase, &order, step, !undo)
                .await
                .map_err(anyhow::Error::msg)?;
            emit(&record, json, |record| {
                println!("{order}: step {step} {}", if undo { "cleared" } else { "done" });
                println!("{} status: {}", phase.title(), record.status);
            })
        }
        Commands::Approve { order, changes } => {
            let decision =
                if changes { ApprovalDecision::ChangesRequested } else { ApprovalDecision::Approved };
            let record = api::set_client_approval(ctx, &order, decision)
                .await
                .map_err(anyhow::Error::msg)?;
            emit(&record, json, |record| println!("{order}: {}", record.status))
        }
        Commands::Finish { phase, order, paper, waste } => {
            let metrics = PhaseMetrics { paper_consumption: paper, paper_waste: waste };
            let outcome =
                api::finish_phase(ctx, phase, &order, metrics).await.map_err(anyhow::Error::msg)?;
            emit(&outcome, json, |outcome| match outcome.next_phase {
                Some(next) => {
                    println!("{order} finished {}, queued for {}", phase.title(), next.title())
                }
                None => println!("{order} completed"),
            })
        }
        Commands::Incident { phase, order, kind, detail } => {
            let incident = api::report_incident(ctx, phase, &order, &kind, &detail)
                .await
                .map_err(anyhow::Error::msg)?;
            emit(&incident, json, |incident| {
                println!("Incident logged on {order}: {}", incident.kind)
            })
        }
        Commands::History { phase, search, limit } => {
            let entries = match (phase, search) {
                (Some(phase), _) => api::phase_history(ctx, phase).await,
                (None, Some(needle)) => api::search_history(ctx, &needle).await,
                (None, None) => api::recent_history(ctx, limit).await,
            }
            .map_err(anyhow::Error::msg)?;
            emit(&entries, json, |entries| print_history(entries))
        }
        Commands::Trace { order } => {
            let trace = api::trace_order(ctx, &order).await.map_err(anyhow::Error::msg)?;
            emit(&trace, json, |trace| {
                println!("{} - {}", trace.order.reference(), trace.order.status);
                for event in &trace.events {
                    println!(
                        "  {}  {:<40} {}",
                        format_timestamp(event.at),
                        event.label,
                        event.actor.as_deref().unwrap_or("")
                    );
                }
            })
        }
    }
}

/// Print `value` as JSON or through the human renderer
fn emit<T, F>(value: &T, json: bool, render: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        render(value);
    }
    Ok(())
}

fn print_orders(phase: Phase, orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders in {}", phase.title());
        return;
    }
    for order in orders {
        println!(
            "{:<12} {:<28} {:>10.2}  {}",
            order.reference(),
            order.status.to_string(),
            order.total,
            format_timestamp(order.created_at)
        );
    }
}

fn print_history(entries: &[AuditEntry]) {
    for entry in entries {
        println!(
            "{}  {:<24} {:<28} {}",
            format_timestamp(entry.created_at),
            entry.action,
            entry.user_email,
            entry.details
        );
    }
}

fn format_timestamp(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| epoch.to_string())
}
