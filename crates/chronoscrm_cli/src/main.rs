//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `chronoscrm_core` wiring.
//! - Walk one lead through the pipeline and print what a board view
//!   would derive from each broadcast.

use chronoscrm_core::{
    default_log_level, init_logging, stage_summaries, Lead, LeadStatus, LeadStore,
    LeadStoreConfig, WatchInterest,
};
use chrono::Utc;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let log_dir = std::env::temp_dir().join("chronoscrm-logs");
    match log_dir.to_str() {
        Some(dir) => {
            if let Err(err) = init_logging(default_log_level(), dir) {
                eprintln!("logging disabled: {err}");
            }
        }
        None => eprintln!("logging disabled: temp dir is not valid UTF-8"),
    }

    println!("chronoscrm_core version={}", chronoscrm_core::core_version());

    let mut jim = Lead::new("Jim Collector", "@jimc_collector");
    jim.source = "Instagram".to_string();
    jim.budget = "$20k-50k".to_string();
    jim.interests
        .push(WatchInterest::new("Rolex", "Daytona", "116500LN", 45_000));
    let ana = Lead::new("Ana Peters", "@ana.watches");

    let store = LeadStore::with_leads(LeadStoreConfig::instant(), vec![jim.clone(), ana]);
    let _subscription = store.subscribe(Arc::new(|leads: &[Lead]| {
        println!("broadcast: {} leads in table", leads.len());
    }));

    for stage in [
        LeadStatus::Qualified,
        LeadStatus::VisitScheduled,
        LeadStatus::Won,
    ] {
        if let Ok(Some(updated)) = store.update_status(jim.id, stage).await {
            println!("moved {} -> {}", updated.name, updated.status);
        }
    }

    if let Ok(snapshot) = store.get_all().await {
        for summary in stage_summaries(&snapshot, Utc::now()) {
            println!(
                "stage={} total={} recent={}",
                summary.stage, summary.total, summary.recent_moves
            );
        }
    }
}
