use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use markdown_tables::as_table;
use repro_harness::Harness;

mod cli;
mod summary;

use summary::RoundRow;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::Cli::parse();
    let harness = Harness::new(cli.config()).context("invalid harness configuration")?;

    // what the table on the page would have been told
    let notifications = Rc::new(Cell::new(0usize));
    let visible = Rc::new(Cell::new(0usize));
    let subscription = {
        let notifications = notifications.clone();
        let visible = visible.clone();
        harness.subscribe_items(move |items| {
            notifications.set(notifications.get() + 1);
            visible.set(items.len());
        })
    };

    let mut rows = Vec::new();
    for strategy in cli.strategies() {
        for round in 1..=cli.rounds {
            let before = notifications.get();
            let started = Instant::now();
            let report = harness.create_items(strategy);
            rows.push(RoundRow {
                round,
                report,
                elapsed: started.elapsed(),
                notifications: notifications.get() - before,
                visible: visible.get(),
            });
        }
    }

    if cli.clear {
        harness.clear_all();
    }
    harness.unsubscribe(subscription);

    println!("{}", as_table(&rows));
    println!(
        "{} event(s) in {} commit(s); {} item(s) visible after {} notification(s)",
        harness.num_events(),
        harness.num_commits(),
        visible.get(),
        notifications.get()
    );

    if cli.dump {
        for event in harness.export_events_json()? {
            println!("{}", serde_json::to_string(&event)?);
        }
    }

    log::debug!("Session {} done", harness.session_id());
    Ok(())
}
