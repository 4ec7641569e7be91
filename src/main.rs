//! quotebox - A short dose of wisdom, online or off
//!
//! Prints a quote from whichever provider answers first, falling back to the
//! local cache and finally to a hardcoded quote.

use std::sync::Arc;

use clap::Parser;
use log::debug;

use quotebox::app::App;
use quotebox::cli::{Cli, StartupConfig};
use quotebox::config::Config;
use quotebox::reachability::NetworkStatus;
use quotebox::slideshow::{Slideshow, SlideshowEvent};

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}

/// Logs every state transition the app publishes
fn watch_state(app: &App) {
    let mut rx = app.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            debug!(
                "state: loading={} error={:?} quote={:?}",
                state.loading,
                state.error,
                state.current_quote.as_ref().map(|quote| &quote.author)
            );
        }
    });
}

#[tokio::main]
async fn main() {
    init_logger();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let startup = StartupConfig::from_cli(&cli)?;
    let config = Config::from_cli(&cli);

    let network = Arc::new(NetworkStatus::new(!startup.offline));
    let app = Arc::new(App::from_config(&config, network));
    watch_state(&app);

    for _ in 0..startup.count {
        let quote = app.load_random_quote().await?;
        println!("{}", quote);
    }

    if let Some(star) = startup.rating {
        let rated = app.set_rating(star).await?;
        match rated.rating {
            Some(stars) => println!("Rated {}/5", stars),
            None => println!("Rating cleared"),
        }
    }

    let Some(interval) = startup.slideshow else {
        return Ok(());
    };

    let mut slideshow = Slideshow::spawn(app.clone(), interval);
    loop {
        tokio::select! {
            event = slideshow.next_event() => match event {
                Some(SlideshowEvent::Loaded(quote)) => println!("{}", quote),
                Some(SlideshowEvent::Failed(message)) => eprintln!("Failed to load quote: {}", message),
                Some(SlideshowEvent::Skipped) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    slideshow.shutdown().await;

    Ok(())
}
