use log::{error, info};
use sentiment_board::handlers::session::Completion;
use sentiment_board::handlers::{Dashboard, HttpBackend};
use sentiment_board::render::render_text;
use sentiment_board::{Config, Pipeline, SubmitError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Type text and press enter to analyze it. :json toggles JSON output, :quit exits.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    info!("Using analysis endpoint {}", config.analyze_url);

    let backend = HttpBackend::new(&config)?;
    let dashboard = Arc::new(Dashboard::new(backend, Pipeline::default(), &config));
    let json_output = Arc::new(AtomicBool::new(false));

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" | ":q" => break,
            ":help" => println!("{}", HELP),
            ":json" => {
                let enabled = !json_output.fetch_xor(true, Ordering::SeqCst);
                println!("JSON output {}", if enabled { "on" } else { "off" });
            }
            "" => {}
            text => {
                // Claim the request here so a line typed while busy is turned
                // away before the next one is read
                let submission = match dashboard.begin(text) {
                    Ok(submission) => submission,
                    Err(SubmitError::Busy) => {
                        println!("Still analyzing the previous text, please wait.");
                        continue;
                    }
                    Err(e) => {
                        println!("Not submitted: {}", e);
                        continue;
                    }
                };

                // Run the request in the background so input stays responsive
                let dashboard = Arc::clone(&dashboard);
                let json_output = Arc::clone(&json_output);
                tokio::spawn(async move {
                    // Failures are part of the rendered view
                    if let Ok(Completion::Stale) = dashboard.dispatch(submission).await {
                        return;
                    }
                    let view = dashboard.render();
                    if json_output.load(Ordering::SeqCst) {
                        match serde_json::to_string_pretty(&view) {
                            Ok(json) => println!("{}", json),
                            Err(e) => error!("Failed to serialize view: {}", e),
                        }
                    } else {
                        print!("{}", render_text(&view));
                    }
                });
            }
        }
    }

    info!("Exiting");
    Ok(())
}
