use std::env;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use uigen_service::clipboard::CommandClipboard;
use uigen_service::controller::{ProxyClient, SessionState, SubmitOutcome, UiController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let base_url =
        env::var("UIGEN_SERVER_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());
    let client = ProxyClient::new(base_url, Duration::from_millis(30_000));
    let mut controller = UiController::new(client, Box::new(CommandClipboard::from_env()));

    let prompt = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !prompt.trim().is_empty() {
        submit_and_render(&mut controller, &prompt).await;
        return Ok(());
    }

    println!("Describe the UI you want (Enter submits, Ctrl-D quits):");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        submit_and_render(&mut controller, &line).await;
    }

    Ok(())
}

async fn submit_and_render(controller: &mut UiController, prompt: &str) {
    if controller.submit(prompt).await != SubmitOutcome::Completed {
        return;
    }

    match controller.state() {
        SessionState::Success(result) => {
            println!(
                "Suggested components: {}",
                result.suggested_components.join(", ")
            );
            println!("\n{}\n", result.code_snippet);

            controller.copy_code().await;
            if controller.copy_acknowledged() {
                println!("(snippet copied to clipboard)");
            }
        }
        SessionState::Failed(message) => eprintln!("{message}"),
        SessionState::Idle | SessionState::Loading => {}
    }
}
