use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cliclack::{input, password, spinner};
use console::style;
use tracing_subscriber::EnvFilter;

use heron::agent::{Agent, DEFAULT_MAX_STEPS};
use heron::credentials::{CredentialSource, KeyRetrievalStrategy, KeyStore};
use heron::events::{Category, ConsoleSink, EventSink, Severity};
use heron::providers::factory::{get_provider, parse_model_id, ModelId, ProviderConfig};
use heron::providers::gateway::{GatewayConfig, DEFAULT_HOST};
use heron::session::Session;
use heron::tools::code::{CodeTool, NodeRunner};
use heron::tools::delegate::{DelegateTool, AIPIPE_API_KEY};
use heron::tools::search::SearchTool;
use heron::tools::ToolRegistry;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model to use: "echo" or "aipipe:<model>"
    #[arg(short, long, default_value = "echo")]
    model: String,

    /// Gateway host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Maximum provider round trips per user turn
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,
}

/// Prompts on the terminal for any key the store cannot produce, then
/// saves the entry so the next run does not ask again. Keeps interactive
/// credential entry out of the agent and the tools.
struct PromptingKeyStore {
    store: KeyStore,
}

impl CredentialSource for PromptingKeyStore {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.store.get(key) {
            return Some(value);
        }

        let entered: String = password(format!("Enter your {key}:"))
            .mask('*')
            .interact()
            .ok()?;
        let entered = entered.trim().to_string();
        if entered.is_empty() {
            return None;
        }

        if let Err(err) = self.store.save(key, &entered) {
            tracing::warn!("could not persist {key}: {err}");
        }
        Some(entered)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ui: Arc<dyn EventSink> = Arc::new(ConsoleSink);
    let credentials: Arc<dyn CredentialSource> = Arc::new(PromptingKeyStore {
        store: KeyStore::new(KeyRetrievalStrategy::Both),
    });

    let Some(model_id) = parse_model_id(&cli.model) else {
        ui.alert(
            &format!(
                "Unrecognized model '{}', expected \"echo\" or \"aipipe:<model>\"",
                cli.model
            ),
            Severity::Danger,
        );
        std::process::exit(1);
    };

    let provider = match model_id {
        ModelId::Echo => {
            let provider = get_provider(ProviderConfig::Echo)?;
            ui.alert("Echo provider ready", Severity::Success);
            provider
        }
        ModelId::Gateway { model } => {
            let Some(api_key) = credentials.get(AIPIPE_API_KEY) else {
                ui.alert("No API key provided", Severity::Danger);
                std::process::exit(1);
            };
            let provider = get_provider(ProviderConfig::Gateway(GatewayConfig {
                host: cli.host.clone(),
                api_key,
                model: model.clone(),
            }))?;
            ui.alert(&format!("AI Pipe provider ready ({model})"), Severity::Success);
            provider
        }
    };

    let mut tools = ToolRegistry::new();
    tools.register(Box::new(SearchTool::new(credentials.clone(), ui.clone())?))?;
    tools.register(Box::new(DelegateTool::new(
        cli.host.clone(),
        credentials.clone(),
        ui.clone(),
    )))?;
    tools.register(Box::new(CodeTool::new(
        Arc::new(NodeRunner::new()),
        ui.clone(),
    )))?;

    let agent = Agent::new(provider, tools, ui.clone()).with_max_steps(cli.max_steps);
    let mut session = Session::new();

    println!(
        "{} {}",
        style("heron").bold(),
        style("- type \"exit\" to end the session").dim()
    );
    println!();

    loop {
        let message_text: String = input("Message:").placeholder("").multiline().interact()?;

        let trimmed = message_text.trim();
        if trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        ui.message("You", trimmed, Category::User);
        session.push_user(trimmed);

        let spin = spinner();
        spin.start("awaiting reply");
        let outcome = agent.run(&mut session).await;
        spin.stop("");

        // Done and Safeguarded already surfaced through the sink; only a
        // loop-level failure needs reporting here. The session is intact
        // either way, so the conversation can continue.
        if let Err(err) = outcome {
            ui.alert(&err.to_string(), Severity::Danger);
        }
        println!();
    }

    Ok(())
}
