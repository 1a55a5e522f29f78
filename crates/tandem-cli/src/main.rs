//! tandem: command-line chat with an OpenAI assistant.
//!
//! Sends one message (or reads lines interactively), lets the assistant call
//! the built-in tools, and prints the reply. Progress goes to stderr.

mod cli;
mod tools;

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tandem_ai::{
    Assistant, AssistantCreateParams, AssistantError, AssistantOptions, AssistantParams, Message,
    OpenAiClient, OpenAiConfig, ProgressEvent, ProgressHandler, ProgressKind, ThreadParams,
    Toolkit,
};
use tandem_common::TandemError;
use tandem_config::TandemConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("tandem=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    // Before the runtime exists, so no other thread sees the environment change.
    load_dotenv();
    let args = cli::parse();

    let config = match tandem_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tandem: {e}");
            return ExitCode::from(2);
        }
    };

    init_tracing(args.log_level.as_deref().unwrap_or(&config.logging.level));
    tracing::info!("tandem v{} starting", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("tandem: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args, config)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("tandem: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: cli::Args, config: TandemConfig) -> tandem_common::Result<ExitCode> {
    let client =
        OpenAiClient::new(client_config(&config)?).map_err(|e| TandemError::Ai(e.to_string()))?;
    let toolkit = Arc::new(tools::builtin_toolkit());

    let options = AssistantOptions::new(
        config.assistant.name.clone(),
        assistant_params(&args, &config, &toolkit),
        match args.thread_id.as_ref().or(config.assistant.thread_id.as_ref()) {
            Some(id) => ThreadParams::existing(id.clone()),
            None => ThreadParams::new_thread(),
        },
    )
    .with_toolkit(toolkit)
    .with_progress_handler(stderr_progress())
    .with_max_tool_rounds(config.session.max_tool_rounds);

    let assistant = Assistant::create(Arc::new(client), options)
        .await
        .map_err(|e| TandemError::Ai(e.to_string()))?;
    tracing::info!(
        assistant_id = %assistant.assistant().id,
        thread_id = %assistant.thread().id,
        "Session started"
    );

    match args.one_shot() {
        Some(message) => {
            let result = assistant.message(message).await;
            let replied = print_reply(&result, &mut std::io::stdout().lock())?;
            Ok(if replied {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            interactive(&assistant).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Write a turn's reply to `out`. Returns false for a failed turn, whose
/// errors the progress handler has already written to stderr.
fn print_reply(
    result: &Result<Message, AssistantError>,
    out: &mut impl Write,
) -> std::io::Result<bool> {
    match result {
        Ok(reply) => {
            writeln!(out, "{}", reply.text())?;
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}

fn client_config(config: &TandemConfig) -> tandem_common::Result<OpenAiConfig> {
    let openai = &config.openai;
    let mut client = OpenAiConfig::from_lookup(&openai.api_key_env, |key| std::env::var(key).ok())
        .map_err(|e| TandemError::Ai(e.to_string()))?
        .with_poll_interval(Duration::from_millis(openai.poll_interval_ms))
        .with_run_timeout(Duration::from_secs(openai.run_timeout_secs))
        .with_request_timeout(Duration::from_secs(openai.request_timeout_secs));
    if let Some(base_url) = &openai.base_url {
        client = client.with_base_url(base_url);
    }
    if let Some(org) = &openai.organization {
        client = client.with_organization(org);
    }
    Ok(client)
}

fn assistant_params(args: &cli::Args, config: &TandemConfig, toolkit: &Toolkit) -> AssistantParams {
    if let Some(id) = args.assistant_id.as_ref().or(config.assistant.id.as_ref()) {
        return AssistantParams::existing(id.clone());
    }
    let mut create = AssistantCreateParams::new(&config.assistant.model)
        .with_name(&config.assistant.name)
        .with_tools(toolkit.function_tools());
    if let Some(instructions) = &config.assistant.instructions {
        create = create.with_instructions(instructions);
    }
    create.into()
}

fn stderr_progress() -> ProgressHandler {
    Arc::new(|event: ProgressEvent| match event.kind {
        ProgressKind::ToolCall => eprintln!("[tool] {}", event.message.replace('\n', " | ")),
        ProgressKind::ToolResponse => eprintln!("[tool] -> {}", event.message),
        ProgressKind::Error => {
            for error in &event.errors {
                eprintln!("[error] {error}");
            }
        }
        ProgressKind::AssistantResponse => {}
    })
}

async fn interactive(assistant: &Assistant) -> tandem_common::Result<()> {
    eprintln!("Type a message, /thread to show the thread id, /quit to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/thread" => {
                println!("{}", assistant.thread().id);
                continue;
            }
            _ => {}
        }

        let result = assistant.message(line).await;
        let mut out = std::io::stdout().lock();
        if print_reply(&result, &mut out)? {
            writeln!(out)?;
        }
    }
    Ok(())
}
