//! pastemark CLI - plain text to Markdown conversion tool
//!
//! Converts pasted or piped text to Markdown using layout heuristics, with
//! an optional LLM enhancement pass that falls back to the heuristics.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use pastemark::llm::{best_available_model, EnhanceRequest, LlmClient, LlmConfig, LlmProvider};
use pastemark::{convert_with_options, ConvertOptions};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Plain text to Markdown conversion
#[derive(Parser)]
#[command(
    name = "pastemark",
    version,
    about = "Convert unstructured text to Markdown",
    long_about = "pastemark - heuristic plain-text to Markdown converter.\n\n\
                  Usage:\n  \
                  pastemark <file>            Convert a file to stdout\n  \
                  pastemark -                 Convert stdin to stdout\n  \
                  pastemark enhance <file>    Convert via LLM, heuristics as fallback"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path, or "-" for stdin (for default conversion)
    input: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert text with the heuristic pipeline (default command)
    Convert {
        /// Input file path, or "-" for stdin
        input: PathBuf,

        /// Skip the Unicode input pre-pass
        #[arg(long)]
        no_normalize: bool,

        /// Keep runs of blank lines instead of collapsing them
        #[arg(long)]
        keep_blank_lines: bool,
    },

    /// Convert via the LLM collaborator, falling back to the heuristics
    Enhance {
        /// Input file path, or "-" for stdin
        input: PathBuf,

        /// Add emojis to headers and sections
        #[arg(long)]
        emoji: bool,

        /// Extra natural-language instructions for the model
        #[arg(long)]
        instructions: Option<String>,

        /// LLM provider
        #[arg(long, default_value = "local")]
        provider: Provider,

        /// Local inference server URL
        #[arg(long)]
        server_url: Option<String>,

        /// Model name (default: provider default)
        #[arg(long)]
        model: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },

    /// List models available from the configured provider
    Models {
        /// LLM provider
        #[arg(long, default_value = "local")]
        provider: Provider,

        /// Local inference server URL
        #[arg(long)]
        server_url: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// LLM provider selection
#[derive(Clone, Copy, ValueEnum)]
enum Provider {
    /// Local Ollama server
    Local,
    /// OpenAI API
    Openai,
}

impl From<Provider> for LlmProvider {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Local => LlmProvider::Local,
            Provider::Openai => LlmProvider::OpenAi,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = cli.output.clone();

    // Handle default command (pastemark <file>)
    if cli.command.is_none() {
        if let Some(input) = cli.input {
            let text = read_input(&input)?;
            let markdown = convert_with_options(&text, &ConvertOptions::default());
            return write_output(output.as_deref(), &markdown);
        }
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    }

    match cli.command.unwrap() {
        Commands::Convert {
            input,
            no_normalize,
            keep_blank_lines,
        } => {
            let text = read_input(&input)?;
            let mut options = ConvertOptions::new();
            if no_normalize {
                options = options.without_normalization();
            }
            if keep_blank_lines {
                options = options.without_blank_line_collapse();
            }
            let markdown = convert_with_options(&text, &options);
            write_output(output.as_deref(), &markdown)?;
        }

        Commands::Enhance {
            input,
            emoji,
            instructions,
            provider,
            server_url,
            model,
            timeout_secs,
        } => {
            let text = read_input(&input)?;
            let config = build_config(provider, server_url, model).with_timeout_secs(timeout_secs);
            let client = LlmClient::new(config);

            let request = EnhanceRequest::new(text)
                .with_emojis(emoji)
                .with_instructions(instructions.unwrap_or_default());

            let pb = create_spinner("Enhancing with LLM...");
            let runtime = tokio::runtime::Runtime::new()?;
            let markdown = runtime.block_on(client.enhance_or_convert(&request));
            pb.finish_and_clear();

            write_output(output.as_deref(), &markdown)?;
        }

        Commands::Models {
            provider,
            server_url,
            json,
        } => {
            let config = build_config(provider, server_url, None);
            let client = LlmClient::new(config);

            let runtime = tokio::runtime::Runtime::new()?;
            let models = runtime.block_on(client.available_models())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&models)?);
            } else if models.is_empty() {
                println!("{}", "No models available".yellow());
            } else {
                let names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
                let best = best_available_model(&names, client.config().provider);
                for model in &models {
                    let marker = if model.name == best { "*" } else { " " };
                    match &model.parameter_size {
                        Some(params) => println!("{} {} ({})", marker, model.name, params),
                        None => println!("{} {}", marker, model.name),
                    }
                }
            }
        }
    }

    Ok(())
}

fn build_config(
    provider: Provider,
    server_url: Option<String>,
    model: Option<String>,
) -> LlmConfig {
    let mut config = LlmConfig::default().with_provider(provider.into());
    if matches!(provider, Provider::Local) {
        config = config.with_model(pastemark::llm::config::DEFAULT_LOCAL_MODEL);
    }
    if let Some(url) = server_url {
        config = config.with_server_url(url);
    }
    if let Some(model) = model {
        config = config.with_model(model);
    }
    config
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}

fn write_output(path: Option<&Path>, markdown: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            fs::write(path, markdown)?;
            eprintln!("{} {}", "Wrote".green(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(markdown.as_bytes())?;
            if !markdown.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
