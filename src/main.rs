use clap::{Parser, Subcommand};

use logmark::sets::load_sets_file;
use logmark::{LogEvent, Registry, Resolver, Result, builtin_event_sets};

#[derive(Parser)]
#[command(name = "logmark")]
#[command(about = "Event-set enrichment for structured log events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich an NDJSON event stream and write the result.
    Enrich {
        /// Event set definitions (sets.json). Built-ins apply either way
        /// unless --no-builtins is given.
        #[arg(long)]
        sets: Option<String>,

        #[arg(long)]
        input: String,

        #[arg(short = 'o', long)]
        out: String,

        #[arg(long)]
        no_builtins: bool,
    },

    /// Print the markers each event would receive, without enriching.
    Preview {
        #[arg(long)]
        sets: Option<String>,

        #[arg(long)]
        input: String,

        #[arg(long)]
        no_builtins: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Enrich {
            sets,
            input,
            out,
            no_builtins,
        } => {
            let mut resolver = build_resolver(sets.as_deref(), no_builtins)?;

            let mut lines = Vec::new();
            for mut event in read_events(&input)? {
                resolver.enrich_event(&mut event)?;
                lines.push(serde_json::to_string(&event)?);
            }
            lines.push(String::new()); // trailing newline
            std::fs::write(&out, lines.join("\n"))?;
            println!("Wrote {}", out);
        }

        Commands::Preview {
            sets,
            input,
            no_builtins,
        } => {
            let mut resolver = build_resolver(sets.as_deref(), no_builtins)?;

            for (idx, event) in read_events(&input)?.into_iter().enumerate() {
                let markers = resolver.get_visual_markers(&event)?;
                println!("{}: {}", idx + 1, markers.join(" "));
            }
        }
    }

    Ok(())
}

fn build_resolver(sets_path: Option<&str>, no_builtins: bool) -> Result<Resolver> {
    let mut registry = Registry::new();
    if !no_builtins {
        registry.register_all(builtin_event_sets())?;
    }
    if let Some(path) = sets_path {
        registry.register_all(load_sets_file(path)?)?;
    }
    Ok(Resolver::new(registry.into_shared()))
}

fn read_events(path: &str) -> Result<Vec<LogEvent>> {
    use anyhow::Context;

    let text =
        std::fs::read_to_string(path).with_context(|| format!("read event stream {}", path))?;

    let mut events = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event: LogEvent = serde_json::from_str(line)
            .with_context(|| format!("parse event at {}:{}", path, lineno + 1))?;
        events.push(event);
    }
    Ok(events)
}
