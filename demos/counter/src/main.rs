//! Mounts a few counters into a document, clicks their buttons and prints the resulting markup.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use sprig::{config::Config, prelude::*};
use tracing::info;

/// Counter demo for the sprig toolkit.
#[derive(Parser, Debug)]
#[command(name = "sprig-counter", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of counters to mount.
    #[arg(long, default_value_t = 2)]
    counters: usize,

    /// Clicks to simulate on every counter.
    #[arg(long, default_value_t = 3)]
    clicks: u32,

    /// Fire a document-wide `counter:reset` event after clicking.
    #[arg(long)]
    reset: bool,
}

struct Counter {
    label: String,
}

impl Component for Counter {
    type State = u32;

    fn render(&self, cx: &Scope<'_, Self>) -> sprig::Result<Rendered> {
        let increment = button((
            attrs! { "class" => "increment", "onclick" => cx.callback(|count| *count += 1) },
            "+",
        ))?;
        Ok(li((
            attrs! { "class" => "counter" },
            span(&self.label)?,
            " ",
            output(cx.state().to_string())?,
            increment,
        ))?
        .into())
    }
}

fn run(cli: &Cli) -> Result<String> {
    let document = Document::new()?;

    let counters: Vec<Handle<Counter>> = (0..cli.counters)
        .map(|index| {
            Handle::new(Counter {
                label: format!("counter {index}"),
            })
        })
        .collect();

    for counter in &counters {
        counter.set_state(0)?;
        let weak = counter.downgrade();
        document.add_event_listener(
            "counter:reset",
            listener(move |_| weak.update(|count| *count = 0)),
        );
    }

    let list = ul(counters.iter().map(Arg::from).collect::<Vec<_>>())?;
    let page = sprig::tags::main((h1("Counters")?, list))?;
    document.body().append_child(&page)?;

    for counter in &counters {
        for _ in 0..cli.clicks {
            let target = counter
                .mounted()
                .iter()
                .flat_map(|element| element.child_elements())
                .find(|element| element.tag_name() == "button")
                .ok_or_else(|| eyre!("counter {} has no button mounted", counter.id()))?;
            target.dispatch_event(&Event::new("click"))?;
        }
        info!(id = %counter.id(), count = ?counter.state().as_deref(), "clicked");
    }

    if cli.reset {
        dispatch(&document, "counter:reset")?;
    }

    Ok(document.outer_html())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    sprig::config::install(&config)?;
    sprig::logging::init(&config.log);

    println!("{}", run(&cli)?);
    Ok(())
}
