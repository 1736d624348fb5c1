use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use wikirender::{Config, MarkdownRenderer};

/// Reads markdown from the configured input file or stdin.
fn read_input(config: &Config) -> Result<String> {
    match config.input_path() {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => io::read_to_string(io::stdin()).context("Failed to read markdown from stdin"),
    }
}

/// Writes rendered HTML to the configured output file or stdout.
fn write_output(config: &Config, html: &str) -> Result<()> {
    match &config.output {
        Some(path) => fs::write(path, html)
            .with_context(|| format!("Failed to write output file: {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write HTML to stdout")
        }
    }
}

fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_writer(io::stderr)
        .init();

    config.validate().context("Invalid configuration")?;

    let renderer = if config.no_wiki_links {
        MarkdownRenderer::new()
    } else {
        MarkdownRenderer::with_wiki_links()
    };
    tracing::info!(
        resolvers = renderer.resolvers().len(),
        input = ?config.input_path(),
        "Rendering markdown"
    );

    let markdown = read_input(&config)?;
    let fragment = renderer
        .render(&markdown)
        .context("Failed to render markdown")?;

    let html = if config.standalone {
        let stylesheets: Vec<&str> = config.stylesheets.iter().map(String::as_str).collect();
        wikirender::page(&config.page_title(), &stylesheets, &fragment).into_string()
    } else {
        fragment
    };

    write_output(&config, &html)?;
    tracing::info!(bytes = html.len(), output = ?config.output, "Wrote HTML");

    Ok(())
}
