use anyhow::{Context, Result};
use clap::Parser;

use tickwrap::buffer::{RopeBuffer, TextBuffer};
use tickwrap::cli::CliArgs;
use tickwrap::config::ConverterConfig;
use tickwrap::scanner;

fn main() -> Result<()> {
    tickwrap::tracing::init();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => ConverterConfig::load_from(path),
        None => ConverterConfig::load(),
    };

    let mut total = 0usize;
    for path in &args.files {
        let name = path.to_string_lossy();
        if config.is_file_excluded(&name) {
            tracing::debug!("skipping excluded file {}", name);
            continue;
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut buffer = RopeBuffer::from_text(&text);
        let count = scanner::convert_document(&mut buffer)
            .with_context(|| format!("failed to convert {}", path.display()))?;
        total += count;

        if args.write {
            if count > 0 {
                std::fs::write(path, buffer.content())
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            println!("{}: {} string(s) converted", path.display(), count);
        } else {
            print!("{}", buffer.content());
        }
    }

    if args.write {
        println!("{total} string(s) converted in total");
    }
    Ok(())
}
