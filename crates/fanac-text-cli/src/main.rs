use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fanac_text::config_file::{self, ConfigFile};
use fanac_text::scanner::WILDCARD;
use fanac_text::{
    TextConfig, designation_from_markup, extract_trailing_serial_designation,
    file_name_to_page_name, find_tagged, page_name_to_file_name, page_name_to_url_name,
    sort_key_for_messy_number, url_name_to_page_name,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod output;

use output::{ColorMode, ConversionRecord, NamesRecord, SerialRecord};

/// Fanzine citation helper - pull issue numbers, names and page-name encodings out of scraped text
///
/// Commands read their input from the TEXT arguments, or one item per line
/// from stdin when none are given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ./.fanac-text.toml and the platform config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the trailing volume/number designation from citation strings
    Serial {
        text: Vec<String>,

        /// Skip the bare-number and spaced-Roman fallbacks
        #[arg(long)]
        strict: bool,

        /// Require the designation to end the text exactly
        #[arg(long)]
        complete: bool,

        /// Never read trailing letters as Roman numerals
        #[arg(long)]
        ignore_roman: bool,
    },

    /// Order messy issue numbers (12, 12a, XIV, 3 1/2, ...)
    SortKeys { text: Vec<String> },

    /// Split lists of names into display-order names
    Names {
        text: Vec<String>,

        /// Print each name in "Last, First" order
        #[arg(long)]
        sort: bool,
    },

    /// Encode page names as case-preserving file names
    PageToFile { text: Vec<String> },

    /// Decode file names back to page names
    FileToPage { text: Vec<String> },

    /// Convert page names to URL names
    PageToUrl { text: Vec<String> },

    /// Convert URL names back to page names
    UrlToPage { text: Vec<String> },

    /// Find the first <TAG>...</TAG> span ("*" matches any tag)
    Scan {
        tag: String,

        text: Vec<String>,

        /// Match the tag name regardless of case
        #[arg(long)]
        ignore_case: bool,

        /// Strip simple markup from the inner text
        #[arg(long)]
        strip_markup: bool,

        /// Keep the tag markers in the inner text
        #[arg(long)]
        include_markers: bool,

        /// Also extract a serial designation from the span
        #[arg(long)]
        serial: bool,
    },

    /// Print the effective configuration file as TOML
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => config_file::read_from_path(path)?,
        None => config_file::load_config(),
    };
    let color = ColorMode(!cli.no_color && !cli.json && std::io::stdout().is_terminal());
    let mut writer: Box<dyn Write> = Box::new(std::io::stdout().lock());
    let w = writer.as_mut();

    match cli.command {
        Command::Config => {
            write!(w, "{}", toml::to_string_pretty(&file)?)?;
        }
        Command::Serial {
            text,
            strict,
            complete,
            ignore_roman,
        } => {
            let mut config = build_config(file)?;
            config.serial.strict |= strict;
            config.serial.complete |= complete;
            config.serial.ignore_roman |= ignore_roman;
            serial(w, &inputs(text)?, &config, cli.json, color)?;
        }
        Command::SortKeys { text } => sort_keys(w, inputs(text)?, cli.json, color)?,
        Command::Names { text, sort } => {
            let config = build_config(file)?;
            names(w, &inputs(text)?, &config, sort, cli.json, color)?;
        }
        Command::PageToFile { text } => {
            convert(w, &inputs(text)?, page_name_to_file_name, cli.json, color)?
        }
        Command::FileToPage { text } => {
            convert(w, &inputs(text)?, file_name_to_page_name, cli.json, color)?
        }
        Command::PageToUrl { text } => {
            convert(w, &inputs(text)?, page_name_to_url_name, cli.json, color)?
        }
        Command::UrlToPage { text } => {
            convert(w, &inputs(text)?, url_name_to_page_name, cli.json, color)?
        }
        Command::Scan {
            tag,
            text,
            ignore_case,
            strip_markup,
            include_markers,
            serial,
        } => {
            if tag.is_empty() {
                anyhow::bail!("tag must not be empty (use \"{}\" for any tag)", WILDCARD);
            }
            let mut config = build_config(file)?;
            config.scan.case_insensitive |= ignore_case;
            config.scan.strip_markup |= strip_markup;
            config.scan.include_markers |= include_markers;
            scan(w, &inputs(text)?, &tag, &config, serial, cli.json, color)?;
        }
    }

    w.flush()?;
    Ok(())
}

fn build_config(file: ConfigFile) -> anyhow::Result<TextConfig> {
    file.into_builder()
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))
}

/// Arguments if given, otherwise the non-blank lines of stdin.
fn inputs(args: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args);
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("No input: pass TEXT arguments or pipe lines on stdin");
    }
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn serial(
    w: &mut dyn Write,
    inputs: &[String],
    config: &TextConfig,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let options = config.serial;
    let results: Vec<_> = inputs
        .iter()
        .map(|input| {
            let designation = extract_trailing_serial_designation(
                input,
                options.strict,
                options.complete,
                options.ignore_roman,
            );
            let key = sort_key_for_messy_number(&designation.number_with_suffix());
            (input.as_str(), designation, key)
        })
        .collect();

    if json {
        let records: Vec<SerialRecord> = results
            .iter()
            .map(|(input, designation, key)| SerialRecord {
                input,
                designation,
                sort_key: *key,
            })
            .collect();
        return output::print_json(w, &records);
    }
    for (input, designation, key) in &results {
        output::print_designation(w, input, designation, *key, color)?;
    }
    Ok(())
}

fn sort_keys(
    w: &mut dyn Write,
    inputs: Vec<String>,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut entries: Vec<(String, f64)> = inputs
        .into_iter()
        .map(|input| {
            let key = sort_key_for_messy_number(&input);
            (input, key)
        })
        .collect();
    // Stable, so inputs with equal keys keep their order.
    entries.sort_by(|a, b| a.1.total_cmp(&b.1));

    if json {
        return output::print_json(w, &entries);
    }
    output::print_sorted(w, &entries, color)?;
    Ok(())
}

fn names(
    w: &mut dyn Write,
    inputs: &[String],
    config: &TextConfig,
    sort: bool,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let results: Vec<(&str, Vec<String>)> = inputs
        .iter()
        .map(|input| {
            let mut names = fanac_text::names::split_name_list_with_config(input, config);
            if sort {
                names = names
                    .iter()
                    .map(|n| fanac_text::names::sort_form_with_config(n, config))
                    .collect();
            }
            (input.as_str(), names)
        })
        .collect();

    if json {
        let records: Vec<NamesRecord> = results
            .iter()
            .map(|(input, names)| NamesRecord { input, names })
            .collect();
        return output::print_json(w, &records);
    }
    for (input, names) in &results {
        output::print_names(w, input, names, color)?;
    }
    Ok(())
}

fn convert(
    w: &mut dyn Write,
    inputs: &[String],
    f: fn(&str) -> String,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let results: Vec<(&str, String)> = inputs.iter().map(|i| (i.as_str(), f(i))).collect();

    if json {
        let records: Vec<ConversionRecord> = results
            .iter()
            .map(|(input, output)| ConversionRecord { input, output })
            .collect();
        return output::print_json(w, &records);
    }
    for (input, converted) in &results {
        output::print_conversion(w, input, converted, color)?;
    }
    Ok(())
}

fn scan(
    w: &mut dyn Write,
    inputs: &[String],
    tag: &str,
    config: &TextConfig,
    with_serial: bool,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    for input in inputs {
        let span = find_tagged(input, tag, &config.scan);
        let designation = if with_serial {
            designation_from_markup(input, tag, config)
        } else {
            None
        };

        if json {
            let found = (!span.is_empty()).then_some(&span);
            let record = designation.as_ref().map(|(d, key)| SerialRecord {
                input: &span.inner,
                designation: d,
                sort_key: *key,
            });
            let value = serde_json::json!({
                "input": input,
                "span": found,
                "designation": record,
            });
            output::print_json(w, &value)?;
            continue;
        }

        output::print_span(w, &span, color)?;
        if let Some((d, key)) = &designation {
            output::print_designation(w, &span.inner, d, *key, color)?;
        }
    }
    Ok(())
}
