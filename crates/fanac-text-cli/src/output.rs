use std::io::Write;

use fanac_text::sort_key::{SORT_FIRST, SORT_LAST};
use fanac_text::{SerialDesignation, TaggedSpan};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// One citation and what was extracted from it, for `--json`.
#[derive(Debug, Serialize)]
pub struct SerialRecord<'a> {
    pub input: &'a str,
    #[serde(flatten)]
    pub designation: &'a SerialDesignation,
    pub sort_key: f64,
}

#[derive(Debug, Serialize)]
pub struct NamesRecord<'a> {
    pub input: &'a str,
    pub names: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct ConversionRecord<'a> {
    pub input: &'a str,
    pub output: &'a str,
}

/// Write `value` as pretty JSON followed by a newline.
pub fn print_json<T: Serialize>(w: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

/// Render a sort key, naming the two sentinels.
pub fn format_sort_key(key: f64) -> String {
    if key == SORT_FIRST {
        "first".to_string()
    } else if key == SORT_LAST {
        "last".to_string()
    } else {
        format!("{}", key)
    }
}

fn field(w: &mut dyn Write, name: &str, value: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "  {:<7} {}", format!("{}:", name).dimmed(), value.bold())
    } else {
        writeln!(w, "  {:<7} {}", format!("{}:", name), value)
    }
}

/// Print one extracted serial designation.
pub fn print_designation(
    w: &mut dyn Write,
    input: &str,
    designation: &SerialDesignation,
    sort_key: f64,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "{}", input)?;
    if !designation.is_match() {
        if color.enabled() {
            writeln!(w, "  {}", "(no designation)".yellow())?;
        } else {
            writeln!(w, "  (no designation)")?;
        }
        return Ok(());
    }

    field(w, "label", &designation.label, color)?;
    if let Some(volume) = &designation.volume {
        field(w, "volume", volume, color)?;
    }
    field(w, "number", &designation.number_with_suffix(), color)?;
    field(w, "key", &format_sort_key(sort_key), color)?;
    Ok(())
}

/// Print `(input, key)` pairs, already in order.
pub fn print_sorted(
    w: &mut dyn Write,
    entries: &[(String, f64)],
    color: ColorMode,
) -> std::io::Result<()> {
    let width = entries.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
    for (input, key) in entries {
        let key = format_sort_key(*key);
        if color.enabled() {
            writeln!(w, "{:<width$}  {}", input, key.dimmed(), width = width)?;
        } else {
            writeln!(w, "{:<width$}  {}", input, key, width = width)?;
        }
    }
    Ok(())
}

/// Print the names found in one input line.
pub fn print_names(
    w: &mut dyn Write,
    input: &str,
    names: &[String],
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "{}", input)?;
    for name in names {
        if color.enabled() {
            writeln!(w, "  {} {}", "-".dimmed(), name.green())?;
        } else {
            writeln!(w, "  - {}", name)?;
        }
    }
    Ok(())
}

/// Print the result of a one-to-one conversion.
pub fn print_conversion(
    w: &mut dyn Write,
    input: &str,
    output: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {} {}", input, "->".dimmed(), output.bold())
    } else {
        writeln!(w, "{} -> {}", input, output)
    }
}

/// Print a tagged span, or a note that nothing was found.
pub fn print_span(w: &mut dyn Write, span: &TaggedSpan, color: ColorMode) -> std::io::Result<()> {
    if span.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "(no tagged span)".yellow())?;
        } else {
            writeln!(w, "(no tagged span)")?;
        }
        return Ok(());
    }
    field(w, "tag", &span.tag, color)?;
    field(w, "inner", &span.inner, color)?;
    field(w, "before", &span.leading, color)?;
    field(w, "after", &span.trailing, color)?;
    Ok(())
}
