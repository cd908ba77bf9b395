use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use relmap_graph::Analysis;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

pub const DOT_ENV: &str = "RELMAP_DOT";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Graphviz source
    Dot,
    /// Relation report
    Json,
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    const fn is_image(self) -> bool {
        matches!(self, Self::Svg | Self::Png | Self::Pdf)
    }

    const fn graphviz_type(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Dot => "dot",
            Self::Json => "json",
        }
    }
}

/// Write `analysis` in `format` to `output`, or stdout for text formats
pub fn emit(analysis: &Analysis, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    if format.is_image() {
        let Some(path) = output else {
            bail!("--output is required for {} output", format.graphviz_type());
        };
        return render_image(&analysis.relations.to_dot(), format, path);
    }

    let text = match format {
        OutputFormat::Json => {
            let mut text =
                relmap_protocol::serialize_json_pretty(&analysis.relations.to_report())?;
            text.push('\n');
            text
        }
        _ => analysis.relations.to_dot(),
    };

    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Pipe DOT source through Graphviz
fn render_image(dot: &str, format: OutputFormat, path: &Path) -> Result<()> {
    let program = env::var(DOT_ENV).unwrap_or_else(|_| "dot".to_string());
    let mut child = Command::new(&program)
        .arg(format!("-T{}", format.graphviz_type()))
        .arg("-o")
        .arg(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to run Graphviz ({program}); is it installed?"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(dot.as_bytes())
            .context("Failed to send graph to Graphviz")?;
    }

    let result = child.wait_with_output().context("Graphviz did not finish")?;
    if !result.status.success() {
        bail!(
            "Graphviz exited with {}: {}",
            result.status,
            String::from_utf8_lossy(&result.stderr).trim()
        );
    }
    log::info!("Wrote {}", path.display());
    Ok(())
}
