//! Command-line front end: export saved projects and inspect them.

#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;

use std::fs;
use std::io::{self, Read, Write};

use canvas::export::{self, ExportFormat};
use canvas::geometry::polygon_clip_path;
use canvas::scene::{Project, ProjectError};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error("unknown page `{0}`")]
    UnknownPage(String),
    #[error("a polygon needs at least 3 sides, got {0}")]
    TooFewSides(u32),
    #[error("failed to encode summary: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pagesmith", about = "Export page-layout projects as static HTML/CSS")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export one page of a saved project.
    Export(ExportArgs),
    /// Print the CSS clip-path of a regular polygon.
    Polygon {
        #[arg(long, env = "PAGESMITH_SIDES", default_value_t = 6)]
        sides: u32,
    },
    /// Print a JSON summary of a saved project.
    Info {
        #[arg(long, env = "PAGESMITH_INPUT", default_value = "-", help = "Project file path, or - for stdin")]
        input: String,
    },
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(long, env = "PAGESMITH_INPUT", default_value = "-", help = "Project file path, or - for stdin")]
    pub input: String,

    #[arg(long, env = "PAGESMITH_FORMAT", value_enum, default_value_t = FormatArg::Html)]
    pub format: FormatArg,

    #[arg(long, env = "PAGESMITH_PAGE", help = "Page id to export, or `main`; defaults to the saved current page")]
    pub page: Option<String>,

    #[arg(long, env = "PAGESMITH_OUTPUT", default_value = "-", help = "Output file path, or - for stdout")]
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Html,
    Css,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => ExportFormat::Html,
            FormatArg::Css => ExportFormat::Css,
        }
    }
}

/// Per-page counts reported by `info`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub name: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub elements: usize,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub current_page: String,
    pub pages: Vec<PageSummary>,
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Export(args) => {
            let json = read_input(&args.input)?;
            let out = render_export(&json, args.format.into(), args.page.as_deref())?;
            info!(input = %args.input, format = ?args.format, bytes = out.len(), "exported");
            write_output(&args.output, &out)
        }
        Command::Polygon { sides } => write_output("-", &format!("{}\n", polygon(sides)?)),
        Command::Info { input } => {
            let project = Project::from_json(&read_input(&input)?)?;
            let summary = serde_json::to_string_pretty(&summarize(&project))?;
            write_output("-", &format!("{summary}\n"))
        }
    }
}

/// Decode `json` and export `page` (or the saved current page).
pub fn render_export(json: &str, format: ExportFormat, page: Option<&str>) -> Result<String, CliError> {
    let mut project = Project::from_json(json)?;
    if let Some(page) = page {
        if !project.change_page(page) {
            return Err(CliError::UnknownPage(page.to_string()));
        }
    }
    debug!(page = project.active_page_id(), elements = project.active_elements().len(), "rendering");
    Ok(export::export(&project, format))
}

pub fn polygon(sides: u32) -> Result<String, CliError> {
    if sides < 3 {
        return Err(CliError::TooFewSides(sides));
    }
    Ok(polygon_clip_path(sides as usize))
}

#[must_use]
pub fn summarize(project: &Project) -> ProjectSummary {
    let main = PageSummary {
        id: canvas::consts::MAIN_PAGE_ID.to_string(),
        name: project.name.clone(),
        canvas_width: project.canvas_width,
        canvas_height: project.canvas_height,
        elements: project.elements.len(),
    };
    let pages = std::iter::once(main)
        .chain(project.pages.iter().map(|p| PageSummary {
            id: p.id.clone(),
            name: p.name.clone(),
            canvas_width: p.canvas_width,
            canvas_height: p.canvas_height,
            elements: p.elements.len(),
        }))
        .collect();
    ProjectSummary { name: project.name.clone(), current_page: project.active_page_id().to_string(), pages }
}

fn read_input(path: &str) -> Result<String, CliError> {
    let read_err = |source: io::Error| CliError::Read { path: path.to_string(), source };
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(read_err)?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(read_err)
    }
}

fn write_output(path: &str, content: &str) -> Result<(), CliError> {
    let write_err = |source: io::Error| CliError::Write { path: path.to_string(), source };
    if path == "-" {
        io::stdout().write_all(content.as_bytes()).map_err(write_err)
    } else {
        fs::write(path, content).map_err(write_err)
    }
}
