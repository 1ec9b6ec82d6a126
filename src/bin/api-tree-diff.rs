// SPDX-License-Identifier: MIT

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use api_tree_diff::*;
use panel::build_file_panel;
use tree::{CodeFile, LineIndex};
use utils::Result;

/// Load a code file, reporting references to ids it does not contain.
fn load(path: &std::path::Path) -> Result<CodeFile> {
    let code_file = utils::read_code_file(path)?;
    let dangling = LineIndex::new(&code_file.review_lines).dangling_references();
    if !dangling.is_empty() {
        info!(
            "{}: {} references to unknown line ids",
            path.display(),
            dangling.len()
        );
    }
    Ok(code_file)
}

#[derive(Parser, Debug)]
#[clap(about = "Render and compare API review trees")]
struct Args {
    /// Configuration file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    #[clap(flatten)]
    output: cli::Options,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a code file as indented plain text
    Render {
        file: PathBuf,

        /// Leave out documentation lines
        #[clap(long)]
        skip_docs: bool,

        /// Spaces per indentation level
        #[clap(long)]
        indent_width: Option<usize>,
    },
    /// Compare two revisions of a code file
    Diff {
        old: PathBuf,
        new: PathBuf,

        /// Print the annotated code file as JSON
        #[clap(long)]
        json: bool,

        /// Include hidden lines
        #[clap(long)]
        show_hidden: bool,
    },
    /// List the stable node id of every displayed line
    Ids { file: PathBuf },
    /// List the navigable scopes of a code file
    Outline { file: PathBuf },
}

fn do_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .init();

    let args = Args::parse();
    let config = config::load_config(args.config.as_deref())?;
    let mut cli = cli::Cli::new(args.output.with_config(&config));

    match args.command {
        Command::Render {
            file,
            skip_docs,
            indent_width,
        } => {
            let code_file = load(&file)?;
            let mut options = config.render_options();
            options.skip_docs |= skip_docs;
            if let Some(indent_width) = indent_width {
                options.indent_width = indent_width;
            }
            let text = render::render_forest(&code_file.review_lines, &options);
            cli.stream().write_all(text.as_bytes())?;
        }
        Command::Diff {
            old,
            new,
            json,
            show_hidden,
        } => {
            let old = load(&old)?;
            let new = load(&new)?;
            let merged = diff::diff_code_files(&old, &new);

            if json {
                writeln!(cli.stream(), "{}", merged.to_json()?)?;
            } else {
                let mut options = config.panel_options();
                options.show_hidden |= show_hidden;
                let panel = build_file_panel(&merged, &options);
                diff_color::Writer::new(config.indent_width).write(cli.stream(), &panel)?;
            }
        }
        Command::Ids { file } => {
            let code_file = load(&file)?;
            let panel = build_file_panel(&code_file, &config.panel_options());
            for row in panel.rows() {
                let indent = " ".repeat(row.indent * config.indent_width);
                writeln!(cli.stream(), "{:>12} {}{}", row.node_id_hash, indent, row.text)?;
                for diagnostic in &row.diagnostics {
                    writeln!(
                        cli.stream(),
                        "{:>12} {}{}: {}",
                        "!",
                        indent,
                        diagnostic.level.name(),
                        diagnostic.text
                    )?;
                }
            }
        }
        Command::Outline { file } => {
            let code_file = load(&file)?;
            let panel = build_file_panel(&code_file, &config.panel_options());
            for entry in panel.navigation() {
                let indent = " ".repeat(entry.depth * config.indent_width);
                writeln!(cli.stream(), "{:>12} {}{}", entry.node_id_hash, indent, entry.label)?;
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = do_main() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
