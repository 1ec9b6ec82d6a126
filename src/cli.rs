// SPDX-License-Identifier: MIT

use std::io::IsTerminal;
use std::process::{Child, Command, Stdio};

use clap::Args;
use log::warn;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::Config;

#[derive(Debug, Clone, Default, Args)]
pub struct Options {
    /// Whether the output should be run through a pager
    #[clap(long)]
    pub pager: Option<bool>,

    /// Whether the output should be colored
    #[clap(long)]
    pub color: Option<bool>,
}
impl Options {
    /// Fill in choices left open on the command line from the config file.
    pub fn with_config(self, config: &Config) -> Options {
        Options {
            pager: self.pager.or(config.pager),
            color: self.color.or(config.color),
        }
    }
}

fn spawn_pager() -> Option<Child> {
    match Command::new("less")
        .arg("-FR")
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
    {
        Ok(child) => Some(child),
        Err(err) => {
            warn!("could not start pager: {}", err);
            None
        }
    }
}

/// Output stream of a command line tool, optionally piped through `less`.
pub struct Cli {
    stream: Box<dyn WriteColor>,
    pager: Option<Child>,
}
impl Cli {
    pub fn new(options: Options) -> Cli {
        let is_terminal = std::io::stdout().is_terminal();
        let use_pager = options.pager.unwrap_or(is_terminal);
        let use_color = options.color.unwrap_or(is_terminal);

        let mut pager = if use_pager { spawn_pager() } else { None };
        let pager_stdin = pager.as_mut().and_then(|pager| pager.stdin.take());

        let stream: Box<dyn WriteColor> = match pager_stdin {
            Some(stdin) if use_color => Box::new(termcolor::Ansi::new(stdin)),
            Some(stdin) => Box::new(termcolor::NoColor::new(stdin)),
            None => {
                let color = if use_color { ColorChoice::Always } else { ColorChoice::Never };
                Box::new(StandardStream::stdout(color))
            }
        };

        Cli { stream, pager }
    }

    pub fn stream(&mut self) -> &mut dyn WriteColor {
        self.stream.as_mut()
    }
}

impl Drop for Cli {
    fn drop(&mut self) {
        // Close the pager's stdin so it sees EOF.
        self.stream = Box::new(termcolor::NoColor::new(std::io::sink()));

        // Wait for the pager to exit, otherwise it ends up killed by the shell
        // and leaves the terminal in a bad state.
        if let Some(pager) = &mut self.pager {
            pager.wait().ok();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn command_line_overrides_config() {
        let config = Config {
            color: Some(true),
            pager: Some(false),
            ..Default::default()
        };
        let options = Options {
            pager: None,
            color: Some(false),
        }
        .with_config(&config);
        assert_eq!(options.color, Some(false));
        assert_eq!(options.pager, Some(false));
    }
}
