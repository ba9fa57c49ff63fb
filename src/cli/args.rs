//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use bundlebox::config::ConfigOverrides;

/// Bundlebox on-demand CSS/JS bundler CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Root directory of file fragments (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub src: Option<PathBuf>,

    /// Directory of combined artifacts (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub dst: Option<PathBuf>,

    /// Config file path (default: bundlebox.toml)
    #[arg(short = 'C', long, global = true, default_value = "bundlebox.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve combined assets, building them on first request
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Combine fragments into one minified asset
    #[command(visible_alias = "b")]
    Bundle {
        #[command(flatten)]
        args: BundleArgs,
    },

    /// Print the fragment fingerprints of a token
    #[command(visible_alias = "d")]
    Decode {
        /// Token, with or without extension (`12.0.3` or `12.0.3.css`)
        token: String,
    },
}

/// Bundle command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BundleArgs {
    /// Combine stylesheets
    #[arg(long, conflicts_with = "js", required_unless_present = "js")]
    pub css: bool,

    /// Combine scripts
    #[arg(long)]
    pub js: bool,

    /// Inline source text (repeatable)
    #[arg(short = 'I', long, value_name = "TEXT")]
    pub inline: Vec<String>,

    /// File relative to the source root (repeatable)
    #[arg(short = 'f', long, value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    pub file: Vec<String>,

    /// Absolute URL (repeatable)
    #[arg(short = 'u', long, value_name = "URL", value_hint = clap::ValueHint::Url)]
    pub url: Vec<String>,

    /// Write the combined output here instead of the artifact directory
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Config values given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        let (interface, port) = match &self.command {
            Commands::Serve { interface, port } => (*interface, *port),
            _ => (None, None),
        };
        ConfigOverrides {
            src: self.src.clone(),
            dst: self.dst.clone(),
            interface,
            port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bundle() {
        let cli = Cli::try_parse_from([
            "bundlebox", "bundle", "--css", "-I", ".a{}", "-f", "a.css", "-f", "b.css",
        ])
        .unwrap();
        let Commands::Bundle { args } = cli.command else {
            panic!("expected bundle command");
        };
        assert!(args.css && !args.js);
        assert_eq!(args.inline, [".a{}"]);
        assert_eq!(args.file, ["a.css", "b.css"]);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_bundle_requires_one_media() {
        assert!(Cli::try_parse_from(["bundlebox", "bundle", "-I", "x"]).is_err());
        assert!(Cli::try_parse_from(["bundlebox", "bundle", "--css", "--js"]).is_err());
    }

    #[test]
    fn test_serve_overrides() {
        let cli =
            Cli::try_parse_from(["bundlebox", "--dst", "out", "serve", "--port", "7070"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.port, Some(7070));
        assert_eq!(overrides.dst, Some(PathBuf::from("out")));
        assert!(overrides.interface.is_none());
        assert_eq!(cli.config, PathBuf::from("bundlebox.toml"));
    }
}
