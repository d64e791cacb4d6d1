use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "twc",
    about = "tw-combobulator: assemble a TiddlyWiki from layered sources",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge all layers and build a single-file wiki
    Build(BuildArgs),
    /// Merge all layers into a wiki folder without building
    Merge(MergeArgs),
    /// Show layers in declared and combination order
    Layers(LayersArgs),
    /// Validate a configuration file
    Check(CheckArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Layer configuration (YAML, or TOML with a .toml extension)
    pub config: PathBuf,
    /// Where to write the built wiki
    #[arg(short, long, default_value = "index.html")]
    pub output: PathBuf,
    /// Fetch all layers concurrently before merging
    #[arg(long)]
    pub prefetch: bool,
    /// The tiddlywiki executable
    #[arg(long, default_value = "tiddlywiki")]
    pub tiddlywiki: PathBuf,
}

#[derive(Args)]
pub struct MergeArgs {
    pub config: PathBuf,
    /// Directory to create for the merged wiki folder; must be missing or empty
    #[arg(long)]
    pub out: PathBuf,
    #[arg(long)]
    pub prefetch: bool,
    #[arg(long, default_value = "tiddlywiki")]
    pub tiddlywiki: PathBuf,
}

#[derive(Args)]
pub struct LayersArgs {
    pub config: PathBuf,
}

#[derive(Args)]
pub struct CheckArgs {
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build_defaults() {
        let cli = Cli::try_parse_from(["twc", "build", "wiki.yaml"]).unwrap();
        if let Command::Build(args) = cli.command {
            assert_eq!(args.config, PathBuf::from("wiki.yaml"));
            assert_eq!(args.output, PathBuf::from("index.html"));
            assert_eq!(args.tiddlywiki, PathBuf::from("tiddlywiki"));
            assert!(!args.prefetch);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_build_with_options() {
        let cli = Cli::try_parse_from([
            "twc", "build", "wiki.yaml", "-o", "dist/site.html", "--prefetch",
            "--tiddlywiki", "/opt/tw/bin/tiddlywiki",
        ])
        .unwrap();
        if let Command::Build(args) = cli.command {
            assert_eq!(args.output, PathBuf::from("dist/site.html"));
            assert!(args.prefetch);
            assert_eq!(args.tiddlywiki, PathBuf::from("/opt/tw/bin/tiddlywiki"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_merge_requires_out() {
        assert!(Cli::try_parse_from(["twc", "merge", "wiki.yaml"]).is_err());
        let cli = Cli::try_parse_from(["twc", "merge", "wiki.yaml", "--out", "merged"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.out, PathBuf::from("merged"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_layers_and_check() {
        let cli = Cli::try_parse_from(["twc", "layers", "wiki.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Layers(_)));
        let cli = Cli::try_parse_from(["twc", "check", "wiki.yaml"]).unwrap();
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn config_is_required() {
        assert!(Cli::try_parse_from(["twc", "build"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["twc", "--verbose", "check", "wiki.yaml"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["twc", "layers", "wiki.yaml", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
