use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use workoutmix::{cli, config, error, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a workout selection from one of your playlists
    Generate(GenerateOptions),

    /// List your playlists
    Playlists(PlaylistsOptions),

    /// Serve the web form
    Serve,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// Name of the playlist, the closest match is used
    #[clap(long, short)]
    pub playlist: String,

    /// Workout type (cardio, strength, yoga or anything else for no tempo filter)
    #[clap(long, short, default_value = "cardio")]
    pub workout: String,

    /// Desired mood (energetic, relaxed, focused, neutral)
    #[clap(long, short, default_value = "energetic")]
    pub mood: String,

    /// Write matching songs to this CSV file
    #[clap(long)]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Only show playlists containing this text
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load .env file. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!(
            "{}\nSet it in your environment or in {}/.env",
            e,
            config::data_dir().display()
        ),
    };

    match cli.command {
        Command::Generate(opt) => {
            cli::generate(&config, opt.playlist, opt.workout, opt.mood, opt.export).await
        }
        Command::Playlists(opt) => cli::list_playlists(&config, opt.search).await,
        Command::Serve => cli::serve(&config).await,
        Command::Completions(_) => {}
    }
}
