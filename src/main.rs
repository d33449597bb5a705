use airscribe::Config;
use airscribe::app::{self, DrawOptions};
use airscribe::gesture::QuizSignal;
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "airscribe")]
#[command(version, about = "Draw in the air with hand gestures")]
struct Cli {
    /// Config file to use instead of ~/.config/airscribe/config.toml
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a landmark recording through the drawing engine
    Draw {
        /// JSON-lines recording, one frame of hands per line
        #[arg(long, value_name = "FILE")]
        replay: PathBuf,

        /// Where the final drawing is written
        #[arg(long, short = 'o', value_name = "PNG", default_value = "drawing.png")]
        output: PathBuf,

        /// Program (and arguments) receiving each analyzed drawing on stdin.
        /// Consumes the rest of the command line.
        #[arg(long, value_name = "CMD", num_args = 1.., allow_hyphen_values = true)]
        analyze_with: Option<Vec<String>>,

        /// Save analyzed drawings here instead of running a command
        #[arg(long, value_name = "DIR")]
        snapshot_dir: Option<PathBuf>,

        /// Override the replay speed in frames per second
        #[arg(long, value_name = "FPS")]
        frame_rate: Option<u32>,
    },
    /// Detect quiz hand signals (thumbs-down hint, finger-count answers)
    Quiz {
        /// JSON-lines recording, one frame of hands per line
        #[arg(long, value_name = "FILE")]
        replay: PathBuf,

        /// Only report hints, never answer options
        #[arg(long, action = ArgAction::SetTrue)]
        no_options: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Draw {
            replay,
            output,
            analyze_with,
            snapshot_dir,
            frame_rate,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let options = DrawOptions {
                replay,
                output,
                analyze_with,
                snapshot_dir,
                frame_rate: frame_rate.map(|fps| fps.clamp(1, 120)),
            };
            let summary = app::run_draw(&config, &options)?;
            println!(
                "frames: {}, strokes: {}, analyses: {}",
                summary.frames, summary.mutations, summary.analyses_requested
            );
            println!("saved drawing to {}", options.output.display());
        }
        Command::Quiz { replay, no_options } => {
            for (frame, signal) in app::run_quiz(&replay, !no_options)? {
                match signal {
                    QuizSignal::Hint => println!("frame {}: hint", frame),
                    QuizSignal::SelectOption(n) => println!("frame {}: option {}", frame, n),
                }
            }
        }
    }

    Ok(())
}
