use std::path::PathBuf;

use bard_core::{
    AppConfig, BardError, BardWeapon, HolderId, SlotItem, SongLibrary, SongSource, Vec2,
    WeaponSave,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> bard_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let library = SongLibrary::builtin();

    match cli.command {
        Commands::Songs => {
            list_songs(&library);
            Ok(())
        }
        Commands::Preview { song, start, count } => preview(&library, &song, start, count),
        Commands::Simulate(args) => simulate(&library, args),
        Commands::Inspect { save, config } => inspect(&library, &save, config.as_deref()),
    }
}

fn list_songs(library: &SongLibrary) {
    for song in library.songs() {
        println!("{:<20} {}", song.key(), song.display_name());
    }
}

fn resolve_song(
    library: &SongLibrary,
    key: &str,
) -> bard_core::Result<std::sync::Arc<dyn SongSource>> {
    library.get(key).ok_or_else(|| {
        let known: Vec<&str> = library.keys().collect();
        BardError::msg(format!("unknown song `{key}` (known: {})", known.join(", ")))
    })
}

fn load_config(path: Option<&std::path::Path>) -> bard_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading config");
            AppConfig::load(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn preview(library: &SongLibrary, key: &str, start: u32, count: u32) -> bard_core::Result<()> {
    let song = resolve_song(library, key)?;
    println!("{}", song.display_name());
    for index in start..start.saturating_add(count) {
        let note = song.next_note(index);
        println!(
            "{index:>5}  kind={} delay={:>3} pitch={:.2} dmg×{:.0} extra={}",
            note.kind, note.delay, note.pitch, note.damage_multiplier, note.extra_count
        );
    }
    Ok(())
}

fn simulate(library: &SongLibrary, args: SimulateArgs) -> bard_core::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut weapon = BardWeapon::from_config(&config);
    if let Some(key) = args.song.as_deref() {
        let song = resolve_song(library, key)?;
        weapon.sequencer_mut().attach_song(SlotItem::Song(song));
    }
    tracing::info!(
        song = %weapon.sequencer().current_song_display_name(),
        ticks = args.ticks,
        press_every = args.press_every,
        "starting simulation"
    );

    let position = Vec2::new(0.0, 0.0);
    let aim = Vec2::new(1.0, 0.0);
    let period = args.press_every.max(1);
    let hold = args.hold.clamp(1, period);
    let mut notes = 0usize;
    let mut projectiles = 0usize;
    for tick in 0..args.ticks {
        let held = tick % period < hold;
        if args.release_animation && !held {
            weapon.end_animation();
        }
        weapon.hold_tick(held, position, aim, HolderId(0));
        for emission in weapon.take_emissions() {
            notes += 1;
            projectiles += emission.projectiles.len();
            let damage = emission.projectiles.first().map_or(0, |p| p.damage);
            println!(
                "tick {tick:>5}  note #{:<4} kind={} projectiles={} damage={} pitch={:.2}",
                weapon.sequencer().current_index().saturating_sub(1),
                emission.note.kind,
                emission.projectiles.len(),
                damage,
                emission.note.pitch
            );
        }
    }
    tracing::info!(notes, projectiles, "simulation finished");

    if let Some(path) = args.save {
        weapon.save().write(&path)?;
        tracing::info!(?path, "weapon saved");
    }
    Ok(())
}

fn inspect(
    library: &SongLibrary,
    save: &std::path::Path,
    config: Option<&std::path::Path>,
) -> bard_core::Result<()> {
    let config = load_config(config)?;
    let record = WeaponSave::read(save)?;
    let sequencer = record.restore(library, config.sequencer.default_note);
    let weapon = BardWeapon::with_sequencer(&config, sequencer);
    for line in weapon.tooltip() {
        println!("{line}");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the bard note sequencer from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the songs that can be attached.
    Songs,
    /// Print the notes a song produces.
    Preview {
        /// Key of the song to preview.
        #[arg(short, long)]
        song: String,
        /// First index to print.
        #[arg(long, default_value_t = 0)]
        start: u32,
        /// Number of notes to print.
        #[arg(short, long, default_value_t = 22)]
        count: u32,
    },
    /// Hold the weapon for a number of ticks with a scripted trigger.
    Simulate(SimulateArgs),
    /// Load a saved weapon and print its tooltip.
    Inspect {
        /// Path to the saved weapon record.
        save: PathBuf,
        /// Optional JSON config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// Song to attach before the first tick. Leave empty to play the default note.
    #[arg(short, long)]
    song: Option<String>,
    /// Number of ticks to run.
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,
    /// Ticks between the start of consecutive presses.
    #[arg(long, default_value_t = 30)]
    press_every: u32,
    /// Ticks the trigger stays down on each press.
    #[arg(long, default_value_t = 3)]
    hold: u32,
    /// End the holder's use animation whenever the trigger is up, arming a
    /// restart as soon as the countdown bottoms out.
    #[arg(long)]
    release_animation: bool,
    /// Optional JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the weapon's save record here when the run ends.
    #[arg(long)]
    save: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simulate_with_release_animation() {
        let cli = Cli::try_parse_from([
            "bard-app",
            "simulate",
            "--song",
            "example",
            "--release-animation",
        ])
        .expect("simulate arguments should parse");

        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.song.as_deref(), Some("example"));
                assert!(args.release_animation);
                assert_eq!(args.ticks, 600);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn release_animation_defaults_off() {
        let cli = Cli::try_parse_from(["bard-app", "simulate"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => assert!(!args.release_animation),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_preview_song_flag() {
        let cli = Cli::try_parse_from(["bard-app", "preview", "--song", "example", "-c", "5"])
            .expect("preview arguments should parse");

        match cli.command {
            Commands::Preview { song, start, count } => {
                assert_eq!(song, "example");
                assert_eq!(start, 0);
                assert_eq!(count, 5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn simulate_runs_without_song() {
        let library = SongLibrary::builtin();
        let cli = Cli::try_parse_from(["bard-app", "simulate", "--ticks", "120"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => assert!(simulate(&library, args).is_ok()),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
