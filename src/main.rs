//! board-dnd - replay drag sessions against board fixtures

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use board_dnd::messages::Msg;
use board_dnd::replay::{self, BoardFixture};
use board_dnd::runtime::{RecordingServices, Runtime};
use board_dnd::subgroup_order::{JsonFileSettings, SubGroupOrderStore};
use board_dnd::BoardConfig;

use cli::{CliArgs, Command, ReplayArgs};

fn main() -> Result<()> {
    board_dnd::tracing::init();

    let args = CliArgs::parse();
    match args.command {
        Command::Replay(args) => run_replay(args),
        Command::Config { save } => {
            let config = BoardConfig::load();
            print!("{}", serde_yaml::to_string(&config)?);
            if save {
                config.save().map_err(anyhow::Error::msg)?;
            }
            Ok(())
        }
    }
}

fn run_replay(args: ReplayArgs) -> Result<()> {
    let board = std::fs::read_to_string(&args.board)
        .with_context(|| format!("Failed to read board fixture {}", args.board.display()))?;
    let fixture = BoardFixture::from_yaml(&board)
        .with_context(|| format!("Failed to parse board fixture {}", args.board.display()))?;

    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let script: Vec<Msg> = serde_json::from_str(&script)
        .with_context(|| format!("Failed to parse script {}", args.script.display()))?;

    let sub_group_order = match &args.settings {
        Some(Some(path)) => SubGroupOrderStore::new(JsonFileSettings::open(path)),
        Some(None) => {
            let settings = JsonFileSettings::open_default().map_err(anyhow::Error::msg)?;
            tracing::info!(path = %settings.path().display(), "using view settings from config dir");
            SubGroupOrderStore::new(settings)
        }
        None => SubGroupOrderStore::default(),
    };

    let model = fixture.into_model(sub_group_order, BoardConfig::load());
    let services = RecordingServices {
        fail_details: args.fail_details,
        fail_orders: args.fail_orders,
        ..RecordingServices::default()
    };

    let mut runtime = Runtime::new(model, services);
    tracing::info!(steps = script.len(), "replaying script");
    replay::replay(&mut runtime, script);

    let report = replay::report(&runtime.model, &runtime.services().calls);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
