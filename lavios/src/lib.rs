//====================================================================

use std::path::PathBuf;

use engine::{Config, EventLoopError, Runner};
use os::LaviOs;

pub mod os;
pub mod scenes;

//====================================================================

pub fn config() -> Config {
    let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");

    Config {
        title: "LaviOS".into(),
        asset_root: assets.clone(),
        content_root: assets,
        ..Default::default()
    }
}

pub fn run() -> Result<(), EventLoopError> {
    Runner::run(config(), LaviOs::new())
}

//====================================================================
