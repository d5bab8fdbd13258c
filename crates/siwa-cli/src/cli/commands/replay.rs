//! `siwa replay`: fold recorded actions through the reducer.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use siwa_core::reducer::reduce_all;
use siwa_core::{SiwaAction, SiwaState};

pub fn run(file: &Path) -> Result<()> {
    let contents = read_input(file)?;
    let actions: Vec<SiwaAction> = serde_json::from_str(&contents)
        .with_context(|| format!("parse actions from {}", file.display()))?;

    tracing::debug!(count = actions.len(), "replaying actions");
    let state = reduce_all(&SiwaState::empty(), &actions);

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("read actions from stdin")?;
        return Ok(contents);
    }
    std::fs::read_to_string(file).with_context(|| format!("read actions from {}", file.display()))
}
