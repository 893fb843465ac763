use std::{fs, iter, path::Path};

use anyhow::{Context, Result};
use road_skirmish_core::DirectionalIntent;
use serde::Deserialize;

/// Input for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FrameInput {
    pub(crate) intent: DirectionalIntent,
    pub(crate) attack: bool,
}

/// Scripted input replayed one frame at a time.
///
/// Each step holds its directions for `frames` frames. An attack fires on
/// the first frame of its step only, the way a key press does.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct InputScript {
    #[serde(default)]
    steps: Vec<ScriptStep>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptStep {
    #[serde(default = "single_frame")]
    frames: usize,
    #[serde(default)]
    left: bool,
    #[serde(default)]
    right: bool,
    #[serde(default)]
    up: bool,
    #[serde(default)]
    down: bool,
    #[serde(default)]
    attack: bool,
}

const fn single_frame() -> usize {
    1
}

impl InputScript {
    /// Loads a script from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid input script at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse input script toml contents")
    }

    /// Total number of frames covered by the script.
    pub(crate) fn frame_count(&self) -> usize {
        self.steps.iter().map(|step| step.frames).sum()
    }

    /// Scripted frames followed by idle frames forever.
    pub(crate) fn frames(&self) -> impl Iterator<Item = FrameInput> + '_ {
        self.steps
            .iter()
            .flat_map(|step| {
                let intent = DirectionalIntent {
                    left: step.left,
                    right: step.right,
                    up: step.up,
                    down: step.down,
                };
                (0..step.frames).map(move |frame| FrameInput {
                    intent,
                    attack: step.attack && frame == 0,
                })
            })
            .chain(iter::repeat(FrameInput::default()))
    }
}
