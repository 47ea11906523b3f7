use std::path::Path;

use flyline_common::Viewport;
use serde::{Deserialize, Serialize};

use crate::event::InputEvent;
use crate::sink::InputSink;

/// Errors from loading an input script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("frame {index} has a negative dt ({dt})")]
    NegativeDt { index: usize, dt: f32 },
}

fn default_dt() -> f32 {
    1.0 / 60.0
}

/// Events delivered before one frame update, and that frame's delta time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFrame {
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default)]
    pub events: Vec<InputEvent>,
}

impl ScriptFrame {
    pub fn new(dt: f32, events: Vec<InputEvent>) -> Self {
        Self { dt, events }
    }

    /// Push this frame's events into `sink`.
    pub fn deliver<S: InputSink>(&self, sink: &mut S) {
        for event in &self.events {
            sink.push_event(*event);
        }
    }
}

/// A recorded or hand-written sequence of input frames for headless runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    /// Viewport the script was authored against.
    #[serde(default)]
    pub viewport: Viewport,
    pub frames: Vec<ScriptFrame>,
}

impl InputScript {
    pub fn from_yaml_str(text: &str) -> Result<Self, ScriptError> {
        let script: InputScript = serde_yaml::from_str(text)?;
        for (index, frame) in script.frames.iter().enumerate() {
            if frame.dt < 0.0 {
                return Err(ScriptError::NegativeDt {
                    index,
                    dt: frame.dt,
                });
            }
        }
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let script = Self::from_yaml_str(&text)?;
        tracing::debug!(
            "loaded input script {} ({} frames)",
            path.display(),
            script.frames.len()
        );
        Ok(script)
    }

    pub fn total_time(&self) -> f32 {
        self.frames.iter().map(|f| f.dt).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Key, MouseButton};
    use std::io::Write;

    const SCRIPT: &str = r#"
viewport: { width: 400, height: 200 }
frames:
  - events:
      - { kind: cursor_moved, x: 0, y: 0 }
      - { kind: button, button: left, pressed: true }
  - dt: 0.5
    events:
      - { kind: key, key: p, pressed: true }
  - dt: 0.25
"#;

    #[test]
    fn parses_frames_and_defaults() {
        let script = InputScript::from_yaml_str(SCRIPT).expect("parse script");
        assert_eq!(script.viewport, Viewport::new(400, 200));
        assert_eq!(script.frames.len(), 3);
        assert_eq!(script.frames[0].dt, default_dt());
        assert_eq!(
            script.frames[0].events[1],
            InputEvent::click(MouseButton::Left)
        );
        assert_eq!(script.frames[1].events, vec![InputEvent::key_down(Key::P)]);
        assert!(script.frames[2].events.is_empty());
        assert!((script.total_time() - (default_dt() + 0.75)).abs() < 1e-6);
    }

    #[test]
    fn rejects_negative_dt() {
        let err = InputScript::from_yaml_str("frames:\n  - dt: -1.0\n").unwrap_err();
        assert!(matches!(err, ScriptError::NegativeDt { index: 0, .. }));
    }

    #[test]
    fn deliver_pushes_into_sink() {
        let script = InputScript::from_yaml_str(SCRIPT).expect("parse script");
        let mut sink: Vec<InputEvent> = Vec::new();
        script.frames[0].deliver(&mut sink);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SCRIPT.as_bytes()).expect("write script");
        let script = InputScript::load(file.path()).expect("load script");
        assert_eq!(script.frames.len(), 3);
    }

    #[test]
    fn shipped_scripts_parse() {
        for text in [
            include_str!("../../../scripts/draw_line.yaml"),
            include_str!("../../../scripts/walk_and_jump.yaml"),
        ] {
            let script = InputScript::from_yaml_str(text).expect("parse shipped script");
            assert!(!script.frames.is_empty());
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = InputScript::load("/nonexistent/flyline/script.yaml").unwrap_err();
        assert!(matches!(err, ScriptError::Io(_)));
    }
}
