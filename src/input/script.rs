//! Scripted input for headless runs
//!
//! Each script line is `"<step> <KeyName> <down|up>"` for a key event or
//! `"<step> <lift|tilt|palette> <value>"` for a slider move. Events are
//! replayed at the start of their step, in the order they were written.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// A UI slider the script can move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Lift,
    /// Degrees
    Tilt,
    Palette,
}

/// What a script event does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptAction {
    Key(KeyCode, ElementState),
    Slider(Slider, f32),
}

/// One scripted event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptEvent {
    pub step: u32,
    pub action: ScriptAction,
}

/// A script line could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptError {
    /// Zero-based line index
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

fn parse_key(name: &str) -> Option<KeyCode> {
    let key = match name {
        "KeyW" => KeyCode::KeyW,
        "KeyA" => KeyCode::KeyA,
        "KeyS" => KeyCode::KeyS,
        "KeyD" => KeyCode::KeyD,
        "KeyC" => KeyCode::KeyC,
        "KeyP" => KeyCode::KeyP,
        "Escape" => KeyCode::Escape,
        "F1" => KeyCode::F1,
        _ => return None,
    };
    Some(key)
}

fn parse_line(index: usize, line: &str) -> Result<ScriptEvent, ScriptError> {
    let error = |message: String| ScriptError { line: index, message };

    let parts: Vec<&str> = line.split_whitespace().collect();
    let [step, target, value] = parts.as_slice() else {
        return Err(error(format!("expected 3 fields, got {}", parts.len())));
    };
    let step: u32 = step
        .parse()
        .map_err(|_| error(format!("bad step '{}'", step)))?;

    let slider = match *target {
        "lift" => Some(Slider::Lift),
        "tilt" => Some(Slider::Tilt),
        "palette" => Some(Slider::Palette),
        _ => None,
    };
    let action = match slider {
        Some(slider) => {
            let v: f32 = value
                .parse()
                .map_err(|_| error(format!("bad slider value '{}'", value)))?;
            ScriptAction::Slider(slider, v)
        }
        None => {
            let key = parse_key(target).ok_or_else(|| error(format!("unknown key '{}'", target)))?;
            let state = match *value {
                "down" => ElementState::Pressed,
                "up" => ElementState::Released,
                other => return Err(error(format!("expected down or up, got '{}'", other))),
            };
            ScriptAction::Key(key, state)
        }
    };
    Ok(ScriptEvent { step, action })
}

/// Parsed script with a replay cursor
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    events: Vec<ScriptEvent>,
    cursor: usize,
}

impl InputScript {
    /// Parse script lines; blank lines and `#` comments are skipped
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, ScriptError> {
        let mut events = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            events.push(parse_line(index, line)?);
        }
        // Stable: same-step events keep their written order
        events.sort_by_key(|e| e.step);
        Ok(Self { events, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events due at or before `step` that have not been replayed yet
    pub fn take_due(&mut self, step: u32) -> &[ScriptEvent] {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].step <= step {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_and_slider() {
        let script = InputScript::parse(&["0 KeyW down", "30 lift 1.2", "# comment", "", "60 KeyW up"]).unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(
            script.events[0].action,
            ScriptAction::Key(KeyCode::KeyW, ElementState::Pressed)
        );
        assert_eq!(script.events[1].action, ScriptAction::Slider(Slider::Lift, 1.2));
        assert_eq!(script.events[2].step, 60);
    }

    #[test]
    fn test_events_sorted_by_step() {
        let script = InputScript::parse(&["10 KeyD down", "0 KeyW down", "10 KeyD up"]).unwrap();
        let steps: Vec<u32> = script.events.iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![0, 10, 10]);
        assert_eq!(
            script.events[1].action,
            ScriptAction::Key(KeyCode::KeyD, ElementState::Pressed)
        );
    }

    #[test]
    fn test_take_due() {
        let mut script = InputScript::parse(&["0 KeyW down", "5 KeyW up", "5 tilt 10", "9 KeyP down"]).unwrap();
        assert_eq!(script.take_due(0).len(), 1);
        assert!(script.take_due(4).is_empty());
        assert_eq!(script.take_due(7).len(), 2);
        assert_eq!(script.take_due(100).len(), 1);
        assert!(script.take_due(200).is_empty());
    }

    #[test]
    fn test_parse_errors() {
        let err = InputScript::parse(&["0 KeyW down", "x KeyW down"]).unwrap_err();
        assert_eq!(err.line, 1);

        assert!(InputScript::parse(&["0 KeyQ down"]).is_err());
        assert!(InputScript::parse(&["0 KeyW sideways"]).is_err());
        assert!(InputScript::parse(&["0 lift high"]).is_err());
        assert!(InputScript::parse(&["0 KeyW"]).is_err());
    }
}
