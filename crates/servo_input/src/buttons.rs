//! Edge-detecting buttons

/// Toggle that flips its state on each press
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PushButton {
    state: bool,
    was_down: bool,
}

impl PushButton {
    /// Create a button with the given initial state
    pub fn new(state: bool) -> Self {
        Self {
            state,
            was_down: false,
        }
    }

    /// Feed the current key state; returns the toggle state
    pub fn update(&mut self, down: bool) -> bool {
        if down && !self.was_down {
            self.state = !self.state;
        }
        self.was_down = down;
        self.state
    }

    /// Current toggle state
    pub fn state(&self) -> bool {
        self.state
    }
}

/// Fires once per press (rising edge)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerButton {
    was_down: bool,
    fired: bool,
}

impl TriggerButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current key state; returns true on a rising edge
    pub fn update(&mut self, down: bool) -> bool {
        let rising = down && !self.was_down;
        self.was_down = down;
        if rising {
            self.fired = true;
        }
        rising
    }

    /// Consume a pending press
    pub fn consume(&mut self) -> bool {
        let fired = self.fired;
        self.fired = false;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_button_toggles_on_press_only() {
        let mut button = PushButton::new(false);
        assert!(button.update(true));
        // Held (key repeat) keeps the state
        assert!(button.update(true));
        assert!(button.update(false));
        assert!(!button.update(true));
    }

    #[test]
    fn test_trigger_fires_once_per_press() {
        let mut trigger = TriggerButton::new();
        assert!(trigger.update(true));
        assert!(!trigger.update(true));
        assert!(trigger.consume());
        assert!(!trigger.consume());
        assert!(!trigger.update(false));
        assert!(trigger.update(true));
    }
}
