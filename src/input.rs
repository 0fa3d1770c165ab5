//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::heat::Metric;
use crate::nav::{MetricSwitch, NavEvent};

/// Translate a key press into a navigation event. Unbound keys and key
/// releases map to `None`.
pub fn map_key(key: KeyEvent) -> Option<NavEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(NavEvent::Quit),
            _ => None,
        };
    }

    let event = match key.code {
        KeyCode::Char('j') | KeyCode::Down => NavEvent::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => NavEvent::MoveUp,
        KeyCode::Char('o') | KeyCode::Enter | KeyCode::Char(' ') => NavEvent::ToggleNode,
        KeyCode::Char('O') => NavEvent::ExpandAllUnder,
        KeyCode::Char('c') => NavEvent::CollapseAllUnder,
        KeyCode::Tab => NavEvent::SwitchMetric(MetricSwitch::Toggle),
        KeyCode::Char('1') => NavEvent::SwitchMetric(MetricSwitch::To(Metric::Size)),
        KeyCode::Char('2') => NavEvent::SwitchMetric(MetricSwitch::To(Metric::ChangeRate)),
        KeyCode::Char('q') | KeyCode::Esc => NavEvent::Quit,
        _ => return None,
    };
    Some(event)
}

/// Key help shown in the footer
pub const HELP: &str =
    "j/k: Navigate  o: Toggle  O: Expand All  c: Collapse All  Tab/1/2: Switch Mode  q: Quit";
