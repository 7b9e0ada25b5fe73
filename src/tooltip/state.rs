use crate::registry::{DefinitionResult, FetchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Fetching,
    Succeeded,
    Failed,
}

/// Everything one tooltip remembers for the lifetime of its element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetState {
    pub fetch: FetchState,
    pub expanded: bool,
    pub result: Option<DefinitionResult>,
    pub error: Option<FetchError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Triggered,
    FetchSucceeded(DefinitionResult),
    FetchFailed(FetchError),
    ToggleClicked,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Fetch,
}

/// Apply `event` to `state`.
///
/// Only the first trigger issues a fetch; completed or failed widgets keep
/// their outcome and completions arriving outside `Fetching` are dropped.
pub fn reduce(mut state: WidgetState, event: Event) -> (WidgetState, Option<Command>) {
    match (state.fetch, event) {
        (FetchState::Idle, Event::Triggered) => {
            state.fetch = FetchState::Fetching;
            (state, Some(Command::Fetch))
        }
        (FetchState::Fetching, Event::FetchSucceeded(result)) => {
            state.fetch = FetchState::Succeeded;
            state.expanded = false;
            state.result = Some(result);
            (state, None)
        }
        (FetchState::Fetching, Event::FetchFailed(err)) => {
            state.fetch = FetchState::Failed;
            state.error = Some(err);
            (state, None)
        }
        (FetchState::Succeeded, Event::ToggleClicked) => {
            state.expanded = !state.expanded;
            (state, None)
        }
        (_, _) => (state, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> DefinitionResult {
        DefinitionResult {
            name: "Age".to_string(),
            short_definition: "Years".to_string(),
            long_definition: "Years lived".to_string(),
            source_link: "https://registry.example/item/1/".to_string(),
        }
    }

    fn run(events: Vec<Event>) -> (WidgetState, Vec<Command>) {
        let mut state = WidgetState::default();
        let mut commands = Vec::new();
        for event in events {
            let (next, command) = reduce(state, event);
            state = next;
            commands.extend(command);
        }
        (state, commands)
    }

    #[test]
    fn test_first_trigger_fetches() {
        let (state, commands) = run(vec![Event::Triggered]);
        assert_eq!(state.fetch, FetchState::Fetching);
        assert_eq!(commands, vec![Command::Fetch]);
    }

    #[test]
    fn test_trigger_while_fetching_is_dropped() {
        let (state, commands) = run(vec![Event::Triggered, Event::Triggered, Event::Triggered]);
        assert_eq!(state.fetch, FetchState::Fetching);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_success_is_cached() {
        let (state, commands) = run(vec![
            Event::Triggered,
            Event::FetchSucceeded(result()),
            Event::Triggered,
        ]);
        assert_eq!(state.fetch, FetchState::Succeeded);
        assert_eq!(state.result, Some(result()));
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_failure_is_terminal() {
        let (state, commands) = run(vec![
            Event::Triggered,
            Event::FetchFailed(FetchError::ServerError),
            Event::Triggered,
            Event::FetchSucceeded(result()),
        ]);
        assert_eq!(state.fetch, FetchState::Failed);
        assert_eq!(state.error, Some(FetchError::ServerError));
        assert_eq!(state.result, None);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_completion_without_trigger_is_ignored() {
        let (state, _) = run(vec![Event::FetchSucceeded(result())]);
        assert_eq!(state, WidgetState::default());
    }

    #[test]
    fn test_toggle_flips_only_after_success() {
        let (state, _) = run(vec![Event::ToggleClicked]);
        assert!(!state.expanded);

        let (state, commands) = run(vec![
            Event::Triggered,
            Event::FetchSucceeded(result()),
            Event::ToggleClicked,
        ]);
        assert!(state.expanded);
        assert_eq!(commands.len(), 1);

        let (state, _) = reduce(state, Event::ToggleClicked);
        assert!(!state.expanded);
    }
}
