use crate::config::Config;
use crate::error::SessionError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    Gathering {
        class_id: usize,
    },
    Training {
        resume: Resume,
    },
    Predicting,
}

/// Where a failed fit returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Idle,
    Predicting,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Idle => write!(f, "idle"),
            State::Gathering { class_id } => write!(f, "gathering class {}", class_id),
            State::Training { .. } => write!(f, "training"),
            State::Predicting => write!(f, "predicting"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    ToggleGather { class_id: usize },
    Train { counts_by_class: Vec<usize> },
    FitDone,
    FitFailed,
    Reset,
    Tick,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartLoop,
    StopLoop,
    GatherSample { class_id: usize },
    PredictFrame,
    Fit,
    ClearBuffer,
    Render,
}

pub fn init() -> (State, Vec<Effect>) {
    (State::Idle, vec![Effect::Render])
}

pub fn transition(
    config: &Config,
    state: State,
    msg: Msg,
) -> Result<(State, Vec<Effect>), SessionError> {
    match (state, msg) {
        (_, Msg::ToggleGather { class_id }) if class_id >= config.num_classes() => {
            Err(SessionError::InvalidClass {
                class_id,
                num_classes: config.num_classes(),
            })
        }
        (State::Idle, Msg::ToggleGather { class_id }) => Ok((
            State::Gathering { class_id },
            vec![Effect::StartLoop, Effect::Render],
        )),
        (State::Gathering { class_id: active }, Msg::ToggleGather { class_id })
            if active == class_id =>
        {
            Ok((State::Idle, vec![Effect::StopLoop, Effect::Render]))
        }
        (State::Predicting, Msg::ToggleGather { class_id }) => Ok((
            State::Gathering { class_id },
            vec![Effect::StopLoop, Effect::StartLoop, Effect::Render],
        )),
        (state @ (State::Gathering { .. } | State::Training { .. }), Msg::ToggleGather { .. }) => {
            Err(SessionError::StateConflict {
                operation: "toggle gathering",
                state: state.to_string(),
            })
        }

        (State::Idle | State::Predicting, Msg::Train { counts_by_class }) => {
            let missing: Vec<String> = config
                .class_names
                .iter()
                .enumerate()
                .filter(|(class_id, _)| counts_by_class.get(*class_id).copied().unwrap_or(0) == 0)
                .map(|(_, name)| name.clone())
                .collect();
            if !missing.is_empty() {
                return Err(SessionError::InsufficientData { missing });
            }

            let resume = match state {
                State::Predicting => Resume::Predicting,
                _ => Resume::Idle,
            };
            Ok((
                State::Training { resume },
                vec![Effect::StopLoop, Effect::Render, Effect::Fit],
            ))
        }
        (state, Msg::Train { .. }) => Err(SessionError::StateConflict {
            operation: "train",
            state: state.to_string(),
        }),

        (State::Training { .. }, Msg::FitDone) => Ok((
            State::Predicting,
            vec![Effect::StartLoop, Effect::Render],
        )),
        (State::Training { resume }, Msg::FitFailed) => match resume {
            Resume::Idle => Ok((State::Idle, vec![Effect::Render])),
            Resume::Predicting => Ok((
                State::Predicting,
                vec![Effect::StartLoop, Effect::Render],
            )),
        },
        (state, Msg::FitDone | Msg::FitFailed) => Ok((state, vec![])),

        (_, Msg::Reset) => Ok((
            State::Idle,
            vec![Effect::StopLoop, Effect::ClearBuffer, Effect::Render],
        )),

        (State::Gathering { class_id }, Msg::Tick) => Ok((
            state,
            vec![Effect::GatherSample { class_id }, Effect::Render],
        )),
        (State::Predicting, Msg::Tick) => Ok((state, vec![Effect::PredictFrame, Effect::Render])),
        (state @ (State::Idle | State::Training { .. }), Msg::Tick) => Ok((state, vec![])),
    }
}
