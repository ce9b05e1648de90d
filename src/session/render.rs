use crate::classifier_head::Prediction;
use crate::error::SessionError;
use crate::session::core::State;
use crate::session::main::Session;

pub fn status_lines(
    state: &State,
    class_names: &[String],
    counts_by_class: &[usize],
    prediction: Option<&Prediction>,
) -> Vec<String> {
    match state {
        State::Training { .. } => vec!["Training...".to_string()],
        State::Predicting => match prediction {
            Some(prediction) => vec![format!(
                "Prediction: {} with {}% confidence",
                prediction.class_name, prediction.confidence
            )],
            None => vec!["Prediction: waiting for frame".to_string()],
        },
        State::Idle | State::Gathering { .. } => {
            if counts_by_class.iter().all(|count| *count == 0) {
                return vec!["Gather class data".to_string()];
            }
            class_names
                .iter()
                .zip(counts_by_class)
                .map(|(name, count)| format!("{} data count: {}", name, count))
                .collect()
        }
    }
}

impl Session {
    pub fn render(&self) -> Result<(), SessionError> {
        let lines = status_lines(
            &self.state,
            &self.config.class_names,
            self.buffer.counts_by_class(),
            self.prediction.as_ref(),
        );

        let mut display = self
            .display
            .lock()
            .map_err(|_| SessionError::Display("display lock poisoned".into()))?;

        display.clear().map_err(SessionError::Display)?;
        for (line, text) in lines.iter().enumerate().take(display.max_lines()) {
            display.write_line(line, text).map_err(SessionError::Display)?;
        }
        display.flush().map_err(SessionError::Display)
    }
}
