//! Terminal renderers for quiz events.

use std::io::Write;

use bioskills_core::{Event, Renderer};

/// Human-readable output.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &Event) -> std::io::Result<()> {
        let out = &mut self.out;
        match event {
            Event::SetLoaded {
                resource,
                total,
                time_budget,
                ..
            } => {
                writeln!(out, "Loaded {resource}: {total} questions, {time_budget}s each")?;
            }
            Event::LoadFailed {
                resource,
                message,
                reason,
                ..
            } => {
                writeln!(out, "{message} from {resource}: {reason}")?;
            }
            Event::QuestionStarted {
                number,
                total,
                prompt,
                options,
                time_budget,
                score,
                ..
            } => {
                writeln!(out)?;
                writeln!(out, "Score: {score}")?;
                writeln!(out, "Question {number}/{total}: {prompt}")?;
                for (i, option) in options.iter().enumerate() {
                    writeln!(out, "  {}) {option}", i + 1)?;
                }
                writeln!(out, "You have {time_budget}s.")?;
            }
            Event::TimerTicked {
                remaining, warning, ..
            } => {
                if *warning && *remaining > 0 {
                    writeln!(out, "  {remaining}s left")?;
                }
            }
            Event::AnswerSubmitted {
                correct,
                answer,
                explanation,
                score,
                ..
            } => {
                if *correct {
                    writeln!(out, "Correct! {explanation}")?;
                } else {
                    writeln!(out, "Not quite. The answer is {answer}. {explanation}")?;
                }
                writeln!(out, "Score: {score}  (n = next)")?;
            }
            Event::TimedOut {
                answer,
                explanation,
                ..
            } => {
                writeln!(out, "Time's up! The answer is {answer}. {explanation}")?;
                writeln!(out, "(n = next)")?;
            }
            Event::QuizFinished { score, total, .. } => {
                writeln!(out)?;
                writeln!(out, "Quiz Complete!")?;
                writeln!(out, "Your final score is {score} out of {total}.")?;
                writeln!(out, "Keep practicing your Bio-skills!")?;
                writeln!(out, "(r = restart, q = quit)")?;
            }
            Event::Error { message, .. } => {
                writeln!(out, "Error: {message}")?;
            }
            Event::StateSnapshot {
                state,
                index,
                total,
                score,
                time_remaining,
                ..
            } => {
                writeln!(
                    out,
                    "[{state:?}] question {index}/{total}, score {score}, {time_remaining}s left"
                )?;
            }
        }
        out.flush()
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, event: &Event) {
        if let Err(e) = self.write_event(event) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

/// One JSON object per line.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, event: &Event) {
        let written = serde_json::to_string(event)
            .map_err(std::io::Error::from)
            .and_then(|line| {
                writeln!(self.out, "{line}")?;
                self.out.flush()
            });
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write event");
        }
    }
}
