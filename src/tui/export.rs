use crate::text_summary;
use crate::wizard::WizardSnapshot;
use anyhow::Result;
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

// Linux clipboard managers read lazily; the owner must outlive the write.
const CLIPBOARD_HOLD: Duration = Duration::from_secs(2);

/// Plain-text rendering of the current result set, if one is shown.
pub fn results_as_text(snapshot: &WizardSnapshot) -> Option<String> {
    let recs = snapshot.state.recommendations()?;
    let selection = snapshot.state.selection()?;
    let mut lines = vec![format!(
        "{} {} ideas for a {} mood",
        selection.meal_type.emoji.as_deref().unwrap_or(""),
        selection.meal_type.name,
        selection.mood.name
    )
    .trim_start()
    .to_string()];
    lines.push(String::new());
    lines.extend(text_summary::format_cards(recs));
    Some(lines.join("\n"))
}

/// Outcome of one clipboard write, reported back to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyStatus {
    Copied { cards: usize },
    Failed(String),
}

impl CopyStatus {
    pub fn to_message(&self) -> String {
        match self {
            CopyStatus::Copied { cards: 1 } => "Copied 1 recommendation to clipboard".into(),
            CopyStatus::Copied { cards } => format!("Copied {cards} recommendations to clipboard"),
            CopyStatus::Failed(reason) => format!("Copy failed: {reason}"),
        }
    }
}

struct CopyJob {
    text: String,
    cards: usize,
}

/// Clipboard writer on its own thread. Jobs run in order; each result comes
/// back through [`ClipboardWorker::poll`].
pub struct ClipboardWorker {
    jobs: std_mpsc::Sender<CopyJob>,
    status: std_mpsc::Receiver<CopyStatus>,
}

impl ClipboardWorker {
    pub fn spawn() -> Self {
        let (jobs, job_rx) = std_mpsc::channel::<CopyJob>();
        let (status_tx, status) = std_mpsc::channel::<CopyStatus>();

        std::thread::spawn(move || {
            for job in job_rx {
                let written = arboard::Clipboard::new().and_then(|mut clipboard| {
                    clipboard.set_text(job.text)?;
                    Ok(clipboard)
                });
                match written {
                    Ok(clipboard) => {
                        let _ = status_tx.send(CopyStatus::Copied { cards: job.cards });
                        std::thread::sleep(CLIPBOARD_HOLD);
                        drop(clipboard);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "clipboard write failed");
                        let _ = status_tx.send(CopyStatus::Failed(e.to_string()));
                    }
                }
            }
        });

        Self { jobs, status }
    }

    /// Queue `text` for the clipboard without blocking the UI thread.
    pub fn copy(&self, text: String, cards: usize) -> Result<()> {
        self.jobs
            .send(CopyJob { text, cards })
            .map_err(|_| anyhow::anyhow!("clipboard worker stopped"))
    }

    /// Latest finished write, if any.
    pub fn poll(&self) -> Option<CopyStatus> {
        self.status.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::model::{CuisineSelection, FoodRecommendation};
    use crate::wizard::{Selection, WizardState};

    #[test]
    fn renders_results_for_clipboard() {
        let state = WizardState::Results {
            selection: Selection {
                mood: catalog::find_mood("Comforting").unwrap(),
                meal_type: catalog::find_meal_type("Dinner").unwrap(),
                cuisines: CuisineSelection::new(),
            },
            recommendations: vec![FoodRecommendation {
                name: "Mac and Cheese".into(),
                description: "Baked, bubbling".into(),
                reason: "Pure comfort".into(),
            }],
        };
        let text = results_as_text(&WizardSnapshot::from(&state)).unwrap();
        assert!(text.contains("Dinner ideas for a Comforting mood"));
        assert!(text.contains("1. Mac and Cheese"));
        assert!(text.contains("Why: Pure comfort"));
    }

    #[test]
    fn copy_status_messages() {
        assert_eq!(
            CopyStatus::Copied { cards: 1 }.to_message(),
            "Copied 1 recommendation to clipboard"
        );
        assert_eq!(
            CopyStatus::Copied { cards: 3 }.to_message(),
            "Copied 3 recommendations to clipboard"
        );
        assert_eq!(
            CopyStatus::Failed("no display".into()).to_message(),
            "Copy failed: no display"
        );
    }

    #[test]
    fn nothing_to_copy_without_results() {
        assert!(results_as_text(&WizardSnapshot::from(&WizardState::initial())).is_none());
    }
}
