use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::editor::logo::{self, LogoSource};
use crate::editor::state::{Command, InvoiceEditor};
use crate::error::{InvoiceError, Result};
use crate::models::Invoice;

enum Request {
    Apply {
        command: Command,
        reply: oneshot::Sender<Result<Invoice>>,
    },
    Snapshot {
        reply: oneshot::Sender<Invoice>,
    },
}

/// Cloneable handle to the editor task.
///
/// The task owns the [`InvoiceEditor`] and applies requests strictly in
/// arrival order, so every state change goes through one serialized
/// path. The task exits once every handle has been dropped.
#[derive(Clone)]
pub struct EditorHandle {
    tx: mpsc::Sender<Request>,
    logo_max_bytes: Option<usize>,
}

impl EditorHandle {
    /// Spawns the editor task.
    ///
    /// # Arguments
    ///
    /// * `editor` - Initial editor state
    /// * `queue_depth` - Capacity of the request channel (at least 1)
    /// * `logo_max_bytes` - Optional size limit applied to logo loads
    ///
    /// # Returns
    ///
    /// The handle and the task's join handle, which yields the final
    /// editor state once the task stops.
    pub fn spawn(
        editor: InvoiceEditor,
        queue_depth: usize,
        logo_max_bytes: Option<usize>,
    ) -> (Self, JoinHandle<InvoiceEditor>) {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let task = tokio::spawn(run(editor, rx));
        (Self { tx, logo_max_bytes }, task)
    }

    /// Applies a command and returns the state right after it.
    ///
    /// # Errors
    ///
    /// Propagates the editor's rejection of the command, or
    /// `EditorUnavailable` if the task has stopped.
    pub async fn apply(&self, command: Command) -> Result<Invoice> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Apply { command, reply })
            .await
            .map_err(|_| InvoiceError::EditorUnavailable)?;
        rx.await.map_err(|_| InvoiceError::EditorUnavailable)?
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> Result<Invoice> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Snapshot { reply })
            .await
            .map_err(|_| InvoiceError::EditorUnavailable)?;
        rx.await.map_err(|_| InvoiceError::EditorUnavailable)
    }

    /// Starts a background logo load.
    ///
    /// On success the task submits a single `SetLogo` command through the
    /// same channel as every other mutation. On failure the current logo
    /// is kept and the error is only logged. The returned handle resolves
    /// to whether the logo was replaced; callers may simply drop it.
    pub fn load_logo(&self, source: LogoSource) -> JoinHandle<bool> {
        let handle = self.clone();
        tokio::spawn(async move {
            let data_uri = match logo::load(source, handle.logo_max_bytes).await {
                Ok(uri) => uri,
                Err(e) => {
                    warn!("Ignoring logo update: {}", e);
                    return false;
                }
            };

            match handle.apply(Command::SetLogo(data_uri)).await {
                Ok(_) => {
                    info!("Logo updated");
                    true
                }
                Err(e) => {
                    warn!("Logo loaded but could not be applied: {}", e);
                    false
                }
            }
        })
    }
}

async fn run(mut editor: InvoiceEditor, mut rx: mpsc::Receiver<Request>) -> InvoiceEditor {
    info!("Invoice editor started");

    while let Some(request) = rx.recv().await {
        match request {
            Request::Apply { command, reply } => {
                let result = editor.apply(command).map(|_| editor.snapshot());
                if let Err(e) = &result {
                    warn!("Editor command rejected: {}", e);
                }
                // The caller may have gone away; the change stands regardless.
                let _ = reply.send(result);
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(editor.snapshot());
            }
        }
    }

    info!("Invoice editor stopped");
    editor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemField, PartyField};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_apply_returns_updated_snapshot() {
        let (handle, _task) = EditorHandle::spawn(InvoiceEditor::new(), 8, None);

        let invoice = handle
            .apply(Command::SetIssuer {
                field: PartyField::Name,
                value: "Acme".into(),
            })
            .await
            .expect("command should apply");

        assert_eq!(invoice.issuer.name, "Acme");
        assert_eq!(handle.snapshot().await.unwrap().issuer.name, "Acme");
    }

    #[tokio::test]
    async fn test_commands_apply_in_order() {
        let (handle, _task) = EditorHandle::spawn(InvoiceEditor::new(), 4, None);

        for i in 0..20 {
            handle
                .apply(Command::UpdateItem {
                    index: 0,
                    field: ItemField::Quantity,
                    value: i.to_string(),
                })
                .await
                .unwrap();
        }

        let invoice = handle.snapshot().await.unwrap();
        assert_eq!(invoice.items[0].quantity, Decimal::from(19));
    }

    #[tokio::test]
    async fn test_rejected_command_surfaces_error() {
        let (handle, _task) = EditorHandle::spawn(InvoiceEditor::new(), 4, None);

        let result = handle.apply(Command::RemoveItem { index: 3 }).await;

        assert!(matches!(
            result,
            Err(InvoiceError::ItemIndexOutOfBounds { index: 3, len: 1 })
        ));
    }

    #[tokio::test]
    async fn test_logo_load_applies_through_channel() {
        let (handle, _task) = EditorHandle::spawn(InvoiceEditor::new(), 4, None);

        let applied = handle
            .load_logo(LogoSource::Bytes {
                mime: "image/png".into(),
                bytes: vec![1, 2, 3],
            })
            .await
            .expect("logo task should not panic");

        assert!(applied);
        let logo = handle.snapshot().await.unwrap().logo;
        assert_eq!(logo.as_deref(), Some("data:image/png;base64,AQID"));
    }

    #[tokio::test]
    async fn test_failed_logo_load_keeps_previous_logo() {
        let (handle, _task) = EditorHandle::spawn(InvoiceEditor::new(), 4, Some(2));
        handle
            .apply(Command::SetLogo("data:image/png;base64,AA==".into()))
            .await
            .unwrap();

        let applied = handle
            .load_logo(LogoSource::Bytes {
                mime: "image/png".into(),
                bytes: vec![0; 10],
            })
            .await
            .unwrap();

        assert!(!applied);
        let logo = handle.snapshot().await.unwrap().logo;
        assert_eq!(logo.as_deref(), Some("data:image/png;base64,AA=="));
    }

    #[tokio::test]
    async fn test_task_returns_state_when_handles_drop() {
        let (handle, task) = EditorHandle::spawn(InvoiceEditor::new(), 4, None);
        handle.apply(Command::AddItem).await.unwrap();
        drop(handle);

        let editor = task.await.expect("editor task should finish");
        assert_eq!(editor.invoice().items.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_logo_file_keeps_draft_logo() {
        let draft = Invoice {
            logo: Some("data:image/png;base64,AA==".into()),
            ..Invoice::new()
        };
        let (handle, task) = EditorHandle::spawn(InvoiceEditor::from_invoice(draft), 4, None);

        let applied = handle
            .load_logo(LogoSource::File("/nonexistent/logo.png".into()))
            .await
            .unwrap();

        assert!(!applied);
        drop(handle);
        let editor = task.await.unwrap();
        assert_eq!(editor.invoice().logo.as_deref(), Some("data:image/png;base64,AA=="));
    }
}
