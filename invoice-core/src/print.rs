use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::error::{InvoiceError, Result};
use crate::models::Invoice;
use crate::render::{render, RenderFormat, RenderOptions};

/// A rendered document on its way to a print facility.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub id: Uuid,
    pub invoice_number: String,
    pub format: RenderFormat,
    pub document: String,
    pub created_at: DateTime<Utc>,
}

impl PrintJob {
    /// Renders `invoice` into a new job. The invoice is only borrowed.
    pub fn new(invoice: &Invoice, options: &RenderOptions, format: RenderFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            invoice_number: invoice.invoice_number.clone(),
            format,
            document: render(invoice, options, format),
            created_at: Utc::now(),
        }
    }
}

/// What a sink reports back after accepting a job.
#[derive(Debug, Clone, Serialize)]
pub struct PrintReceipt {
    pub job_id: Uuid,
    pub format: RenderFormat,
    pub location: String,
    pub bytes: usize,
    pub submitted_at: DateTime<Utc>,
}

/// Destination for rendered invoices (a printer, a spool directory, ...).
///
/// Submitting is one-shot: once `submit` returns, cancelling or
/// tracking the job is the destination's concern.
pub trait PrintSink: Send + Sync {
    fn submit(&self, job: &PrintJob) -> Result<PrintReceipt>;
}

/// Writes each job as a file into a spool directory.
#[derive(Debug, Clone)]
pub struct FilePrintSink {
    dir: PathBuf,
}

impl FilePrintSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<sanitized invoice number>-<job id prefix>.<ext>`
    pub fn path_for(&self, job: &PrintJob) -> PathBuf {
        let id = job.id.simple().to_string();
        let file_name = format!(
            "{}-{}.{}",
            sanitize_filename(&job.invoice_number),
            &id[..8],
            job.format.extension()
        );
        self.dir.join(file_name)
    }
}

impl PrintSink for FilePrintSink {
    fn submit(&self, job: &PrintJob) -> Result<PrintReceipt> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            InvoiceError::Print(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        let path = self.path_for(job);
        std::fs::write(&path, job.document.as_bytes())
            .map_err(|e| InvoiceError::Print(format!("cannot write {}: {}", path.display(), e)))?;

        info!("Print job {} written to {}", job.id, path.display());

        Ok(PrintReceipt {
            job_id: job.id,
            format: job.format,
            location: path.display().to_string(),
            bytes: job.document.len(),
            submitted_at: Utc::now(),
        })
    }
}

/// Renders the snapshot and hands it to `sink`.
pub fn print_invoice(
    invoice: &Invoice,
    options: &RenderOptions,
    format: RenderFormat,
    sink: &dyn PrintSink,
) -> Result<PrintReceipt> {
    let job = PrintJob::new(invoice, options, format);
    info!(
        "Submitting print job {} for invoice {:?} ({} bytes)",
        job.id,
        job.invoice_number,
        job.document.len()
    );
    sink.submit(&job)
}

/// Reduces free text to a safe file name stem, falling back to "invoice".
pub fn sanitize_filename(input: &str) -> String {
    let mapped: String = input
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = mapped.trim_matches(|c| c == '_' || c == '.');
    if trimmed.is_empty() {
        "invoice".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Keeps submitted jobs in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub jobs: std::sync::Mutex<Vec<PrintJob>>,
}

#[cfg(test)]
impl PrintSink for RecordingSink {
    fn submit(&self, job: &PrintJob) -> Result<PrintReceipt> {
        let mut jobs = self.jobs.lock().expect("sink lock poisoned");
        jobs.push(job.clone());
        Ok(PrintReceipt {
            job_id: job.id,
            format: job.format,
            location: format!("memory:{}", jobs.len() - 1),
            bytes: job.document.len(),
            submitted_at: job.created_at,
        })
    }
}
