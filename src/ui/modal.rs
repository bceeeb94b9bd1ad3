use std::cell::Cell;
use std::io::{self, Write};

use tracing::debug;

use crate::domain::ticket::TicketSummary;
use crate::domain::validation::FieldErrors;
use crate::workflow::submission::SubmissionState;

/// Page-wide presentation state shared by whatever is drawn on top of it.
#[derive(Debug, Default)]
pub struct Viewport {
    scroll_locks: Cell<usize>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locks.get() > 0
    }

    pub fn lock_scroll(&self) -> ScrollLock<'_> {
        self.scroll_locks.set(self.scroll_locks.get() + 1);
        debug!(holders = self.scroll_locks.get(), "scroll locked");
        ScrollLock { viewport: self }
    }
}

/// Keeps the page from scrolling until dropped.
#[must_use = "scrolling is released as soon as the lock is dropped"]
pub struct ScrollLock<'a> {
    viewport: &'a Viewport,
}

impl Drop for ScrollLock<'_> {
    fn drop(&mut self) {
        let holders = self.viewport.scroll_locks.get().saturating_sub(1);
        self.viewport.scroll_locks.set(holders);
        debug!(holders, "scroll lock released");
    }
}

/// The success summary. Holds the scroll lock for as long as it is open.
pub struct SummaryModal<'a> {
    summary: &'a TicketSummary,
    _lock: ScrollLock<'a>,
}

impl<'a> SummaryModal<'a> {
    pub fn open(viewport: &'a Viewport, summary: &'a TicketSummary) -> Self {
        Self {
            summary,
            _lock: viewport.lock_scroll(),
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let summary = self.summary;
        writeln!(out, "┌─ ¡Ticket creado exitosamente! ─────────────")?;
        writeln!(out, "│ Número de ticket:  {}", summary.id)?;
        if let Some(reference) = summary.reference.as_deref().filter(|r| *r != summary.id) {
            writeln!(out, "│ Referencia:        {reference}")?;
        }
        writeln!(out, "│ Fecha de creación: {}", summary.created_at)?;
        writeln!(out, "│ Estado:            {}", summary.status)?;
        writeln!(out, "│ Prioridad:         {}", summary.priority)?;
        writeln!(out, "│ Título:            {}", summary.title)?;
        writeln!(out, "│ Tiempo estimado:   {}", summary.estimated_time)?;
        writeln!(out, "│ Asignado a:        {}", summary.assigned_to)?;
        if summary.provisional_company {
            writeln!(
                out,
                "│ Nota: la empresa se registró de forma provisional."
            )?;
        }
        writeln!(out, "└────────────────────────────────────────────")?;
        Ok(())
    }

    pub fn close(self) {}
}

pub fn render_loading(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Enviando ticket...")
}

pub fn render_banner(out: &mut impl Write, message: &str, errors: &FieldErrors) -> io::Result<()> {
    writeln!(out, "✗ {message}")?;
    for (field, detail) in errors.iter() {
        writeln!(out, "  - {}: {detail}", field.label())?;
    }
    Ok(())
}

/// Draws the page behind any modal: the loading line, the error banner or a
/// one-line confirmation. Nothing is drawn while a modal holds the scroll lock.
pub fn render_state(
    out: &mut impl Write,
    viewport: &Viewport,
    state: &SubmissionState,
    errors: &FieldErrors,
) -> io::Result<()> {
    if viewport.is_scroll_locked() {
        debug!(state = state.name(), "page covered by modal, skipping redraw");
        return Ok(());
    }
    match state {
        SubmissionState::Idle => Ok(()),
        SubmissionState::Submitting => render_loading(out),
        SubmissionState::Error { message } => render_banner(out, message, errors),
        SubmissionState::Success(summary) => writeln!(out, "✓ Ticket {} enviado", summary.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::Field;

    fn summary() -> TicketSummary {
        TicketSummary {
            id: "TKT-004211".to_string(),
            reference: Some("TKT-004211".to_string()),
            created_at: "14/03/2026 09:30".to_string(),
            status: "Abierto".to_string(),
            priority: "Alta".to_string(),
            title: "Laptop no enciende".to_string(),
            estimated_time: "2-4 horas".to_string(),
            assigned_to: "Equipo de soporte".to_string(),
            provisional_company: true,
        }
    }

    #[test]
    fn modal_holds_scroll_lock_until_closed() {
        let viewport = Viewport::new();
        let summary = summary();

        let modal = SummaryModal::open(&viewport, &summary);
        assert!(viewport.is_scroll_locked());
        modal.close();
        assert!(!viewport.is_scroll_locked());
    }

    #[test]
    fn lock_is_released_on_early_return() {
        fn render_then_fail(viewport: &Viewport, summary: &TicketSummary) -> io::Result<()> {
            let _modal = SummaryModal::open(viewport, summary);
            Err(io::Error::other("terminal closed"))
        }

        let viewport = Viewport::new();
        assert!(render_then_fail(&viewport, &summary()).is_err());
        assert!(!viewport.is_scroll_locked());
    }

    #[test]
    fn nested_locks_release_independently() {
        let viewport = Viewport::new();
        let outer = viewport.lock_scroll();
        {
            let _inner = viewport.lock_scroll();
        }
        assert!(viewport.is_scroll_locked());
        drop(outer);
        assert!(!viewport.is_scroll_locked());
    }

    #[test]
    fn renders_summary_modal() {
        let viewport = Viewport::new();
        let summary = summary();
        let mut out = Vec::new();

        let modal = SummaryModal::open(&viewport, &summary);
        modal.render(&mut out).unwrap();
        modal.close();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("TKT-004211"));
        assert!(text.contains("2-4 horas"));
        assert!(text.contains("provisional"));
        assert!(!text.contains("Referencia"));
    }

    #[test]
    fn renders_banner_with_field_errors() {
        let viewport = Viewport::new();
        let mut errors = FieldErrors::default();
        errors.insert(Field::ContactEmail, "Ingresa un email válido");
        let mut out = Vec::new();

        render_state(
            &mut out,
            &viewport,
            &SubmissionState::Error {
                message: "Por favor corrige los campos marcados".to_string(),
            },
            &errors,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("✗ Por favor corrige los campos marcados"));
        assert!(text.contains("Email: Ingresa un email válido"));
    }

    #[test]
    fn open_modal_covers_the_page() {
        let viewport = Viewport::new();
        let summary = summary();
        let state = SubmissionState::Success(summary.clone());

        let modal = SummaryModal::open(&viewport, &summary);
        let mut covered = Vec::new();
        render_state(&mut covered, &viewport, &state, &FieldErrors::default()).unwrap();
        assert!(covered.is_empty());
        modal.close();

        let mut page = Vec::new();
        render_state(&mut page, &viewport, &state, &FieldErrors::default()).unwrap();
        assert_eq!(String::from_utf8(page).unwrap(), "✓ Ticket TKT-004211 enviado\n");
    }
}
