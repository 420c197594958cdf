//! TUI event types for input and backend completions.

use crate::outcome::OperationKind;
use crate::requests::Ticket;
use crossterm::event::KeyEvent;
use registro_protocol::{Persona, PersonaDraft, SearchFilter};
use std::path::PathBuf;

/// Application event emitted by input handlers or request tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Periodic tick event.
    Tick,
    /// A backend request finished.
    Completed(Completion),
    /// Scroll event in the record list.
    Scroll(i16),
}

/// Request the view wants issued against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List(Ticket),
    Search(Ticket, SearchFilter),
    Create(Ticket, PersonaDraft),
    Export(Ticket),
}

impl Request {
    pub fn ticket(&self) -> Ticket {
        match self {
            Request::List(ticket)
            | Request::Search(ticket, _)
            | Request::Create(ticket, _)
            | Request::Export(ticket) => *ticket,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.ticket().kind
    }
}

/// Finished request with its ticket and error text, if any.
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub result: CompletionResult,
}

#[derive(Debug)]
pub enum CompletionResult {
    Records(Result<Vec<Persona>, String>),
    Created(Result<(), String>),
    Exported(Result<PathBuf, String>),
}
