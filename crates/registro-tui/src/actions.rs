//! Runs view requests against the backend and reports completions.

use crate::event::{AppEvent, Completion, CompletionResult, Request};
use log::{debug, warn};
use registro_client::{ExportSink, RecordsApi};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Spawns one task per request and forwards its completion to the event loop.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn RecordsApi>,
    sink: Arc<dyn ExportSink>,
    sender: mpsc::Sender<AppEvent>,
}

impl Dispatcher {
    pub fn new(
        api: Arc<dyn RecordsApi>,
        sink: Arc<dyn ExportSink>,
        sender: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self { api, sink, sender }
    }

    /// Issue a request in the background.
    pub fn dispatch(&self, request: Request) {
        let api = self.api.clone();
        let sink = self.sink.clone();
        let sender = self.sender.clone();
        debug!("dispatching request (kind={:?})", request.kind());
        tokio::spawn(async move {
            let completion = execute(api.as_ref(), sink.as_ref(), request).await;
            if sender.send(AppEvent::Completed(completion)).await.is_err() {
                debug!("event loop closed before completion was delivered");
            }
        });
    }
}

/// Run a single request to completion.
pub async fn execute(api: &dyn RecordsApi, sink: &dyn ExportSink, request: Request) -> Completion {
    let ticket = request.ticket();
    let result = match request {
        Request::List(_) => CompletionResult::Records(api.list().await.map_err(describe)),
        Request::Search(_, filter) => {
            CompletionResult::Records(api.search(&filter).await.map_err(describe))
        }
        Request::Create(_, draft) => {
            CompletionResult::Created(api.create(&draft).await.map_err(describe))
        }
        Request::Export(_) => {
            let saved = match api.export_spreadsheet().await {
                Ok(contents) => sink.save(&contents).await,
                Err(err) => Err(err),
            };
            CompletionResult::Exported(saved.map_err(describe))
        }
    };
    Completion { ticket, result }
}

fn describe(err: registro_client::ClientError) -> String {
    warn!("backend request failed: {err}");
    err.to_string()
}
