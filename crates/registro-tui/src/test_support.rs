//! In-memory backend doubles for view and CLI tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use registro_client::{ClientError, ExportSink, RecordsApi};
use registro_protocol::{EXPORT_FILE_NAME, Persona, PersonaDraft, PersonaId, SearchFilter};
use std::path::PathBuf;

pub fn persona(id: i64, nombre: &str, apellido: &str) -> Persona {
    Persona {
        id: PersonaId::Number(id),
        nombre: nombre.to_string(),
        apellido: apellido.to_string(),
        ciudad: None,
        ocupacion: None,
        relato: None,
        fecha: None,
    }
}

/// Records backend kept in memory; newest record first like the service.
#[derive(Default)]
pub struct FakeApi {
    records: Mutex<Vec<Persona>>,
    calls: Mutex<Vec<String>>,
    fail_status: Mutex<Option<u16>>,
}

impl FakeApi {
    pub fn with_records(records: Vec<Persona>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make every later call fail with this status.
    pub fn fail_with(&self, status: u16) {
        *self.fail_status.lock() = Some(status);
    }

    pub fn recover(&self) {
        *self.fail_status.lock() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record_call(&self, call: String) -> Result<(), ClientError> {
        self.calls.lock().push(call);
        match *self.fail_status.lock() {
            Some(status) => Err(ClientError::Status {
                status,
                body: String::new(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordsApi for FakeApi {
    async fn list(&self) -> Result<Vec<Persona>, ClientError> {
        self.record_call("GET /personas".to_string())?;
        Ok(self.records.lock().clone())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Persona>, ClientError> {
        let query = filter
            .query_pairs()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        self.record_call(format!("GET /personas/buscar?{query}"))?;
        let matches = self
            .records
            .lock()
            .iter()
            .filter(|persona| filter.nombre.is_empty() || persona.nombre.contains(&filter.nombre))
            .filter(|persona| {
                filter.ciudad.is_empty() || persona.ciudad() == Some(filter.ciudad.as_str())
            })
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn create(&self, draft: &PersonaDraft) -> Result<(), ClientError> {
        self.record_call(format!("POST /personas {}", draft.nombre))?;
        let mut records = self.records.lock();
        let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());
        let persona = Persona {
            id: PersonaId::Number(records.len() as i64 + 1),
            nombre: draft.nombre.clone(),
            apellido: draft.apellido.clone(),
            ciudad: optional(&draft.ciudad),
            ocupacion: optional(&draft.ocupacion),
            relato: optional(&draft.relato),
            fecha: Some("2024-03-01T10:30:00".to_string()),
        };
        records.insert(0, persona);
        Ok(())
    }

    async fn export_spreadsheet(&self) -> Result<Vec<u8>, ClientError> {
        self.record_call("GET /personas/descargar/excel".to_string())?;
        Ok(b"xlsx".to_vec())
    }
}

/// Export sink that keeps saved payloads in memory.
#[derive(Default)]
pub struct MemorySink {
    saved: Mutex<Vec<Vec<u8>>>,
}

impl MemorySink {
    pub fn saved(&self) -> Vec<Vec<u8>> {
        self.saved.lock().clone()
    }
}

#[async_trait]
impl ExportSink for MemorySink {
    async fn save(&self, contents: &[u8]) -> Result<PathBuf, ClientError> {
        self.saved.lock().push(contents.to_vec());
        Ok(PathBuf::from("memory").join(EXPORT_FILE_NAME))
    }
}
