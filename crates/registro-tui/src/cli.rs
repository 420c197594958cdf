//! One-shot commands that run a single operation and print plain text.

use crate::display::format_fecha;
use crate::outcome::{OperationKind, Outcome};
use anyhow::anyhow;
use clap::Subcommand;
use log::{info, warn};
use registro_client::{ExportSink, RecordsApi};
use registro_protocol::{Persona, PersonaDraft, SearchFilter};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print every record, newest first
    List,

    /// Print records matching a name and/or city
    Search {
        /// Name fragment to match
        #[arg(long, default_value = "")]
        nombre: String,
        /// City to match
        #[arg(long, default_value = "")]
        ciudad: String,
    },

    /// Register a new person
    Add {
        #[arg(long, default_value = "")]
        nombre: String,
        #[arg(long, default_value = "")]
        apellido: String,
        #[arg(long, default_value = "")]
        ciudad: String,
        #[arg(long, default_value = "")]
        ocupacion: String,
        #[arg(long, default_value = "")]
        relato: String,
    },

    /// Download the spreadsheet of all records
    Export {
        /// Directory to save into (defaults to the configured export directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

impl Command {
    /// Export directory requested on the command line, if any.
    pub fn export_dir(&self) -> Option<&Path> {
        match self {
            Command::Export { dir } => dir.as_deref(),
            _ => None,
        }
    }
}

/// Run one command to completion, writing its report to `out`.
///
/// # Errors
/// Returns the failure message of the operation when the backend call fails
/// or the input is rejected, and any error writing to `out`.
pub async fn run_command(
    command: Command,
    api: &dyn RecordsApi,
    sink: &dyn ExportSink,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::List => {
            let records = list(api).await?;
            write_records(out, &records)?;
        }
        Command::Search { nombre, ciudad } => {
            let filter = SearchFilter { nombre, ciudad };
            let records = if filter.is_empty() {
                list(api).await?
            } else {
                info!("searching records");
                api.search(&filter)
                    .await
                    .map_err(|err| failed(OperationKind::Search, err))?
            };
            write_records(out, &records)?;
        }
        Command::Add {
            nombre,
            apellido,
            ciudad,
            ocupacion,
            relato,
        } => {
            let draft = PersonaDraft {
                nombre,
                apellido,
                ciudad,
                ocupacion,
                relato,
            };
            if !draft.has_required_fields() {
                return Err(anyhow!(Outcome::missing_required().render()));
            }
            info!("creating record");
            api.create(&draft)
                .await
                .map_err(|err| failed(OperationKind::Create, err))?;
            writeln!(out, "{}", Outcome::created().render())?;

            // The record is saved even when the refreshed list cannot be fetched.
            match list(api).await {
                Ok(records) => write_records(out, &records)?,
                Err(err) => writeln!(out, "{err}")?,
            }
        }
        Command::Export { .. } => {
            info!("exporting spreadsheet");
            let contents = api
                .export_spreadsheet()
                .await
                .map_err(|err| failed(OperationKind::Export, err))?;
            let path = sink
                .save(&contents)
                .await
                .map_err(|err| failed(OperationKind::Export, err))?;
            writeln!(out, "{}", Outcome::exported(path.display()).render())?;
        }
    }
    Ok(())
}

async fn list(api: &dyn RecordsApi) -> anyhow::Result<Vec<Persona>> {
    info!("loading records");
    api.list().await.map_err(|err| failed(OperationKind::Load, err))
}

fn failed(kind: OperationKind, err: registro_client::ClientError) -> anyhow::Error {
    warn!("backend request failed: {err}");
    anyhow!(Outcome::failure(kind, err).render())
}

fn write_records(out: &mut impl Write, records: &[Persona]) -> std::io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "📭 No hay personas registradas");
    }
    for (idx, persona) in records.iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", persona.full_name())?;
        let optional = [
            ("📍 Ciudad", persona.ciudad()),
            ("💼 Ocupación", persona.ocupacion()),
            ("📝 Relato", persona.relato()),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                writeln!(out, "  {label}: {value}")?;
            }
        }
        writeln!(out, "  📅 {}", format_fecha(persona.fecha.as_deref()))?;
    }
    Ok(())
}
