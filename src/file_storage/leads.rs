//! Append-only lead document store
//!
//! Each captured lead is one pretty-printed JSON file under `leads/`, plus a
//! minimal entry in `leads/index.json` so listings never read every document.

use super::{ensure_dir, read_json, write_json, FileResult};
use crate::funnel::submission::LeadRepository;
use crate::models::Lead;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Version of the index file format
const INDEX_VERSION: u32 = 1;

/// Minimal lead metadata kept in the index for listing views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadIndexEntry {
    pub id: String,
    pub nome: String,
    pub project_type: Option<String>,
    pub created_at: String,
}

/// Index file wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadIndex {
    pub version: u32,
    pub updated_at: String,
    pub entries: Vec<LeadIndexEntry>,
}

impl Default for LeadIndex {
    fn default() -> Self {
        Self {
            version: INDEX_VERSION,
            updated_at: Utc::now().to_rfc3339(),
            entries: Vec::new(),
        }
    }
}

/// File-backed lead repository
#[derive(Debug, Clone)]
pub struct FileLeadStore {
    leads_dir: PathBuf,
}

impl FileLeadStore {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            leads_dir: base_dir.join("leads"),
        }
    }

    fn lead_path(&self, id: &str) -> PathBuf {
        self.leads_dir.join(format!("{}.json", id))
    }

    fn index_path(&self) -> PathBuf {
        self.leads_dir.join("index.json")
    }

    fn read_index(&self) -> LeadIndex {
        if !self.index_path().exists() {
            return LeadIndex::default();
        }
        match read_json(&self.index_path()) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Rebuilding lead index, existing one unreadable: {}", e);
                LeadIndex::default()
            }
        }
    }

    /// Persist a lead and register it in the index. Returns the new id.
    pub fn save(&self, lead: &Lead) -> FileResult<String> {
        ensure_dir(&self.leads_dir)?;

        let id = format!("lead_{}", &Uuid::new_v4().to_string().replace('-', "")[..12]);
        write_json(&self.lead_path(&id), lead)?;

        let mut index = self.read_index();
        index.entries.push(LeadIndexEntry {
            id: id.clone(),
            nome: lead.nome.clone(),
            project_type: lead.project_type.map(|p| {
                serde_json::to_value(p)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default()
            }),
            created_at: lead.created_at.clone(),
        });
        index.updated_at = Utc::now().to_rfc3339();

        // Index failures do not lose the document itself
        if let Err(e) = write_json(&self.index_path(), &index) {
            log::warn!("Lead {} saved but index update failed: {}", id, e);
        }

        Ok(id)
    }

    /// Read one lead document by id
    pub fn read(&self, id: &str) -> FileResult<Lead> {
        read_json(&self.lead_path(id))
    }

    /// List lead summaries, newest first
    pub fn list(&self) -> Vec<LeadIndexEntry> {
        let mut entries = self.read_index().entries;
        entries.reverse();
        entries
    }
}

impl LeadRepository for FileLeadStore {
    fn save_lead(&self, lead: &Lead) -> FileResult<String> {
        self.save(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormData, LeadContext, ProjectType};
    use tempfile::TempDir;

    fn sample_lead(nome: &str) -> Lead {
        let form = FormData {
            nome: nome.to_string(),
            email: "x@exemplo.com".to_string(),
            whatsapp: "11987654321".to_string(),
            project_type: Some(ProjectType::Simples),
            ..Default::default()
        };
        Lead::from_form(&form, &LeadContext::default())
    }

    #[test]
    fn test_save_and_read_lead() {
        let dir = TempDir::new().unwrap();
        let store = FileLeadStore::new(dir.path());

        let id = store.save(&sample_lead("Ana")).unwrap();
        assert!(id.starts_with("lead_"));
        assert_eq!(id.len(), "lead_".len() + 12);

        let loaded = store.read(&id).unwrap();
        assert_eq!(loaded.nome, "Ana");
        assert_eq!(loaded.whatsapp, "11987654321");
    }

    #[test]
    fn test_index_lists_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = FileLeadStore::new(dir.path());

        store.save(&sample_lead("Primeiro")).unwrap();
        store.save(&sample_lead("Segundo")).unwrap();

        let entries = store.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].nome, "Segundo");
        assert_eq!(entries[1].nome, "Primeiro");
        assert_eq!(entries[0].project_type.as_deref(), Some("simples"));
    }

    #[test]
    fn test_list_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = FileLeadStore::new(dir.path());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_corrupt_index_does_not_block_saves() {
        let dir = TempDir::new().unwrap();
        let store = FileLeadStore::new(dir.path());

        store.save(&sample_lead("Ana")).unwrap();
        std::fs::write(dir.path().join("leads").join("index.json"), "oops").unwrap();

        let id = store.save(&sample_lead("Bia")).unwrap();
        assert_eq!(store.read(&id).unwrap().nome, "Bia");
        // Index was rebuilt from scratch
        let entries = store.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].nome, "Bia");
    }
}
