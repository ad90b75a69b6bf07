// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::contract::models::ContractData;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// `<base>/<contract number>/`, created on demand.
    fn contract_dir(&self, data: &ContractData) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(data.contract_info.contract_number_or_unknown());
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves the extracted contract as pretty JSON, in the shape the dashboard loads.
    pub fn save_contract(&self, data: &ContractData, source_stem: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.contract_dir(data)?.join(format!("{}_contract.json", source_stem));

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved contract data to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the extraction in JSON format
    pub fn save_contract_metadata(&self, data: &ContractData, source_stem: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.contract_dir(data)?.join(format!("{}_contract_meta.json", source_stem));

        let metadata = serde_json::json!({
            "source": source_stem,
            "contract_number": data.contract_info.contract_number,
            "contract_name": data.contract_info.contract_name,
            "block_count": data.blocks.len(),
            "beneficiary_count": data.beneficiary_count(),
            "reference_dates": data.reference_dates(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }
}

/// Loads a pre-extracted dataset, such as the dashboard's default `data.json`.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<ContractData, StorageError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StorageError::NotFound(path.display().to_string()));
    }

    let raw = fs::read_to_string(path)?;
    let data: ContractData = serde_json::from_str(&raw)
        .map_err(|e| StorageError::SerializationError(format!("{}: {}", path.display(), e)))?;

    tracing::debug!("Loaded dataset {} with {} blocks", path.display(), data.blocks.len());
    Ok(data)
}
